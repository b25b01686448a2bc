use crate::core::geo::{TileCoordinate, YScheme};
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
///
/// Coordinates are always handed over in XYZ; a source addressing rows
/// differently flips them itself.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: &TileCoordinate) -> String;
}

/// Template-driven source, e.g. `https://host/maps/{code}/{z}/{x}/{y}.jpg`.
///
/// `{code}` is optional and picks one dated map version.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSource {
    template: String,
    y_scheme: YScheme,
}

impl TemplateSource {
    pub fn new(template: impl Into<String>, y_scheme: YScheme) -> Self {
        Self {
            template: template.into(),
            y_scheme,
        }
    }

    /// Source for one map version. Templates without `{code}` ignore it.
    pub fn for_version(template: &str, code: &str, y_scheme: YScheme) -> Self {
        Self::new(template.replace("{code}", code), y_scheme)
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for TemplateSource {
    fn url(&self, coord: &TileCoordinate) -> String {
        self.template
            .replace("{z}", &coord.zoom.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.row_in(self.y_scheme).to_string())
    }
}

/// Lighting variant served by the authenticated proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Daytime,
    Nighttime,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daytime => "daytime",
            Self::Nighttime => "nighttime",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Daytime => Self::Nighttime,
            Self::Nighttime => Self::Daytime,
        }
    }
}

/// Source behind the header-injecting relay, laid out as
/// `{base}z{z}/{x}_{y}.jpg?mode={daytime|nighttime}`. Rows are XYZ unless
/// the relayed provider says otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxySource {
    base_url: String,
    mode: TimeOfDay,
    y_scheme: YScheme,
}

impl ProxySource {
    pub fn new(base_url: impl Into<String>, mode: TimeOfDay) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            mode,
            y_scheme: YScheme::Xyz,
        }
    }

    pub fn with_scheme(mut self, y_scheme: YScheme) -> Self {
        self.y_scheme = y_scheme;
        self
    }

    pub fn mode(&self) -> TimeOfDay {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TimeOfDay) {
        self.mode = mode;
    }
}

impl TileSource for ProxySource {
    fn url(&self, coord: &TileCoordinate) -> String {
        format!(
            "{}z{}/{}_{}.jpg?mode={}",
            self.base_url,
            coord.zoom,
            coord.x,
            coord.row_in(self.y_scheme),
            self.mode.as_str()
        )
    }
}
