//! Park and map-version configuration
//!
//! Each park publishes its own tile pyramid: a URL template, a zoom range,
//! the direction of its Y axis and, per zoom, the rectangle of tiles that
//! actually exist. The built-in catalog mirrors the parks the viewer ships
//! with; callers can load their own from JSON of the same shape.

use crate::core::bounds::ProjectedExtent;
use crate::core::constants::{DEFAULT_PARK_ID, FALLBACK_CENTER};
use crate::core::geo::{LatLng, YScheme};
use crate::prelude::HashMap;
use crate::tiles::extent::{compute_island_extent, TileIndexBounds, TileRange};
use crate::tiles::source::{ProxySource, TemplateSource, TileSource, TimeOfDay};
use crate::{MapError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template marker for parks whose tiles go through the authenticating relay
pub const PROXY_TEMPLATE: &str = "tdr-proxy";

static BUILTIN_PARKS: Lazy<ParkCatalog> = Lazy::new(|| {
    // Checked by test_builtin_catalog_loads.
    ParkCatalog::from_json(include_str!("data/parks.json")).unwrap_or_else(|e| {
        log::error!("built-in park catalog is invalid: {}", e);
        ParkCatalog::default()
    })
});

/// A named viewpoint inside a park
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkLocation {
    /// `(lon, lat)`
    pub coords: (f64, f64),
    pub zoom: f64,
    #[serde(default)]
    pub rotation: Option<f64>,
    pub name: String,
}

impl ParkLocation {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::from_lon_lat(self.coords)
    }
}

/// Starting camera for a park
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialView {
    pub center: LatLng,
    pub zoom: f64,
    /// Clockwise, in degrees
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkConfig {
    pub park_id: String,
    pub name: String,
    /// `{code}`, `{z}`, `{x}` and `{y}` are substituted; [`PROXY_TEMPLATE`]
    /// routes tiles through `proxy_url` instead.
    pub tile_template: String,
    #[serde(default)]
    pub proxy_url: Option<String>,
    pub min_zoom: u8,
    pub max_zoom: u8,
    #[serde(default)]
    pub y_scheme: YScheme,
    /// `(lon, lat)`
    #[serde(default)]
    pub default_center: Option<(f64, f64)>,
    #[serde(default)]
    pub default_zoom: Option<f64>,
    #[serde(default)]
    pub default_rotation: Option<f64>,
    /// Zoom level (as a string key) → existing tile rectangle, rows in `y_scheme`
    #[serde(default)]
    pub bounds_by_zoom: BTreeMap<String, TileRange>,
    #[serde(default)]
    pub locations: Vec<ParkLocation>,
}

impl ParkConfig {
    /// Tile bounds per zoom. Keys that are not zoom levels are skipped.
    pub fn tile_index_bounds(&self) -> Vec<TileIndexBounds> {
        self.bounds_by_zoom
            .iter()
            .filter_map(|(key, range)| match key.trim().parse::<u8>() {
                Ok(zoom) => Some(range.at_zoom(zoom)),
                Err(_) => {
                    log::warn!("park {}: ignoring bounds key {:?}", self.park_id, key);
                    None
                }
            })
            .collect()
    }

    /// Padded projected extent of the park's tiles, if it publishes bounds
    pub fn island_extent(&self) -> Option<ProjectedExtent> {
        compute_island_extent(&self.tile_index_bounds(), self.y_scheme)
    }

    pub fn uses_proxy(&self) -> bool {
        self.tile_template == PROXY_TEMPLATE
    }

    /// Tile source for one dated map version
    pub fn tile_source(&self, code: &str, mode: TimeOfDay) -> Result<Box<dyn TileSource>> {
        if self.uses_proxy() {
            let base = self.proxy_url.as_deref().ok_or_else(|| {
                MapError::Config(format!(
                    "park {} uses the tile proxy but has no proxyUrl",
                    self.park_id
                ))
            })?;
            return Ok(Box::new(ProxySource::new(base, mode).with_scheme(self.y_scheme)));
        }
        Ok(Box::new(TemplateSource::for_version(
            &self.tile_template,
            code,
            self.y_scheme,
        )))
    }

    /// Default view if configured, else the centre of the tile extent, else a
    /// fixed fallback. The latter two open two levels above the minimum zoom.
    pub fn initial_view(&self) -> InitialView {
        let rotation_deg = self.default_rotation.unwrap_or(0.0);
        let fallback_zoom = f64::from(self.min_zoom) + 2.0;

        if let (Some(center), Some(zoom)) = (self.default_center, self.default_zoom) {
            return InitialView {
                center: LatLng::from_lon_lat(center),
                zoom,
                rotation_deg,
            };
        }

        let center = match self.island_extent() {
            Some(extent) => LatLng::from_mercator(extent.center()),
            None => LatLng::from_lon_lat(FALLBACK_CENTER),
        };

        InitialView {
            center,
            zoom: fallback_zoom,
            rotation_deg,
        }
    }

    /// Whether a position falls inside the park's padded tile extent.
    /// Parks without bounds contain nothing.
    pub fn contains(&self, position: &LatLng) -> bool {
        self.island_extent()
            .map(|extent| extent.contains_lat_lng(position))
            .unwrap_or(false)
    }
}

/// Parks keyed by lowercase id
#[derive(Debug, Clone, Default)]
pub struct ParkCatalog {
    parks: HashMap<String, ParkConfig>,
    order: Vec<String>,
}

impl ParkCatalog {
    /// Parses a JSON array of park configs
    pub fn from_json(json: &str) -> Result<Self> {
        let parks: Vec<ParkConfig> = serde_json::from_str(json)?;
        Ok(Self::from_parks(parks))
    }

    pub fn from_parks(parks: Vec<ParkConfig>) -> Self {
        let mut catalog = Self::default();
        for park in parks {
            let id = park.park_id.to_lowercase();
            if catalog.parks.insert(id.clone(), park).is_none() {
                catalog.order.push(id);
            }
        }
        catalog
    }

    /// The parks the viewer ships with
    pub fn builtin() -> &'static ParkCatalog {
        &BUILTIN_PARKS
    }

    pub fn get(&self, park_id: &str) -> Option<&ParkConfig> {
        self.parks.get(&park_id.trim().to_lowercase())
    }

    /// Like [`ParkCatalog::get`], falling back to the default park
    pub fn resolve(&self, park_id: Option<&str>) -> Option<&ParkConfig> {
        park_id
            .and_then(|id| self.get(id))
            .or_else(|| self.get(DEFAULT_PARK_ID))
    }

    /// Park ids in the order they were loaded
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parks.is_empty()
    }
}

/// One dated map version offered by a park
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapVersion {
    pub code: String,
    pub label: String,
    /// Matching satellite imagery release, if any
    #[serde(default)]
    pub esri_id: Option<String>,
    #[serde(default)]
    pub esri_label: Option<String>,
}

/// A park's map versions, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionCatalog {
    versions: Vec<MapVersion>,
}

impl VersionCatalog {
    pub fn new(versions: Vec<MapVersion>) -> Self {
        Self { versions }
    }

    /// Parses the `servers.json` list published per park
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn find(&self, code: &str) -> Option<&MapVersion> {
        self.versions.iter().find(|v| v.code == code)
    }

    pub fn versions(&self) -> &[MapVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.versions.iter().position(|v| v.code == code)
    }

    pub fn code_at(&self, index: usize) -> Option<&str> {
        self.versions.get(index).map(|v| v.code.as_str())
    }

    pub fn is_valid(&self, code: &str) -> bool {
        !code.is_empty() && self.find(code).is_some()
    }

    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.find(code).map(|v| v.label.as_str())
    }

    pub fn esri_id_for(&self, code: &str) -> Option<&str> {
        self.find(code).and_then(|v| v.esri_id.as_deref())
    }

    pub fn esri_label_for(&self, code: &str) -> Option<&str> {
        self.find(code).and_then(|v| v.esri_label.as_deref())
    }

    /// The version just before `code`. The oldest version, and any unknown
    /// code, map to the oldest version.
    pub fn previous_code(&self, code: &str) -> Option<&str> {
        match self.index_of(code) {
            Some(i) if i > 0 => self.code_at(i - 1),
            _ => self.code_at(0),
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.versions.last().map(|v| v.code.as_str())
    }
}
