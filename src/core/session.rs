//! Viewer state for one park: which map version is shown, whether two
//! versions are being compared, and how.
//!
//! The session is owned by the rendering layer and passed around
//! explicitly; nothing in this crate keeps a global copy. It derives serde so
//! callers can persist it per park between visits.

use crate::core::config::VersionCatalog;
use crate::diff::sensitivity::Sensitivity;
use serde::{Deserialize, Serialize};

/// What the map view should currently draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// One version, full screen
    Single,
    /// Two versions split by a draggable divider
    Swipe,
    /// One diff layer built from both versions
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSession {
    current_code: String,
    left_code: Option<String>,
    right_code: Option<String>,
    last_viewed: Option<String>,
    recent: [Option<String>; 2],
    compare_mode: bool,
    highlight_mode: bool,
    showing_park_imagery: bool,
    pub sensitivity: Sensitivity,
}

impl CompareSession {
    pub fn new(initial_code: impl Into<String>) -> Self {
        let code = initial_code.into();
        Self {
            recent: [Some(code.clone()), None],
            current_code: code,
            left_code: None,
            right_code: None,
            last_viewed: None,
            compare_mode: false,
            highlight_mode: false,
            showing_park_imagery: true,
            sensitivity: Sensitivity::default(),
        }
    }

    /// Starts at the newest version of a park, if it has any
    pub fn at_latest(versions: &VersionCatalog) -> Option<Self> {
        versions.latest().map(Self::new)
    }

    /// Restores the "last viewed" memory from an earlier visit
    pub fn with_last_viewed(mut self, code: Option<String>) -> Self {
        self.last_viewed = code;
        self
    }

    pub fn current_code(&self) -> &str {
        &self.current_code
    }

    pub fn last_viewed(&self) -> Option<&str> {
        self.last_viewed.as_deref()
    }

    /// `(left, right)` while comparing
    pub fn compared_codes(&self) -> Option<(&str, &str)> {
        if !self.compare_mode {
            return None;
        }
        match (&self.left_code, &self.right_code) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }

    pub fn is_comparing(&self) -> bool {
        self.compare_mode
    }

    pub fn is_showing_park_imagery(&self) -> bool {
        self.showing_park_imagery
    }

    pub fn view_mode(&self) -> ViewMode {
        match (self.compare_mode, self.highlight_mode) {
            (false, _) => ViewMode::Single,
            (true, false) => ViewMode::Swipe,
            (true, true) => ViewMode::Highlight,
        }
    }

    /// ΔE threshold for highlight diffs, from the sensitivity slider
    pub fn threshold(&self) -> f64 {
        self.sensitivity.threshold()
    }

    /// Shows `code` on its own. Returns `false` when it was already shown.
    pub fn select_version(&mut self, code: &str) -> bool {
        if self.current_code == code {
            return false;
        }

        self.last_viewed = Some(std::mem::replace(&mut self.current_code, code.to_string()));
        if self.recent[0].as_deref() != Some(code) {
            let previous = self.recent[0].take();
            self.recent = [Some(code.to_string()), previous];
        }
        log::debug!("selected map version {}", code);
        true
    }

    /// Jumps back to the version shown before the current one
    pub fn quick_switch(&mut self) -> bool {
        match self.recent[1].clone() {
            Some(code) => self.select_version(&code),
            None => false,
        }
    }

    /// Enters or leaves compare mode and returns the new state.
    ///
    /// Entering puts the current version on the left and the last viewed one
    /// on the right when that is a different, known version. Otherwise the
    /// current version goes right and its predecessor left.
    pub fn toggle_compare(&mut self, versions: &VersionCatalog) -> bool {
        self.compare_mode = !self.compare_mode;
        self.highlight_mode = false;

        if self.compare_mode {
            let remembered = self
                .last_viewed
                .as_deref()
                .filter(|code| versions.is_valid(code) && *code != self.current_code);

            let (left, right) = match remembered {
                Some(last) => (self.current_code.clone(), last.to_string()),
                None => {
                    let left = versions
                        .previous_code(&self.current_code)
                        .unwrap_or(self.current_code.as_str())
                        .to_string();
                    (left, self.current_code.clone())
                }
            };
            log::debug!("comparing {} against {}", left, right);
            self.left_code = Some(left);
            self.right_code = Some(right);
        }

        self.compare_mode
    }

    /// Switches between swipe and highlight. Only available while comparing
    /// park imagery; returns whether anything changed.
    pub fn toggle_highlight(&mut self) -> bool {
        if !self.compare_mode || !self.showing_park_imagery {
            return false;
        }
        self.highlight_mode = !self.highlight_mode;
        true
    }

    /// Flips between park maps and satellite imagery. Satellite tiles have no
    /// highlight mode, so switching to them falls back to swipe.
    pub fn toggle_imagery(&mut self) {
        self.showing_park_imagery = !self.showing_park_imagery;
        if !self.showing_park_imagery {
            self.highlight_mode = false;
        }
    }

    pub fn set_sensitivity(&mut self, value: i32) {
        self.sensitivity.set_value(value);
    }

    pub fn can_step_older(&self, versions: &VersionCatalog) -> bool {
        self.sides()
            .iter()
            .any(|code| matches!(versions.index_of(code), Some(i) if i > 0))
    }

    pub fn can_step_newer(&self, versions: &VersionCatalog) -> bool {
        self.sides()
            .iter()
            .any(|code| matches!(versions.index_of(code), Some(i) if i + 1 < versions.len()))
    }

    /// Moves one version back in time. While comparing, each side moves on
    /// its own if it can.
    pub fn step_older(&mut self, versions: &VersionCatalog) -> bool {
        self.step(versions, |i, _| i.checked_sub(1))
    }

    /// Moves one version forward in time
    pub fn step_newer(&mut self, versions: &VersionCatalog) -> bool {
        self.step(versions, |i, len| (i + 1 < len).then_some(i + 1))
    }

    fn sides(&self) -> Vec<&str> {
        if self.compare_mode {
            [&self.left_code, &self.right_code]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect()
        } else {
            vec![self.current_code.as_str()]
        }
    }

    fn step<F>(&mut self, versions: &VersionCatalog, step_to: F) -> bool
    where
        F: Fn(usize, usize) -> Option<usize>,
    {
        let target = |code: &str| -> Option<String> {
            let index = versions.index_of(code)?;
            let next = step_to(index, versions.len())?;
            versions.code_at(next).map(str::to_string)
        };

        if !self.compare_mode {
            return match target(&self.current_code) {
                Some(code) => self.select_version(&code),
                None => false,
            };
        }

        let mut changed = false;
        for side in [&mut self.left_code, &mut self.right_code] {
            if let Some(code) = side.as_deref().and_then(target) {
                *side = Some(code);
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MapVersion;

    fn versions() -> VersionCatalog {
        VersionCatalog::new(
            ["2016", "2019", "2022", "2024"]
                .iter()
                .map(|code| MapVersion {
                    code: code.to_string(),
                    label: format!("Map {}", code),
                    esri_id: None,
                    esri_label: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_starts_single_at_latest() {
        let session = CompareSession::at_latest(&versions()).unwrap();
        assert_eq!(session.current_code(), "2024");
        assert_eq!(session.view_mode(), ViewMode::Single);
        assert_eq!(session.compared_codes(), None);
        assert_eq!(session.threshold(), 10.0);
    }

    #[test]
    fn test_select_remembers_last_viewed() {
        let mut session = CompareSession::new("2024");
        assert!(!session.select_version("2024"));
        assert!(session.select_version("2019"));
        assert_eq!(session.last_viewed(), Some("2024"));
        assert!(session.quick_switch());
        assert_eq!(session.current_code(), "2024");
        assert!(session.quick_switch());
        assert_eq!(session.current_code(), "2019");
    }

    #[test]
    fn test_compare_without_history_uses_previous() {
        let versions = versions();
        let mut session = CompareSession::new("2022");
        assert!(session.toggle_compare(&versions));
        assert_eq!(session.compared_codes(), Some(("2019", "2022")));
        assert_eq!(session.view_mode(), ViewMode::Swipe);
    }

    #[test]
    fn test_compare_oldest_against_itself() {
        let mut session = CompareSession::new("2016");
        session.toggle_compare(&versions());
        assert_eq!(session.compared_codes(), Some(("2016", "2016")));
    }

    #[test]
    fn test_compare_with_history_puts_current_left() {
        let versions = versions();
        let mut session = CompareSession::new("2016");
        session.select_version("2024");
        session.toggle_compare(&versions);
        assert_eq!(session.compared_codes(), Some(("2024", "2016")));
    }

    #[test]
    fn test_stale_last_viewed_is_ignored() {
        let versions = versions();
        let mut session = CompareSession::new("2024").with_last_viewed(Some("1999".into()));
        session.toggle_compare(&versions);
        assert_eq!(session.compared_codes(), Some(("2022", "2024")));
    }

    #[test]
    fn test_highlight_requires_compare_and_park_imagery() {
        let versions = versions();
        let mut session = CompareSession::new("2024");
        assert!(!session.toggle_highlight());

        session.toggle_compare(&versions);
        assert!(session.toggle_highlight());
        assert_eq!(session.view_mode(), ViewMode::Highlight);

        session.toggle_imagery();
        assert_eq!(session.view_mode(), ViewMode::Swipe);
        assert!(!session.toggle_highlight());

        session.toggle_imagery();
        assert!(session.toggle_highlight());
        assert!(!session.toggle_compare(&versions));
        assert_eq!(session.view_mode(), ViewMode::Single);
    }

    #[test]
    fn test_stepping_single() {
        let versions = versions();
        let mut session = CompareSession::new("2019");
        assert!(session.step_older(&versions));
        assert_eq!(session.current_code(), "2016");
        assert!(!session.step_older(&versions));
        assert!(!session.can_step_older(&versions));
        assert!(session.can_step_newer(&versions));
        assert!(session.step_newer(&versions));
        assert_eq!(session.current_code(), "2019");
    }

    #[test]
    fn test_stepping_compare_moves_sides_independently() {
        let versions = versions();
        let mut session = CompareSession::new("2019");
        session.toggle_compare(&versions);
        assert_eq!(session.compared_codes(), Some(("2016", "2019")));

        assert!(session.step_older(&versions));
        assert_eq!(session.compared_codes(), Some(("2016", "2016")));
        assert!(!session.step_older(&versions));

        assert!(session.step_newer(&versions));
        assert!(session.step_newer(&versions));
        assert!(session.step_newer(&versions));
        assert_eq!(session.compared_codes(), Some(("2024", "2024")));
        assert!(!session.can_step_newer(&versions));
    }

    #[test]
    fn test_sensitivity_drives_threshold() {
        let mut session = CompareSession::new("2024");
        session.set_sensitivity(100);
        assert_eq!(session.threshold(), 0.0);
        session.set_sensitivity(25);
        assert_eq!(session.threshold(), 75.0);
    }
}
