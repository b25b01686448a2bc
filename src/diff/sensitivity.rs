use crate::core::constants::{DEFAULT_SENSITIVITY, SENSITIVITY_MAX, SENSITIVITY_MIN};
use serde::{Deserialize, Serialize};

/// Bounds of the sensitivity slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityRange {
    pub min: i32,
    pub max: i32,
}

impl Default for SensitivityRange {
    fn default() -> Self {
        Self {
            min: SENSITIVITY_MIN,
            max: SENSITIVITY_MAX,
        }
    }
}

impl SensitivityRange {
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min.min(self.max), self.max.max(self.min))
    }
}

/// Maps a slider position to a ΔE threshold. The mapping is inverted: the
/// further right the slider, the lower the threshold and the more pixels
/// get flagged as changed.
pub fn slider_to_threshold(value: i32, range: SensitivityRange) -> f64 {
    f64::from(range.min + range.max - range.clamp(value))
}

/// Slider state owned by a compare session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub range: SensitivityRange,
    value: i32,
}

impl Sensitivity {
    pub fn new(range: SensitivityRange, value: i32) -> Self {
        Self {
            range,
            value: range.clamp(value),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = self.range.clamp(value);
    }

    pub fn threshold(&self) -> f64 {
        slider_to_threshold(self.value, self.range)
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::new(SensitivityRange::default(), DEFAULT_SENSITIVITY)
    }
}
