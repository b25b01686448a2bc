//! sRGB → CIE L*a*b* conversion and CIE76 colour distance.

use crate::core::constants::D65_WHITE;
use serde::{Deserialize, Serialize};

/// A colour in CIE L*a*b* space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// CIE76 ΔE to another colour
    pub fn distance(&self, other: &Lab) -> f64 {
        lab_distance(self, other)
    }
}

/// sRGB gamma expansion of one 8-bit channel
fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// Converts an sRGB colour to L*a*b* under a D65 white point
pub fn rgb_to_lab(r: u8, g: u8, b: u8) -> Lab {
    let (r, g, b) = (linearize(r), linearize(g), linearize(b));

    let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
    let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
    let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

    let fx = lab_f(x / D65_WHITE[0]);
    let fy = lab_f(y / D65_WHITE[1]);
    let fz = lab_f(z / D65_WHITE[2]);

    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Euclidean distance in L*a*b* (CIE76 ΔE). Not perceptually uniform, but
/// good enough to tell "same colour" from "changed" on map imagery.
pub fn lab_distance(lhs: &Lab, rhs: &Lab) -> f64 {
    let dl = lhs.l - rhs.l;
    let da = lhs.a - rhs.a;
    let db = lhs.b - rhs.b;
    (dl * dl + da * da + db * db).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lab(actual: Lab, l: f64, a: f64, b: f64) {
        let tol = 1e-3;
        assert!(
            (actual.l - l).abs() < tol && (actual.a - a).abs() < tol && (actual.b - b).abs() < tol,
            "{:?} != ({}, {}, {})",
            actual,
            l,
            a,
            b
        );
    }

    #[test]
    fn test_reference_white_and_black() {
        assert_lab(rgb_to_lab(0, 0, 0), 0.0, 0.0, 0.0);
        let white = rgb_to_lab(255, 255, 255);
        // The four-digit sRGB matrix lands a hair off the D65 white, so a*
        // and b* stay within a couple of hundredths rather than exactly zero.
        assert!((white.l - 100.0).abs() < 1e-3);
        assert!(white.a.abs() < 0.02);
        assert!(white.b.abs() < 0.02);
    }

    #[test]
    fn test_red_is_warm() {
        let red = rgb_to_lab(255, 0, 0);
        assert!(red.a > 70.0);
        assert!(red.b > 50.0);
    }

    #[test]
    fn test_distance_identity_and_symmetry() {
        let a = rgb_to_lab(12, 200, 77);
        let b = rgb_to_lab(13, 199, 80);
        assert_eq!(lab_distance(&a, &a), 0.0);
        assert_eq!(lab_distance(&a, &b), b.distance(&a));
        assert!(lab_distance(&a, &b) > 0.0);
    }

    #[test]
    fn test_one_unit_change_is_visible() {
        let a = rgb_to_lab(100, 100, 100);
        let b = rgb_to_lab(100, 100, 101);
        assert!(lab_distance(&a, &b) > 0.0);
    }
}
