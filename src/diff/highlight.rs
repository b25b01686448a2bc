//! Highlight diffing of two renderings of the same tile.
//!
//! Pixels whose colour moved further than the threshold (CIE76 ΔE) are
//! painted in the highlight colour; everything else is greyed out from the
//! "before" tile so the changes stand out against a muted backdrop.

use crate::core::constants::{HIGHLIGHT_ALPHA, HIGHLIGHT_RGB, LUMA_WEIGHTS, TILE_SIZE};
use crate::diff::color::{lab_distance, rgb_to_lab};
use crate::{MapError, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Decoded RGBA raster, one tile's worth of pixels
pub type RasterImage = RgbaImage;

/// Colours used when painting a diff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffStyle {
    /// Colour of changed pixels, alpha included
    pub highlight: [u8; 4],
    /// Luma weights applied to the before pixel's R, G and B
    pub luma_weights: [f64; 3],
}

impl Default for DiffStyle {
    fn default() -> Self {
        let [r, g, b] = HIGHLIGHT_RGB;
        Self {
            highlight: [r, g, b, HIGHLIGHT_ALPHA],
            luma_weights: LUMA_WEIGHTS,
        }
    }
}

impl DiffStyle {
    fn grey(&self, pixel: &Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        let [wr, wg, wb] = self.luma_weights;
        let luma = wr * f64::from(r) + wg * f64::from(g) + wb * f64::from(b);
        // Halves go to even, as a clamped byte canvas stores them
        let grey = luma.round_ties_even().clamp(0.0, 255.0) as u8;
        Rgba([grey, grey, grey, a])
    }
}

/// Diffs two same-sized tiles with the default [`DiffStyle`].
pub fn diff_tile(before: &RasterImage, after: &RasterImage, threshold: f64) -> Result<RasterImage> {
    diff_tile_with_style(before, after, threshold, &DiffStyle::default())
}

/// Diffs two same-sized tiles. Alpha takes no part in the comparison, so
/// fully transparent pixels still register a change when their RGB differs.
pub fn diff_tile_with_style(
    before: &RasterImage,
    after: &RasterImage,
    threshold: f64,
    style: &DiffStyle,
) -> Result<RasterImage> {
    if before.dimensions() != after.dimensions() {
        return Err(MapError::DimensionMismatch {
            before: before.dimensions(),
            after: after.dimensions(),
        });
    }

    let (width, height) = before.dimensions();
    let mut out = RgbaImage::new(width, height);
    let highlight = Rgba(style.highlight);

    for ((old, new), target) in before.pixels().zip(after.pixels()).zip(out.pixels_mut()) {
        let [r1, g1, b1, _] = old.0;
        let [r2, g2, b2, _] = new.0;
        let delta = lab_distance(&rgb_to_lab(r1, g1, b1), &rgb_to_lab(r2, g2, b2));

        *target = if delta > threshold {
            highlight
        } else {
            style.grey(old)
        };
    }

    Ok(out)
}

/// Number of pixels painted with the style's highlight colour
pub fn count_highlighted(image: &RasterImage, style: &DiffStyle) -> usize {
    image.pixels().filter(|p| p.0 == style.highlight).count()
}

/// Outcome of composing one highlight tile
#[derive(Debug, Clone, PartialEq)]
pub enum ComposedTile {
    /// Both tiles decoded and were diffed
    Diffed(RasterImage),
    /// A stand-in: a blank tile, or the before tile as it is
    Fallback(RasterImage),
}

impl ComposedTile {
    pub fn is_diffed(&self) -> bool {
        matches!(self, Self::Diffed(_))
    }

    pub fn image(&self) -> &RasterImage {
        match self {
            Self::Diffed(image) | Self::Fallback(image) => image,
        }
    }

    pub fn into_image(self) -> RasterImage {
        match self {
            Self::Diffed(image) | Self::Fallback(image) => image,
        }
    }
}

/// Builds the highlight tile shown for one tile position from the encoded
/// "before" and "after" images, as delivered by the tile fetcher.
///
/// Never fails: a missing or undecodable before tile becomes a blank
/// transparent tile, and a missing or undecodable after tile leaves the
/// before tile as it is. An after tile of a different size is scaled to the
/// before tile's dimensions first.
pub fn compose_highlight_tile(
    before: Option<&[u8]>,
    after: Option<&[u8]>,
    threshold: f64,
    style: &DiffStyle,
) -> RasterImage {
    compose_highlight(before, after, threshold, style).into_image()
}

/// Like [`compose_highlight_tile`], but tells a real diff from a stand-in so
/// callers can avoid keeping the latter around.
pub fn compose_highlight(
    before: Option<&[u8]>,
    after: Option<&[u8]>,
    threshold: f64,
    style: &DiffStyle,
) -> ComposedTile {
    let Some(base) = before.and_then(|bytes| decode_tile(bytes, "before")) else {
        return ComposedTile::Fallback(RgbaImage::new(TILE_SIZE, TILE_SIZE));
    };

    let Some(mut compare) = after.and_then(|bytes| decode_tile(bytes, "after")) else {
        return ComposedTile::Fallback(base);
    };

    let (width, height) = base.dimensions();
    if compare.dimensions() != (width, height) {
        log::debug!(
            "scaling after tile from {:?} to {:?}",
            compare.dimensions(),
            (width, height)
        );
        compare = imageops::resize(&compare, width, height, FilterType::Triangle);
    }

    match diff_tile_with_style(&base, &compare, threshold, style) {
        Ok(diff) => ComposedTile::Diffed(diff),
        Err(e) => {
            log::warn!("highlight diff failed, showing before tile: {}", e);
            ComposedTile::Fallback(base)
        }
    }
}

fn decode_tile(bytes: &[u8], which: &str) -> Option<RasterImage> {
    match image::load_from_memory(bytes) {
        Ok(decoded) => Some(decoded.to_rgba8()),
        Err(e) => {
            log::warn!("could not decode {} tile ({} bytes): {}", which, bytes.len(), e);
            None
        }
    }
}
