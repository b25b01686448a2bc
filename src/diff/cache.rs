use crate::core::geo::TileCoordinate;
use crate::diff::highlight::{compose_highlight, ComposedTile, DiffStyle, RasterImage};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const DEFAULT_CAPACITY: usize = 512;

/// Identifies one composed highlight tile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighlightKey {
    pub before_code: String,
    pub after_code: String,
    pub coord: TileCoordinate,
    threshold_bits: u64,
}

impl HighlightKey {
    pub fn new(
        before_code: impl Into<String>,
        after_code: impl Into<String>,
        coord: TileCoordinate,
        threshold: f64,
    ) -> Self {
        Self {
            before_code: before_code.into(),
            after_code: after_code.into(),
            coord,
            threshold_bits: threshold.to_bits(),
        }
    }

    pub fn threshold(&self) -> f64 {
        f64::from_bits(self.threshold_bits)
    }
}

/// In-memory cache of composed highlight tiles using LRU eviction.
///
/// Moving the sensitivity slider changes the key, so stale thresholds simply
/// age out.
#[derive(Debug)]
pub struct HighlightCache {
    cache: Arc<Mutex<LruCache<HighlightKey, Arc<RasterImage>>>>,
    style: DiffStyle,
}

impl HighlightCache {
    pub fn new(capacity: usize, style: DiffStyle) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            style,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY, DiffStyle::default())
    }

    pub fn get(&self, key: &HighlightKey) -> Option<Arc<RasterImage>> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    /// Returns the cached tile or composes it from the encoded tiles. Only
    /// real diffs are kept; stand-ins for missing tiles are rebuilt next time.
    pub fn get_or_compose(
        &self,
        key: HighlightKey,
        before: Option<&[u8]>,
        after: Option<&[u8]>,
    ) -> Arc<RasterImage> {
        if let Some(tile) = self.get(&key) {
            return tile;
        }

        match compose_highlight(before, after, key.threshold(), &self.style) {
            ComposedTile::Diffed(image) => {
                let tile = Arc::new(image);
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(key, Arc::clone(&tile));
                }
                tile
            }
            ComposedTile::Fallback(image) => Arc::new(image),
        }
    }

    /// Drops every tile of one version pair, e.g. after a tile refresh
    pub fn invalidate_pair(&self, before_code: &str, after_code: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            let stale: Vec<HighlightKey> = cache
                .iter()
                .map(|(key, _)| key)
                .filter(|key| key.before_code == before_code && key.after_code == after_code)
                .cloned()
                .collect();
            for key in &stale {
                cache.pop(key);
            }
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HighlightCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn key(after: &str, threshold: f64) -> HighlightKey {
        HighlightKey::new("2019", after, TileCoordinate::new(16, 1, 2), threshold)
    }

    fn png(pixel: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba(pixel)))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_compose_once_per_key() {
        let (white, black) = (png([255; 4]), png([0, 0, 0, 255]));
        let (white, black) = (Some(white.as_slice()), Some(black.as_slice()));
        let cache = HighlightCache::new(4, DiffStyle::default());

        let first = cache.get_or_compose(key("2024", 10.0), white, black);
        let second = cache.get_or_compose(key("2024", 10.0), Some(&b"ignored"[..]), None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.get_or_compose(key("2024", 20.0), white, white);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_fallback_tiles_are_not_kept() {
        let (white, black) = (png([255; 4]), png([0, 0, 0, 255]));
        let (white, black) = (Some(white.as_slice()), Some(black.as_slice()));
        let cache = HighlightCache::new(4, DiffStyle::default());

        let blank = cache.get_or_compose(key("2024", 10.0), None, None);
        assert_eq!(blank.get_pixel(0, 0).0, [0, 0, 0, 0]);
        let before_only = cache.get_or_compose(key("2024", 10.0), white, None);
        assert_eq!(before_only.get_pixel(0, 0).0, [255; 4]);
        assert!(cache.is_empty());

        let diffed = cache.get_or_compose(key("2024", 10.0), white, black);
        assert_eq!(diffed.get_pixel(0, 0).0, [255, 0, 0, 200]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_and_invalidation() {
        let white = png([255; 4]);
        let white = Some(white.as_slice());
        let cache = HighlightCache::new(2, DiffStyle::default());
        cache.get_or_compose(key("2022", 10.0), white, white);
        cache.get_or_compose(key("2024", 10.0), white, white);
        cache.get_or_compose(key("2024", 5.0), white, white);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("2022", 10.0)).is_none());

        cache.invalidate_pair("2019", "2024");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_still_caches_one() {
        let white = png([255; 4]);
        let white = Some(white.as_slice());
        let cache = HighlightCache::new(0, DiffStyle::default());
        cache.get_or_compose(key("2024", 10.0), white, white);
        assert_eq!(cache.len(), 1);
    }
}
