use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in Web Mercator metres, used to constrain pan/zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ProjectedExtent {
    /// Creates an extent, ordering each axis so `min <= max` holds
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Smallest extent containing every point. An empty iterator yields the
    /// inverted "empty" extent, which reports `is_valid() == false`.
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().fold(Self::empty(), |mut extent, point| {
            extent.extend(&point);
            extent
        })
    }

    /// Creates empty bounds (invalid bounds that can be extended)
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Extends the extent to include a point
    pub fn extend(&mut self, point: &Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Checks if the extent contains a projected point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Checks if the extent contains a geographic position
    pub fn contains_lat_lng(&self, lat_lng: &LatLng) -> bool {
        self.contains(&lat_lng.to_mercator())
    }

    /// Returns a copy grown on every side by `ratio` of the matching axis' span
    pub fn padded(&self, ratio: f64) -> Self {
        let pad_x = self.width() * ratio;
        let pad_y = self.height() * ratio;
        Self {
            min_x: self.min_x - pad_x,
            min_y: self.min_y - pad_y,
            max_x: self.max_x + pad_x,
            max_y: self.max_y + pad_y,
        }
    }

    /// Checks if the extent is valid (min <= max on both axes)
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// `[min_x, min_y, max_x, max_y]`, the layout map engines take extents in
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}
