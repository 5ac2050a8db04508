//! Geographic coordinate and rectangle types.
//!
//! `GeoPoint` uses `f32` (single-precision) longitude/latitude, the same
//! precision the spatial indices store.  At the equator this gives ~1 m
//! precision.  Distances are computed in `f64` so that a heuristic derived
//! from them stays comparable with link lengths computed the same way.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate, longitude first.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f32,
    pub lat: f32,
}

impl GeoPoint {
    /// Construct from `(longitude, latitude)` in degrees.  No range check.
    #[inline]
    pub fn new(lon: f32, lat: f32) -> Self {
        Self { lon, lat }
    }

    /// Construct with a range check: `lon ∈ [-180, 180]`, `lat ∈ [-90, 90]`.
    pub fn checked(lon: f32, lat: f32) -> CoreResult<Self> {
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidCoordinate { lon, lat });
        }
        Ok(Self { lon, lat })
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat as f64 - self.lat as f64).to_radians();
        let d_lon = (other.lon as f64 - self.lon as f64).to_radians();

        let lat1 = (self.lat as f64).to_radians();
        let lat2 = (other.lat as f64).to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ── GeoRect ───────────────────────────────────────────────────────────────────

/// An axis-aligned longitude/latitude rectangle, bounds inclusive.
///
/// Doubles as the running bounding box of a map.  The [`empty`](Self::empty)
/// rectangle is inverted (`min > max`) so that the first
/// [`expand`](Self::expand) snaps it to the inserted point.
///
/// Rectangles never wrap the antimeridian: `min_lon > max_lon` means empty,
/// not "crosses ±180°".
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoRect {
    pub min_lon: f32,
    pub min_lat: f32,
    pub max_lon: f32,
    pub max_lat: f32,
}

impl GeoRect {
    #[inline]
    pub fn new(min_lon: f32, min_lat: f32, max_lon: f32, max_lat: f32) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    /// The inverted rectangle containing nothing.
    pub const fn empty() -> Self {
        Self {
            min_lon: 180.0,
            min_lat: 90.0,
            max_lon: -180.0,
            max_lat: -90.0,
        }
    }

    /// Square window of half-width `radius_deg` around `center`.
    pub fn around(center: GeoPoint, radius_deg: f32) -> Self {
        Self {
            min_lon: center.lon - radius_deg,
            min_lat: center.lat - radius_deg,
            max_lon: center.lon + radius_deg,
            max_lat: center.lat + radius_deg,
        }
    }

    /// Smallest rectangle containing every point; empty for no points.
    pub fn enclosing(points: impl IntoIterator<Item = GeoPoint>) -> Self {
        let mut rect = Self::empty();
        for p in points {
            rect.expand(p);
        }
        rect
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    /// Grow to include `p`.  Never shrinks.
    pub fn expand(&mut self, p: GeoPoint) {
        self.min_lon = self.min_lon.min(p.lon);
        self.max_lon = self.max_lon.max(p.lon);
        self.min_lat = self.min_lat.min(p.lat);
        self.max_lat = self.max_lat.max(p.lat);
    }

    /// Grow to include all of `other`.  An empty `other` is a no-op.
    pub fn union(&mut self, other: &GeoRect) {
        if other.is_empty() {
            return;
        }
        self.min_lon = self.min_lon.min(other.min_lon);
        self.max_lon = self.max_lon.max(other.max_lon);
        self.min_lat = self.min_lat.min(other.min_lat);
        self.max_lat = self.max_lat.max(other.max_lat);
    }

    /// Copy padded by `margin_deg` on every side.  Empty stays empty.
    pub fn padded(&self, margin_deg: f32) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min_lon: self.min_lon - margin_deg,
            min_lat: self.min_lat - margin_deg,
            max_lon: self.max_lon + margin_deg,
            max_lat: self.max_lat + margin_deg,
        }
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.min_lon
            && p.lon <= self.max_lon
            && p.lat >= self.min_lat
            && p.lat <= self.max_lat
    }

    pub fn intersects(&self, other: &GeoRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    /// South-west corner.
    #[inline]
    pub fn min(&self) -> GeoPoint {
        GeoPoint::new(self.min_lon, self.min_lat)
    }

    /// North-east corner.
    #[inline]
    pub fn max(&self) -> GeoPoint {
        GeoPoint::new(self.max_lon, self.max_lat)
    }
}

impl Default for GeoRect {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for GeoRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[empty]");
        }
        write!(f, "[{} .. {}]", self.min(), self.max())
    }
}
