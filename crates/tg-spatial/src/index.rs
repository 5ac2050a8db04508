//! Per-layer dual-axis spatial index.
//!
//! # Design
//!
//! Every layer keeps **two** independently sorted sequences of
//! [`PositionValue`]s: one ordered by longitude, one by latitude.  A window
//! query runs one 1-D range scan per axis and intersects the two sorted key
//! lists:
//!
//! ```text
//! lon ∈ [min_lon, max_lon]  →  {a, b, c, d}
//! lat ∈ [min_lat, max_lat]  →  {b, d, e}
//!                    result →  {b, d}
//! ```
//!
//! It is not a 2-D structure.  For point entities the
//! intersection is exact; for polygons (one entry per vertex) it can report a
//! polygon whose longitude hit and latitude hit come from different vertices.
//! Rectangles never wrap the antimeridian: a window with `min_lon > max_lon`
//! selects nothing.
//!
//! Each `SpatialIndex` instance owns its layer maps; nothing is shared.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use tg_core::{GeoPoint, GeoRect, LayerKey};

use crate::{GraphError, GraphResult};

// ── PositionValue ─────────────────────────────────────────────────────────────

/// One axis coordinate of one entity.
///
/// Ordered by coordinate, then key, so equal coordinates sort
/// deterministically.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionValue<K> {
    pub coord: f32,
    pub key:   K,
}

impl<K> PositionValue<K> {
    #[inline]
    pub fn new(coord: f32, key: K) -> Self {
        Self { coord, key }
    }
}

impl<K: Ord> Ord for PositionValue<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coord
            .total_cmp(&other.coord)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K: Ord> PartialOrd for PositionValue<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> PartialEq for PositionValue<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord> Eq for PositionValue<K> {}

// ── Layer ─────────────────────────────────────────────────────────────────────

#[inline]
fn is_negative_nan(x: f32) -> bool {
    x.is_nan() && x.is_sign_negative()
}

/// A sorted sequence of [`PositionValue`]s along one axis.
///
/// Duplicates are kept: a polygon with two vertices on the same meridian
/// contributes two equal longitude entries, and its latitude sequence must
/// grow by the same count.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer<K> {
    values: Vec<PositionValue<K>>,
}

impl<K: Ord + Copy> Layer<K> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Insert keeping sort order; equal values land after existing ones.
    pub fn add_element(&mut self, value: PositionValue<K>) {
        let at = self.values.partition_point(|v| *v <= value);
        self.values.insert(at, value);
    }

    /// Remove one occurrence of `value`.  Returns `false` if absent.
    pub fn remove_element(&mut self, value: &PositionValue<K>) -> bool {
        match self.values.binary_search(value) {
            Ok(at) => {
                self.values.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, value: &PositionValue<K>) -> bool {
        self.values.binary_search(value).is_ok()
    }

    /// All values with `lo <= coord <= hi`, in sort order.  NaN coordinates
    /// never match, and a NaN bound selects nothing.
    pub fn range(&self, lo: f32, hi: f32) -> &[PositionValue<K>] {
        if lo.is_nan() || hi.is_nan() {
            return &[];
        }
        // `total_cmp` sorts negative NaN first; keep both predicates true there.
        let start = self.values.partition_point(|v| v.coord < lo || is_negative_nan(v.coord));
        let end = self.values.partition_point(|v| v.coord <= hi || is_negative_nan(v.coord));
        if start >= end {
            return &[];
        }
        &self.values[start..end]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionValue<K>> + '_ {
        self.values.iter()
    }

    /// Bulk insert: append then re-sort once.
    pub fn extend(&mut self, values: impl IntoIterator<Item = PositionValue<K>>) {
        self.values.extend(values);
        self.values.sort_unstable();
    }
}

impl<K: Ord + Copy> Default for Layer<K> {
    fn default() -> Self {
        Self::new()
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Longitude and latitude [`Layer`]s for every layer key.
///
/// Every mutation touches both axes, so for every layer
/// `lon[layer].len() == lat[layer].len()`; [`verify`](Self::verify) checks
/// it explicitly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialIndex<K> {
    lon: BTreeMap<LayerKey, Layer<K>>,
    lat: BTreeMap<LayerKey, Layer<K>>,
}

impl<K: Ord + Copy> SpatialIndex<K> {
    pub fn new() -> Self {
        Self { lon: BTreeMap::new(), lat: BTreeMap::new() }
    }

    /// Index `key` at `pos` in `layer`.
    pub fn insert(&mut self, layer: LayerKey, key: K, pos: GeoPoint) {
        self.lon
            .entry(layer)
            .or_default()
            .add_element(PositionValue::new(pos.lon, key));
        self.lat
            .entry(layer)
            .or_default()
            .add_element(PositionValue::new(pos.lat, key));
        debug_assert_eq!(self.layer_len(layer).0, self.layer_len(layer).1);
    }

    /// Remove one `(key, pos)` entry from `layer`.
    ///
    /// Returns `false`, leaving both axes untouched, unless the entry is
    /// present on both.
    pub fn remove(&mut self, layer: LayerKey, key: K, pos: GeoPoint) -> bool {
        let lon_value = PositionValue::new(pos.lon, key);
        let lat_value = PositionValue::new(pos.lat, key);
        let (Some(lon), Some(lat)) = (self.lon.get_mut(&layer), self.lat.get_mut(&layer)) else {
            return false;
        };
        if !lon.contains(&lon_value) || !lat.contains(&lat_value) {
            return false;
        }
        lon.remove_element(&lon_value);
        lat.remove_element(&lat_value);
        true
    }

    /// Move `(key, pos)` from `old` to `new`.  Returns `false` if the entry
    /// was not indexed in `old`.
    pub fn relocate(&mut self, old: LayerKey, new: LayerKey, key: K, pos: GeoPoint) -> bool {
        if !self.remove(old, key, pos) {
            return false;
        }
        self.insert(new, key, pos);
        true
    }

    /// Keys with an entry inside `rect` in `layer`: sorted, deduplicated.
    ///
    /// An absent layer yields an empty list.
    pub fn region(&self, layer: LayerKey, rect: &GeoRect) -> Vec<K> {
        let (Some(lon), Some(lat)) = (self.lon.get(&layer), self.lat.get(&layer)) else {
            return Vec::new();
        };

        let mut lon_keys: Vec<K> = lon
            .range(rect.min_lon, rect.max_lon)
            .iter()
            .map(|v| v.key)
            .collect();
        let mut lat_keys: Vec<K> = lat
            .range(rect.min_lat, rect.max_lat)
            .iter()
            .map(|v| v.key)
            .collect();

        lon_keys.sort_unstable();
        lon_keys.dedup();
        lat_keys.sort_unstable();
        lat_keys.dedup();
        intersect_sorted(&lon_keys, &lat_keys)
    }

    /// Layer keys present in the index, ascending.
    pub fn layer_keys(&self) -> impl Iterator<Item = LayerKey> + '_ {
        self.lon.keys().copied()
    }

    pub fn has_layer(&self, layer: LayerKey) -> bool {
        self.lon.contains_key(&layer)
    }

    /// `(longitude entries, latitude entries)` of `layer`.
    pub fn layer_len(&self, layer: LayerKey) -> (usize, usize) {
        (
            self.lon.get(&layer).map_or(0, Layer::len),
            self.lat.get(&layer).map_or(0, Layer::len),
        )
    }

    /// Total longitude entries across all layers.
    pub fn len(&self) -> usize {
        self.lon.values().map(Layer::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Layers in which each key accepted by `keep` has an entry.
    pub fn layers_by_key(&self, keep: impl Fn(&K) -> bool) -> BTreeMap<K, Vec<LayerKey>> {
        let mut out: BTreeMap<K, Vec<LayerKey>> = BTreeMap::new();
        for (layer, values) in &self.lon {
            for v in values.iter().filter(|v| keep(&v.key)) {
                let layers = out.entry(v.key).or_default();
                if layers.last() != Some(layer) {
                    layers.push(*layer);
                }
            }
        }
        out
    }

    /// Copy the entries of `other` whose layer lies in `layers` and whose
    /// key is accepted by `admit`.
    pub fn merge_where(
        &mut self,
        other:  &SpatialIndex<K>,
        layers: RangeInclusive<LayerKey>,
        admit:  impl Fn(&K) -> bool,
    ) {
        merge_axis(&mut self.lon, &other.lon, &layers, &admit);
        merge_axis(&mut self.lat, &other.lat, &layers, &admit);
    }

    /// Check the dual-axis invariant.
    ///
    /// # Errors
    ///
    /// [`GraphError::IndexMismatch`] naming the first inconsistent layer.
    pub fn verify(&self) -> GraphResult<()> {
        for layer in self.lon.keys().chain(self.lat.keys()) {
            let (lon, lat) = self.layer_len(*layer);
            if lon != lat || self.lon.contains_key(layer) != self.lat.contains_key(layer) {
                return Err(GraphError::IndexMismatch { layer: *layer, lon, lat });
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lon.clear();
        self.lat.clear();
    }
}

impl<K: Ord + Copy> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Full layer range, for merges that ignore level of detail.
pub fn all_layers() -> RangeInclusive<LayerKey> {
    LayerKey(i16::MIN)..=LayerKey(i16::MAX)
}

fn merge_axis<K: Ord + Copy>(
    target: &mut BTreeMap<LayerKey, Layer<K>>,
    source: &BTreeMap<LayerKey, Layer<K>>,
    layers: &RangeInclusive<LayerKey>,
    admit:  &impl Fn(&K) -> bool,
) {
    for (layer, values) in source.range(layers.clone()) {
        let admitted: Vec<PositionValue<K>> =
            values.iter().filter(|v| admit(&v.key)).copied().collect();
        if admitted.is_empty() {
            continue;
        }
        target.entry(*layer).or_default().extend(admitted);
    }
}

/// Intersection of two ascending, duplicate-free slices.
fn intersect_sorted<K: Ord + Copy>(a: &[K], b: &[K]) -> Vec<K> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
