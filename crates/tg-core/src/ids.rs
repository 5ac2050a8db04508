//! Strongly typed, zero-cost key wrappers.
//!
//! Keys are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Unlike dense indices they are
//! *stable identifiers*: OSM node ids are sparse 64-bit values, so keys are
//! never used to index a `Vec` directly.

use std::fmt;

/// Generate a typed key wrapper around a primitive integer.
macro_rules! typed_key {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_key! {
    /// Key of a graph node.  OSM node ids are 64-bit.
    pub struct NodeKey(i64);
}

typed_key! {
    /// Key of a directed graph link.
    pub struct LinkKey(i32);
}

typed_key! {
    /// Key of a named place.  Independent of the node key space.
    pub struct PlaceKey(i32);
}

typed_key! {
    /// Key of a polygon area.  Areas are derived from OSM ways, hence 64-bit.
    pub struct AreaKey(i64);
}

typed_key! {
    /// Partition key for the spatial indices (e.g. road importance class).
    /// Smaller keys are coarser layers, which is what level-of-detail loading
    /// relies on.
    pub struct LayerKey(i16);
}

typed_key! {
    /// Cell of the fixed 0.5° × 0.5° tile grid; see [`crate::tile`].
    pub struct TileId(u32);
}
