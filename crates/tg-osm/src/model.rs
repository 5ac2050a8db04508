//! OpenStreetMap entity payloads: nodes, links, places, areas.
//!
//! Link categories double as layer keys: the order of [`LinkType`] goes from
//! the most to the least important way, so `LinkType::Motorway.layer_key()`
//! is the coarsest road layer and a level-of-detail load of
//! `..= LinkType::Unclassified.layer_key()` brings in the major road network
//! only.

use serde::{Deserialize, Serialize};

use tg_core::{GeoPoint, GeoRect, LayerKey, TileId};
use tg_spatial::{Positioned, Weighted};

// ── OsmNode ───────────────────────────────────────────────────────────────────

/// A routing node.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OsmNode {
    pub pos:    GeoPoint,
    /// Elevation in metres, if known.
    pub height: Option<f32>,
}

impl OsmNode {
    pub fn new(pos: GeoPoint) -> Self {
        Self { pos, height: None }
    }

    pub fn with_height(pos: GeoPoint, height: f32) -> Self {
        Self { pos, height: Some(height) }
    }

    pub fn tile(&self) -> TileId {
        TileId::of(self.pos)
    }
}

impl Positioned for OsmNode {
    #[inline]
    fn position(&self) -> GeoPoint {
        self.pos
    }
}

// ── LinkType ──────────────────────────────────────────────────────────────────

/// Category of a link, most important first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i16)]
pub enum LinkType {
    // Ways.
    Motorway = 1,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    Service,
    LivingStreet,
    Pedestrian,
    Track,
    BusGuideway,
    Escape,
    Raceway,
    Road,
    Footway,
    Cycleway,
    Bridleway,
    Steps,
    Path,
    // Rail.
    MainRailway,
    BranchRailway,
    Subway,
    Tramway,
    SecondRailway,
    // Water.
    Lake,
    AnyWater,
    Canal,
    Riverbank,
    River,
    Bay,
    Beach,
    Wetland,
    Water,
    Stream,
    // Land cover.
    Wood,
    Forest,
    Scrub,
    Farmland,
    Farmyard,
    Meadow,
    Grass,
    Grassland,
    Unknown,
}

impl LinkType {
    /// Layer this category is indexed in.
    #[inline]
    pub fn layer_key(self) -> LayerKey {
        LayerKey(self as i16)
    }

    pub fn is_way(self) -> bool {
        (Self::Motorway..=Self::Path).contains(&self)
    }

    pub fn is_rail(self) -> bool {
        (Self::MainRailway..=Self::SecondRailway).contains(&self)
    }

    pub fn is_water(self) -> bool {
        (Self::Lake..=Self::Stream).contains(&self)
    }

    /// Land cover other than water.
    pub fn is_land_cover(self) -> bool {
        (Self::Wood..=Self::Grassland).contains(&self)
    }

    pub fn is_grass(self) -> bool {
        (Self::Meadow..=Self::Grassland).contains(&self)
    }

    /// Typical car speed in metres per second; `None` if cars may not use it.
    pub fn car_speed_mps(self) -> Option<f64> {
        let kmh = match self {
            Self::Motorway => 130.0,
            Self::Trunk => 100.0,
            Self::Primary => 90.0,
            Self::Secondary => 80.0,
            Self::Tertiary => 70.0,
            Self::Unclassified | Self::Road => 50.0,
            Self::Residential => 40.0,
            Self::Service | Self::Track => 20.0,
            Self::LivingStreet => 7.0,
            _ => return None,
        };
        Some(kmh / 3.6)
    }
}

// ── OsmLink ───────────────────────────────────────────────────────────────────

/// A directed link between two nodes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OsmLink {
    pub length_m: f32,
    pub kind:     LinkType,
}

impl OsmLink {
    pub fn new(length_m: f32, kind: LinkType) -> Self {
        Self { length_m, kind }
    }
}

impl Weighted for OsmLink {
    #[inline]
    fn length_m(&self) -> f64 {
        f64::from(self.length_m)
    }
}

// ── Places ────────────────────────────────────────────────────────────────────

/// Kind of a named place, largest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlaceType {
    // Regions.
    Continent,
    Country,
    State,
    Region,
    Province,
    District,
    County,
    Municipality,
    // Towns.
    City,
    Town,
    Village,
    Hamlet,
    Allotments,
    IsolatedDwelling,
    Farm,
    // Parts of towns.
    Borough,
    Quarter,
    Suburb,
    Neighbourhood,
    CityBlock,
    Plot,
    // Other locations.
    Island,
    Islet,
    Square,
    Locality,
    Unknown,
}

impl PlaceType {
    pub fn is_region(self) -> bool {
        (Self::Continent..=Self::Municipality).contains(&self)
    }

    pub fn is_town(self) -> bool {
        (Self::City..=Self::Farm).contains(&self)
    }

    pub fn is_town_part(self) -> bool {
        (Self::Borough..=Self::Plot).contains(&self)
    }

    pub fn is_location(self) -> bool {
        (Self::Island..=Self::Locality).contains(&self)
    }
}

/// A named point of interest.  Places have their own key space and index;
/// they are not routing nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OsmPlace {
    pub pos:  GeoPoint,
    pub name: String,
    pub kind: PlaceType,
}

impl OsmPlace {
    pub fn new(pos: GeoPoint, name: impl Into<String>, kind: PlaceType) -> Self {
        Self { pos, name: name.into(), kind }
    }
}

impl Positioned for OsmPlace {
    #[inline]
    fn position(&self) -> GeoPoint {
        self.pos
    }
}

// ── Area ──────────────────────────────────────────────────────────────────────

/// A polygon, vertices in ring order.  The ring is implicitly closed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub points: Vec<GeoPoint>,
}

impl Area {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> GeoRect {
        GeoRect::enclosing(self.points.iter().copied())
    }

    /// The tile owning this area: the tile of its first vertex.
    ///
    /// An area crossing a tile edge is still written to exactly one tile.
    pub fn tile(&self) -> Option<TileId> {
        self.points.first().map(|p| TileId::of(*p))
    }

    pub fn in_tile(&self, tile: TileId) -> bool {
        self.tile() == Some(tile)
    }
}
