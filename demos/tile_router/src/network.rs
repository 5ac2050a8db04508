//! Synthetic street grid around Ljubljana.
//!
//! An 8 × 8 grid spaced 0.07° × 0.05°, which straddles the tile edges at
//! 14.5° E and 46.0° N and so lands in four tiles.  Every third row and
//! column is a primary road; the rest are residential streets.

use tg_core::{AreaKey, GeoPoint, LayerKey, LinkKey, NodeKey, PlaceKey};
use tg_osm::{Area, LinkType, MapResult, OpenStreetMap, OsmLink, OsmNode, OsmPlace, PlaceType};

pub const ROWS: i64 = 8;
pub const COLS: i64 = 8;

const LON0:     f32 = 14.26;
const LAT0:     f32 = 45.84;
const LON_STEP: f32 = 0.07;
const LAT_STEP: f32 = 0.05;

/// Links are this much longer than the straight line between their ends.
const DETOUR: f64 = 1.05;

pub fn node_key(row: i64, col: i64) -> NodeKey {
    NodeKey(row * COLS + col)
}

pub fn position(row: i64, col: i64) -> GeoPoint {
    GeoPoint::new(LON0 + col as f32 * LON_STEP, LAT0 + row as f32 * LAT_STEP)
}

fn is_arterial(line: i64) -> bool {
    line % 3 == 0
}

/// Build the whole grid as one map.
pub fn build_network() -> MapResult<OpenStreetMap> {
    let mut map = OpenStreetMap::new();

    for row in 0..ROWS {
        for col in 0..COLS {
            let kind = if is_arterial(row) || is_arterial(col) {
                LinkType::Primary
            } else {
                LinkType::Residential
            };
            map.add_node(kind.layer_key(), node_key(row, col), OsmNode::new(position(row, col)))?;
        }
    }

    let mut next_link = 0;
    let mut connect = |map: &mut OpenStreetMap, a: (i64, i64), b: (i64, i64), kind: LinkType| -> MapResult<()> {
        let length = position(a.0, a.1).distance_m(position(b.0, b.1)) * DETOUR;
        let link = OsmLink::new(length as f32, kind);
        map.add_link(LinkKey(next_link), link, node_key(a.0, a.1), node_key(b.0, b.1))?;
        map.add_link(LinkKey(next_link + 1), link, node_key(b.0, b.1), node_key(a.0, a.1))?;
        next_link += 2;
        Ok(())
    };

    for row in 0..ROWS {
        for col in 0..COLS {
            if col + 1 < COLS {
                let kind = if is_arterial(row) { LinkType::Primary } else { LinkType::Residential };
                connect(&mut map, (row, col), (row, col + 1), kind)?;
            }
            if row + 1 < ROWS {
                let kind = if is_arterial(col) { LinkType::Primary } else { LinkType::Residential };
                connect(&mut map, (row, col), (row + 1, col), kind)?;
            }
        }
    }

    let places = [
        (PlaceKey(1), position(4, 4), "Ljubljana", PlaceType::City),
        (PlaceKey(2), position(0, 0), "Brezovica", PlaceType::Village),
        (PlaceKey(3), position(7, 7), "Domžale", PlaceType::Town),
    ];
    for (key, pos, name, kind) in places {
        map.add_place(key, kind_layer(kind), OsmPlace::new(pos, name, kind))?;
    }

    let park = Area::new(vec![position(2, 2), position(2, 3), position(3, 3), position(3, 2)]);
    map.add_area(AreaKey(1), LinkType::Grass.layer_key(), park)?;

    Ok(map)
}

/// Places are layered by size, larger first.
fn kind_layer(kind: PlaceType) -> LayerKey {
    LayerKey(kind as i16)
}
