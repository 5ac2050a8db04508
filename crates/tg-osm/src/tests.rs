//! Unit tests for tg-osm.
//!
//! Most tests share one small map spanning three tiles: a road layer around
//! (14.6, 45.0) and a rail layer with one node near (24.6, 45.0) and one far
//! north at (24.7, 55.1).

#[cfg(test)]
mod helpers {
    use tg_core::{AreaKey, GeoPoint, LayerKey, LinkKey, NodeKey, PlaceKey, TileId};

    use crate::{Area, LinkType, OpenStreetMap, OsmLink, OsmNode, OsmPlace, PlaceType};

    pub const ROADS: LayerKey = LayerKey(111);
    pub const RAILS: LayerKey = LayerKey(333);

    pub fn p(lon: f32, lat: f32) -> GeoPoint {
        GeoPoint::new(lon, lat)
    }

    pub fn tile_a() -> TileId {
        TileId::of(p(14.6, 45.0))
    }

    pub fn tile_b() -> TileId {
        TileId::of(p(24.6, 45.0))
    }

    pub fn tile_c() -> TileId {
        TileId::of(p(24.7, 55.1))
    }

    /// Road half: nodes 1, 2, link 3, area 4, place 5.
    pub fn roads() -> OpenStreetMap {
        let mut m = OpenStreetMap::new();
        m.add_node(ROADS, NodeKey(1), OsmNode::new(p(14.6, 45.0))).unwrap();
        m.add_node(ROADS, NodeKey(2), OsmNode::new(p(14.7, 45.1))).unwrap();
        m.add_link(LinkKey(3), OsmLink::new(666.0, LinkType::Subway), NodeKey(1), NodeKey(2))
            .unwrap();
        m.add_area(
            AreaKey(4),
            ROADS,
            Area::new(vec![p(14.6, 45.0), p(14.65, 45.05), p(14.7, 45.0)]),
        )
        .unwrap();
        m.add_place(PlaceKey(5), ROADS, OsmPlace::new(p(14.65, 45.05), "Ljubljana", PlaceType::City))
            .unwrap();
        m
    }

    /// Rail half: nodes 6, 7, links 8 (6 → 7) and 9 (7 → 2, leaving the
    /// half), area 10, place 11.
    pub fn rails() -> OpenStreetMap {
        let mut m = OpenStreetMap::new();
        m.add_node(RAILS, NodeKey(6), OsmNode::new(p(24.6, 45.0))).unwrap();
        m.add_node(RAILS, NodeKey(7), OsmNode::new(p(24.7, 55.1))).unwrap();
        m.add_link(LinkKey(8), OsmLink::new(333.0, LinkType::Cycleway), NodeKey(6), NodeKey(7))
            .unwrap();
        m.add_link(LinkKey(9), OsmLink::new(999.0, LinkType::Tramway), NodeKey(7), NodeKey(2))
            .unwrap();
        m.add_area(
            AreaKey(10),
            RAILS,
            Area::new(vec![p(24.6, 45.0), p(24.65, 45.05), p(24.7, 45.0)]),
        )
        .unwrap();
        m.add_place(PlaceKey(11), RAILS, OsmPlace::new(p(24.65, 45.05), "Outpost", PlaceType::Village))
            .unwrap();
        m
    }

    /// Both halves in one map.
    pub fn sample() -> OpenStreetMap {
        let mut m = roads();
        m.merge_tile(&rails());
        m
    }

    /// One tile, two layers: node 1 in layer 1, node 2 and place 5 in
    /// layer 5, links both ways.
    pub fn two_layers() -> OpenStreetMap {
        let mut m = OpenStreetMap::new();
        m.add_node(LayerKey(1), NodeKey(1), OsmNode::new(p(14.6, 45.0))).unwrap();
        m.add_node(LayerKey(5), NodeKey(2), OsmNode::new(p(14.7, 45.1))).unwrap();
        m.add_link(LinkKey(3), OsmLink::new(100.0, LinkType::Primary), NodeKey(1), NodeKey(2))
            .unwrap();
        m.add_link(LinkKey(4), OsmLink::new(100.0, LinkType::Residential), NodeKey(2), NodeKey(1))
            .unwrap();
        m.add_place(PlaceKey(5), LayerKey(5), OsmPlace::new(p(14.65, 45.05), "Corner", PlaceType::Hamlet))
            .unwrap();
        m
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use tg_core::LayerKey;

    use crate::{LinkType, PlaceType};

    #[test]
    fn link_type_is_its_layer() {
        assert_eq!(LinkType::Motorway.layer_key(), LayerKey(1));
        assert!(LinkType::Motorway.layer_key() < LinkType::Footway.layer_key());
    }

    #[test]
    fn link_categories() {
        assert!(LinkType::Path.is_way());
        assert!(!LinkType::Path.is_rail());
        assert!(LinkType::Subway.is_rail());
        assert!(LinkType::Lake.is_water());
        assert!(LinkType::Meadow.is_grass());
        assert!(LinkType::Meadow.is_land_cover());
        assert!(!LinkType::Wood.is_grass());
        assert!(!LinkType::Unknown.is_land_cover());
    }

    #[test]
    fn only_roads_have_car_speed() {
        assert!(LinkType::Motorway.car_speed_mps().unwrap() > LinkType::Residential.car_speed_mps().unwrap());
        assert_eq!(LinkType::Footway.car_speed_mps(), None);
        assert_eq!(LinkType::Tramway.car_speed_mps(), None);
    }

    #[test]
    fn place_categories() {
        assert!(PlaceType::Country.is_region());
        assert!(PlaceType::City.is_town());
        assert!(PlaceType::Suburb.is_town_part());
        assert!(PlaceType::Island.is_location());
        assert!(!PlaceType::Unknown.is_location());
    }
}

// ── Map ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod map {
    use tg_core::{AreaKey, GeoRect, LayerKey, LinkKey, NodeKey, PlaceKey};
    use tg_spatial::GraphError;

    use super::helpers::*;
    use crate::{Area, MapError, OsmLink, OsmNode, OsmPlace, LinkType, PlaceType};

    #[test]
    fn queries_per_layer() {
        let m = sample();
        let frame = m.frame_box(0.01);
        assert_eq!(m.region(ROADS, &frame), vec![NodeKey(1), NodeKey(2)]);
        assert_eq!(m.region(RAILS, &frame), vec![NodeKey(6), NodeKey(7)]);
        assert_eq!(m.places(ROADS, &frame), vec![PlaceKey(5)]);
        assert_eq!(m.places(RAILS, &frame), vec![PlaceKey(11)]);
        assert_eq!(m.areas(ROADS, &frame), vec![AreaKey(4)]);
        assert_eq!(m.areas(RAILS, &frame), vec![AreaKey(10)]);
        assert!(m.region(LayerKey(222), &frame).is_empty());
        m.verify().unwrap();
    }

    #[test]
    fn bounding_box_covers_everything() {
        let m = sample();
        assert_eq!(*m.bounding_box(), GeoRect::new(14.6, 45.0, 24.7, 55.1));
        assert_eq!(m.tile_ids().len(), 3);
        assert!(m.tile_ids().contains(&tile_a()));
        assert!(m.tile_ids().contains(&tile_c()));
    }

    #[test]
    fn small_window_sees_one_tile() {
        let m = sample();
        let window = GeoRect::new(14.5, 44.9, 14.8, 45.2);
        assert_eq!(m.region(ROADS, &window), vec![NodeKey(1), NodeKey(2)]);
        assert!(m.region(RAILS, &window).is_empty());
        assert!(m.places(RAILS, &window).is_empty());
    }

    #[test]
    fn duplicate_places_and_areas_rejected() {
        let mut m = sample();
        assert!(matches!(
            m.add_place(PlaceKey(5), ROADS, OsmPlace::new(p(1.0, 1.0), "Again", PlaceType::Town)),
            Err(MapError::PlaceExists(PlaceKey(5)))
        ));
        assert!(matches!(
            m.add_area(AreaKey(4), ROADS, Area::new(vec![p(1.0, 1.0)])),
            Err(MapError::AreaExists(AreaKey(4)))
        ));
        assert!(matches!(
            m.add_area(AreaKey(40), ROADS, Area::default()),
            Err(MapError::EmptyArea(AreaKey(40)))
        ));
        assert_eq!(m.place(PlaceKey(5)).unwrap().name, "Ljubljana");
        assert!(!m.has_area(AreaKey(40)));
    }

    #[test]
    fn graph_errors_pass_through() {
        let mut m = sample();
        assert!(matches!(
            m.add_node(ROADS, NodeKey(1), OsmNode::new(p(0.0, 0.0))),
            Err(MapError::Graph(GraphError::NodeExists(NodeKey(1))))
        ));
        assert!(matches!(
            m.add_link(LinkKey(50), OsmLink::new(1.0, LinkType::Road), NodeKey(99), NodeKey(1)),
            Err(MapError::Graph(GraphError::NodeNotFound(NodeKey(99))))
        ));
    }

    #[test]
    fn move_node_between_layers() {
        let mut m = sample();
        let frame = m.frame_box(0.01);
        m.move_node(ROADS, RAILS, NodeKey(1)).unwrap();
        assert_eq!(m.region(ROADS, &frame), vec![NodeKey(2)]);
        assert_eq!(m.region(RAILS, &frame), vec![NodeKey(1), NodeKey(6), NodeKey(7)]);
        assert!(matches!(
            m.move_node(ROADS, RAILS, NodeKey(1)),
            Err(MapError::Graph(GraphError::NotInLayer { .. }))
        ));
        m.verify().unwrap();
    }

    #[test]
    fn nearest_node() {
        let m = sample();
        assert_eq!(m.find_next_node(p(14.61, 45.01), 0.05, None), Some(NodeKey(1)));
        assert_eq!(m.find_next_node(p(14.61, 45.01), 0.05, Some(RAILS)), None);
        assert_eq!(m.find_next_node(p(0.0, 0.0), 0.05, None), None);
    }

    #[test]
    fn merge_layer_respects_ceiling() {
        let mut m = roads();
        let frame = sample().frame_box(0.01);

        let stats = m.merge_layer(LayerKey(222), &rails());
        assert_eq!(stats.graph.nodes_added, 0);
        assert_eq!(stats.places_added, 0);
        assert_eq!(stats.areas_added, 0);
        assert!(m.region(RAILS, &frame).is_empty());

        let stats = m.merge_layer(RAILS, &rails());
        assert_eq!(stats.graph.nodes_added, 2);
        assert_eq!(stats.graph.links_added, 2);
        assert_eq!(stats.places_added, 1);
        assert_eq!(stats.areas_added, 1);
        assert!(stats.is_disjoint());
        assert_eq!(m.region(RAILS, &frame), vec![NodeKey(6), NodeKey(7)]);
        assert_eq!(m.areas(RAILS, &frame), vec![AreaKey(10)]);
        assert_eq!(*m.bounding_box(), *sample().bounding_box());
        // Partial merges do not claim tiles.
        assert_eq!(m.tile_ids().len(), 1);
        m.verify().unwrap();
    }

    #[test]
    fn remerge_overlaps_without_conflict() {
        let mut m = sample();
        let stats = m.merge_tile(&sample());
        assert_eq!(stats.graph.nodes_added, 0);
        assert_eq!(stats.place_overlaps, 2);
        assert_eq!(stats.area_overlaps, 2);
        assert!(!stats.is_disjoint());
        assert!(!stats.has_conflicts());
        assert_eq!(m.area_index().layer_len(ROADS), (3, 3));
        m.verify().unwrap();
    }

    #[test]
    fn conflicting_place_keeps_first() {
        let mut m = roads();
        let mut other = crate::OpenStreetMap::new();
        other
            .add_place(PlaceKey(5), ROADS, OsmPlace::new(p(14.65, 45.05), "Laibach", PlaceType::City))
            .unwrap();
        let stats = m.merge_tile(&other);
        assert_eq!(stats.place_conflicts, 1);
        assert!(stats.has_conflicts());
        assert_eq!(m.place(PlaceKey(5)).unwrap().name, "Ljubljana");
    }

    #[test]
    fn extract_tile_keeps_layers() {
        let m = sample();
        let a = m.extract_tile(tile_a());
        assert_eq!(a.node_count(), 2);
        assert_eq!(a.link_count(), 1);
        assert!(a.link(LinkKey(3)).is_some());
        assert_eq!(a.place_count(), 1);
        assert_eq!(a.area_count(), 1);
        let frame = a.frame_box(0.01);
        assert_eq!(a.places(ROADS, &frame), vec![PlaceKey(5)]);
        assert_eq!(a.areas(ROADS, &frame), vec![AreaKey(4)]);
        assert_eq!(a.tile_ids().iter().copied().collect::<Vec<_>>(), vec![tile_a()]);

        // Node 7 sits alone in its tile; its link to node 2 comes along.
        let c = m.extract_tile(tile_c());
        assert_eq!(c.node_count(), 1);
        assert!(c.link(LinkKey(9)).is_some());
        assert_eq!(c.place_count(), 0);
        assert_eq!(c.area_count(), 0);
        c.verify().unwrap();
    }
}

// ── Codec and tile files ──────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use tg_core::{AreaKey, LayerKey, NodeKey, PlaceKey, TileId};
    use tg_routing::{AstarRouter, RecursiveRouter, UnitCost};

    use super::helpers::*;
    use crate::{Area, FORMAT_VERSION, MapError, OSM_MAGIC, OpenStreetMap, OsmPlace, PlaceType, tile_file_name};

    fn encoded(m: &OpenStreetMap) -> Vec<u8> {
        let mut buf = Vec::new();
        m.write_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn header_layout() {
        let buf = encoded(&sample());
        assert_eq!(&buf[..4], &OSM_MAGIC.to_le_bytes());
        assert_eq!(u16::from_le_bytes([buf[4], buf[5]]), FORMAT_VERSION);
    }

    #[test]
    fn stream_preserves_map() {
        let m = sample();
        let back = OpenStreetMap::read_from(encoded(&m).as_slice()).unwrap();
        assert_eq!(back.node_count(), m.node_count());
        assert_eq!(back.link_count(), m.link_count());
        assert_eq!(back.place_count(), m.place_count());
        assert_eq!(back.area_count(), m.area_count());
        assert_eq!(back.bounding_box(), m.bounding_box());
        assert_eq!(back.tile_ids(), m.tile_ids());
        assert_eq!(back.place(PlaceKey(11)), m.place(PlaceKey(11)));

        let frame = m.frame_box(0.01);
        assert_eq!(back.region(RAILS, &frame), m.region(RAILS, &frame));
        assert_eq!(
            back.route(&AstarRouter, NodeKey(6), NodeKey(2), &UnitCost),
            m.route(&AstarRouter, NodeKey(6), NodeKey(2), &UnitCost),
        );
        back.verify().unwrap();
    }

    #[test]
    fn foreign_magic_rejected() {
        let mut buf = encoded(&sample());
        buf[0] ^= 0xff;
        assert!(matches!(
            OpenStreetMap::read_from(buf.as_slice()),
            Err(MapError::BadMagic { expected: OSM_MAGIC, .. })
        ));
    }

    #[test]
    fn other_version_rejected() {
        let mut buf = encoded(&sample());
        buf[4..6].copy_from_slice(&3u16.to_le_bytes());
        assert!(matches!(
            OpenStreetMap::read_from(buf.as_slice()),
            Err(MapError::VersionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn truncated_input_rejected() {
        let buf = encoded(&sample());
        assert!(matches!(OpenStreetMap::read_from(&buf[..3]), Err(MapError::Io(_))));
        assert!(matches!(
            OpenStreetMap::read_from(&buf[..buf.len() - 1]),
            Err(MapError::Codec(_))
        ));
    }

    #[test]
    fn tiles_merge_back_into_whole() {
        let dir = tempfile::tempdir().unwrap();
        let whole = sample();
        let written = whole.save_tiles(dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(tile_file_name(dir.path(), tile_b()).is_file());

        let mut m = OpenStreetMap::new();
        let mut scratch = OpenStreetMap::new();
        for tile in written {
            assert!(m.merge_osm_tile(tile, dir.path(), &mut scratch).unwrap());
        }
        assert_eq!(m.node_count(), 4);
        assert_eq!(m.link_count(), 3);
        assert_eq!(m.place_count(), 2);
        assert_eq!(m.area_count(), 2);
        assert_eq!(m.bounding_box(), whole.bounding_box());
        assert_eq!(m.tile_ids(), whole.tile_ids());
        m.verify().unwrap();

        let astar = m.route(&AstarRouter, NodeKey(6), NodeKey(2), &UnitCost).unwrap();
        let exhaustive = m.route(&RecursiveRouter, NodeKey(6), NodeKey(2), &UnitCost).unwrap();
        assert_eq!(astar.links, exhaustive.links);
        assert_eq!(astar.cost, 2.0);
        assert_eq!(m.route(&AstarRouter, NodeKey(1), NodeKey(7), &UnitCost), None);
    }

    #[test]
    fn tiles_without_nodes_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut whole = roads();
        whole
            .add_place(PlaceKey(77), ROADS, OsmPlace::new(p(30.2, 10.2), "Wadi", PlaceType::Hamlet))
            .unwrap();
        whole
            .add_area(AreaKey(78), ROADS, Area::new(vec![p(30.2, 10.2), p(30.3, 10.25), p(30.25, 10.3)]))
            .unwrap();
        let lonely = TileId::of(p(30.2, 10.2));
        assert!(!whole.tile_ids().contains(&lonely));
        assert!(whole.content_tiles().contains(&lonely));

        let written = whole.save_tiles(dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.contains(&lonely) && written.contains(&tile_a()));
        assert!(tile_file_name(dir.path(), lonely).is_file());

        let mut m = OpenStreetMap::new();
        let mut scratch = OpenStreetMap::new();
        for tile in written {
            assert!(m.merge_osm_tile(tile, dir.path(), &mut scratch).unwrap());
        }
        assert_eq!(m.node_count(), 2);
        assert_eq!(m.place_count(), 2);
        assert_eq!(m.area_count(), 2);
        assert_eq!(m.place(PlaceKey(77)), whole.place(PlaceKey(77)));
        assert_eq!(m.area(AreaKey(78)), whole.area(AreaKey(78)));
        assert_eq!(m.bounding_box(), whole.bounding_box());

        let frame = whole.frame_box(0.01);
        assert_eq!(m.places(ROADS, &frame), whole.places(ROADS, &frame));
        assert_eq!(m.areas(ROADS, &frame), whole.areas(ROADS, &frame));
        m.verify().unwrap();
    }

    #[test]
    fn tile_merge_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        sample().save_tiles(dir.path()).unwrap();

        let mut m = OpenStreetMap::new();
        let mut scratch = OpenStreetMap::new();
        assert!(m.merge_osm_tile(tile_a(), dir.path(), &mut scratch).unwrap());
        let bbox = *m.bounding_box();
        let counts = (m.node_count(), m.link_count(), m.place_count(), m.area_count());

        assert!(!m.merge_osm_tile(tile_a(), dir.path(), &mut scratch).unwrap());
        assert_eq!(*m.bounding_box(), bbox);
        assert_eq!((m.node_count(), m.link_count(), m.place_count(), m.area_count()), counts);
        assert_eq!(m.place_index().layer_len(ROADS), (1, 1));
    }

    #[test]
    fn missing_tile_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = OpenStreetMap::new();
        let mut scratch = OpenStreetMap::new();
        assert!(matches!(
            m.merge_osm_tile(tile_a(), dir.path(), &mut scratch),
            Err(MapError::Io(_))
        ));
        assert!(m.tile_ids().is_empty());
    }

    #[test]
    fn partial_then_full_load() {
        let dir = tempfile::tempdir().unwrap();
        let source = two_layers();
        source.save_tiles(dir.path()).unwrap();
        let tile = tile_a();

        let mut m = OpenStreetMap::new();
        let mut scratch = OpenStreetMap::new();
        assert!(m.merge_osm_layer(LayerKey(i16::MIN)..=LayerKey(1), tile, dir.path(), &mut scratch).unwrap());
        assert_eq!(m.node_count(), 1);
        assert_eq!(m.link_count(), 1);
        assert_eq!(m.place_count(), 0);
        assert!(m.tile_ids().is_empty());

        assert!(m.merge_osm_tile(tile, dir.path(), &mut scratch).unwrap());
        assert_eq!(m.node_count(), 2);
        assert_eq!(m.link_count(), 2);
        assert_eq!(m.place_count(), 1);
        assert!(m.tile_ids().contains(&tile));
        assert_eq!(m.geo().node_index().layer_len(LayerKey(1)), (1, 1));
        m.verify().unwrap();

        // Fully merged: layer loads are skipped too.
        assert!(!m.merge_osm_layer(LayerKey(i16::MIN)..=LayerKey(1), tile, dir.path(), &mut scratch).unwrap());
    }
}

// ── Configuration and loading ─────────────────────────────────────────────────

#[cfg(test)]
mod loading {
    use std::path::{Path, PathBuf};

    use tg_core::{GeoRect, LayerKey, NodeKey};

    use super::helpers::*;
    use crate::{MapConfig, MapError, OpenStreetMap, TileLoader};

    fn config_for(dir: &Path) -> MapConfig {
        MapConfig { tiles_path: dir.to_path_buf(), ..MapConfig::default() }
    }

    #[test]
    fn config_from_toml() {
        let config = MapConfig::from_toml_str(
            r#"
            tiles_path        = "/srv/tiles"
            search_radius_deg = 0.02
            max_layer         = 6
            preload           = [1, 2]
            "#,
        )
        .unwrap();
        assert_eq!(config.tiles_path, PathBuf::from("/srv/tiles"));
        assert_eq!(config.search_radius_deg, 0.02);
        assert_eq!(config.max_layer_key(), Some(LayerKey(6)));
        assert_eq!(config.preload, vec![1, 2]);
    }

    #[test]
    fn config_defaults() {
        assert_eq!(MapConfig::from_toml_str("").unwrap(), MapConfig::default());
        let config = MapConfig::from_toml_str("max_layer = 3").unwrap();
        assert_eq!(config.search_radius_deg, 0.01);
        assert_eq!(config.max_layer, Some(3));
    }

    #[test]
    fn config_errors() {
        assert!(matches!(
            MapConfig::from_toml_str("search_radius_deg = \"wide\""),
            Err(MapError::Config(_))
        ));
        let config = MapConfig { preload: vec![u32::MAX], ..MapConfig::default() };
        assert!(matches!(config.preload_tiles(), Err(MapError::Core(_))));
    }

    #[test]
    fn config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.toml");
        std::fs::write(&path, "search_radius_deg = 0.5\n").unwrap();
        assert_eq!(MapConfig::load(&path).unwrap().search_radius_deg, 0.5);
        assert!(matches!(MapConfig::load(&dir.path().join("absent.toml")), Err(MapError::Io(_))));
    }

    #[test]
    fn region_skips_missing_tiles() {
        let dir = tempfile::tempdir().unwrap();
        sample().save_tiles(dir.path()).unwrap();
        let mut loader = TileLoader::new(config_for(dir.path()));
        let mut m = OpenStreetMap::new();

        // Spans 46 tiles, of which only A and B exist on disk.
        let rect = GeoRect::new(14.0, 44.6, 25.0, 45.4);
        assert_eq!(loader.load_region(&mut m, &rect).unwrap(), 2);
        assert_eq!(m.node_count(), 3);
        assert!(m.tile_ids().contains(&tile_a()));
        assert!(m.tile_ids().contains(&tile_b()));
        assert!(!m.tile_ids().contains(&tile_c()));

        assert_eq!(loader.load_region(&mut m, &rect).unwrap(), 0);
    }

    #[test]
    fn level_of_detail_loading() {
        let dir = tempfile::tempdir().unwrap();
        two_layers().save_tiles(dir.path()).unwrap();
        let config = MapConfig { max_layer: Some(1), ..config_for(dir.path()) };
        let mut loader = TileLoader::new(config);
        let mut m = OpenStreetMap::new();

        assert!(loader.load_tile(&mut m, tile_a()).unwrap());
        assert!(loader.is_partial(tile_a()));
        assert_eq!(m.node_count(), 1);
        assert!(!loader.load_tile(&mut m, tile_a()).unwrap());

        assert!(loader.load_full(&mut m, tile_a()).unwrap());
        assert!(!loader.is_partial(tile_a()));
        assert_eq!(m.node_count(), 2);
        assert!(!loader.load_tile(&mut m, tile_a()).unwrap());
        m.verify().unwrap();
    }

    #[test]
    fn preload_and_nearest_node() {
        let dir = tempfile::tempdir().unwrap();
        sample().save_tiles(dir.path()).unwrap();
        let config = MapConfig { preload: vec![tile_a().get()], ..config_for(dir.path()) };
        let mut loader = TileLoader::new(config);
        let mut m = OpenStreetMap::new();

        assert_eq!(loader.preload(&mut m).unwrap(), 1);
        assert_eq!(m.node_count(), 2);

        assert_eq!(loader.nearest_node(&mut m, p(24.605, 45.0)).unwrap(), Some(NodeKey(6)));
        assert!(m.tile_ids().contains(&tile_b()));
    }
}

// ── Travel time ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod travel_time {
    use tg_core::{LayerKey, LinkKey, NodeKey};
    use tg_routing::{AstarRouter, CostPolicy, DistanceCost, RecursiveRouter};

    use super::helpers::p;
    use crate::{LinkType, OpenStreetMap, OsmLink, OsmNode, TravelTimeCost, WALKING_SPEED_MPS};

    /// A slow direct street and a longer motorway detour.
    fn town() -> OpenStreetMap {
        let mut m = OpenStreetMap::new();
        let layer = LayerKey(1);
        m.add_node(layer, NodeKey(1), OsmNode::new(p(0.0, 0.0))).unwrap();
        m.add_node(layer, NodeKey(2), OsmNode::new(p(0.01, 0.0))).unwrap();
        m.add_node(layer, NodeKey(3), OsmNode::new(p(0.005, 0.005))).unwrap();
        m.add_link(LinkKey(10), OsmLink::new(1200.0, LinkType::Residential), NodeKey(1), NodeKey(2))
            .unwrap();
        m.add_link(LinkKey(11), OsmLink::new(800.0, LinkType::Motorway), NodeKey(1), NodeKey(3))
            .unwrap();
        m.add_link(LinkKey(12), OsmLink::new(800.0, LinkType::Motorway), NodeKey(3), NodeKey(2))
            .unwrap();
        m
    }

    #[test]
    fn walking_fallback() {
        let cost = TravelTimeCost.link_cost(&OsmLink::new(14.0, LinkType::Footway));
        assert!((cost - 14.0 / WALKING_SPEED_MPS).abs() < 1e-9);
    }

    #[test]
    fn fastest_is_not_shortest() {
        let m = town();
        let fastest = m.route(&AstarRouter, NodeKey(1), NodeKey(2), &TravelTimeCost).unwrap();
        assert_eq!(fastest.links, vec![LinkKey(11), LinkKey(12)]);
        let shortest = m.route(&AstarRouter, NodeKey(1), NodeKey(2), &DistanceCost).unwrap();
        assert_eq!(shortest.links, vec![LinkKey(10)]);

        let exhaustive = m.route(&RecursiveRouter, NodeKey(1), NodeKey(2), &TravelTimeCost).unwrap();
        assert_eq!(exhaustive.links, fastest.links);
        assert!((exhaustive.cost - fastest.cost).abs() < 1e-9);
    }
}
