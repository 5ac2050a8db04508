//! Unit tests for tg-routing.
//!
//! Graphs are built by hand; no map data is needed.

#[cfg(test)]
mod helpers {
    use tg_core::{GeoPoint, LinkKey, NodeKey};
    use tg_spatial::{Graph, Weighted};

    use crate::{AdditiveCost, CostPolicy};

    #[derive(Clone, Copy, Debug)]
    pub struct Len(pub f64);

    impl Weighted for Len {
        fn length_m(&self) -> f64 {
            self.0
        }
    }

    /// Cost = link payload; no estimate.
    pub struct ByLength;

    impl<N> CostPolicy<N, f64> for ByLength {
        fn link_cost(&self, link: &f64) -> f64 {
            *link
        }
    }

    impl<N> AdditiveCost<N, f64> for ByLength {}

    /// Three nodes, links in both directions:
    ///
    /// ```text
    ///   0 ──4 (2.18)──▶ 1 ──5 (3.141)──▶ 2
    ///   0 ─────────7 (55)──────────────▶ 2
    /// ```
    ///
    /// Fewest links: `[7]`.  Shortest: `[4, 5]`.
    pub fn triangle() -> Graph<f64, f64> {
        let mut g = Graph::new();
        g.add_node(NodeKey(0), 3.149).unwrap();
        g.add_node(NodeKey(1), 2.181).unwrap();
        g.add_node(NodeKey(2), 10.0).unwrap();
        g.add_link(LinkKey(3), 3.14, NodeKey(1), NodeKey(0)).unwrap();
        g.add_link(LinkKey(4), 2.18, NodeKey(0), NodeKey(1)).unwrap();
        g.add_link(LinkKey(5), 3.141, NodeKey(1), NodeKey(2)).unwrap();
        g.add_link(LinkKey(6), 2.182, NodeKey(2), NodeKey(1)).unwrap();
        g.add_link(LinkKey(7), 55.0, NodeKey(0), NodeKey(2)).unwrap();
        g.add_link(LinkKey(8), 56.0, NodeKey(2), NodeKey(0)).unwrap();
        g
    }

    /// Square A(1)–B(2)–C(3)–D(4)–A, unit-length links both ways.
    pub fn square() -> Graph<GeoPoint, Len> {
        let mut g = Graph::new();
        let corners = [(1, 0.0, 0.0), (2, 0.001, 0.0), (3, 0.001, 0.001), (4, 0.0, 0.001)];
        for (k, lon, lat) in corners {
            g.add_node(NodeKey(k), GeoPoint::new(lon, lat)).unwrap();
        }
        let mut key = 0;
        for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
            for (s, e) in [(a, b), (b, a)] {
                key += 1;
                g.add_link(LinkKey(key), Len(1.0), NodeKey(s), NodeKey(e)).unwrap();
            }
        }
        g
    }

    /// Add a link whose length is the great-circle distance times `stretch`.
    pub fn link(g: &mut Graph<GeoPoint, Len>, key: i32, s: i64, e: i64, stretch: f64) {
        let a = *g.node(NodeKey(s)).unwrap();
        let b = *g.node(NodeKey(e)).unwrap();
        g.add_link(LinkKey(key), Len(a.distance_m(b) * stretch), NodeKey(s), NodeKey(e))
            .unwrap();
    }

    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fixtures {
    use tg_core::{LinkKey, NodeKey};

    use super::helpers::{ByLength, square, triangle};
    use crate::{AstarRouter, RecursiveRouter, Router, UnitCost};

    #[test]
    fn fewest_links() {
        let g = triangle();
        for route in [
            RecursiveRouter.route(&g, NodeKey(0), NodeKey(2), &UnitCost),
            AstarRouter.route(&g, NodeKey(0), NodeKey(2), &UnitCost),
        ] {
            let route = route.unwrap();
            assert_eq!(route.links, vec![LinkKey(7)]);
            assert_eq!(route.cost, 1.0);
        }
    }

    #[test]
    fn shortest_by_length() {
        let g = triangle();
        for route in [
            RecursiveRouter.route(&g, NodeKey(0), NodeKey(2), &ByLength),
            AstarRouter.route(&g, NodeKey(0), NodeKey(2), &ByLength),
        ] {
            let route = route.unwrap();
            assert_eq!(route.links, vec![LinkKey(4), LinkKey(5)]);
            assert!((route.cost - (2.18 + 3.141)).abs() < 1e-9);
        }
    }

    #[test]
    fn square_opposite_corner() {
        let g = square();
        let astar = AstarRouter.route(&g, NodeKey(1), NodeKey(3), &UnitCost).unwrap();
        let rec = RecursiveRouter.route(&g, NodeKey(1), NodeKey(3), &UnitCost).unwrap();
        assert_eq!(astar.cost, 2.0);
        assert_eq!(rec.cost, 2.0);
        assert_eq!(astar.links.len(), 2);

        let nodes = astar.nodes(&g).unwrap();
        assert_eq!(nodes.first(), Some(&NodeKey(1)));
        assert_eq!(nodes.last(), Some(&NodeKey(3)));
        assert!(nodes[1] == NodeKey(2) || nodes[1] == NodeKey(4));
    }

    #[test]
    fn same_node_is_free() {
        let g = square();
        for route in [
            AstarRouter.route(&g, NodeKey(2), NodeKey(2), &UnitCost),
            RecursiveRouter.route(&g, NodeKey(2), NodeKey(2), &UnitCost),
        ] {
            let route = route.unwrap();
            assert!(route.is_trivial());
            assert_eq!(route.cost, 0.0);
        }
    }

    #[test]
    fn unknown_keys_yield_none() {
        let g = square();
        assert!(AstarRouter.route(&g, NodeKey(1), NodeKey(99), &UnitCost).is_none());
        assert!(AstarRouter.route(&g, NodeKey(99), NodeKey(1), &UnitCost).is_none());
        assert!(RecursiveRouter.route(&g, NodeKey(1), NodeKey(99), &UnitCost).is_none());
        assert!(RecursiveRouter.route(&g, NodeKey(99), NodeKey(1), &UnitCost).is_none());
    }
}

// ── Reachability ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod reachability {
    use tg_core::{GeoPoint, LinkKey, NodeKey};
    use tg_spatial::Graph;

    use super::helpers::{Len, link};
    use crate::{AstarRouter, DistanceCost, RecursiveRouter, Router};

    fn line() -> Graph<GeoPoint, Len> {
        let mut g = Graph::new();
        for k in 1..=3 {
            g.add_node(NodeKey(k), GeoPoint::new(k as f32 * 0.01, 0.0)).unwrap();
        }
        link(&mut g, 1, 1, 2, 1.0);
        link(&mut g, 2, 2, 3, 1.0);
        g
    }

    #[test]
    fn one_way_links() {
        let g = line();
        assert!(AstarRouter.route(&g, NodeKey(1), NodeKey(3), &DistanceCost).is_some());
        assert!(AstarRouter.route(&g, NodeKey(3), NodeKey(1), &DistanceCost).is_none());
        assert!(RecursiveRouter.route(&g, NodeKey(1), NodeKey(3), &DistanceCost).is_some());
        assert!(RecursiveRouter.route(&g, NodeKey(3), NodeKey(1), &DistanceCost).is_none());
    }

    #[test]
    fn disconnected_component() {
        let mut g = line();
        g.add_node(NodeKey(9), GeoPoint::new(1.0, 1.0)).unwrap();
        assert!(AstarRouter.route(&g, NodeKey(1), NodeKey(9), &DistanceCost).is_none());
        assert!(RecursiveRouter.route(&g, NodeKey(1), NodeKey(9), &DistanceCost).is_none());
    }

    #[test]
    fn dangling_link_is_skipped() {
        let mut g = line();
        // Leaves the loaded area; node 50 lives in a tile not merged yet.
        g.add_link(LinkKey(10), Len(0.0), NodeKey(1), NodeKey(50)).unwrap();
        let astar = AstarRouter.route(&g, NodeKey(1), NodeKey(3), &DistanceCost).unwrap();
        let rec = RecursiveRouter.route(&g, NodeKey(1), NodeKey(3), &DistanceCost).unwrap();
        assert_eq!(astar.links, vec![LinkKey(1), LinkKey(2)]);
        assert_eq!(rec.links, vec![LinkKey(1), LinkKey(2)]);
    }

    #[test]
    fn detour_beats_slow_direct_link() {
        let mut g = line();
        link(&mut g, 3, 1, 3, 3.0);
        let astar = AstarRouter.route(&g, NodeKey(1), NodeKey(3), &DistanceCost).unwrap();
        let rec = RecursiveRouter.route(&g, NodeKey(1), NodeKey(3), &DistanceCost).unwrap();
        assert_eq!(astar.links, vec![LinkKey(1), LinkKey(2)]);
        assert_eq!(rec.links, astar.links);
    }
}

// ── Router agreement ──────────────────────────────────────────────────────────

#[cfg(test)]
mod agreement {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use tg_core::{GeoPoint, LinkKey, NodeKey};
    use tg_spatial::Graph;

    use super::helpers::{ByLength, Len, approx_eq, link};
    use crate::{AstarRouter, DistanceCost, RecursiveRouter, Router};

    /// Random points in a 0.1° square, each linked to a few random others
    /// with lengths stretched above the straight-line distance.
    fn random_geo_graph(rng: &mut SmallRng, nodes: i64, degree: usize) -> Graph<GeoPoint, Len> {
        let mut g = Graph::new();
        for k in 0..nodes {
            let p = GeoPoint::new(rng.gen_range(11.0..11.1), rng.gen_range(48.0..48.1));
            g.add_node(NodeKey(k), p).unwrap();
        }
        let mut key = 0;
        for s in 0..nodes {
            for _ in 0..degree {
                let e = rng.gen_range(0..nodes);
                if e == s {
                    continue;
                }
                key += 1;
                link(&mut g, key, s, e, rng.gen_range(1.0..2.0));
            }
        }
        g
    }

    /// Integer link weights, so sums are exact in any order.
    fn random_weighted_graph(rng: &mut SmallRng, nodes: i64, links: i32) -> Graph<(), f64> {
        let mut g = Graph::new();
        for k in 0..nodes {
            g.add_node(NodeKey(k), ()).unwrap();
        }
        for key in 0..links {
            let s = rng.gen_range(0..nodes);
            let e = rng.gen_range(0..nodes);
            let w = rng.gen_range(0..10) as f64;
            g.add_link(LinkKey(key), w, NodeKey(s), NodeKey(e)).unwrap();
        }
        g
    }

    #[test]
    fn same_cost_with_distance_heuristic() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let g = random_geo_graph(&mut rng, 25, 3);
            for _ in 0..10 {
                let from = NodeKey(rng.gen_range(0..25));
                let to = NodeKey(rng.gen_range(0..25));
                let astar = AstarRouter.route(&g, from, to, &DistanceCost);
                let rec = RecursiveRouter.route(&g, from, to, &DistanceCost);
                match (astar, rec) {
                    (Some(a), Some(r)) => {
                        assert!(approx_eq(a.cost, r.cost), "{from}→{to}: {} vs {}", a.cost, r.cost);
                        assert_eq!(a.nodes(&g).unwrap().last(), r.nodes(&g).unwrap().last());
                    }
                    (None, None) => {}
                    (a, r) => panic!("{from}→{to}: reachability differs: {a:?} vs {r:?}"),
                }
            }
        }
    }

    #[test]
    fn same_cost_with_zero_weight_links() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let g = random_weighted_graph(&mut rng, 15, 40);
            for _ in 0..10 {
                let from = NodeKey(rng.gen_range(0..15));
                let to = NodeKey(rng.gen_range(0..15));
                let astar = AstarRouter.route(&g, from, to, &ByLength).map(|r| r.cost);
                let rec = RecursiveRouter.route(&g, from, to, &ByLength).map(|r| r.cost);
                assert_eq!(astar, rec, "{from}→{to}");
            }
        }
    }

    #[test]
    fn route_cost_matches_link_sum() {
        let mut rng = SmallRng::seed_from_u64(7);
        let g = random_geo_graph(&mut rng, 30, 3);
        for to in 1..30 {
            let Some(route) = RecursiveRouter.route(&g, NodeKey(0), NodeKey(to), &DistanceCost) else {
                continue;
            };
            let sum: f64 = route.links.iter().map(|l| g.link(*l).unwrap().0).sum();
            assert!(approx_eq(sum, route.cost));
        }
    }
}
