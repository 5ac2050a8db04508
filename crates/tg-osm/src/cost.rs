//! Cost policies over OSM payloads.

use tg_routing::{AdditiveCost, CostPolicy};

use crate::model::{LinkType, OsmLink, OsmNode};

/// Speed assumed on links closed to cars, in metres per second.
pub const WALKING_SPEED_MPS: f64 = 1.4;

/// Fastest routes, in seconds.
///
/// Links open to cars are driven at their category's typical speed, all
/// others are walked.  The estimate assumes motorway speed in a straight
/// line, so it never overestimates.
#[derive(Copy, Clone, Debug, Default)]
pub struct TravelTimeCost;

impl TravelTimeCost {
    fn top_speed() -> f64 {
        LinkType::Motorway.car_speed_mps().unwrap_or(WALKING_SPEED_MPS)
    }
}

impl CostPolicy<OsmNode, OsmLink> for TravelTimeCost {
    #[inline]
    fn link_cost(&self, link: &OsmLink) -> f64 {
        let speed = link.kind.car_speed_mps().unwrap_or(WALKING_SPEED_MPS);
        f64::from(link.length_m) / speed
    }

    #[inline]
    fn estimated_cost(&self, from: &OsmNode, to: &OsmNode) -> f64 {
        from.pos.distance_m(to.pos) / Self::top_speed()
    }
}

impl AdditiveCost<OsmNode, OsmLink> for TravelTimeCost {}
