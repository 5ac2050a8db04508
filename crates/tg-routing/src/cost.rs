//! Cost policies: how much a link costs and how far the destination still is.
//!
//! Both routers are generic over a [`CostPolicy`].  The defaults give every
//! link a cost of `1.0` and never estimate, which turns A* into a plain
//! breadth-first/Dijkstra search.
//!
//! | Policy           | Link cost             | Estimate                        |
//! |------------------|-----------------------|---------------------------------|
//! | [`UnitCost`]     | `1.0`                 | `0.0`                           |
//! | [`DistanceCost`] | `L::length_m()`       | great-circle distance in metres |
//!
//! Costs must be non-negative.  A* only returns optimal routes if the
//! estimate never exceeds the true remaining cost.

use tg_spatial::{Positioned, Weighted};

/// Link cost and remaining-cost estimate for node payload `N` and link
/// payload `L`.
pub trait CostPolicy<N, L> {
    /// Cost of traversing `link`.
    #[inline]
    fn link_cost(&self, _link: &L) -> f64 {
        1.0
    }

    /// Lower bound on the cost from `from` to `to`.
    #[inline]
    fn estimated_cost(&self, _from: &N, _to: &N) -> f64 {
        0.0
    }
}

/// Marker for policies whose route cost is the plain sum of link costs.
///
/// The cost of a link must not depend on how it was reached (no turn
/// penalties, no time-of-day).  [`RecursiveRouter`](crate::RecursiveRouter)
/// reuses the tail of the best route found so far whenever it meets one of
/// its nodes again, which is only correct under this assumption.
pub trait AdditiveCost<N, L>: CostPolicy<N, L> {}

// ── UnitCost ──────────────────────────────────────────────────────────────────

/// Every link costs `1.0`: routes with the fewest links.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnitCost;

impl<N, L> CostPolicy<N, L> for UnitCost {}

impl<N, L> AdditiveCost<N, L> for UnitCost {}

// ── DistanceCost ──────────────────────────────────────────────────────────────

/// Shortest routes by physical length.
///
/// The estimate is the great-circle distance, which is admissible as long as
/// no link is shorter than the straight line between its end points.
#[derive(Copy, Clone, Debug, Default)]
pub struct DistanceCost;

impl<N: Positioned, L: Weighted> CostPolicy<N, L> for DistanceCost {
    #[inline]
    fn link_cost(&self, link: &L) -> f64 {
        link.length_m()
    }

    #[inline]
    fn estimated_cost(&self, from: &N, to: &N) -> f64 {
        from.position().distance_m(to.position())
    }
}

impl<N: Positioned, L: Weighted> AdditiveCost<N, L> for DistanceCost {}
