//! `tg-routing` — route search over a `tg-spatial` [`Graph`](tg_spatial::Graph).
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`cost`]      | `CostPolicy`, `AdditiveCost`, `UnitCost`, `DistanceCost`  |
//! | [`router`]    | `Router` trait, `RouteResult`                             |
//! | [`astar`]     | `AstarRouter`: best-first A*                              |
//! | [`recursive`] | `RecursiveRouter`: depth-first branch-and-bound           |
//!
//! Both routers answer the same query and agree on the total cost; the link
//! sequence may differ when several optimal routes exist.
//!
//! ```text
//! let route = AstarRouter.route(map.graph(), from, to, &DistanceCost)?;
//! ```

pub mod astar;
pub mod cost;
pub mod recursive;
pub mod router;

#[cfg(test)]
mod tests;

pub use astar::AstarRouter;
pub use cost::{AdditiveCost, CostPolicy, DistanceCost, UnitCost};
pub use recursive::RecursiveRouter;
pub use router::{RouteResult, Router};
