//! Routing trait and result type.

use tg_core::{LinkKey, NodeKey};
use tg_spatial::{Graph, GraphResult};

use crate::CostPolicy;

// ── RouteResult ───────────────────────────────────────────────────────────────

/// The result of a routing query: links in travel order plus the summed cost.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Links to traverse in order, from source to destination.
    pub links: Vec<LinkKey>,
    /// Total cost under the policy used for the query.
    pub cost: f64,
}

impl RouteResult {
    /// The zero-cost route from a node to itself.
    pub fn empty() -> Self {
        Self { links: Vec::new(), cost: 0.0 }
    }

    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }

    /// Nodes visited by this route, source first.  Empty for a trivial route.
    pub fn nodes<N, L>(&self, graph: &Graph<N, L>) -> GraphResult<Vec<NodeKey>> {
        graph.nodes_on_route(&self.links)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// A route-search algorithm.
///
/// Returns `None` if `to` cannot be reached from `from`, including when
/// either key is not in the graph.  `from == to` yields
/// [`RouteResult::empty`].  Links whose end node is not loaded are skipped.
///
/// # Thread safety
///
/// Routers are stateless; all search state is local to one call, so a
/// router can be shared across threads as long as the graph is not mutated.
pub trait Router<N, L, C: CostPolicy<N, L>>: Send + Sync {
    fn route(
        &self,
        graph: &Graph<N, L>,
        from:  NodeKey,
        to:    NodeKey,
        cost:  &C,
    ) -> Option<RouteResult>;
}
