//! Best-first A* search.
//!
//! Search state lives in an arena of [`NodeRouteInfo`]s indexed by a
//! `FxHashMap<NodeKey, usize>`.  The open set is a min-heap on
//! `cost + estimate`; a cheaper path to a known node updates its info in place
//! and pushes it again.  Heap entries whose priority no longer matches the
//! live info are stale and skipped on pop.
//!
//! There is no closed set: a node whose cost improves after expansion is
//! expanded again, so an admissible but inconsistent estimate still yields an
//! optimal route.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::hash_map::Entry;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use tracing::trace;

use tg_core::{LinkKey, NodeKey};
use tg_spatial::Graph;

use crate::{CostPolicy, RouteResult, Router};

/// A* over any [`CostPolicy`].
#[derive(Copy, Clone, Debug, Default)]
pub struct AstarRouter;

impl<N, L, C> Router<N, L, C> for AstarRouter
where
    C: CostPolicy<N, L>,
{
    fn route(
        &self,
        graph: &Graph<N, L>,
        from:  NodeKey,
        to:    NodeKey,
        cost:  &C,
    ) -> Option<RouteResult> {
        astar(graph, from, to, cost)
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Per-node search record.
#[derive(Debug, Clone)]
struct NodeRouteInfo {
    node:     NodeKey,
    /// Cost from the source.
    cost:     f64,
    /// Estimated cost to the destination; fixed per node.
    estimate: f64,
    /// Link used to reach this node and the arena index of its start.
    via:      Option<(LinkKey, usize)>,
}

impl NodeRouteInfo {
    #[inline]
    fn priority(&self) -> f64 {
        self.cost + self.estimate
    }
}

type OpenEntry = (Reverse<OrderedFloat<f64>>, Reverse<usize>);

fn astar<N, L, C: CostPolicy<N, L>>(
    graph: &Graph<N, L>,
    from:  NodeKey,
    to:    NodeKey,
    policy: &C,
) -> Option<RouteResult> {
    let target = graph.node(to)?;
    let source = graph.node(from)?;
    if from == to {
        return Some(RouteResult::empty());
    }

    let mut infos = vec![NodeRouteInfo {
        node:     from,
        cost:     0.0,
        estimate: policy.estimated_cost(source, target),
        via:      None,
    }];
    let mut visited: FxHashMap<NodeKey, usize> = FxHashMap::default();
    visited.insert(from, 0);

    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    open.push((Reverse(OrderedFloat(infos[0].priority())), Reverse(0)));

    let mut expanded = 0_usize;
    while let Some((Reverse(OrderedFloat(priority)), Reverse(idx))) = open.pop() {
        let info = &infos[idx];
        if priority > info.priority() {
            continue;
        }
        if info.node == to {
            trace!(expanded, visited = infos.len(), "A* reached destination");
            return Some(reconstruct(&infos, idx));
        }
        expanded += 1;

        let (node, base) = (info.node, info.cost);
        for &link_key in graph.outgoing(node) {
            let Some(entry) = graph.link_entry(link_key) else { continue };
            let Some(next) = graph.node(entry.end) else { continue };
            let next_cost = base + policy.link_cost(&entry.link);

            match visited.entry(entry.end) {
                Entry::Occupied(slot) => {
                    let i = *slot.get();
                    if next_cost < infos[i].cost {
                        infos[i].cost = next_cost;
                        infos[i].via = Some((link_key, idx));
                        open.push((Reverse(OrderedFloat(infos[i].priority())), Reverse(i)));
                    }
                }
                Entry::Vacant(slot) => {
                    let i = infos.len();
                    infos.push(NodeRouteInfo {
                        node:     entry.end,
                        cost:     next_cost,
                        estimate: policy.estimated_cost(next, target),
                        via:      Some((link_key, idx)),
                    });
                    slot.insert(i);
                    open.push((Reverse(OrderedFloat(infos[i].priority())), Reverse(i)));
                }
            }
        }
    }

    trace!(expanded, visited = infos.len(), "A* exhausted open set");
    None
}

/// Walk predecessor links back from `idx`, then reverse.
fn reconstruct(infos: &[NodeRouteInfo], idx: usize) -> RouteResult {
    let mut links = Vec::new();
    let mut cur = idx;
    while let Some((link, prev)) = infos[cur].via {
        links.push(link);
        cur = prev;
    }
    links.reverse();
    RouteResult { links, cost: infos[idx].cost }
}
