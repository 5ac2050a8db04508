//! Exhaustive depth-first branch-and-bound search.
//!
//! The search walks every path from the source, pruned three ways:
//!
//! 1. **Memo.**  The cheapest cost at which each node has been reached is
//!    remembered; arriving again at equal or higher cost ends the branch.
//!    This also cuts cycles, since costs are non-negative.
//! 2. **Bound.**  A branch ends when `cost + estimate(node, to)` cannot beat
//!    the best route found so far.
//! 3. **Splicing.**  Reaching a node that lies on the best route, at a lower
//!    cost than before, completes the current path with that route's tail
//!    instead of searching on.
//!
//! Outgoing links are tried in ascending `link cost + estimate` order so a
//! good bound is found early.  The walk uses an explicit frame stack, not
//! native recursion, so deep graphs do not exhaust the thread stack.
//!
//! Worst-case running time is exponential in the graph size.

use rustc_hash::FxHashMap;
use tracing::trace;

use tg_core::{LinkKey, NodeKey};
use tg_spatial::Graph;

use crate::{AdditiveCost, RouteResult, Router};

/// Branch-and-bound search; requires an [`AdditiveCost`] policy.
#[derive(Copy, Clone, Debug, Default)]
pub struct RecursiveRouter;

impl<N, L, C> Router<N, L, C> for RecursiveRouter
where
    C: AdditiveCost<N, L>,
{
    fn route(
        &self,
        graph: &Graph<N, L>,
        from:  NodeKey,
        to:    NodeKey,
        cost:  &C,
    ) -> Option<RouteResult> {
        let target = graph.node(to)?;
        graph.node(from)?;
        if from == to {
            return Some(RouteResult::empty());
        }

        let mut search = Search {
            graph,
            policy: cost,
            to,
            target,
            memo: FxHashMap::default(),
            best: Vec::new(),
            best_cost: f64::INFINITY,
            best_index: FxHashMap::default(),
            expanded: 0,
            splices: 0,
        };
        search.run(from);

        trace!(
            expanded = search.expanded,
            splices = search.splices,
            found = search.best_cost.is_finite(),
            "branch-and-bound finished"
        );
        if !search.best_cost.is_finite() {
            return None;
        }
        Some(RouteResult {
            links: search.best.iter().map(|step| step.link).collect(),
            cost:  search.best_cost,
        })
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// One link of a path, with the path cost up to and including it.
#[derive(Copy, Clone, Debug)]
struct Step {
    link:  LinkKey,
    start: NodeKey,
    total: f64,
}

/// A node being expanded: its children in exploration order, and the next
/// one to try.
struct Frame {
    node:     NodeKey,
    cost:     f64,
    children: Vec<(f64, LinkKey, NodeKey)>,
    next:     usize,
}

struct Search<'g, 'c, N, L, C> {
    graph:      &'g Graph<N, L>,
    policy:     &'c C,
    to:         NodeKey,
    target:     &'g N,
    /// Cheapest arrival cost per node.  The source is fixed for one search,
    /// so the node alone is the key.
    memo:       FxHashMap<NodeKey, f64>,
    best:       Vec<Step>,
    best_cost:  f64,
    /// Position in `best` of the link leaving each node of the best route.
    best_index: FxHashMap<NodeKey, usize>,
    expanded:   usize,
    splices:    usize,
}

impl<N, L, C: AdditiveCost<N, L>> Search<'_, '_, N, L, C> {
    fn run(&mut self, from: NodeKey) {
        let mut path: Vec<Step> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(root) = self.enter(from, 0.0, &path) {
            stack.push(root);
        }

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.children.len() {
                stack.pop();
                path.pop();
                continue;
            }
            let (link_cost, link, end) = frame.children[frame.next];
            frame.next += 1;
            let step = Step { link, start: frame.node, total: frame.cost + link_cost };

            path.push(step);
            match self.enter(end, step.total, &path) {
                Some(child) => stack.push(child),
                None => {
                    path.pop();
                }
            }
        }
    }

    /// Arrive at `node` with `cost` along `path`.  Returns the frame to
    /// expand, or `None` if the branch ends here.
    fn enter(&mut self, node: NodeKey, cost: f64, path: &[Step]) -> Option<Frame> {
        if node == self.to {
            if cost < self.best_cost {
                self.record(path.to_vec());
            }
            return None;
        }

        if self.memo.get(&node).is_some_and(|&seen| seen <= cost) {
            return None;
        }
        self.memo.insert(node, cost);

        let payload = self.graph.node(node)?;
        if cost + self.policy.estimated_cost(payload, self.target) >= self.best_cost {
            return None;
        }

        if let Some(&at) = self.best_index.get(&node) {
            self.splice(path, at, cost);
            return None;
        }

        self.expanded += 1;
        let mut children: Vec<(f64, LinkKey, NodeKey)> = Vec::new();
        let mut order: Vec<f64> = Vec::new();
        for &link in self.graph.outgoing(node) {
            let Some(entry) = self.graph.link_entry(link) else { continue };
            let Some(end) = self.graph.node(entry.end) else { continue };
            let link_cost = self.policy.link_cost(&entry.link);
            children.push((link_cost, link, entry.end));
            order.push(link_cost + self.policy.estimated_cost(end, self.target));
        }
        let mut ranked: Vec<usize> = (0..children.len()).collect();
        ranked.sort_by(|&a, &b| order[a].total_cmp(&order[b]));
        let children = ranked.into_iter().map(|i| children[i]).collect();

        Some(Frame { node, cost, children, next: 0 })
    }

    /// Complete `path` (ending at a node of the best route) with the best
    /// route's tail from position `at`.
    fn splice(&mut self, path: &[Step], at: usize, cost: f64) {
        let reached = if at == 0 { 0.0 } else { self.best[at - 1].total };
        let tail_cost = self.best_cost - reached;
        if cost + tail_cost >= self.best_cost {
            return;
        }

        let mut route = path.to_vec();
        route.extend(self.best[at..].iter().map(|step| Step {
            total: cost + (step.total - reached),
            ..*step
        }));
        self.splices += 1;
        self.record(route);
    }

    fn record(&mut self, route: Vec<Step>) {
        self.best_cost = route.last().map_or(0.0, |step| step.total);
        self.best_index.clear();
        for (i, step) in route.iter().enumerate() {
            self.best_index.entry(step.start).or_insert(i);
        }
        self.best = route;
    }
}
