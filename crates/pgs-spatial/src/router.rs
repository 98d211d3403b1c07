//! Edge weights and single-source shortest paths.
//!
//! # Pluggability
//!
//! Path cost comes from an [`EdgeWeight`].  Two weights are in use:
//!
//! | Weight                 | Cost per street              | Used by              |
//! |------------------------|------------------------------|----------------------|
//! | [`SpeedLimitWeight`]   | `max(0, 100 - limit_kmh)`    | ordinary trips       |
//! | congestion (pgs-world) | current cover duration (s)   | guidance service     |
//!
//! Any `Fn(EdgeId) -> f64` closure is also a weight.
//!
//! # Query model
//!
//! [`ShortestPaths::compute`] runs Dijkstra once from a source node and keeps
//! the whole tree, so repeated point queries (`path_to`, `cost_to`) against
//! one source cost nothing extra.  An unreachable target is `None`, never an
//! error.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use pgs_core::{EdgeId, NodeId};

use crate::network::StreetNetwork;
use crate::{SpatialError, SpatialResult};

// ── EdgeWeight ────────────────────────────────────────────────────────────────

/// Cost of traversing one street.
///
/// Must be non-negative; negative values are clamped to zero so Dijkstra's
/// invariant holds.  `Sync` so one weight can serve every worker thread.
pub trait EdgeWeight: Sync {
    fn cost(&self, network: &StreetNetwork, edge: EdgeId) -> f64;
}

impl<F> EdgeWeight for F
where
    F: Fn(EdgeId) -> f64 + Sync,
{
    #[inline]
    fn cost(&self, _network: &StreetNetwork, edge: EdgeId) -> f64 {
        self(edge)
    }
}

/// Prefers faster roads: `100 - speed limit (km/h)`, floored at zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpeedLimitWeight;

impl EdgeWeight for SpeedLimitWeight {
    #[inline]
    fn cost(&self, network: &StreetNetwork, edge: EdgeId) -> f64 {
        (100.0 - network.edge_speed_limit_kmh[edge.index()]).max(0.0)
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of streets from a source node to a target node.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub edges: Vec<EdgeId>,
    /// Sum of edge weights along `edges`.
    pub cost: f64,
}

impl Route {
    /// `true` if source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Physical length of the route in metres.
    pub fn length_m(&self, network: &StreetNetwork) -> f64 {
        self.edges.iter().map(|e| network.edge_length_m[e.index()]).sum()
    }
}

// ── ShortestPaths ─────────────────────────────────────────────────────────────

/// A shortest-path tree rooted at one source node.
pub struct ShortestPaths {
    source:    NodeId,
    dist:      Vec<f64>,
    prev_edge: Vec<EdgeId>,
}

/// Heap key ordered by `f64::total_cmp`, with the node as tie-breaker.
#[derive(Copy, Clone, PartialEq)]
struct HeapEntry(f64, NodeId);

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0).then(self.1.cmp(&other.1))
    }
}

impl ShortestPaths {
    /// Run Dijkstra from `source` over every reachable node.
    pub fn compute<W: EdgeWeight + ?Sized>(
        network: &StreetNetwork,
        source: NodeId,
        weight: &W,
    ) -> SpatialResult<Self> {
        if !network.contains_node(source) {
            return Err(SpatialError::NodeNotFound(source));
        }

        let n = network.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev_edge = vec![EdgeId::INVALID; n];
        dist[source.index()] = 0.0;

        let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
        heap.push(Reverse(HeapEntry(0.0, source)));

        while let Some(Reverse(HeapEntry(cost, node))) = heap.pop() {
            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }
            for edge in network.out_edges(node) {
                let neighbor = network.edge_to[edge.index()];
                let new_cost = cost + weight.cost(network, edge).max(0.0);
                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    prev_edge[neighbor.index()] = edge;
                    heap.push(Reverse(HeapEntry(new_cost, neighbor)));
                }
            }
        }

        Ok(Self { source, dist, prev_edge })
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// `true` if `target` is reachable from the source.
    #[inline]
    pub fn reaches(&self, target: NodeId) -> bool {
        self.dist.get(target.index()).is_some_and(|d| d.is_finite())
    }

    /// Total cost to `target`, or `None` when unreachable.
    pub fn cost_to(&self, target: NodeId) -> Option<f64> {
        self.reaches(target).then(|| self.dist[target.index()])
    }

    /// The shortest route to `target`, or `None` when unreachable.  The
    /// source itself yields an empty route.
    pub fn path_to(&self, network: &StreetNetwork, target: NodeId) -> Option<Route> {
        let cost = self.cost_to(target)?;
        let mut edges = Vec::new();
        let mut cur = target;
        while cur != self.source {
            let e = self.prev_edge[cur.index()];
            edges.push(e);
            cur = network.edge_from[e.index()];
        }
        edges.reverse();
        Some(Route { edges, cost })
    }
}

/// One-shot convenience: shortest route from `from` to `to`.
pub fn shortest_route<W: EdgeWeight + ?Sized>(
    network: &StreetNetwork,
    from: NodeId,
    to: NodeId,
    weight: &W,
) -> SpatialResult<Option<Route>> {
    if !network.contains_node(to) {
        return Err(SpatialError::NodeNotFound(to));
    }
    Ok(ShortestPaths::compute(network, from, weight)?.path_to(network, to))
}
