//! Street network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format in both directions.
//! Given a `NodeId n`, its outgoing streets are the contiguous `EdgeId` range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! and its incoming streets are
//!
//! ```text
//! in_edges[ node_in_start[n] .. node_in_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_speed_limit_kmh`, `edge_tags`) are sorted by source node and indexed
//! by `EdgeId`.  The incoming index exists for the undirected breadth-first
//! spot search, which walks a node's neighbourhood in both directions.
//!
//! # Simplification
//!
//! Map data splits one physical street into many short segments at every
//! shape point.  [`StreetNetworkBuilder::simplify`] merges chains of
//! same-named segments through pass-through nodes before `build()`.

use std::collections::VecDeque;

use log::{debug, info};

use pgs_core::{EdgeId, GeoPoint, NodeId};

// ── StreetTags ────────────────────────────────────────────────────────────────

/// The subset of map tags the simulation reads from a street.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetTags {
    /// The `name` tag.  Only named streets carry parking spots.
    pub name: Option<String>,
    /// The `junction` tag (e.g. `roundabout`).
    pub junction: Option<String>,
}

impl StreetTags {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), junction: None }
    }

    /// `true` if the street carries a `name` tag.
    #[inline]
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// Display name: the `name` tag, or the `junction` tag with its first
    /// letter capitalised, or `None` for an anonymous street.
    pub fn street_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        self.junction.as_deref().map(capitalise)
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── StreetNetwork ─────────────────────────────────────────────────────────────

/// Directed street graph in CSR format.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`StreetNetworkBuilder`].
pub struct StreetNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing streets of node `n` are EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Row pointer into `in_edges`.  Length = `node_count + 1`.
    pub node_in_start: Vec<u32>,

    /// Incoming streets grouped by target node, ascending `EdgeId` per node.
    pub in_edges: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Street length in metres.
    pub edge_length_m: Vec<f64>,
    /// Posted speed limit in km/h.
    pub edge_speed_limit_kmh: Vec<f64>,
    pub edge_tags: Vec<StreetTags>,
}

impl StreetNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the outgoing streets of `node`.  No allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Iterator over the incoming streets of `node`.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        (self.node_in_start[node.index() + 1] - self.node_in_start[node.index()]) as usize
    }

    #[inline]
    pub fn source(&self, edge: EdgeId) -> NodeId {
        self.edge_from[edge.index()]
    }

    #[inline]
    pub fn target(&self, edge: EdgeId) -> NodeId {
        self.edge_to[edge.index()]
    }

    /// First street from `from` to `to`, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }
}

// ── StreetNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`StreetNetwork`] incrementally, then call [`build`](Self::build).
///
/// Streets may be added in any order.  `build()` sorts them by source node
/// (stable, so streets sharing a source keep insertion order) and constructs
/// both CSR indexes.
///
/// # Example
///
/// ```
/// use pgs_core::GeoPoint;
/// use pgs_spatial::{StreetNetworkBuilder, StreetTags};
///
/// let mut b = StreetNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(48.13, 11.57));
/// let c = b.add_node(GeoPoint::new(48.14, 11.57));
/// b.add_two_way(a, c, 1_100.0, 50.0, StreetTags::named("Leopoldstraße"));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2);
/// ```
pub struct StreetNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawStreet>,
}

#[derive(Clone)]
struct RawStreet {
    from:            NodeId,
    to:              NodeId,
    length_m:        f64,
    speed_limit_kmh: f64,
    tags:            StreetTags,
}

impl StreetNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add an intersection and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** street from `from` to `to`.
    pub fn add_street(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        speed_limit_kmh: f64,
        tags: StreetTags,
    ) {
        debug_assert!(from.index() < self.nodes.len() && to.index() < self.nodes.len());
        self.raw_edges.push(RawStreet { from, to, length_m, speed_limit_kmh, tags });
    }

    /// Add one street in each direction between `a` and `b`.
    pub fn add_two_way(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f64,
        speed_limit_kmh: f64,
        tags: StreetTags,
    ) {
        self.add_street(a, b, length_m, speed_limit_kmh, tags.clone());
        self.add_street(b, a, length_m, speed_limit_kmh, tags);
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Contract pass-through nodes until none remain; returns the number of
    /// contractions.
    ///
    /// A node is contracted when it has exactly one incoming and one outgoing
    /// street, both with the same display name, and the merged street would
    /// not be a self loop.  The merged street sums both lengths, takes the
    /// lower speed limit and keeps the incoming street's tags.  Both
    /// endpoints of a merged street are re-examined, since a contraction can
    /// make a neighbour contractible.  Contracted nodes are dropped and the
    /// remaining node ids compacted in their original order.
    pub fn simplify(&mut self) -> usize {
        let n = self.nodes.len();
        let mut alive = vec![true; self.raw_edges.len()];
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, e) in self.raw_edges.iter().enumerate() {
            outgoing[e.from.index()].push(i);
            incoming[e.to.index()].push(i);
        }

        let mut removed = vec![false; n];
        let mut queued = vec![true; n];
        let mut worklist: VecDeque<usize> = (0..n).collect();
        let mut contractions = 0;

        while let Some(node) = worklist.pop_front() {
            queued[node] = false;
            if removed[node] || incoming[node].len() != 1 || outgoing[node].len() != 1 {
                continue;
            }
            let e_in = incoming[node][0];
            let e_out = outgoing[node][0];
            let (u, w) = (self.raw_edges[e_in].from, self.raw_edges[e_out].to);
            if e_in == e_out || u == w {
                continue;
            }
            let name_in = self.raw_edges[e_in].tags.street_name();
            if name_in != self.raw_edges[e_out].tags.street_name() {
                continue;
            }

            let merged = RawStreet {
                from: u,
                to: w,
                length_m: self.raw_edges[e_in].length_m + self.raw_edges[e_out].length_m,
                speed_limit_kmh: self.raw_edges[e_in]
                    .speed_limit_kmh
                    .min(self.raw_edges[e_out].speed_limit_kmh),
                tags: self.raw_edges[e_in].tags.clone(),
            };
            let merged_idx = self.raw_edges.len();
            self.raw_edges.push(merged);
            alive[e_in] = false;
            alive[e_out] = false;
            alive.push(true);

            outgoing[u.index()].retain(|&e| e != e_in);
            outgoing[u.index()].push(merged_idx);
            incoming[w.index()].retain(|&e| e != e_out);
            incoming[w.index()].push(merged_idx);
            incoming[node].clear();
            outgoing[node].clear();
            removed[node] = true;
            contractions += 1;

            debug!("simplify: contracted node {node} into street {u}->{w} ({name_in:?})");

            for endpoint in [u.index(), w.index()] {
                if !queued[endpoint] {
                    queued[endpoint] = true;
                    worklist.push_back(endpoint);
                }
            }
        }

        // Compact: drop contracted nodes and dead streets, renumber the rest.
        let mut remap = vec![NodeId::INVALID; n];
        let mut nodes = Vec::with_capacity(n - contractions);
        for (old, pos) in self.nodes.iter().enumerate() {
            if !removed[old] {
                remap[old] = NodeId(nodes.len() as u32);
                nodes.push(*pos);
            }
        }
        let raw_edges: Vec<RawStreet> = self
            .raw_edges
            .drain(..)
            .zip(alive)
            .filter_map(|(mut e, keep)| {
                keep.then(|| {
                    e.from = remap[e.from.index()];
                    e.to = remap[e.to.index()];
                    e
                })
            })
            .collect();

        info!(
            "simplify: {contractions} contractions, {} nodes / {} streets remain",
            nodes.len(),
            raw_edges.len()
        );
        self.nodes = nodes;
        self.raw_edges = raw_edges;
        contractions
    }

    /// Consume the builder and produce a [`StreetNetwork`].
    ///
    /// Time complexity: O(E log E) for the two edge sorts.
    pub fn build(self) -> StreetNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64> = raw.iter().map(|e| e.length_m).collect();
        let edge_speed_limit_kmh: Vec<f64> = raw.iter().map(|e| e.speed_limit_kmh).collect();
        let edge_tags: Vec<StreetTags> = raw.into_iter().map(|e| e.tags).collect();

        let node_out_start = row_pointer(node_count, edge_from.iter());
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let node_in_start = row_pointer(node_count, edge_to.iter());
        let mut in_edges: Vec<EdgeId> = (0..edge_count).map(|i| EdgeId(i as u32)).collect();
        in_edges.sort_by_key(|e| edge_to[e.index()].0);

        StreetNetwork {
            node_pos: self.nodes,
            node_out_start,
            node_in_start,
            in_edges,
            edge_from,
            edge_to,
            edge_length_m,
            edge_speed_limit_kmh,
            edge_tags,
        }
    }
}

/// CSR row pointer over the node each edge is keyed by.
fn row_pointer<'a>(node_count: usize, keys: impl Iterator<Item = &'a NodeId>) -> Vec<u32> {
    let mut start = vec![0u32; node_count + 1];
    for n in keys {
        start[n.index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }
    start
}

impl Default for StreetNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
