//! Pluggable parking-spot search.

use std::collections::VecDeque;

use pgs_core::NodeId;
use pgs_world::{SpotLocation, World};

/// Chooses which free spot a guided car should be sent to.
///
/// Implementations read the world but never mutate it; the guidance service
/// does the reserving.  `Send + Sync` so one strategy serves every thread.
pub trait ParkingStrategy: Send + Sync {
    fn find_spot(&self, world: &World, destination: NodeId) -> Option<SpotLocation>;
}

/// Breadth-first search outward from the destination over the undirected
/// street graph.
///
/// Streets are visited in BFS order (out-streets of a node before its
/// in-streets); the first street with a free spot wins and its free spot
/// nearest the street source is returned.  Hop count therefore beats metres.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestParkingStrategy;

impl ParkingStrategy for NearestParkingStrategy {
    fn find_spot(&self, world: &World, destination: NodeId) -> Option<SpotLocation> {
        let network = world.network();
        if !network.contains_node(destination) {
            return None;
        }

        let mut seen_node = vec![false; network.node_count()];
        let mut seen_edge = vec![false; network.edge_count()];
        let mut queue = VecDeque::from([destination]);
        seen_node[destination.index()] = true;

        while let Some(node) = queue.pop_front() {
            let outgoing = network.out_edges(node).map(|e| (e, network.target(e)));
            let incoming = network.in_edges(node).map(|e| (e, network.source(e)));
            for (edge, neighbor) in outgoing.chain(incoming) {
                if seen_edge[edge.index()] {
                    continue;
                }
                seen_edge[edge.index()] = true;
                if let Some(spot) = world.first_free_spot(edge) {
                    return Some(spot);
                }
                if !seen_node[neighbor.index()] {
                    seen_node[neighbor.index()] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}
