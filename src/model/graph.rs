// src/model/graph.rs

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

pub type Image = [i32; 3];

pub fn add_image(a: Image, b: Image) -> Image {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn neg_image(a: Image) -> Image {
    [-a[0], -a[1], -a[2]]
}

/// Undirected bond between site `from` in the home cell and site `to`
/// translated by `to_image`. `(u, v, d)` and `(v, u, -d)` are the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BondEdge {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub to_image: Image,
}

impl BondEdge {
    pub fn new(from: usize, to: usize, to_image: Image) -> Self {
        Self { from, to, to_image }
    }

    /// Orientation-independent form used for deduplication
    fn canonical(self) -> Self {
        let reversed = BondEdge::new(self.to, self.from, neg_image(self.to_image));
        if (self.from, self.to) < (reversed.from, reversed.to) {
            self
        } else if (self.from, self.to) > (reversed.from, reversed.to) {
            reversed
        } else if self.to_image >= reversed.to_image {
            // Self-loop: pick the lexicographically larger direction
            self
        } else {
            reversed
        }
    }
}

/// Bonding graph over site indices, as produced by a bonding oracle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGraph")]
pub struct BondingGraph {
    edges: Vec<BondEdge>,
}

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    edges: Vec<BondEdge>,
}

impl From<RawGraph> for BondingGraph {
    fn from(raw: RawGraph) -> Self {
        BondingGraph::new(raw.edges)
    }
}

impl BondingGraph {
    /// Build from edges; duplicates (in either orientation) collapse, first one wins.
    pub fn new(edges: impl IntoIterator<Item = BondEdge>) -> Self {
        let mut seen = FxHashSet::default();
        let mut unique = Vec::new();
        for edge in edges {
            if seen.insert(edge.canonical()) {
                unique.push(edge);
            }
        }
        Self { edges: unique }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[BondEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Validate against a structure of `site_count` sites and build neighbor lists.
    pub fn adjacency(&self, site_count: usize) -> SceneResult<Adjacency> {
        let mut neighbors = vec![Vec::new(); site_count];

        for edge in &self.edges {
            if edge.from >= site_count || edge.to >= site_count {
                return Err(SceneError::InvalidGraph(format!(
                    "edge {} -> {} references a site outside 0..{}",
                    edge.from, edge.to, site_count
                )));
            }
            if edge.from == edge.to && edge.to_image == [0, 0, 0] {
                return Err(SceneError::InvalidGraph(format!(
                    "site {} is bonded to itself in the same cell",
                    edge.from
                )));
            }

            neighbors[edge.from].push(Neighbor {
                site: edge.to,
                offset: edge.to_image,
            });
            neighbors[edge.to].push(Neighbor {
                site: edge.from,
                offset: neg_image(edge.to_image),
            });
        }

        Ok(Adjacency { neighbors })
    }
}

/// A neighbor of some site: `site` shifted by `offset` relative to the center's image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub site: usize,
    pub offset: Image,
}

/// Per-site neighbor lists covering both directions of every edge
#[derive(Debug, Clone)]
pub struct Adjacency {
    neighbors: Vec<Vec<Neighbor>>,
}

impl Adjacency {
    pub fn neighbors(&self, site: usize) -> &[Neighbor] {
        self.neighbors.get(site).map(|n| n.as_slice()).unwrap_or(&[])
    }

    /// Number of incident edge directions. A periodic self-loop counts twice.
    pub fn coordination_number(&self, site: usize) -> usize {
        self.neighbors(site).len()
    }

    pub fn site_count(&self) -> usize {
        self.neighbors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_duplicate_collapses() {
        let g = BondingGraph::new([
            BondEdge::new(0, 1, [1, 0, 0]),
            BondEdge::new(1, 0, [-1, 0, 0]),
            BondEdge::new(0, 1, [0, 0, 0]),
        ]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.edges()[0], BondEdge::new(0, 1, [1, 0, 0]));
    }

    #[test]
    fn test_self_loop_counts_twice() {
        let g = BondingGraph::new([
            BondEdge::new(0, 0, [1, 0, 0]),
            BondEdge::new(0, 0, [-1, 0, 0]),
        ]);
        assert_eq!(g.len(), 1);
        let adj = g.adjacency(1).unwrap();
        assert_eq!(adj.coordination_number(0), 2);
        let offsets: Vec<Image> = adj.neighbors(0).iter().map(|n| n.offset).collect();
        assert!(offsets.contains(&[1, 0, 0]));
        assert!(offsets.contains(&[-1, 0, 0]));
    }

    #[test]
    fn test_neighbors_both_directions() {
        let g = BondingGraph::new([BondEdge::new(0, 1, [0, 1, 0])]);
        let adj = g.adjacency(2).unwrap();
        assert_eq!(
            adj.neighbors(0),
            &[Neighbor { site: 1, offset: [0, 1, 0] }]
        );
        assert_eq!(
            adj.neighbors(1),
            &[Neighbor { site: 0, offset: [0, -1, 0] }]
        );
    }

    #[test]
    fn test_out_of_range_edge_rejected() {
        let g = BondingGraph::new([BondEdge::new(0, 5, [0, 0, 0])]);
        assert!(matches!(g.adjacency(2), Err(SceneError::InvalidGraph(_))));
    }

    #[test]
    fn test_deserialize_dedupes() {
        let g: BondingGraph = serde_json::from_str(
            r#"{"edges": [{"from": 0, "to": 1, "to_image": [0, 0, 1]},
                          {"from": 1, "to": 0, "to_image": [0, 0, -1]}]}"#,
        )
        .unwrap();
        assert_eq!(g.len(), 1);
    }
}
