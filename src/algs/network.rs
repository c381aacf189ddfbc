//! Cycle network: a graph over the vertices of persistent cycle representatives.
//!
//! For every finite pair whose persistence reaches the noise threshold and
//! whose cycle and chain are both non-empty, each simplex of the killed cycle
//! contributes either an edge between its first two vertices, weighted
//! `1 / (value + 0.1)`, or an isolated node (0-cycles). Nodes carry a tag:
//! the caller's label for that vertex or, without labels, the homology
//! dimension of the class that introduced it.
//!
//! Nodes left without neighbours are tied together so the graph stays
//! connected: the first isolated node is linked to every other isolated node
//! with weight [`CONNECTOR_WEIGHT`], and the lowest connected node is linked to
//! the last isolated node with weight [`BRIDGE_WEIGHT`].
//!
//! Adjacency is held in ordered maps, so iteration order depends only on
//! vertex ids.

use std::collections::BTreeMap;

use crate::algs::persistence::{DynamicPersistence, SimplexState, Sign};
use crate::persistence_error::PersistenceError;
use crate::topology::vertex::VertexId;

/// Weight of edges joining isolated nodes to the connector node.
pub const CONNECTOR_WEIGHT: f64 = 10.0;
/// Weight of the edge joining the connector group to the connected part.
pub const BRIDGE_WEIGHT: f64 = 0.1;

/// Offset added to a simplex value before inverting it into an edge weight.
const WEIGHT_OFFSET: f64 = 0.1;

/// Options for [`CycleNetwork::build`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkOptions {
    /// Pairs with `death - birth` below this are skipped.
    pub noise_threshold: f64,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            noise_threshold: 0.001,
        }
    }
}

/// What a node is coloured by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeTag {
    /// Caller label of the vertex.
    Label(u8),
    /// Homology dimension of the class whose cycle contains the vertex.
    Dimension(usize),
}

/// Undirected weighted graph over point indices.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CycleNetwork {
    tags: BTreeMap<VertexId, NodeTag>,
    adjacency: BTreeMap<VertexId, BTreeMap<VertexId, f64>>,
}

impl CycleNetwork {
    /// Build the network from a finished reduction.
    ///
    /// `labels`, when given, is indexed by vertex id.
    ///
    /// # Errors
    /// [`PersistenceError::VertexOutOfRange`] if a cycle vertex has no label.
    pub fn build(
        persistence: &DynamicPersistence<'_>,
        options: &NetworkOptions,
        labels: Option<&[u8]>,
    ) -> Result<Self, PersistenceError> {
        let map = persistence.make_simplex_map();
        let mut net = Self::default();

        for (death, state) in persistence.states().iter().enumerate() {
            let SimplexState::Paired {
                partner,
                sign: Sign::Negative,
                cycle,
                chain,
            } = state
            else {
                continue;
            };
            if map.value(death) - map.value(*partner) < options.noise_threshold {
                continue;
            }
            if cycle.is_empty() || chain.is_empty() {
                continue;
            }
            let class_dim = map.dimension(*partner);

            for handle in cycle.iter() {
                let vertices = map.vertices(handle);
                let tag = |v: VertexId| -> Result<NodeTag, PersistenceError> {
                    match labels {
                        Some(l) => l.get(v.index()).copied().map(NodeTag::Label).ok_or(
                            PersistenceError::VertexOutOfRange {
                                vertex: v.index(),
                                len: l.len(),
                            },
                        ),
                        None => Ok(NodeTag::Dimension(class_dim)),
                    }
                };
                match vertices {
                    [v] => net.add_node(*v, tag(*v)?),
                    [a, b, ..] => {
                        net.add_node(*a, tag(*a)?);
                        net.add_node(*b, tag(*b)?);
                        net.add_edge(*a, *b, 1.0 / (map.value(handle) + WEIGHT_OFFSET));
                    }
                    [] => {}
                }
            }
        }

        net.connect_isolated();
        log::debug!(
            "cycle network: {} nodes, {} edges",
            net.node_count(),
            net.edge_count()
        );
        Ok(net)
    }

    fn add_node(&mut self, v: VertexId, tag: NodeTag) {
        self.tags.insert(v, tag);
        self.adjacency.entry(v).or_default();
    }

    /// Insert or overwrite the undirected edge `a - b`.
    fn add_edge(&mut self, a: VertexId, b: VertexId, weight: f64) {
        self.adjacency.entry(a).or_default().insert(b, weight);
        self.adjacency.entry(b).or_default().insert(a, weight);
    }

    fn connect_isolated(&mut self) {
        let (isolated, connected): (Vec<VertexId>, Vec<VertexId>) = self
            .adjacency
            .keys()
            .copied()
            .partition(|v| self.adjacency[v].is_empty());

        let Some((&hub, rest)) = isolated.split_first() else {
            return;
        };
        for &v in rest {
            self.add_edge(hub, v, CONNECTOR_WEIGHT);
        }
        if let (Some(&anchor), Some(&last)) = (connected.first(), isolated.last()) {
            self.add_edge(anchor, last, BRIDGE_WEIGHT);
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Nodes in increasing vertex order.
    pub fn nodes(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Edges `(a, b, weight)` with `a < b`, in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, f64)> + '_ {
        self.adjacency.iter().flat_map(|(&a, nbrs)| {
            nbrs.range(a..)
                .filter(move |(b, _)| **b != a)
                .map(move |(&b, &w)| (a, b, w))
        })
    }

    pub fn contains_node(&self, v: VertexId) -> bool {
        self.adjacency.contains_key(&v)
    }

    /// Weight of edge `a - b`, if present.
    pub fn weight(&self, a: VertexId, b: VertexId) -> Option<f64> {
        self.adjacency.get(&a)?.get(&b).copied()
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(&v).map_or(0, BTreeMap::len)
    }

    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.adjacency
            .get(&v)
            .into_iter()
            .flat_map(|nbrs| nbrs.iter().map(|(&b, &w)| (b, w)))
    }

    pub fn tag(&self, v: VertexId) -> Option<NodeTag> {
        self.tags.get(&v).copied()
    }
}
