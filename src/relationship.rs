//! Static causal edges between indicators.
//!
//! The relationship graph is the network the presentation layer draws
//! arrows for. It is independent of scenario rules: rules say what a
//! scenario moves, edges say how indicators are wired to each other.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;
use crate::id::IndicatorId;

/// How a move in the source carries to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Source up, target up.
    Positive,
    /// Source up, target down.
    Negative,
    /// Direction depends on the economic context.
    Conditional,
}

/// A directed causal edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Edge slug, e.g. `fed-funds-to-2y`.
    pub id: String,
    /// Upstream indicator.
    pub source: IndicatorId,
    /// Downstream indicator.
    pub target: IndicatorId,
    /// How a move carries across the edge.
    pub relationship: Polarity,
    /// Short causal explanation.
    pub reason: String,
}

/// An indicator reached while walking downstream from a shock node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep<'a> {
    /// The indicator reached.
    pub indicator: &'a IndicatorId,
    /// Number of edges from the start node.
    pub depth: usize,
    /// Edge through which the indicator was first reached.
    pub via: &'a Relationship,
}

/// Immutable directed graph over indicator ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipGraph {
    edges: Vec<Relationship>,
    outgoing: HashMap<IndicatorId, Vec<usize>>,
    incoming: HashMap<IndicatorId, Vec<usize>>,
}

impl RelationshipGraph {
    /// Builds the graph, rejecting duplicate edge ids.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::DuplicateId` for the first repeated edge id.
    pub fn new(edges: Vec<Relationship>) -> Result<Self, IntegrityError> {
        let mut seen = HashSet::with_capacity(edges.len());
        let mut outgoing: HashMap<IndicatorId, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<IndicatorId, Vec<usize>> = HashMap::new();
        for (pos, edge) in edges.iter().enumerate() {
            if !seen.insert(edge.id.as_str()) {
                return Err(IntegrityError::DuplicateId {
                    kind: "relationship",
                    id: edge.id.clone(),
                });
            }
            outgoing.entry(edge.source.clone()).or_default().push(pos);
            incoming.entry(edge.target.clone()).or_default().push(pos);
        }
        drop(seen);
        Ok(Self {
            edges,
            outgoing,
            incoming,
        })
    }

    /// Edges leaving `id`, in declaration order.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Relationship> {
        self.edges_at(&self.outgoing, id)
    }

    /// Edges entering `id`, in declaration order.
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &Relationship> {
        self.edges_at(&self.incoming, id)
    }

    fn edges_at<'a>(
        &'a self,
        adjacency: &'a HashMap<IndicatorId, Vec<usize>>,
        id: &str,
    ) -> impl Iterator<Item = &'a Relationship> {
        adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.edges[pos])
    }

    /// Breadth-first walk from `start`, visiting each reachable indicator
    /// once. The start node itself is not included. Feedback loops back to
    /// visited nodes are cut.
    #[must_use]
    pub fn downstream(&self, start: &str) -> Vec<ChainStep<'_>> {
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(start, 0)]);
        let mut chain = Vec::new();

        while let Some((node, depth)) = queue.pop_front() {
            for edge in self.outgoing(node) {
                let target = edge.target.as_str();
                if visited.insert(target) {
                    chain.push(ChainStep {
                        indicator: &edge.target,
                        depth: depth + 1,
                        via: edge,
                    });
                    queue.push_back((target, depth + 1));
                }
            }
        }
        chain
    }

    /// Edges in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.edges.iter()
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn records(&self) -> &[Relationship] {
        &self.edges
    }
}
