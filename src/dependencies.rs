//! Syntactic dependency graph.
//!
//! Vertices correspond 1:1 to surface-graph vertices, so edges are
//! keyed directly by surface [`VertexId`]. Each dependent vertex holds
//! at most one edge towards its head, carrying the relation name as a
//! string-pool code. When the upstream pipeline did not run the
//! dependency stage, the engine constructs an empty aligned graph
//! lazily and registers it back on the analysis result.

use std::collections::BTreeMap;

use crate::graph::{TokenGraph, VertexId};
use crate::pool::StrCode;

/// A dependency edge from a dependent vertex towards its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Surface vertex of the head.
    pub target: VertexId,
    /// Relation name code (resolved through the string pool).
    pub relation: StrCode,
}

/// Head/relation edges, vertex-aligned to the surface graph.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<VertexId, DependencyEdge>,
    vertex_count: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty dependency graph aligned to `surface`, one (implicit)
    /// vertex per surface vertex.
    pub fn aligned_to(surface: &TokenGraph) -> Self {
        Self {
            edges: BTreeMap::new(),
            vertex_count: surface.vertex_count(),
        }
    }

    /// Record the edge `dependent -> target`, replacing any previous
    /// edge of `dependent`.
    pub fn add_edge(&mut self, dependent: VertexId, target: VertexId, relation: StrCode) {
        self.edges
            .insert(dependent, DependencyEdge { target, relation });
    }

    /// The single outgoing edge of `dependent`, if the dependency stage
    /// produced one.
    pub fn edge(&self, dependent: VertexId) -> Option<&DependencyEdge> {
        self.edges.get(&dependent)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
