//! Token graphs.
//!
//! Both analysis layers share one graph type: the `SurfaceGraph` is the
//! disambiguated linear path from head sentinel to tail sentinel, and
//! the `LatticeGraph` holds the richer set of tokenization alternatives
//! the surface path was disambiguated from. Interior vertices carry an
//! optional [`TokenCandidate`] plus an optional [`FeatureSet`];
//! sentinels carry neither.

use crate::pool::StrCode;
use crate::properties::FeatureSet;

/// Vertex handle, local to one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Which analysis layer a graph (or a vertex reference) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphLayer {
    Surface,
    Lattice,
}

/// One finalized token alternative attached to a vertex.
///
/// Surface text and lemma are string-pool codes; offsets and lengths
/// are in characters of the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCandidate {
    pub surface: StrCode,
    pub lemma: StrCode,
    pub offset: usize,
    pub length: usize,
    /// Tokenizer status key (e.g. `t_alphanumeric`).
    pub status: String,
}

#[derive(Debug, Clone, Default)]
struct VertexData {
    token: Option<TokenCandidate>,
    features: Option<FeatureSet>,
}

/// Directed token graph with head and tail sentinels.
#[derive(Debug, Clone)]
pub struct TokenGraph {
    layer: GraphLayer,
    vertices: Vec<VertexData>,
    out_edges: Vec<Vec<VertexId>>,
    first: VertexId,
    last: VertexId,
}

impl TokenGraph {
    /// Create a graph containing only the two sentinels, with the head
    /// directly connected to the tail.
    pub fn new(layer: GraphLayer) -> Self {
        let mut graph = Self {
            layer,
            vertices: vec![VertexData::default(), VertexData::default()],
            out_edges: vec![Vec::new(), Vec::new()],
            first: VertexId(0),
            last: VertexId(1),
        };
        graph.add_edge(graph.first, graph.last);
        graph
    }

    pub fn layer(&self) -> GraphLayer {
        self.layer
    }

    pub fn first_vertex(&self) -> VertexId {
        self.first
    }

    pub fn last_vertex(&self) -> VertexId {
        self.last
    }

    /// Add an interior vertex carrying `token` and `features`.
    pub fn add_vertex(
        &mut self,
        token: Option<TokenCandidate>,
        features: Option<FeatureSet>,
    ) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(VertexData { token, features });
        self.out_edges.push(Vec::new());
        id
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.out_edges[from.0 as usize].push(to);
    }

    /// Drop every outgoing edge of `from`. Used when re-wiring the
    /// surface path.
    pub fn clear_out_edges(&mut self, from: VertexId) {
        self.out_edges[from.0 as usize].clear();
    }

    pub fn out_edges(&self, v: VertexId) -> &[VertexId] {
        &self.out_edges[v.0 as usize]
    }

    pub fn vertex_token(&self, v: VertexId) -> Option<&TokenCandidate> {
        self.vertices.get(v.0 as usize)?.token.as_ref()
    }

    pub fn vertex_features(&self, v: VertexId) -> Option<&FeatureSet> {
        self.vertices.get(v.0 as usize)?.features.as_ref()
    }

    /// A vertex with neither token nor feature data is a structural
    /// placeholder and produces no output token.
    pub fn is_material(&self, v: VertexId) -> bool {
        match self.vertices.get(v.0 as usize) {
            Some(data) => data.token.is_some() || data.features.is_some(),
            None => false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Walk the path from the head sentinel towards the tail sentinel,
    /// following the first outgoing edge of each vertex. Yields interior
    /// vertices only. A vertex without outgoing edges ends the walk as
    /// if the tail had been reached.
    pub fn walk(&self) -> PathWalk<'_> {
        PathWalk {
            graph: self,
            cursor: self.first,
            steps: 0,
        }
    }
}

/// Iterator over the linear surface path. See [`TokenGraph::walk`].
pub struct PathWalk<'g> {
    graph: &'g TokenGraph,
    cursor: VertexId,
    steps: usize,
}

impl Iterator for PathWalk<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        if self.cursor == self.graph.last {
            return None;
        }
        let next = self.graph.out_edges(self.cursor).first().copied()?;
        if next == self.graph.last {
            return None;
        }
        self.steps += 1;
        if self.steps > self.graph.vertex_count() {
            log::warn!(
                "token graph walk exceeded {} vertices, cycle suspected; stopping",
                self.graph.vertex_count()
            );
            return None;
        }
        self.cursor = next;
        Some(next)
    }
}
