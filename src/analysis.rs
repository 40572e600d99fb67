//! Analysis results as handed over by the upstream pipeline.
//!
//! An [`AnalysisResult`] bundles the graphs and annotation tables one
//! pipeline run produced for one input text. The engine only ever holds
//! a shared reference to it; the single mutable slot is the lazily
//! registered dependency graph, kept behind a `OnceCell` so the first
//! projection can construct and register it without exclusive access.
//!
//! The [`AnalysisBuilder`] assembles synthetic results for hosts and
//! tests that do not run the real pipeline.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use unicode_segmentation::UnicodeSegmentation;

use crate::annotations::{AnnotationIndex, NamedEntityAnnotation, Payload, NAMED_ENTITY};
use crate::dependencies::DependencyGraph;
use crate::graph::{GraphLayer, TokenCandidate, TokenGraph, VertexId};
use crate::pool::StringPool;
use crate::properties::FeatureSet;

/// Logical names of the per-result data slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKey {
    SurfaceGraph,
    LatticeGraph,
    Annotations,
    SentenceBoundaries,
    AnalysisMetadata,
}

impl DataKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKey::SurfaceGraph => "SurfaceGraph",
            DataKey::LatticeGraph => "LatticeGraph",
            DataKey::Annotations => "Annotations",
            DataKey::SentenceBoundaries => "SentenceBoundaries",
            DataKey::AnalysisMetadata => "AnalysisMetadata",
        }
    }
}

impl std::fmt::Display for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of one data slot, as returned by
/// [`AnalysisResult::data`].
#[derive(Debug)]
pub enum AnalysisData<'a> {
    Graph(&'a TokenGraph),
    Annotations(&'a AnnotationIndex),
    SentenceBoundaries(&'a [SentenceBound]),
    Metadata(&'a BTreeMap<String, String>),
}

/// First and last surface vertices of one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceBound {
    pub first: VertexId,
    pub last: VertexId,
}

/// Everything one pipeline run produced for one input text.
#[derive(Debug)]
pub struct AnalysisResult {
    language: String,
    text: String,
    surface: Option<TokenGraph>,
    lattice: Option<TokenGraph>,
    annotations: Option<AnnotationIndex>,
    dependencies: OnceCell<DependencyGraph>,
    sentence_boundaries: Option<Vec<SentenceBound>>,
    metadata: BTreeMap<String, String>,
}

impl AnalysisResult {
    /// Start building a synthetic result. `pool` receives the interned
    /// token strings.
    pub fn build<'p>(pool: &'p mut StringPool, language: &str) -> AnalysisBuilder<'p> {
        AnalysisBuilder::new(pool, language)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Keyed access mirroring the pipeline's data-slot contract.
    /// `None` means the producing stage did not run.
    pub fn data(&self, key: DataKey) -> Option<AnalysisData<'_>> {
        match key {
            DataKey::SurfaceGraph => self.surface.as_ref().map(AnalysisData::Graph),
            DataKey::LatticeGraph => self.lattice.as_ref().map(AnalysisData::Graph),
            DataKey::Annotations => self.annotations.as_ref().map(AnalysisData::Annotations),
            DataKey::SentenceBoundaries => self
                .sentence_boundaries
                .as_deref()
                .map(AnalysisData::SentenceBoundaries),
            DataKey::AnalysisMetadata => Some(AnalysisData::Metadata(&self.metadata)),
        }
    }

    pub fn has(&self, key: DataKey) -> bool {
        self.data(key).is_some()
    }

    pub fn surface_graph(&self) -> Option<&TokenGraph> {
        self.surface.as_ref()
    }

    pub fn lattice_graph(&self) -> Option<&TokenGraph> {
        self.lattice.as_ref()
    }

    pub fn annotations(&self) -> Option<&AnnotationIndex> {
        self.annotations.as_ref()
    }

    pub fn sentence_boundaries(&self) -> Option<&[SentenceBound]> {
        self.sentence_boundaries.as_deref()
    }

    /// The dependency graph, if one has been produced or registered.
    pub fn dependency_graph(&self) -> Option<&DependencyGraph> {
        self.dependencies.get()
    }

    /// The dependency graph, constructing and registering an empty one
    /// aligned to `surface` on first use.
    pub fn dependency_graph_or_init(&self, surface: &TokenGraph) -> &DependencyGraph {
        self.dependencies
            .get_or_init(|| DependencyGraph::aligned_to(surface))
    }
}

/// Fluent constructor for [`AnalysisResult`] values.
///
/// Words pushed through [`push_word`](Self::push_word) are chained into
/// the linear surface path, given character offsets as if separated by
/// single spaces, and each linked to an automatically created lattice
/// twin (the disambiguation correspondence every surface vertex is
/// expected to have).
pub struct AnalysisBuilder<'p> {
    pool: &'p mut StringPool,
    language: String,
    text: String,
    cursor: usize,
    surface: TokenGraph,
    lattice: TokenGraph,
    surface_chain: Vec<VertexId>,
    annotations: AnnotationIndex,
    dependencies: DependencyGraph,
    has_dependencies: bool,
    sentence_boundaries: Option<Vec<SentenceBound>>,
    metadata: BTreeMap<String, String>,
    omit_surface: bool,
    omit_lattice: bool,
    omit_annotations: bool,
}

impl<'p> AnalysisBuilder<'p> {
    pub fn new(pool: &'p mut StringPool, language: &str) -> Self {
        Self {
            pool,
            language: language.to_string(),
            text: String::new(),
            cursor: 0,
            surface: TokenGraph::new(GraphLayer::Surface),
            lattice: TokenGraph::new(GraphLayer::Lattice),
            surface_chain: Vec::new(),
            annotations: AnnotationIndex::new(),
            dependencies: DependencyGraph::new(),
            has_dependencies: false,
            sentence_boundaries: None,
            metadata: BTreeMap::new(),
            omit_surface: false,
            omit_lattice: false,
            omit_annotations: false,
        }
    }

    /// Append a word to the surface path with default status and no
    /// features.
    pub fn push_word(&mut self, surface: &str, lemma: &str) -> VertexId {
        self.push_word_with(surface, lemma, None, "t_alphanumeric")
    }

    /// Append a word to the surface path.
    ///
    /// Returns the new surface vertex. A lattice twin carrying the same
    /// candidate is created and linked as the vertex's single
    /// correspondence.
    pub fn push_word_with(
        &mut self,
        surface: &str,
        lemma: &str,
        features: Option<FeatureSet>,
        status: &str,
    ) -> VertexId {
        if !self.text.is_empty() {
            self.text.push(' ');
            self.cursor += 1;
        }
        let offset = self.cursor;
        let length = surface.graphemes(true).count();
        self.text.push_str(surface);
        self.cursor += length;

        let candidate = TokenCandidate {
            surface: self.pool.intern(surface),
            lemma: self.pool.intern(lemma),
            offset,
            length,
            status: status.to_string(),
        };
        let v = self
            .surface
            .add_vertex(Some(candidate.clone()), features.clone());
        self.surface_chain.push(v);

        let twin = self.lattice.add_vertex(Some(candidate), features);
        self.annotations
            .add_match(GraphLayer::Surface, v, GraphLayer::Lattice, twin);
        v
    }

    /// Add a free-standing lattice vertex (an entity member, say) with
    /// explicit offset and length.
    pub fn add_lattice_word(
        &mut self,
        surface: &str,
        lemma: &str,
        offset: usize,
        features: Option<FeatureSet>,
    ) -> VertexId {
        let candidate = TokenCandidate {
            surface: self.pool.intern(surface),
            lemma: self.pool.intern(lemma),
            offset,
            length: surface.graphemes(true).count(),
            status: "t_alphanumeric".to_string(),
        };
        self.lattice.add_vertex(Some(candidate), features)
    }

    /// The single lattice correspondent created for a pushed word.
    pub fn lattice_twin(&self, surface_vertex: VertexId) -> Option<VertexId> {
        self.annotations
            .matches(GraphLayer::Surface, surface_vertex, GraphLayer::Lattice)
            .iter()
            .next()
            .copied()
    }

    /// Register an extra surface/lattice correspondence.
    pub fn link(&mut self, surface_vertex: VertexId, lattice_vertex: VertexId) -> &mut Self {
        self.annotations.add_match(
            GraphLayer::Surface,
            surface_vertex,
            GraphLayer::Lattice,
            lattice_vertex,
        );
        self
    }

    /// Attach a named-entity annotation to a vertex of `layer`, with
    /// `members` in that same layer.
    pub fn attach_entity(
        &mut self,
        layer: GraphLayer,
        v: VertexId,
        entity_type: &str,
        members: Vec<VertexId>,
    ) -> &mut Self {
        let annotation = NamedEntityAnnotation {
            entity_type: self.pool.intern(entity_type),
            members,
        };
        self.annotations
            .attach(layer, v, NAMED_ENTITY, Payload::NamedEntity(annotation));
        self
    }

    /// Record the dependency edge `dependent -> target`.
    pub fn add_dependency(
        &mut self,
        dependent: VertexId,
        target: VertexId,
        relation: &str,
    ) -> &mut Self {
        let relation = self.pool.intern(relation);
        self.dependencies.add_edge(dependent, target, relation);
        self.has_dependencies = true;
        self
    }

    /// Mark a sentence spanning the surface vertices `first..=last`.
    pub fn mark_sentence(&mut self, first: VertexId, last: VertexId) -> &mut Self {
        self.sentence_boundaries
            .get_or_insert_with(Vec::new)
            .push(SentenceBound { first, last });
        self
    }

    pub fn meta(&mut self, key: &str, value: &str) -> &mut Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Leave the surface graph out of the result, as if the
    /// disambiguation stage never ran.
    pub fn without_surface(&mut self) -> &mut Self {
        self.omit_surface = true;
        self
    }

    pub fn without_lattice(&mut self) -> &mut Self {
        self.omit_lattice = true;
        self
    }

    pub fn without_annotations(&mut self) -> &mut Self {
        self.omit_annotations = true;
        self
    }

    /// Wire the surface path and produce the result.
    pub fn build(mut self) -> AnalysisResult {
        // head -> w1 -> ... -> wn -> tail; head -> tail when no words.
        let first = self.surface.first_vertex();
        let last = self.surface.last_vertex();
        if !self.surface_chain.is_empty() {
            self.surface.clear_out_edges(first);
            let mut previous = first;
            for &v in &self.surface_chain {
                self.surface.add_edge(previous, v);
                previous = v;
            }
            self.surface.add_edge(previous, last);
        }

        let dependencies = OnceCell::new();
        if self.has_dependencies {
            // Cannot fail: the cell was created empty just above.
            let _ = dependencies.set(self.dependencies);
        }

        AnalysisResult {
            language: self.language,
            text: self.text,
            surface: (!self.omit_surface).then_some(self.surface),
            lattice: (!self.omit_lattice).then_some(self.lattice),
            annotations: (!self.omit_annotations).then_some(self.annotations),
            dependencies,
            sentence_boundaries: self.sentence_boundaries,
            metadata: self.metadata,
        }
    }
}
