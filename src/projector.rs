//! The graph projection engine.
//!
//! Projects one analysis result into a flat [`Document`] in two passes
//! over the surface graph:
//!
//! 1. **Numbering & dependency collection** — walk the linear surface
//!    path, assign every vertex that will produce output (including
//!    entity members, which may live in the lattice graph) a
//!    monotonically increasing token index, and collect each vertex's
//!    dependency edge. Running collection as a complete first pass is
//!    what makes forward references resolvable: by the time any head
//!    index is needed, the full vertex-to-token assignment exists.
//! 2. **Emission** — re-walk the path identically and construct the
//!    output tokens, expanding named entities with BIO tags and
//!    resolving head/relation pairs against the pass-1 maps.
//!
//! Missing analysis stages and upstream failures never escape as
//! errors: [`Projector::project`] converts them into a document with
//! the error flag set.

use std::collections::{HashMap, HashSet};

use crate::analysis::{AnalysisResult, DataKey};
use crate::annotations::AnnotationIndex;
use crate::config::ProjectionConfig;
use crate::dependencies::DependencyGraph;
use crate::document::{Document, IobTag, Sentence, Token};
use crate::error::{ProjectionError, ProjectionResult};
use crate::graph::{GraphLayer, TokenGraph, VertexId};
use crate::pool::StringPool;
use crate::properties::{CategoryKind, FeatureSet, PropertyResolver};

/// Mutable per-call scratch state, rebuilt at the start of every
/// projection so one engine instance can be reused sequentially across
/// documents.
#[derive(Debug, Default)]
struct ProjectionSession {
    /// Vertex-to-token-index map, for both layers. Dependency targets
    /// and sentence endpoints resolve through this.
    vertex_tokens: HashMap<(GraphLayer, VertexId), usize>,
    /// Dependency edges collected during pass 1, keyed by surface
    /// vertex.
    vertex_deps: HashMap<VertexId, CollectedDependency>,
    /// Vertices whose token has been appended to the document.
    emitted: HashSet<(GraphLayer, VertexId)>,
    /// Entity type of the most recently emitted token run; drives IOB
    /// continuation across adjacent annotations of the same entity.
    previous_entity: Option<String>,
    next_index: usize,
}

impl ProjectionSession {
    /// Assign `v` the next token index, or return the one it already
    /// has.
    fn assign(&mut self, layer: GraphLayer, v: VertexId) -> usize {
        use std::collections::hash_map::Entry;
        match self.vertex_tokens.entry((layer, v)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.next_index;
                self.next_index += 1;
                entry.insert(index);
                index
            }
        }
    }
}

#[derive(Debug)]
struct CollectedDependency {
    target: VertexId,
    relation: String,
}

/// How a surface vertex participates in a named entity.
#[derive(Debug)]
enum EntityResolution {
    /// Entity fully resolved at the surface layer; members are surface
    /// vertices.
    Surface {
        entity_type: String,
        members: Vec<VertexId>,
    },
    /// Entity defined on the vertex's lattice correspondent; members
    /// are lattice vertices.
    Lattice {
        entity_type: String,
        members: Vec<VertexId>,
    },
    /// Not part of any entity.
    None,
}

/// The projection engine. Holds read-only references to the shared
/// linguistic resources; all per-call state lives in a fresh session.
pub struct Projector<'r> {
    pool: &'r StringPool,
    properties: &'r PropertyResolver,
    config: ProjectionConfig,
}

impl<'r> Projector<'r> {
    pub fn new(pool: &'r StringPool, properties: &'r PropertyResolver) -> Self {
        Self {
            pool,
            properties,
            config: ProjectionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project `result` into a document.
    ///
    /// Never panics on missing analysis data: the returned document
    /// carries the error flag and a message naming the missing stage
    /// instead. Check [`Document::error`] before using the tokens.
    pub fn project(&self, result: &AnalysisResult) -> Document {
        match self.try_project(result) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("projection failed: {}", e);
                Document::failed(result.language(), e.to_string())
            }
        }
    }

    /// Wrap an upstream pipeline failure into the document error
    /// channel, for hosts whose analysis call failed before any result
    /// existed.
    pub fn pipeline_failure(language: &str, message: impl Into<String>) -> Document {
        let error = ProjectionError::Pipeline {
            message: message.into(),
        };
        Document::failed(language, error.to_string())
    }

    /// Named-entity type of a surface vertex, `"_"` when it is outside
    /// any entity. Read-only probe; mirrors the resolution order of the
    /// emission pass.
    pub fn entity_type_of(
        &self,
        result: &AnalysisResult,
        v: VertexId,
    ) -> ProjectionResult<String> {
        let annotations = result
            .annotations()
            .ok_or_else(|| ProjectionError::missing(DataKey::Annotations.as_str()))?;
        Ok(match self.resolve_entity(annotations, v)? {
            EntityResolution::None => "_".to_string(),
            EntityResolution::Surface { entity_type, .. }
            | EntityResolution::Lattice { entity_type, .. } => entity_type,
        })
    }

    fn try_project(&self, result: &AnalysisResult) -> ProjectionResult<Document> {
        let surface = result
            .surface_graph()
            .ok_or_else(|| ProjectionError::missing(DataKey::SurfaceGraph.as_str()))?;
        let lattice = result
            .lattice_graph()
            .ok_or_else(|| ProjectionError::missing(DataKey::LatticeGraph.as_str()))?;
        let annotations = result
            .annotations()
            .ok_or_else(|| ProjectionError::missing(DataKey::Annotations.as_str()))?;
        let dependencies = result.dependency_graph_or_init(surface);

        let mut session = ProjectionSession::default();
        let mut doc = Document::new(result.language(), result.text());

        self.number_pass(surface, lattice, annotations, dependencies, &mut session)?;
        self.emission_pass(surface, lattice, annotations, &mut session, &mut doc)?;
        self.assemble_sentences(result, &session, &mut doc);
        Ok(doc)
    }

    /// Pass 1: walk the surface path, collect dependency edges and
    /// assign token indices.
    fn number_pass(
        &self,
        surface: &TokenGraph,
        lattice: &TokenGraph,
        annotations: &AnnotationIndex,
        dependencies: &DependencyGraph,
        session: &mut ProjectionSession,
    ) -> ProjectionResult<()> {
        for v in surface.walk() {
            if let Some(edge) = dependencies.edge(v) {
                session.vertex_deps.insert(
                    v,
                    CollectedDependency {
                        target: edge.target,
                        relation: self.pool.resolve(edge.relation).to_string(),
                    },
                );
            }
            if !surface.is_material(v) {
                continue;
            }
            match self.resolve_entity(annotations, v)? {
                EntityResolution::Surface { members, .. } => {
                    number_members(surface, GraphLayer::Surface, v, &members, session);
                }
                EntityResolution::Lattice { members, .. } => {
                    number_members(lattice, GraphLayer::Lattice, v, &members, session);
                }
                EntityResolution::None => {
                    session.assign(GraphLayer::Surface, v);
                }
            }
        }
        Ok(())
    }

    /// Pass 2: re-walk the surface path and emit tokens.
    fn emission_pass(
        &self,
        surface: &TokenGraph,
        lattice: &TokenGraph,
        annotations: &AnnotationIndex,
        session: &mut ProjectionSession,
        doc: &mut Document,
    ) -> ProjectionResult<()> {
        for v in surface.walk() {
            if !surface.is_material(v) {
                continue;
            }
            if session.emitted.contains(&(GraphLayer::Surface, v)) {
                continue;
            }
            match self.resolve_entity(annotations, v)? {
                EntityResolution::None => {
                    self.emit_token(
                        doc,
                        session,
                        surface,
                        GraphLayer::Surface,
                        v,
                        Some(v),
                        IobTag::Outside,
                        "_",
                    )?;
                    session.previous_entity = None;
                }
                EntityResolution::Surface {
                    entity_type,
                    members,
                } => {
                    self.emit_entity(doc, session, surface, GraphLayer::Surface, v, &entity_type, &members)?;
                }
                EntityResolution::Lattice {
                    entity_type,
                    members,
                } => {
                    self.emit_entity(doc, session, lattice, GraphLayer::Lattice, v, &entity_type, &members)?;
                }
            }
        }
        Ok(())
    }

    /// Emit every member token of one entity annotation with BIO tags.
    ///
    /// `covering` is the surface vertex the annotation was resolved
    /// from; a dependency edge outgoing from it lands on the first
    /// emitted member when the members themselves carry none.
    fn emit_entity(
        &self,
        doc: &mut Document,
        session: &mut ProjectionSession,
        graph: &TokenGraph,
        layer: GraphLayer,
        covering: VertexId,
        entity_type: &str,
        members: &[VertexId],
    ) -> ProjectionResult<()> {
        let continues = self.config.continue_adjacent_entities
            && session.previous_entity.as_deref() == Some(entity_type);
        let mut first = true;
        let mut emitted_any = false;
        for &m in members {
            if !graph.is_material(m) || session.emitted.contains(&(layer, m)) {
                continue;
            }
            let iob = if first && !continues {
                IobTag::Begin
            } else {
                IobTag::Inside
            };
            let dependency_from = match layer {
                GraphLayer::Surface => Some(m),
                GraphLayer::Lattice => first.then_some(covering),
            };
            self.emit_token(doc, session, graph, layer, m, dependency_from, iob, entity_type)?;
            first = false;
            emitted_any = true;
        }
        if emitted_any {
            session.previous_entity = Some(entity_type.to_string());
        }
        Ok(())
    }

    /// Shared token-emission routine for both the plain surface path
    /// and entity member expansion. `dependency_from` names the surface
    /// vertex whose dependency edge this token reports, if any.
    #[allow(clippy::too_many_arguments)]
    fn emit_token(
        &self,
        doc: &mut Document,
        session: &mut ProjectionSession,
        graph: &TokenGraph,
        layer: GraphLayer,
        v: VertexId,
        dependency_from: Option<VertexId>,
        iob: IobTag,
        entity_type: &str,
    ) -> ProjectionResult<()> {
        let index = *session.vertex_tokens.get(&(layer, v)).ok_or_else(|| {
            ProjectionError::contract(format!(
                "vertex {:?} of {:?} layer reached emission without a token index",
                v, layer
            ))
        })?;
        debug_assert_eq!(index, doc.len());

        let (text, lemma, offset, length, status) = match graph.vertex_token(v) {
            Some(candidate) => (
                escape_control(self.pool.resolve(candidate.surface)),
                self.pool.resolve(candidate.lemma).to_string(),
                candidate.offset,
                candidate.length,
                candidate.status.clone(),
            ),
            None => (String::new(), String::new(), 0, 0, String::new()),
        };

        let features_set = graph.vertex_features(v);
        let category = features_set
            .map(|features| self.properties.macro_code(features))
            .unwrap_or(0);
        let features = self.format_features(features_set);

        let (relation, head) = match dependency_from {
            Some(source) => self.resolve_dependency(session, source),
            None => ("_".to_string(), 0),
        };

        doc.push(Token {
            length,
            text,
            lemma,
            index,
            offset,
            category,
            head,
            relation,
            features,
            iob,
            entity_type: entity_type.to_string(),
            status,
        });
        session.emitted.insert((layer, v));
        Ok(())
    }

    /// Determine entity participation of a surface vertex: surface
    /// annotation first, then the single lattice correspondent. Nested
    /// entities are not decomposed; the outer type applies to all
    /// member tokens.
    fn resolve_entity(
        &self,
        annotations: &AnnotationIndex,
        v: VertexId,
    ) -> ProjectionResult<EntityResolution> {
        if let Some(annotation) = annotations.named_entity(GraphLayer::Surface, v) {
            return Ok(EntityResolution::Surface {
                entity_type: self.pool.resolve(annotation.entity_type).to_string(),
                members: annotation.members.clone(),
            });
        }

        let correspondents = annotations.matches(GraphLayer::Surface, v, GraphLayer::Lattice);
        let mut it = correspondents.iter();
        let lattice_vertex = match (it.next(), it.next()) {
            (Some(&single), None) => single,
            _ => {
                return Err(ProjectionError::contract(format!(
                    "expected exactly one lattice correspondent for surface vertex {:?}, found {}",
                    v,
                    correspondents.len()
                )));
            }
        };

        if let Some(annotation) = annotations.named_entity(GraphLayer::Lattice, lattice_vertex) {
            return Ok(EntityResolution::Lattice {
                entity_type: self.pool.resolve(annotation.entity_type).to_string(),
                members: annotation.members.clone(),
            });
        }
        Ok(EntityResolution::None)
    }

    /// Resolve (relation label, head token index) for a surface vertex
    /// from the pass-1 maps.
    fn resolve_dependency(&self, session: &ProjectionSession, v: VertexId) -> (String, usize) {
        let Some(collected) = session.vertex_deps.get(&v) else {
            return ("_".to_string(), 0);
        };
        let head = match session
            .vertex_tokens
            .get(&(GraphLayer::Surface, collected.target))
        {
            Some(&index) => index,
            None => {
                log::warn!(
                    "dependency target {:?} of vertex {:?} has no token index; defaulting head to 0",
                    collected.target,
                    v
                );
                0
            }
        };
        let relation = self.config.map_relation(&collected.relation).to_string();
        if relation == self.config.root_label {
            // A root token has no numeric head target in output.
            (relation, 0)
        } else {
            (relation, head)
        }
    }

    /// Sorted `key=value` pairs for every feature-class category, `"_"`
    /// when none apply.
    fn format_features(&self, features: Option<&FeatureSet>) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(features) = features {
            for (category, code) in features.iter() {
                if !matches!(self.properties.kind(category), Some(CategoryKind::Feature)) {
                    continue;
                }
                match self.properties.symbolic_value(category, code) {
                    Some(value) => pairs.push(format!("{}={}", category, value)),
                    None => log::debug!("no symbolic value for {}={}", category, code),
                }
            }
        }
        if pairs.is_empty() {
            "_".to_string()
        } else {
            pairs.sort();
            pairs.join("|")
        }
    }

    /// Translate sentence-boundary vertex pairs into token-index spans.
    fn assemble_sentences(
        &self,
        result: &AnalysisResult,
        session: &ProjectionSession,
        doc: &mut Document,
    ) {
        let Some(bounds) = result.sentence_boundaries() else {
            return;
        };
        for bound in bounds {
            let start = session
                .vertex_tokens
                .get(&(GraphLayer::Surface, bound.first));
            let end = session.vertex_tokens.get(&(GraphLayer::Surface, bound.last));
            match (start, end) {
                (Some(&start), Some(&end)) => doc.push_sentence(Sentence { start, end }),
                _ => log::warn!(
                    "sentence boundary {:?}..{:?} does not map to token indices; skipped",
                    bound.first,
                    bound.last
                ),
            }
        }
    }
}

/// Assign indices to the material members of one entity, then alias the
/// covering surface vertex to the first member's index so dependency
/// targets and sentence endpoints pointing at it still resolve.
fn number_members(
    graph: &TokenGraph,
    layer: GraphLayer,
    covering: VertexId,
    members: &[VertexId],
    session: &mut ProjectionSession,
) {
    let mut first_index = None;
    for &m in members {
        if !graph.is_material(m) {
            continue;
        }
        let index = session.assign(layer, m);
        if first_index.is_none() {
            first_index = Some(index);
        }
    }
    if let Some(index) = first_index {
        session
            .vertex_tokens
            .entry((GraphLayer::Surface, covering))
            .or_insert(index);
    }
}

/// Escape CR/LF/TAB with a `\xHH` hex escape per offending byte.
fn escape_control(text: &str) -> String {
    if !text.contains(['\r', '\n', '\t']) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 6);
    for ch in text.chars() {
        match ch {
            '\r' => out.push_str("\\x0D"),
            '\n' => out.push_str("\\x0A"),
            '\t' => out.push_str("\\x09"),
            _ => out.push(ch),
        }
    }
    out
}
