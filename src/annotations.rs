//! Cross-graph annotation index.
//!
//! A typed n-to-n correspondence table between vertices of different
//! graph layers, plus tagged payloads attached to vertices. The index
//! is an explicit multimap keyed by `(layer, vertex)` pairs rather than
//! anything graph-type specific, so new layers or payload kinds do not
//! require touching the graphs themselves.

use std::collections::{BTreeSet, HashMap};

use crate::graph::{GraphLayer, VertexId};
use crate::pool::StrCode;

/// Payload kind under which named-entity annotations are attached.
pub const NAMED_ENTITY: &str = "NamedEntity";

/// A named-entity annotation: the entity type (string-pool code) and
/// the ordered member vertices the entity covers. Members live in the
/// layer the annotation is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntityAnnotation {
    pub entity_type: StrCode,
    pub members: Vec<VertexId>,
}

/// Tagged payload attached to a vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    NamedEntity(NamedEntityAnnotation),
    /// Free-form interned text (normalized forms and the like).
    Text(StrCode),
}

/// Correspondences across graph layers plus per-vertex payloads.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    matches: HashMap<(GraphLayer, VertexId, GraphLayer), BTreeSet<VertexId>>,
    payloads: HashMap<(GraphLayer, VertexId), HashMap<String, Payload>>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` in `from_layer` corresponds to `to` in
    /// `to_layer`. The relation is stored in both directions.
    pub fn add_match(
        &mut self,
        from_layer: GraphLayer,
        from: VertexId,
        to_layer: GraphLayer,
        to: VertexId,
    ) {
        self.matches
            .entry((from_layer, from, to_layer))
            .or_default()
            .insert(to);
        self.matches
            .entry((to_layer, to, from_layer))
            .or_default()
            .insert(from);
    }

    /// Vertices of `to_layer` corresponding to `v` of `from_layer`.
    pub fn matches(
        &self,
        from_layer: GraphLayer,
        v: VertexId,
        to_layer: GraphLayer,
    ) -> &BTreeSet<VertexId> {
        static EMPTY: BTreeSet<VertexId> = BTreeSet::new();
        self.matches
            .get(&(from_layer, v, to_layer))
            .unwrap_or(&EMPTY)
    }

    /// Attach a payload to a vertex under the given kind, replacing any
    /// previous payload of that kind.
    pub fn attach(&mut self, layer: GraphLayer, v: VertexId, kind: &str, payload: Payload) {
        self.payloads
            .entry((layer, v))
            .or_default()
            .insert(kind.to_string(), payload);
    }

    pub fn has_annotation(&self, layer: GraphLayer, v: VertexId, kind: &str) -> bool {
        self.annotation(layer, v, kind).is_some()
    }

    pub fn annotation(&self, layer: GraphLayer, v: VertexId, kind: &str) -> Option<&Payload> {
        self.payloads.get(&(layer, v))?.get(kind)
    }

    /// Named-entity payload on a vertex, if any.
    pub fn named_entity(
        &self,
        layer: GraphLayer,
        v: VertexId,
    ) -> Option<&NamedEntityAnnotation> {
        match self.annotation(layer, v, NAMED_ENTITY) {
            Some(Payload::NamedEntity(annotation)) => Some(annotation),
            _ => None,
        }
    }
}
