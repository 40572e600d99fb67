//! Graph projection engine for linguistic analysis results.
//!
//! An upstream analysis pipeline produces a set of interconnected
//! graphs for each input text: a disambiguated linear token graph (the
//! surface graph), the richer lattice of tokenization alternatives it
//! was chosen from, cross-graph annotations (named entities), and a
//! syntactic dependency graph. This crate flattens that bundle into a
//! consumer-facing [`Document`]: an ordered token sequence with
//! per-token attributes, BIO entity tags, head/relation pairs and
//! sentence spans.
//!
//! ## Core Types
//!
//! - [`Projector`] - the two-pass projection engine
//! - [`AnalysisResult`] / [`AnalysisBuilder`] - pipeline output bundle
//! - [`Document`] / [`Token`] / [`Sentence`] - the flat output model
//! - [`TokenGraph`] / [`AnnotationIndex`] / [`DependencyGraph`] - the
//!   graph layers the engine consumes
//! - [`StringPool`] / [`PropertyResolver`] - shared read-only language
//!   resources, injected by the host
//!
//! ## Example
//!
//! ```
//! use lattice_projection::{AnalysisResult, Projector, PropertyResolver, StringPool};
//!
//! let mut pool = StringPool::new();
//! let mut builder = AnalysisResult::build(&mut pool, "eng");
//! let paris = builder.push_word("Paris", "Paris");
//! let is = builder.push_word("is", "be");
//! builder.add_dependency(paris, is, "nsubj");
//! let result = builder.build();
//!
//! let properties = PropertyResolver::new();
//! let projector = Projector::new(&pool, &properties);
//! let doc = projector.project(&result);
//! assert!(!doc.error());
//! assert_eq!(doc.len(), 2);
//! assert_eq!(doc[0].head, 1);
//! ```

mod analysis;
mod annotations;
mod config;
mod dependencies;
mod display;
mod document;
mod error;
mod graph;
mod pool;
mod projector;
mod properties;

// Analysis-result surface
pub use analysis::{
    AnalysisBuilder,
    AnalysisData,
    AnalysisResult,
    DataKey,
    SentenceBound,
};

// Graph layers
pub use annotations::{AnnotationIndex, NamedEntityAnnotation, Payload, NAMED_ENTITY};
pub use dependencies::{DependencyEdge, DependencyGraph};
pub use graph::{GraphLayer, PathWalk, TokenCandidate, TokenGraph, VertexId};

// Shared language resources
pub use pool::{StrCode, StringPool};
pub use properties::{CategoryKind, CategorySchema, FeatureSet, PropertyResolver};

// Engine
pub use config::ProjectionConfig;
pub use error::{ProjectionError, ProjectionResult};
pub use projector::Projector;

// Output model
pub use display::DocumentDisplay;
pub use document::{Document, IobTag, Sentence, Token};
