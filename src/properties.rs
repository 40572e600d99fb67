//! Categorical property schemas.
//!
//! The upstream pipeline stores part-of-speech and morphological
//! information as packed integer codes, one per category. The
//! [`PropertyResolver`] holds the per-language schema mapping those
//! codes to symbolic names. Categories are classed as macro (coarse
//! part of speech), micro (fine part of speech) or plain morphological
//! features; only the feature class contributes to the `key=value`
//! feature string on output tokens.

use std::collections::{BTreeMap, HashMap};

/// How a category participates in token output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Coarse part-of-speech category; its code becomes the token's
    /// category field.
    Macro,
    /// Fine part-of-speech category; carried by the graphs but not
    /// projected into the feature string.
    Micro,
    /// Morphological feature, rendered as `name=value` in the feature
    /// string.
    Feature,
}

/// One category of the per-language schema.
#[derive(Debug, Clone)]
pub struct CategorySchema {
    name: String,
    kind: CategoryKind,
    values: BTreeMap<u32, String>,
}

impl CategorySchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    /// Symbolic name for a code within this category.
    pub fn symbolic_value(&self, code: u32) -> Option<&str> {
        self.values.get(&code).map(String::as_str)
    }
}

/// Per-language schema mapping packed categorical codes to symbolic
/// names. Read-only during projection; injected by the host.
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    categories: Vec<CategorySchema>,
    by_name: HashMap<String, usize>,
}

impl PropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category with its code-to-name table.
    ///
    /// Re-registering a name replaces the previous table.
    pub fn add_category(
        &mut self,
        name: &str,
        kind: CategoryKind,
        values: &[(u32, &str)],
    ) -> &mut Self {
        let schema = CategorySchema {
            name: name.to_string(),
            kind,
            values: values
                .iter()
                .map(|(code, text)| (*code, text.to_string()))
                .collect(),
        };
        match self.by_name.get(name) {
            Some(&slot) => self.categories[slot] = schema,
            None => {
                self.by_name.insert(name.to_string(), self.categories.len());
                self.categories.push(schema);
            }
        }
        self
    }

    /// All registered categories, in registration order.
    pub fn categories(&self) -> impl Iterator<Item = &CategorySchema> {
        self.categories.iter()
    }

    pub fn category(&self, name: &str) -> Option<&CategorySchema> {
        self.by_name.get(name).map(|&slot| &self.categories[slot])
    }

    /// Symbolic name for `code` within `category`.
    pub fn symbolic_value(&self, category: &str, code: u32) -> Option<&str> {
        self.category(category)?.symbolic_value(code)
    }

    pub fn kind(&self, category: &str) -> Option<CategoryKind> {
        self.category(category).map(CategorySchema::kind)
    }

    /// Code of the macro category in `features`, or 0 if the set has no
    /// macro-category entry.
    pub fn macro_code(&self, features: &FeatureSet) -> u32 {
        self.categories
            .iter()
            .filter(|schema| schema.kind == CategoryKind::Macro)
            .find_map(|schema| features.get(&schema.name))
            .unwrap_or(0)
    }
}

/// Category-keyed code assignments attached to a graph vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    codes: BTreeMap<String, u32>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style assignment.
    pub fn with(mut self, category: &str, code: u32) -> Self {
        self.codes.insert(category.to_string(), code);
        self
    }

    pub fn set(&mut self, category: &str, code: u32) {
        self.codes.insert(category.to_string(), code);
    }

    pub fn get(&self, category: &str) -> Option<u32> {
        self.codes.get(category).copied()
    }

    /// Iterate `(category, code)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.codes.iter().map(|(name, &code)| (name.as_str(), code))
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}
