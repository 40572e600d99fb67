//! Projection configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};

/// Tunables for the projection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Relation label marking the syntactic root. A token whose mapped
    /// relation equals this label gets head index 0 regardless of the
    /// collected target.
    pub root_label: String,
    /// Optional relation-name remapping applied after collection;
    /// identity for names absent from the table.
    pub relation_map: BTreeMap<String, String>,
    /// When true, an entity annotation adjacent to a just-emitted
    /// entity of the same type continues its IOB run (`I`) instead of
    /// opening a new one (`B`).
    pub continue_adjacent_entities: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            root_label: "root".to_string(),
            relation_map: BTreeMap::new(),
            continue_adjacent_entities: true,
        }
    }
}

impl ProjectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_label(mut self, label: &str) -> Self {
        self.root_label = label.to_string();
        self
    }

    /// Map the raw relation name `from` to `to` on output.
    pub fn with_relation_alias(mut self, from: &str, to: &str) -> Self {
        self.relation_map.insert(from.to_string(), to.to_string());
        self
    }

    pub fn with_continue_adjacent_entities(mut self, enabled: bool) -> Self {
        self.continue_adjacent_entities = enabled;
        self
    }

    /// Load a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ProjectionResult<Self> {
        toml::from_str(text).map_err(|e| ProjectionError::Config {
            message: e.to_string(),
        })
    }

    /// Translate a raw relation name through the remapping table.
    pub(crate) fn map_relation<'a>(&'a self, raw: &'a str) -> &'a str {
        self.relation_map.get(raw).map(String::as_str).unwrap_or(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProjectionConfig::default();
        assert_eq!(config.root_label, "root");
        assert!(config.relation_map.is_empty());
        assert!(config.continue_adjacent_entities);
    }

    #[test]
    fn test_relation_mapping_is_identity_when_absent() {
        let config = ProjectionConfig::new().with_relation_alias("SUJ_V", "nsubj");
        assert_eq!(config.map_relation("SUJ_V"), "nsubj");
        assert_eq!(config.map_relation("COMPL"), "COMPL");
    }

    #[test]
    fn test_from_toml_str() {
        let config = ProjectionConfig::from_toml_str(
            r#"
            root_label = "ud:root"
            continue_adjacent_entities = false

            [relation_map]
            SUJ_V = "nsubj"
            "#,
        )
        .unwrap();
        assert_eq!(config.root_label, "ud:root");
        assert!(!config.continue_adjacent_entities);
        assert_eq!(config.map_relation("SUJ_V"), "nsubj");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ProjectionConfig::from_toml_str("root_label = [").unwrap_err();
        assert!(matches!(err, ProjectionError::Config { .. }));
    }
}
