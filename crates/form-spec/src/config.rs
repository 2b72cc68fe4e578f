use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LimitLookupError;

pub const DEFAULT_MAX_LABEL_LENGTH: usize = 255;

/// Engine settings, fixed once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    /// Treat every element as copy-only, even the reusable variants.
    #[serde(default)]
    pub never_reuse_elements: bool,
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,
    #[serde(default)]
    pub schema: SchemaRegistry,
}

fn default_max_label_length() -> usize {
    DEFAULT_MAX_LABEL_LENGTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            never_reuse_elements: false,
            max_label_length: DEFAULT_MAX_LABEL_LENGTH,
            schema: SchemaRegistry::default(),
        }
    }
}

/// Declared storage columns of the objects an answer sheet can reach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaRegistry {
    #[serde(default)]
    pub types: BTreeMap<String, TypeSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypeSchema {
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SchemaRegistry {
    pub fn with_column(mut self, type_name: &str, attribute: &str, limit: Option<usize>) -> Self {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .columns
            .insert(attribute.to_string(), ColumnSpec { limit });
        self
    }

    pub fn column_limit(&self, type_name: &str, attribute: &str) -> Result<usize, LimitLookupError> {
        let schema = self
            .types
            .get(type_name)
            .ok_or_else(|| LimitLookupError::UnknownType(type_name.to_string()))?;
        let column =
            schema
                .columns
                .get(attribute)
                .ok_or_else(|| LimitLookupError::UnknownAttribute {
                    type_name: type_name.to_string(),
                    attribute: attribute.to_string(),
                })?;
        column.limit.ok_or_else(|| LimitLookupError::Unlimited {
            type_name: type_name.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_defaults_apply_to_missing_fields() {
        let config: EngineConfig = serde_json::from_value(json!({})).expect("config");
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_value(json!({
            "never_reuse_elements": true,
            "schema": { "types": { "Address": { "columns": { "city": { "limit": 60 } } } } }
        }))
        .expect("config");
        assert!(config.never_reuse_elements);
        assert_eq!(config.max_label_length, 255);
        assert_eq!(config.schema.column_limit("Address", "city"), Ok(60));
    }

    #[test]
    fn column_limit_reports_each_failure() {
        let registry = SchemaRegistry::default().with_column("Person", "notes", None);
        assert_eq!(
            registry.column_limit("Pet", "name"),
            Err(LimitLookupError::UnknownType("Pet".into()))
        );
        assert!(matches!(
            registry.column_limit("Person", "age"),
            Err(LimitLookupError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            registry.column_limit("Person", "notes"),
            Err(LimitLookupError::Unlimited { .. })
        ));
    }
}
