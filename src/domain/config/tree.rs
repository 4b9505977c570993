// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration tree consumed by the resource emitter

use crate::shared::error::{Result, StencilError};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Nested values tree, addressed by dotted paths such as
/// `webserver.podDisruptionBudget.enabled`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Value,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }
}

impl ConfigTree {
    pub fn new(root: Value) -> Result<Self> {
        match root {
            Value::Mapping(_) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            other => Err(StencilError::config_error(format!(
                "Configuration root must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        Self::new(root)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StencilError::ConfigError(format!(
                "Failed to read values file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content).map_err(|e| {
            StencilError::ConfigError(format!(
                "Failed to parse values file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Absent, null and non-boolean values all read as disabled.
    pub fn flag(&self, path: &str) -> bool {
        match self.get(path) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true" || s == "True",
            _ => false,
        }
    }

    pub fn string(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Reads a flat string-to-string mapping. Scalars are stringified;
    /// nested mappings or sequences are rejected.
    pub fn string_map(&self, path: &str) -> Result<Option<BTreeMap<String, String>>> {
        let mapping = match self.mapping_at(path)? {
            Some(mapping) => mapping,
            None => return Ok(None),
        };

        let mut map = BTreeMap::new();
        for (key, value) in mapping {
            let key = scalar_to_string(key).ok_or_else(|| {
                StencilError::ConfigError(format!(
                    "'{}' must be a flat string mapping, found a {} key",
                    path,
                    value_kind(key)
                ))
            })?;
            let value = scalar_to_string(value).ok_or_else(|| {
                StencilError::ConfigError(format!(
                    "'{}.{}' must be a string value, found {}",
                    path,
                    key,
                    value_kind(value)
                ))
            })?;
            map.insert(key, value);
        }
        Ok(Some(map))
    }

    /// Reads a mapping with values passed through untouched.
    pub fn mapping(&self, path: &str) -> Result<Option<BTreeMap<String, Value>>> {
        let mapping = match self.mapping_at(path)? {
            Some(mapping) => mapping,
            None => return Ok(None),
        };

        let mut map = BTreeMap::new();
        for (key, value) in mapping {
            let key = scalar_to_string(key).ok_or_else(|| {
                StencilError::ConfigError(format!(
                    "'{}' has a non-scalar key ({})",
                    path,
                    value_kind(key)
                ))
            })?;
            map.insert(key, value.clone());
        }
        Ok(Some(map))
    }

    fn mapping_at(&self, path: &str) -> Result<Option<&Mapping>> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Mapping(mapping)) => Ok(Some(mapping)),
            Some(other) => Err(StencilError::ConfigError(format!(
                "'{}' must be a mapping, found {}",
                path,
                value_kind(other)
            ))),
        }
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: &str = r#"
webserver:
  enabled: true
  labels:
    team: data
    replicas: 2
  podDisruptionBudget:
    enabled: "true"
    config:
      maxUnavailable: 1
  nested:
    inner:
      deep: value
labels: {}
"#;

    #[test]
    fn test_dotted_lookup_and_flags() {
        let tree = ConfigTree::from_yaml_str(VALUES).unwrap();
        assert!(tree.flag("webserver.enabled"));
        assert!(tree.flag("webserver.podDisruptionBudget.enabled"));
        assert!(!tree.flag("webserver.missing"));
        assert!(!tree.flag("scheduler.enabled"));
        assert!(!tree.flag("webserver.labels"));
    }

    #[test]
    fn test_string_map_stringifies_scalars() {
        let tree = ConfigTree::from_yaml_str(VALUES).unwrap();
        let labels = tree.string_map("webserver.labels").unwrap().unwrap();
        assert_eq!(labels.get("team").map(String::as_str), Some("data"));
        assert_eq!(labels.get("replicas").map(String::as_str), Some("2"));
        assert_eq!(tree.string_map("labels").unwrap(), Some(BTreeMap::new()));
        assert_eq!(tree.string_map("scheduler.labels").unwrap(), None);
    }

    #[test]
    fn test_string_map_rejects_nested_values() {
        let tree = ConfigTree::from_yaml_str(VALUES).unwrap();
        let err = tree.string_map("webserver.nested").unwrap_err();
        assert!(matches!(err, StencilError::ConfigError(_)));
        assert!(err.to_string().contains("webserver.nested.inner"));

        let err = tree.string_map("webserver.enabled").unwrap_err();
        assert!(matches!(err, StencilError::ConfigError(_)));
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        assert!(ConfigTree::from_yaml_str("- a\n- b\n").is_err());
        assert_eq!(ConfigTree::from_yaml_str("~").unwrap(), ConfigTree::default());
    }
}
