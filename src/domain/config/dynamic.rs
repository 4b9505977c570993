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

use crate::domain::config::tree::{value_kind, ConfigTree};
use crate::shared::error::{Result, StencilError};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// Parse dynamic configuration properties from -D key=value format
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let parts: Vec<&str> = config.splitn(2, '=').collect();
        if parts.len() != 2 {
            return Err(StencilError::ConfigError(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        }

        let key = parts[0].trim();
        let value = parts[1].trim();

        if key.is_empty() {
            return Err(StencilError::ConfigError(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}

/// Returns a copy of `tree` with every dotted key set to its value.
/// Values are read as YAML scalars, so `true` becomes a boolean and `1` a number.
pub fn apply_overrides(tree: &ConfigTree, configs: &HashMap<String, String>) -> Result<ConfigTree> {
    let mut result = tree.clone();

    // Sorted so a parent key is always written before its children.
    let mut keys: Vec<&String> = configs.keys().collect();
    keys.sort();

    for key in keys {
        let value = parse_scalar(&configs[key]);
        set_path(result.root_mut(), key, value)?;
        tracing::debug!(key = %key, "applied dynamic override");
    }

    Ok(result)
}

/// A number that does not print back as written (`2.10` reads as `2.1`)
/// stays a string so version-like values survive.
fn parse_scalar(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Number(n)) if n.to_string() != raw => Value::String(raw.to_string()),
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

fn set_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(StencilError::ConfigError(format!(
            "Invalid override key: '{}'",
            path
        )));
    }

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| StencilError::config_error("Empty override key"))?;

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let mapping = current.as_mapping_mut().ok_or_else(|| {
            StencilError::ConfigError(format!(
                "Cannot override '{}': '{}' is not a mapping",
                path,
                segments[..depth].join(".")
            ))
        })?;

        let needs_mapping = matches!(mapping.get(*segment), None | Some(Value::Null));
        if needs_mapping {
            mapping.insert(
                Value::String(segment.to_string()),
                Value::Mapping(Mapping::new()),
            );
        }
        current = mapping.get_mut(*segment).ok_or_else(|| {
            StencilError::ConfigError(format!("Cannot override '{}'", path))
        })?;
    }

    match current {
        Value::Mapping(mapping) => {
            mapping.insert(Value::String(last.to_string()), value);
            Ok(())
        }
        other => Err(StencilError::ConfigError(format!(
            "Cannot override '{}': '{}' is {}, not a mapping",
            path,
            parents.join("."),
            value_kind(other)
        ))),
    }
}
