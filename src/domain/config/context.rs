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

//! Per-render inputs supplied by the caller

use crate::shared::error::{Result, StencilError};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Values available to page templates during substitution.
///
/// Placeholder keys resolve as follows:
/// - `hostname`, `app_version`, `custom_theme`: the optional fields below
/// - `plugin_deprecation`: always present, `"true"` or `"false"`
/// - `flags.<name>`: `"true"`/`"false"` when the flag is set, missing otherwise
/// - anything else: looked up in `vars`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    pub hostname: Option<String>,
    pub app_version: Option<String>,
    pub custom_theme: Option<String>,
    /// Appends the plugin deprecation warning to the page messages.
    pub plugin_deprecation: bool,
    pub flags: BTreeMap<String, bool>,
    pub vars: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a context file; `.yaml`/`.yml` files are read as YAML, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StencilError::ConfigError(format!(
                "Failed to read context file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let context = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                StencilError::ConfigError(format!(
                    "Failed to parse context file {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                StencilError::ConfigError(format!(
                    "Failed to parse context file {}: {}",
                    path.display(),
                    e
                ))
            })?
        };
        Ok(context)
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = Some(version.into());
        self
    }

    pub fn with_custom_theme(mut self, theme: impl Into<String>) -> Self {
        self.custom_theme = Some(theme.into());
        self
    }

    pub fn with_plugin_deprecation(mut self, enabled: bool) -> Self {
        self.plugin_deprecation = enabled;
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(name.into(), enabled);
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Unset flags read as disabled.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn has_custom_theme(&self) -> bool {
        self.custom_theme.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "hostname" => self.hostname.as_deref().map(Cow::Borrowed),
            "app_version" => self.app_version.as_deref().map(Cow::Borrowed),
            "custom_theme" => self.custom_theme.as_deref().map(Cow::Borrowed),
            "plugin_deprecation" => Some(Cow::Owned(self.plugin_deprecation.to_string())),
            _ => match key.strip_prefix("flags.") {
                Some(flag) => self.flags.get(flag).map(|v| Cow::Owned(v.to_string())),
                None => self.vars.get(key).map(|v| Cow::Borrowed(v.as_str())),
            },
        }
    }
}

/// Inputs to a single resource render besides the configuration tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitContext {
    /// Application version the gate is evaluated against; falls back to the
    /// tree's `airflowVersion` when unset.
    pub current_version: Option<String>,
    /// Target cluster version, used to pick the resource API version.
    pub kube_version: Option<String>,
    pub namespace: Option<String>,
}

impl EmitContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = Some(version.into());
        self
    }

    pub fn with_kube_version(mut self, version: impl Into<String>) -> Self {
        self.kube_version = Some(version.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}
