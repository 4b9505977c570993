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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, StencilError>;

#[derive(Error, Debug)]
pub enum StencilError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid version constraint '{expression}': {reason}")]
    GateEvaluation { expression: String, reason: String },

    #[error("Missing context key '{key}' (no value in render context and no default declared)")]
    MissingContextKey { key: String },

    #[error("Block resolution failed for '{name}': {reason}")]
    BlockResolution { name: String, reason: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl StencilError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn gate_evaluation(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GateEvaluation {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_context_key(key: impl Into<String>) -> Self {
        Self::MissingContextKey { key: key.into() }
    }

    pub fn block_resolution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BlockResolution {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
