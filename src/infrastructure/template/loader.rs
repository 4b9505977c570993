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

use crate::domain::template::TemplateSet;
use crate::shared::error::{Result, StencilError};
use std::path::{Path, PathBuf};

/// Loads every regular file in `dir` into a template set keyed by file name.
/// `.yaml`/`.yml` files are leaf templates, anything else is a layout.
pub fn load_template_set(dir: impl AsRef<Path>) -> Result<TemplateSet> {
    let dir = resolve_template_dir(dir.as_ref())?;

    if !dir.is_dir() {
        return Err(StencilError::ConfigError(format!(
            "Template directory does not exist: {}",
            dir.display()
        )));
    }

    let entries = std::fs::read_dir(&dir).map_err(|e| {
        StencilError::ConfigError(format!(
            "Failed to read template directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                StencilError::ConfigError(format!(
                    "Failed to read template directory {}: {}",
                    dir.display(),
                    e
                ))
            })?
            .path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut set = TemplateSet::new();
    for path in paths {
        load_template_file(&mut set, &path)?;
    }

    tracing::debug!(dir = %dir.display(), templates = set.len(), "loaded templates");
    Ok(set)
}

fn load_template_file(set: &mut TemplateSet, path: &Path) -> Result<()> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(StencilError::ConfigError(format!(
            "Template file name is not valid UTF-8: {}",
            path.display()
        )));
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        StencilError::ConfigError(format!(
            "Failed to read template file {}: {}",
            path.display(),
            e
        ))
    })?;

    let result = if is_leaf(path) {
        set.add_leaf_yaml(name, &content)
    } else {
        set.add_layout(name, &content)
    };

    result.map_err(|e| match e {
        StencilError::BlockResolution { name, reason } => {
            StencilError::block_resolution(name, format!("{} ({})", reason, path.display()))
        }
        other => StencilError::ConfigError(format!(
            "Failed to load template file {}: {}",
            path.display(),
            other
        )),
    })
}

fn is_leaf(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

pub fn resolve_template_dir(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .map_err(|e| StencilError::ConfigError(format!("Cannot get current directory: {}", e)))?
            .join(path))
    }
}
