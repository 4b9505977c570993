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

//! Template registry and inheritance chain resolution

use crate::domain::template::assets::AssetDeclarations;
use crate::domain::template::block::{resolve_block, BlockMode, BlockOverride, Layout};
use crate::shared::error::{Result, StencilError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A template that extends another one by overriding some of its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeafTemplate {
    pub extends: String,
    #[serde(default)]
    pub blocks: BTreeMap<String, BlockOverride>,
    #[serde(default)]
    pub assets: AssetDeclarations,
}

impl LeafTemplate {
    pub fn new(extends: impl Into<String>) -> Self {
        Self {
            extends: extends.into(),
            blocks: BTreeMap::new(),
            assets: AssetDeclarations::default(),
        }
    }

    pub fn with_block(mut self, name: impl Into<String>, block: BlockOverride) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn with_assets(mut self, assets: AssetDeclarations) -> Self {
        self.assets = assets;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Layout(Layout),
    Leaf(LeafTemplate),
}

/// Block contents and accumulated assets of a fully resolved chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub document: String,
    pub blocks: BTreeMap<String, String>,
    pub assets: AssetDeclarations,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, TemplateSource>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layout(&mut self, name: impl Into<String>, source: &str) -> Result<()> {
        let name = name.into();
        let layout = Layout::parse(&name, source)?;
        self.templates.insert(name, TemplateSource::Layout(layout));
        Ok(())
    }

    pub fn add_leaf(&mut self, name: impl Into<String>, leaf: LeafTemplate) {
        self.templates.insert(name.into(), TemplateSource::Leaf(leaf));
    }

    pub fn add_leaf_yaml(&mut self, name: impl Into<String>, yaml: &str) -> Result<()> {
        let name = name.into();
        let leaf: LeafTemplate = serde_yaml::from_str(yaml).map_err(|e| {
            StencilError::ConfigError(format!("Failed to parse template '{}': {}", name, e))
        })?;
        self.add_leaf(name, leaf);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TemplateSource> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Walks `name` up to its root layout, then applies every level's block
    /// overrides from the root down, so each child builds on its parent's
    /// result. Assets accumulate in the same order.
    pub fn resolve(&self, name: &str) -> Result<ResolvedTemplate> {
        let (layout, chain) = self.chain(name)?;

        let mut blocks = layout.defaults().clone();
        let mut assets = AssetDeclarations::default();

        for (template_name, leaf) in chain.iter().rev() {
            for (block_name, block) in &leaf.blocks {
                let base = blocks.get(block_name).ok_or_else(|| {
                    StencilError::block_resolution(
                        block_name,
                        format!(
                            "template '{}' overrides a block its layout does not declare",
                            template_name
                        ),
                    )
                })?;
                let mode = BlockMode::parse(block_name, &block.mode)?;
                let resolved = resolve_block(block_name, base, block.content.as_deref(), mode)?;
                tracing::debug!(template = %template_name, block = %block_name, mode = %mode, "block resolved");
                blocks.insert(block_name.clone(), resolved);
            }
            assets.extend(&leaf.assets);
        }

        Ok(ResolvedTemplate {
            document: layout.assemble(&blocks),
            blocks,
            assets,
        })
    }

    /// Root layout plus the leaves from `name` upwards.
    fn chain<'a>(&'a self, name: &str) -> Result<(&'a Layout, Vec<(&'a str, &'a LeafTemplate)>)> {
        let mut chain = Vec::new();
        let mut visited: Vec<&str> = Vec::new();
        let mut current: &str = name;

        loop {
            if visited.contains(&current) {
                let mut path = visited.clone();
                path.push(current);
                return Err(StencilError::block_resolution(
                    current,
                    format!("cyclic extends chain: {}", path.join(" -> ")),
                ));
            }

            let (key, source) = match self.templates.get_key_value(current) {
                Some((key, source)) => (key.as_str(), source),
                None => {
                    let reason = match visited.last() {
                        Some(child) => format!("template not found (extended by '{}')", child),
                        None => "template not found".to_string(),
                    };
                    return Err(StencilError::block_resolution(current, reason));
                }
            };
            visited.push(key);

            match source {
                TemplateSource::Layout(layout) => return Ok((layout, chain)),
                TemplateSource::Leaf(leaf) => {
                    chain.push((key, leaf));
                    current = leaf.extends.as_str();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_set() -> TemplateSet {
        let mut set = TemplateSet::new();
        set.add_layout(
            "base.html",
            "<head>{% block head_css %}A{% endblock %}</head><body>{% block content %}{% endblock %}</body>",
        )
        .unwrap();
        set
    }

    #[test]
    fn test_extend_scenario() {
        let mut set = base_set();
        set.add_leaf(
            "page.yaml",
            LeafTemplate::new("base.html")
                .with_block("head_css", BlockOverride::new(BlockMode::Extend, "B")),
        );
        let resolved = set.resolve("page.yaml").unwrap();
        assert_eq!(resolved.blocks["head_css"], "AB");
        assert_eq!(resolved.document, "<head>AB</head><body></body>");
    }

    #[test]
    fn test_three_level_chain_folds_from_root() {
        let mut set = base_set();
        set.add_leaf(
            "main.yaml",
            LeafTemplate::new("base.html")
                .with_block("head_css", BlockOverride::new(BlockMode::Extend, "B")),
        );
        set.add_leaf(
            "dags.yaml",
            LeafTemplate::new("main.yaml")
                .with_block("head_css", BlockOverride::new(BlockMode::Extend, "C"))
                .with_block("content", BlockOverride::new(BlockMode::Replace, "dags")),
        );
        let resolved = set.resolve("dags.yaml").unwrap();
        assert_eq!(resolved.document, "<head>ABC</head><body>dags</body>");
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut set = base_set();
        set.add_leaf("a", LeafTemplate::new("b"));
        set.add_leaf("b", LeafTemplate::new("a"));
        let err = set.resolve("a").unwrap_err();
        assert!(err.to_string().contains("cyclic extends chain: a -> b -> a"));
    }

    #[test]
    fn test_missing_parent_and_unknown_block() {
        let mut set = base_set();
        set.add_leaf("orphan", LeafTemplate::new("missing.html"));
        assert!(matches!(
            set.resolve("orphan"),
            Err(StencilError::BlockResolution { ref name, .. }) if name == "missing.html"
        ));

        set.add_leaf(
            "typo",
            LeafTemplate::new("base.html")
                .with_block("head_csss", BlockOverride::new(BlockMode::Replace, "x")),
        );
        assert!(matches!(
            set.resolve("typo"),
            Err(StencilError::BlockResolution { ref name, .. }) if name == "head_csss"
        ));
    }

    #[test]
    fn test_leaf_from_yaml_defaults_to_replace() {
        let mut set = base_set();
        set.add_leaf_yaml(
            "home.yaml",
            "extends: base.html\nblocks:\n  content:\n    content: hello\n",
        )
        .unwrap();
        let resolved = set.resolve("home.yaml").unwrap();
        assert_eq!(resolved.blocks["content"], "hello");

        set.add_leaf_yaml(
            "bad.yaml",
            "extends: base.html\nblocks:\n  content:\n    mode: super\n    content: x\n",
        )
        .unwrap();
        assert!(matches!(
            set.resolve("bad.yaml"),
            Err(StencilError::BlockResolution { ref name, .. }) if name == "content"
        ));
    }
}
