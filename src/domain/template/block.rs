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

//! Named blocks and the layouts that declare them

use crate::shared::error::{Result, StencilError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

const BLOCK_PATTERN: &str = r"(?s)\{%\s*block\s+([A-Za-z_][A-Za-z0-9_]*)\s*%\}(.*?)\{%\s*endblock(?:\s+([A-Za-z_][A-Za-z0-9_]*))?\s*%\}";
const BLOCK_TAG_PATTERN: &str = r"\{%\s*(endblock|block)(?:\s+([A-Za-z_][A-Za-z0-9_]*))?\s*%\}";

/// How a child template's content combines with the block it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    /// Child content only.
    Replace,
    /// Parent content, then child content.
    Extend,
    /// Child content, then parent content.
    ExtendAfter,
    /// Parent content unchanged.
    Inherit,
}

impl BlockMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockMode::Replace => "replace",
            BlockMode::Extend => "extend",
            BlockMode::ExtendAfter => "extend_after",
            BlockMode::Inherit => "inherit",
        }
    }

    /// Unknown modes are reported against the block that declared them.
    pub fn parse(block: &str, raw: &str) -> Result<Self> {
        match raw.trim() {
            "replace" => Ok(BlockMode::Replace),
            "extend" => Ok(BlockMode::Extend),
            "extend_after" => Ok(BlockMode::ExtendAfter),
            "inherit" => Ok(BlockMode::Inherit),
            other => Err(StencilError::block_resolution(
                block,
                format!(
                    "unknown block mode '{}' (expected replace, extend, extend_after or inherit)",
                    other
                ),
            )),
        }
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child template's entry for one block, as authored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockOverride {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub content: Option<String>,
}

fn default_mode() -> String {
    BlockMode::Replace.as_str().to_string()
}

impl BlockOverride {
    pub fn new(mode: BlockMode, content: impl Into<String>) -> Self {
        Self {
            mode: mode.as_str().to_string(),
            content: Some(content.into()),
        }
    }
}

pub fn resolve_block(
    name: &str,
    base_default: &str,
    leaf_override: Option<&str>,
    mode: BlockMode,
) -> Result<String> {
    if mode == BlockMode::Inherit {
        return Ok(base_default.to_string());
    }

    let leaf = leaf_override.ok_or_else(|| {
        StencilError::block_resolution(name, format!("mode '{}' requires content", mode))
    })?;

    let resolved = match mode {
        BlockMode::Replace => leaf.to_string(),
        BlockMode::Extend => format!("{}{}", base_default, leaf),
        BlockMode::ExtendAfter => format!("{}{}", leaf, base_default),
        BlockMode::Inherit => base_default.to_string(),
    };
    Ok(resolved)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Block(String),
}

/// Root of an inheritance chain: literal text with named, defaulted slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    segments: Vec<Segment>,
    defaults: BTreeMap<String, String>,
}

impl Layout {
    /// `template` names the layout in error messages.
    pub fn parse(template: &str, source: &str) -> Result<Self> {
        let block_re = Regex::new(BLOCK_PATTERN)?;
        let tag_re = Regex::new(BLOCK_TAG_PATTERN)?;

        let mut segments = Vec::new();
        let mut defaults = BTreeMap::new();
        let mut last = 0;

        for caps in block_re.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            let name = &caps[1];
            let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            let text = &source[last..whole.start()];
            check_stray_tags(&tag_re, template, text)?;

            if let Some(end_name) = caps.get(3) {
                if end_name.as_str() != name {
                    return Err(StencilError::block_resolution(
                        name,
                        format!(
                            "closed by 'endblock {}' in template '{}'",
                            end_name.as_str(),
                            template
                        ),
                    ));
                }
            }
            if tag_re.is_match(body) {
                return Err(StencilError::block_resolution(
                    name,
                    format!("nested blocks are not supported (template '{}')", template),
                ));
            }
            if defaults.contains_key(name) {
                return Err(StencilError::block_resolution(
                    name,
                    format!("declared more than once in template '{}'", template),
                ));
            }

            if !text.is_empty() {
                segments.push(Segment::Text(text.to_string()));
            }
            segments.push(Segment::Block(name.to_string()));
            defaults.insert(name.to_string(), body.to_string());
            last = whole.end();
        }

        let tail = &source[last..];
        check_stray_tags(&tag_re, template, tail)?;
        if !tail.is_empty() {
            segments.push(Segment::Text(tail.to_string()));
        }

        tracing::debug!(template = %template, blocks = defaults.len(), "layout parsed");
        Ok(Self { segments, defaults })
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.defaults.keys().map(String::as_str)
    }

    pub fn default_content(&self, block: &str) -> Option<&str> {
        self.defaults.get(block).map(String::as_str)
    }

    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.defaults
    }

    /// Fills every slot from `blocks`, falling back to the layout default.
    pub fn assemble(&self, blocks: &BTreeMap<String, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Block(name) => {
                    let content = blocks
                        .get(name)
                        .or_else(|| self.defaults.get(name))
                        .map(String::as_str)
                        .unwrap_or_default();
                    out.push_str(content);
                }
            }
        }
        out
    }
}

fn check_stray_tags(tag_re: &Regex, template: &str, text: &str) -> Result<()> {
    if let Some(caps) = tag_re.captures(text) {
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| template.to_string());
        let reason = if &caps[1] == "block" {
            format!("unterminated block in template '{}'", template)
        } else {
            format!("endblock without matching block in template '{}'", template)
        };
        return Err(StencilError::block_resolution(name, reason));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherit_returns_base() {
        assert_eq!(
            resolve_block("head_css", "A", None, BlockMode::Inherit).unwrap(),
            "A"
        );
        assert_eq!(
            resolve_block("head_css", "A", Some("B"), BlockMode::Inherit).unwrap(),
            "A"
        );
    }

    #[test]
    fn test_extend_puts_base_first() {
        assert_eq!(
            resolve_block("head_css", "A", Some("B"), BlockMode::Extend).unwrap(),
            "AB"
        );
        assert_eq!(
            resolve_block("head_css", "A", Some("B"), BlockMode::ExtendAfter).unwrap(),
            "BA"
        );
        assert_eq!(
            resolve_block("head_css", "A", Some("B"), BlockMode::Replace).unwrap(),
            "B"
        );
    }

    #[test]
    fn test_mode_without_content_fails() {
        let err = resolve_block("content", "A", None, BlockMode::Replace).unwrap_err();
        match err {
            StencilError::BlockResolution { name, .. } => assert_eq!(name, "content"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_mode_names_block() {
        let err = BlockMode::parse("tail_js", "super").unwrap_err();
        assert!(err.to_string().contains("tail_js"));
        assert_eq!(BlockMode::parse("x", " extend ").unwrap(), BlockMode::Extend);
    }

    #[test]
    fn test_layout_parse_and_assemble() {
        let layout = Layout::parse(
            "base.html",
            "<head>{% block head_css %}<link a>{% endblock %}</head>\n<body>{% block content %}{% endblock content %}</body>",
        )
        .unwrap();
        let names: Vec<&str> = layout.block_names().collect();
        assert_eq!(names, vec!["content", "head_css"]);
        assert_eq!(layout.default_content("head_css"), Some("<link a>"));

        let mut blocks = BTreeMap::new();
        blocks.insert("content".to_string(), "hi".to_string());
        assert_eq!(
            layout.assemble(&blocks),
            "<head><link a></head>\n<body>hi</body>"
        );
    }

    #[test]
    fn test_malformed_layouts() {
        let dup = Layout::parse("t", "{% block a %}{% endblock %}{% block a %}{% endblock %}");
        assert!(matches!(dup, Err(StencilError::BlockResolution { ref name, .. }) if name == "a"));

        let open = Layout::parse("t", "x {% block a %} never closed");
        assert!(matches!(open, Err(StencilError::BlockResolution { ref name, .. }) if name == "a"));

        let stray = Layout::parse("t", "x {% endblock %}");
        assert!(stray.is_err());

        let mismatched = Layout::parse("t", "{% block a %}{% endblock b %}");
        assert!(mismatched.is_err());

        let nested = Layout::parse("t", "{% block a %}{% block b %}{% endblock %}{% endblock %}");
        assert!(nested.is_err());
    }
}
