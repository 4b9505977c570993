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

//! Ordered stylesheet and script injection

use crate::domain::config::RenderContext;
use crate::domain::template::html::escape_attr;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Stylesheet,
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    pub href: String,
}

impl AssetRef {
    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Stylesheet,
            href: href.into(),
        }
    }

    pub fn script(href: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Script,
            href: href.into(),
        }
    }

    pub fn to_html(&self) -> String {
        match self.kind {
            AssetKind::Stylesheet => format!(
                "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">",
                escape_attr(&self.href)
            ),
            AssetKind::Script => format!("<script src=\"{}\"></script>", escape_attr(&self.href)),
        }
    }
}

/// Pure predicate over the render context. Predicates never observe each
/// other's results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetPredicate {
    FlagEnabled { name: String },
    FlagDisabled { name: String },
    CustomTheme,
    NoCustomTheme,
}

impl AssetPredicate {
    pub fn evaluate(&self, ctx: &RenderContext) -> bool {
        match self {
            AssetPredicate::FlagEnabled { name } => ctx.flag(name),
            AssetPredicate::FlagDisabled { name } => !ctx.flag(name),
            AssetPredicate::CustomTheme => ctx.has_custom_theme(),
            AssetPredicate::NoCustomTheme => !ctx.has_custom_theme(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConditionalAsset {
    pub kind: AssetKind,
    pub href: String,
    pub when: AssetPredicate,
}

impl ConditionalAsset {
    pub fn new(asset: AssetRef, when: AssetPredicate) -> Self {
        Self {
            kind: asset.kind,
            href: asset.href,
            when,
        }
    }

    pub fn asset(&self) -> AssetRef {
        AssetRef {
            kind: self.kind,
            href: self.href.clone(),
        }
    }
}

/// Asset section of a template declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetDeclarations {
    #[serde(rename = "static")]
    pub static_assets: Vec<AssetRef>,
    pub conditional: Vec<ConditionalAsset>,
}

impl AssetDeclarations {
    pub fn extend(&mut self, other: &AssetDeclarations) {
        self.static_assets.extend(other.static_assets.iter().cloned());
        self.conditional.extend(other.conditional.iter().cloned());
    }

    pub fn build(&self, ctx: &RenderContext) -> Vec<AssetRef> {
        build_asset_list(&self.static_assets, &self.conditional, ctx)
    }
}

/// Static assets in authored order, then every conditional asset whose
/// predicate holds, in declaration order.
pub fn build_asset_list(
    static_assets: &[AssetRef],
    conditional_assets: &[ConditionalAsset],
    ctx: &RenderContext,
) -> Vec<AssetRef> {
    let mut assets = static_assets.to_vec();
    for conditional in conditional_assets {
        if conditional.when.evaluate(ctx) {
            assets.push(conditional.asset());
        } else {
            tracing::debug!(href = %conditional.href, "conditional asset skipped");
        }
    }
    assets
}

pub fn render_asset_tags(assets: &[AssetRef]) -> String {
    assets
        .iter()
        .map(AssetRef::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditional() -> Vec<ConditionalAsset> {
        vec![
            ConditionalAsset::new(
                AssetRef::stylesheet("/static/bootstrap-theme.css"),
                AssetPredicate::NoCustomTheme,
            ),
            ConditionalAsset::new(
                AssetRef::script("/static/analytics.js"),
                AssetPredicate::FlagEnabled {
                    name: "analytics".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_static_assets_always_appear_in_order() {
        let statics = vec![AssetRef::stylesheet("/a.css"), AssetRef::script("/b.js")];
        let ctx = RenderContext::new().with_custom_theme("dark.css");
        let assets = build_asset_list(&statics, &conditional(), &ctx);
        assert_eq!(assets, statics);
    }

    #[test]
    fn test_conditional_assets_follow_context() {
        let statics = vec![AssetRef::stylesheet("/a.css")];
        let ctx = RenderContext::new().with_flag("analytics", true);
        let assets = build_asset_list(&statics, &conditional(), &ctx);
        let hrefs: Vec<&str> = assets.iter().map(|a| a.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["/a.css", "/static/bootstrap-theme.css", "/static/analytics.js"]
        );
    }

    #[test]
    fn test_declarations_from_yaml() {
        let yaml = r#"
static:
  - kind: stylesheet
    href: /static/main.css
conditional:
  - kind: script
    href: /static/tracking.js
    when:
      type: flag_disabled
      name: privacy_mode
"#;
        let decl: AssetDeclarations = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decl.static_assets.len(), 1);
        assert_eq!(
            decl.conditional[0].when,
            AssetPredicate::FlagDisabled {
                name: "privacy_mode".to_string()
            }
        );
        assert_eq!(decl.build(&RenderContext::new()).len(), 2);
    }

    #[test]
    fn test_render_tags() {
        let html = render_asset_tags(&[
            AssetRef::stylesheet("/a.css"),
            AssetRef::script("/b.js"),
        ]);
        assert_eq!(
            html,
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"/a.css\">\n<script src=\"/b.js\"></script>"
        );
    }
}
