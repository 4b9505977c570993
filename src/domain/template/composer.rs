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

//! Page rendering: resolution, then substitution
//!
//! A render pass is a value that is consumed by each phase:
//! [`RenderPass::resolve`] yields a [`ResolvedDocument`], and only that can be
//! substituted. There is no way back from a resolved document to resolution.

use crate::domain::config::RenderContext;
use crate::domain::template::assets::{render_asset_tags, AssetRef};
use crate::domain::template::inheritance::TemplateSet;
use crate::domain::template::messages::{render_message_html, render_messages, FlashMessage, MessageBlock};
use crate::domain::template::substitute::Substitutor;
use crate::shared::error::Result;
use regex::Regex;

const DIRECTIVE_PATTERN: &str = r"\{%\s*(assets|messages)\s*%\}";

pub struct PageComposer {
    templates: TemplateSet,
}

impl PageComposer {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn begin<'a>(
        &'a self,
        template: &str,
        messages: &'a [FlashMessage],
        ctx: &'a RenderContext,
    ) -> RenderPass<'a> {
        RenderPass {
            templates: &self.templates,
            template: template.to_string(),
            messages,
            ctx,
        }
    }

    /// Runs both phases. Nothing is returned unless both succeed.
    pub fn render(
        &self,
        template: &str,
        messages: &[FlashMessage],
        ctx: &RenderContext,
    ) -> Result<String> {
        self.begin(template, messages, ctx).resolve()?.substitute()
    }
}

/// Phase one input.
pub struct RenderPass<'a> {
    templates: &'a TemplateSet,
    template: String,
    messages: &'a [FlashMessage],
    ctx: &'a RenderContext,
}

impl<'a> RenderPass<'a> {
    /// Resolves blocks, builds the asset list and message blocks, and expands
    /// the `{% assets %}` and `{% messages %}` directives.
    pub fn resolve(self) -> Result<ResolvedDocument<'a>> {
        let resolved = self.templates.resolve(&self.template)?;
        let assets = resolved.assets.build(self.ctx);
        let messages = render_messages(self.messages, self.ctx.plugin_deprecation);

        let asset_html = render_asset_tags(&assets);
        let message_html = render_message_html(&messages);
        let directive_re = Regex::new(DIRECTIVE_PATTERN)?;
        let text = directive_re
            .replace_all(&resolved.document, |caps: &regex::Captures| match &caps[1] {
                "assets" => asset_html.clone(),
                _ => message_html.clone(),
            })
            .into_owned();

        tracing::debug!(
            template = %self.template,
            assets = assets.len(),
            messages = messages.len(),
            "template resolved"
        );

        Ok(ResolvedDocument {
            template: self.template,
            text,
            assets,
            messages,
            ctx: self.ctx,
        })
    }
}

/// Phase two input: fully composed text that still carries placeholders.
pub struct ResolvedDocument<'a> {
    template: String,
    text: String,
    assets: Vec<AssetRef>,
    messages: Vec<MessageBlock>,
    ctx: &'a RenderContext,
}

impl ResolvedDocument<'_> {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn assets(&self) -> &[AssetRef] {
        &self.assets
    }

    pub fn messages(&self) -> &[MessageBlock] {
        &self.messages
    }

    pub fn substitute(self) -> Result<String> {
        let output = Substitutor::new()?.substitute(&self.text, self.ctx)?;
        tracing::debug!(template = %self.template, bytes = output.len(), "template rendered");
        Ok(output)
    }
}
