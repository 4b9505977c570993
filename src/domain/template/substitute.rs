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

//! Placeholder substitution
//!
//! A placeholder is `{{ key }}` or `{{ key | default("text") }}` where `key`
//! is a dotted identifier. Any other brace text is copied through untouched.

use crate::domain::config::RenderContext;
use crate::shared::error::{Result, StencilError};
use regex::Regex;

const PLACEHOLDER_PATTERN: &str = r#"\{\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*(?:\|\s*default\(\s*"([^"]*)"\s*\)\s*)?\}\}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub key: String,
    pub default: Option<String>,
}

pub struct Substitutor {
    pattern: Regex,
}

impl Substitutor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(PLACEHOLDER_PATTERN)?,
        })
    }

    /// Placeholders in document order, duplicates included.
    pub fn placeholders(&self, document: &str) -> Vec<Placeholder> {
        self.pattern
            .captures_iter(document)
            .map(|caps| Placeholder {
                key: caps[1].to_string(),
                default: caps.get(2).map(|m| m.as_str().to_string()),
            })
            .collect()
    }

    /// Replaces every placeholder. Stops at the first key that is neither in
    /// the context nor given a default. Inserted values are not re-scanned.
    pub fn substitute(&self, document: &str, ctx: &RenderContext) -> Result<String> {
        let mut output = String::with_capacity(document.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(document) {
            let Some(whole) = caps.get(0) else { continue };
            let key = &caps[1];

            output.push_str(&document[last..whole.start()]);
            match (ctx.lookup(key), caps.get(2)) {
                (Some(value), _) => output.push_str(&value),
                (None, Some(default)) => output.push_str(default.as_str()),
                (None, None) => return Err(StencilError::missing_context_key(key)),
            }
            last = whole.end();
        }

        output.push_str(&document[last..]);
        Ok(output)
    }
}

pub fn substitute(document: &str, ctx: &RenderContext) -> Result<String> {
    Substitutor::new()?.substitute(document, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_known_keys() {
        let ctx = RenderContext::new()
            .with_hostname("web-0")
            .with_var("site.title", "Airflow");
        let out = substitute("<title>{{ site.title }}</title> on {{hostname}}", &ctx).unwrap();
        assert_eq!(out, "<title>Airflow</title> on web-0");
    }

    #[test]
    fn test_default_used_only_when_missing() {
        let ctx = RenderContext::new().with_app_version("2.9.0");
        let out = substitute(
            r#"{{ app_version | default("dev") }} {{ custom_theme | default("none") }}"#,
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "2.9.0 none");
    }

    #[test]
    fn test_missing_key_reports_first_placeholder() {
        let ctx = RenderContext::new();
        let err = substitute("{{ hostname }} {{ other }}", &ctx).unwrap_err();
        match err {
            StencilError::MissingContextKey { key } => assert_eq!(key, "hostname"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_placeholder_braces_untouched() {
        let ctx = RenderContext::new();
        let doc = "function f() { return {a: 1}; } {{ 1 + 2 }} {{}} { hostname }";
        assert_eq!(substitute(doc, &ctx).unwrap(), doc);
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let ctx = RenderContext::new().with_var("a", "{{ b }}");
        assert_eq!(substitute("{{ a }}", &ctx).unwrap(), "{{ b }}");
    }

    #[test]
    fn test_lists_placeholders() {
        let s = Substitutor::new().unwrap();
        let found = s.placeholders(r#"{{ a }} {{ flags.x | default("false") }}"#);
        assert_eq!(
            found,
            vec![
                Placeholder {
                    key: "a".to_string(),
                    default: None
                },
                Placeholder {
                    key: "flags.x".to_string(),
                    default: Some("false".to_string())
                },
            ]
        );
    }
}
