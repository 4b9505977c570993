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

use crate::domain::template::html::escape_text;
use crate::infrastructure::constants::{
    MESSAGE_CATEGORY_INFO, MESSAGE_CATEGORY_WARNING, PLUGIN_DEPRECATION_MESSAGE,
};
use crate::shared::error::StencilError;
use serde::Deserialize;

/// A message queued by the application for the next page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlashMessage {
    pub category: String,
    pub text: String,
}

impl FlashMessage {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }
}

/// `category:text`, or bare text for an info message.
impl std::str::FromStr for FlashMessage {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, text) = match s.split_once(':') {
            Some((category, text))
                if !category.is_empty() && category.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                (category, text)
            }
            _ => (MESSAGE_CATEGORY_INFO, s),
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(StencilError::ConfigError(format!(
                "Empty flash message: '{}'",
                s
            )));
        }
        Ok(Self::new(category, text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    pub category: String,
    pub text: String,
    pub dismissible: bool,
}

impl MessageBlock {
    pub fn to_html(&self) -> String {
        let css_class = match self.category.as_str() {
            "error" => "danger",
            other => other,
        };
        let close = if self.dismissible {
            "<button type=\"button\" class=\"close\" data-dismiss=\"alert\">&times;</button>"
        } else {
            ""
        };
        format!(
            "<div class=\"alert alert-{}\" role=\"alert\">{}{}</div>",
            escape_text(css_class),
            close,
            escape_text(&self.text)
        )
    }
}

/// Standard messages first, in order; the plugin deprecation warning, when
/// requested, always comes last and cannot be dismissed.
pub fn render_messages(standard: &[FlashMessage], plugin_deprecation: bool) -> Vec<MessageBlock> {
    let mut blocks: Vec<MessageBlock> = standard
        .iter()
        .map(|m| MessageBlock {
            category: m.category.clone(),
            text: m.text.clone(),
            dismissible: true,
        })
        .collect();

    if plugin_deprecation {
        blocks.push(MessageBlock {
            category: MESSAGE_CATEGORY_WARNING.to_string(),
            text: PLUGIN_DEPRECATION_MESSAGE.to_string(),
            dismissible: false,
        });
    }

    blocks
}

pub fn render_message_html(blocks: &[MessageBlock]) -> String {
    blocks
        .iter()
        .map(MessageBlock::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> Vec<FlashMessage> {
        vec![
            FlashMessage::new("info", "DAG paused"),
            FlashMessage::new("error", "Import failed"),
        ]
    }

    #[test]
    fn test_no_deprecation_without_flag() {
        let blocks = render_messages(&standard(), false);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.text != PLUGIN_DEPRECATION_MESSAGE));
        assert!(blocks.iter().all(|b| b.dismissible));
    }

    #[test]
    fn test_deprecation_comes_last() {
        let blocks = render_messages(&standard(), true);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text, "DAG paused");
        assert_eq!(blocks[1].text, "Import failed");
        let last = blocks.last().unwrap();
        assert_eq!(last.text, PLUGIN_DEPRECATION_MESSAGE);
        assert_eq!(last.category, "warning");
        assert!(!last.dismissible);
        assert!(!last.to_html().contains("data-dismiss"));
    }

    #[test]
    fn test_html_maps_error_and_escapes() {
        let html = MessageBlock {
            category: "error".to_string(),
            text: "<script>{{ x }}</script>".to_string(),
            dismissible: true,
        }
        .to_html();
        assert!(html.starts_with("<div class=\"alert alert-danger\""));
        assert!(html.contains("&lt;script&gt;&#123;&#123; x &#125;&#125;"));
        assert!(html.contains("data-dismiss"));
    }

    #[test]
    fn test_parse_flash_message() {
        let msg: FlashMessage = "warning:Disk almost full".parse().unwrap();
        assert_eq!(msg, FlashMessage::new("warning", "Disk almost full"));

        let msg: FlashMessage = "Saved".parse().unwrap();
        assert_eq!(msg, FlashMessage::new("info", "Saved"));

        let msg: FlashMessage = "see http://host:8080".parse().unwrap();
        assert_eq!(msg.category, "info");
        assert_eq!(msg.text, "see http://host:8080");

        assert!("warning:  ".parse::<FlashMessage>().is_err());
    }
}
