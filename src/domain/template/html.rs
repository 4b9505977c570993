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

/// Escapes text content. Braces are escaped too so injected text can never
/// form a placeholder.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a double-quoted attribute value, leaving braces intact so
/// authored placeholders in URLs still substitute.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_neutralizes_placeholders() {
        assert_eq!(
            escape_text("<b>{{ secret }}</b>"),
            "&lt;b&gt;&#123;&#123; secret &#125;&#125;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_attr_keeps_braces() {
        assert_eq!(
            escape_attr("{{ static_url }}/a.css?x=1&y=\"2\""),
            "{{ static_url }}/a.css?x=1&amp;y=&quot;2&quot;"
        );
    }
}
