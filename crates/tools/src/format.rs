//! Bounded serialization of tool payloads.
//!
//! The consumer is a language-model context window, not a terminal: output
//! over the ceiling is cut and labeled, never an error.

use serde_json::Value;

use gangway_config::FormatConfig;

/// Output shape for read tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Markdown,
    Json,
}

impl Format {
    /// Read `response_format` from tool params; anything unrecognized falls
    /// back to markdown, matching the tools' declared default.
    #[must_use]
    pub fn from_params(params: &Value) -> Self {
        match params.get("response_format").and_then(Value::as_str) {
            Some("json") => Self::Json,
            _ => Self::Markdown,
        }
    }
}

/// Serializes payloads and enforces the character ceiling.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    max_chars: usize,
}

impl ResponseFormatter {
    #[must_use]
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    #[must_use]
    pub fn from_config(cfg: &FormatConfig) -> Self {
        Self::new(cfg.max_chars)
    }

    /// Fixed suffix appended when output is cut.
    #[must_use]
    pub fn truncation_suffix(&self) -> String {
        format!(
            "\n\n[Response truncated at {} characters. \
             Use filters or pagination to get more specific results.]",
            self.max_chars
        )
    }

    /// Render `data` in the requested format, then enforce the ceiling.
    #[must_use]
    pub fn format(&self, data: &Value, format: Format) -> String {
        let rendered = match format {
            Format::Json => {
                serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
            },
            Format::Markdown => value_to_markdown(data),
        };
        self.truncate(rendered)
    }

    /// Cut at the character boundary and label the loss. The ceiling counts
    /// characters, not bytes, so multi-byte content can never be split
    /// mid-scalar.
    fn truncate(&self, rendered: String) -> String {
        if rendered.chars().count() <= self.max_chars {
            return rendered;
        }
        let mut out: String = rendered.chars().take(self.max_chars).collect();
        out.push_str(&self.truncation_suffix());
        out
    }
}

// ── Markdown rendering ───────────────────────────────────────────────────────

fn value_to_markdown(value: &Value) -> String {
    match value {
        Value::Object(map) => object_to_markdown(map, 0),
        Value::Array(items) => array_to_markdown(items),
        other => scalar_to_string(other),
    }
}

/// Objects become bolded `key:` lines, nested two spaces per depth.
fn object_to_markdown(map: &serde_json::Map<String, Value>, level: usize) -> String {
    let indent = "  ".repeat(level);
    let mut lines = Vec::new();

    for (key, value) in map {
        match value {
            Value::Object(nested) => {
                lines.push(format!("{indent}**{key}:**"));
                lines.push(object_to_markdown(nested, level + 1));
            },
            Value::Array(items) => {
                lines.push(format!("{indent}**{key}:**"));
                if items.first().is_some_and(Value::is_object) {
                    for (i, item) in items.iter().enumerate() {
                        lines.push(format!("{indent}  {}.", i + 1));
                        if let Value::Object(nested) = item {
                            lines.push(object_to_markdown(nested, level + 2));
                        }
                    }
                } else {
                    for item in items {
                        lines.push(format!("{indent}  - {}", scalar_to_string(item)));
                    }
                }
            },
            scalar => lines.push(format!("{indent}**{key}:** {}", scalar_to_string(scalar))),
        }
    }

    lines.join("\n")
}

/// Top-level arrays of objects become numbered sections; scalar arrays
/// become bullet lists.
fn array_to_markdown(items: &[Value]) -> String {
    if items.is_empty() {
        return "No items found.".to_string();
    }

    if items.first().is_some_and(Value::is_object) {
        let mut lines = Vec::new();
        for (i, item) in items.iter().enumerate() {
            lines.push(format!("\n### Item {}", i + 1));
            match item {
                Value::Object(map) => lines.push(object_to_markdown(map, 0)),
                other => lines.push(scalar_to_string(other)),
            }
        }
        lines.join("\n")
    } else {
        items
            .iter()
            .map(|item| format!("- {}", scalar_to_string(item)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strings render bare; everything else uses its JSON spelling.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn markdown_nests_objects_and_numbers_object_lists() {
        let formatter = ResponseFormatter::new(25_000);
        let data = json!({
            "chat": {
                "jid": "123@g.us",
                "name": "Compiler Club",
            },
            "members": [
                {"name": "Ada"},
                {"name": "Grace"},
            ],
            "topics": ["linkers", "parsers"],
        });

        let out = formatter.format(&data, Format::Markdown);
        assert!(out.contains("**chat:**"));
        assert!(out.contains("  **jid:** 123@g.us"));
        assert!(out.contains("  1."));
        assert!(out.contains("    **name:** Ada"));
        assert!(out.contains("  - linkers"));
    }

    #[test]
    fn markdown_top_level_list_gets_item_sections() {
        let formatter = ResponseFormatter::new(25_000);
        let out = formatter.format(
            &json!([{"jid": "a@s.whatsapp.net"}, {"jid": "b@s.whatsapp.net"}]),
            Format::Markdown,
        );
        assert!(out.contains("### Item 1"));
        assert!(out.contains("### Item 2"));

        let empty = formatter.format(&json!([]), Format::Markdown);
        assert_eq!(empty, "No items found.");
    }

    #[test]
    fn json_mode_is_pretty_printed() {
        let formatter = ResponseFormatter::new(25_000);
        let out = formatter.format(&json!({"a": 1}), Format::Json);
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn over_ceiling_output_is_cut_to_exactly_ceiling_plus_suffix() {
        let formatter = ResponseFormatter::new(100);
        let long = "x".repeat(500);
        let out = formatter.format(&json!(long), Format::Markdown);

        let suffix = formatter.truncation_suffix();
        assert!(out.ends_with(&suffix));
        assert_eq!(out.chars().count(), 100 + suffix.chars().count());
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let formatter = ResponseFormatter::new(10);
        let long = "█".repeat(50);
        let out = formatter.format(&json!(long), Format::Markdown);
        // No panic, and the visible content is exactly ten blocks.
        assert!(out.starts_with(&"█".repeat(10)));
        assert!(!out.starts_with(&"█".repeat(11)));
    }

    #[test]
    fn under_ceiling_output_is_untouched() {
        let formatter = ResponseFormatter::new(25_000);
        let out = formatter.format(&json!({"ok": true}), Format::Markdown);
        assert_eq!(out, "**ok:** true");
    }

    #[test]
    fn format_param_parsing_defaults_to_markdown() {
        assert_eq!(Format::from_params(&json!({})), Format::Markdown);
        assert_eq!(
            Format::from_params(&json!({"response_format": "json"})),
            Format::Json
        );
        assert_eq!(
            Format::from_params(&json!({"response_format": "yaml"})),
            Format::Markdown
        );
    }
}
