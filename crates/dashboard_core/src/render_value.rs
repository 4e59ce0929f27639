//! Schema-less rendering of arbitrary JSON values.
//!
//! `custom_attributes` and scraped `Product Information` have no fixed shape,
//! so they go through [`render_value`], which maps every JSON variant onto a
//! [`RenderedValue`] tree. The tree is plain data: renderers decide how to lay
//! it out, and [`RenderedValue::to_lines`] gives the default indented text.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedValue {
    Null,
    Bool(bool),
    Number(String),
    Text(String),
    EmptyList,
    EmptyObject,
    List(Vec<RenderedValue>),
    /// Object fields in insertion order.
    Fields(Vec<(String, RenderedValue)>),
}

pub fn render_value(value: &Value) -> RenderedValue {
    match value {
        Value::Null => RenderedValue::Null,
        Value::Bool(b) => RenderedValue::Bool(*b),
        Value::Number(n) => RenderedValue::Number(n.to_string()),
        Value::String(s) => RenderedValue::Text(s.clone()),
        Value::Array(items) if items.is_empty() => RenderedValue::EmptyList,
        Value::Array(items) => RenderedValue::List(items.iter().map(render_value).collect()),
        Value::Object(map) if map.is_empty() => RenderedValue::EmptyObject,
        Value::Object(map) => RenderedValue::Fields(
            map.iter()
                .map(|(key, value)| (key.clone(), render_value(value)))
                .collect(),
        ),
    }
}

/// Renders each entry of an object, keeping insertion order.
pub fn render_fields<'a>(
    entries: impl IntoIterator<Item = (&'a String, &'a Value)>,
) -> Vec<(String, RenderedValue)> {
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), render_value(value)))
        .collect()
}

impl RenderedValue {
    /// True for values that fit on one line.
    pub fn is_inline(&self) -> bool {
        match self {
            RenderedValue::List(items) => items.iter().all(RenderedValue::is_scalar),
            RenderedValue::Fields(_) => false,
            _ => true,
        }
    }

    fn is_scalar(&self) -> bool {
        !matches!(self, RenderedValue::List(_) | RenderedValue::Fields(_))
    }

    /// Indented text lines, two spaces per nesting level.
    pub fn to_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.write_lines(0, &mut out);
        out
    }

    fn write_lines(&self, indent: usize, out: &mut Vec<String>) {
        let pad = "  ".repeat(indent);
        match self {
            RenderedValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    match item {
                        RenderedValue::Fields(_) => {
                            out.push(format!("{pad}[{index}]:"));
                            item.write_lines(indent + 1, out);
                        }
                        RenderedValue::List(_) if !item.is_inline() => {
                            out.push(format!("{pad}[{index}]:"));
                            item.write_lines(indent + 1, out);
                        }
                        _ => out.push(format!("{pad}• {item}")),
                    }
                }
            }
            RenderedValue::Fields(fields) => {
                for (key, value) in fields {
                    if value.is_inline() {
                        out.push(format!("{pad}{key}: {value}"));
                    } else {
                        out.push(format!("{pad}{key}:"));
                        value.write_lines(indent + 1, out);
                    }
                }
            }
            scalar => out.push(format!("{pad}{scalar}")),
        }
    }
}

impl fmt::Display for RenderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedValue::Null => f.write_str("null"),
            RenderedValue::Bool(true) => f.write_str("Yes"),
            RenderedValue::Bool(false) => f.write_str("No"),
            RenderedValue::Number(n) => f.write_str(n),
            RenderedValue::Text(s) => f.write_str(s),
            RenderedValue::EmptyList => f.write_str("Empty array"),
            RenderedValue::EmptyObject => f.write_str("Empty object"),
            RenderedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            RenderedValue::Fields(fields) => write!(f, "{{{} fields}}", fields.len()),
        }
    }
}

/// Whether a scraped string looks like a direct link to an image.
pub fn is_image_url(candidate: &str) -> bool {
    const EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp"];
    if !(candidate.starts_with("http://") || candidate.starts_with("https://")) {
        return false;
    }
    let lower = candidate.to_ascii_lowercase();
    EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalars_render_distinctly() {
        assert_eq!(render_value(&json!(null)).to_string(), "null");
        assert_eq!(render_value(&json!("")).to_string(), "");
        assert_eq!(render_value(&json!(true)).to_string(), "Yes");
        assert_eq!(render_value(&json!(false)).to_string(), "No");
        assert_eq!(render_value(&json!(12.5)).to_string(), "12.5");
        assert_eq!(render_value(&json!([])), RenderedValue::EmptyList);
        assert_eq!(render_value(&json!({})), RenderedValue::EmptyObject);
        assert_ne!(render_value(&json!(null)), render_value(&json!("")));
    }

    #[test]
    fn nested_objects_keep_insertion_order() {
        let value = json!({
            "zeta": 1,
            "alpha": {"inner": false, "list": ["a", "b"]},
            "items": [{"k": "v"}, "plain", [1, 2]],
            "none": []
        });
        assert_eq!(
            render_value(&value).to_lines(),
            vec![
                "zeta: 1",
                "alpha:",
                "  inner: No",
                "  list: [a, b]",
                "items:",
                "  [0]:",
                "    k: v",
                "  • plain",
                "  • [1, 2]",
                "none: Empty array",
            ]
        );
    }

    #[test]
    fn image_urls_need_scheme_and_extension() {
        assert!(is_image_url("https://cdn.example.com/a/B.JPG?w=200"));
        assert!(!is_image_url("cdn.example.com/a.png"));
        assert!(!is_image_url("https://example.com/product"));
    }
}
