//! Findings returned by the vision backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text snippets, labels and web entities extracted from an image.
///
/// Only key presence is checked: each field holds whatever JSON the
/// backend sent (normally a list, but `null`, a bare string or an object
/// are passed through too). A missing key reads as an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    #[serde(default = "empty_list")]
    pub text: Value,
    #[serde(default = "empty_list")]
    pub labels: Value,
    #[serde(default = "empty_list")]
    pub web_entities: Value,
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

impl Default for Findings {
    fn default() -> Self {
        Self {
            text: empty_list(),
            labels: empty_list(),
            web_entities: empty_list(),
        }
    }
}

impl Findings {
    /// Render as the context block sent alongside the image.
    ///
    /// Lists read like `['ORGANIC', "Ben's"]`, matching the findings a user
    /// passes on the command line.
    pub fn to_prompt(&self) -> String {
        format!(
            "Extracted text: {}\nLabels: {}\nWeb info: {}",
            render(&self.text),
            render(&self.labels),
            render(&self.web_entities)
        )
    }
}

/// Number of entries in a findings field, for logging.
pub(crate) fn entry_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Null => 0,
        _ => 1,
    }
}

// A top-level string is inserted bare; everything else uses literal notation.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => literal(other),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), literal(v)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

/// Single quotes unless the text holds a `'` and no `"`.
fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PLACEHOLDER_FINDINGS;
    use serde_json::json;

    #[test]
    fn missing_keys_default_to_empty_lists() {
        let f: Findings = serde_json::from_value(json!({"labels": ["Bottle"]})).unwrap();
        assert_eq!(f.text, json!([]));
        assert_eq!(f.web_entities, json!([]));
        assert_eq!(f.to_prompt(), "Extracted text: []\nLabels: ['Bottle']\nWeb info: []");
    }

    #[test]
    fn placeholder_has_the_same_shape_as_rendered_findings() {
        let f = Findings {
            labels: json!(["Product", "Package", "Container"]),
            ..Findings::default()
        };
        assert_eq!(f.to_prompt(), PLACEHOLDER_FINDINGS);
    }

    #[test]
    fn null_and_scalar_fields_are_kept() {
        let f: Findings = serde_json::from_str(
            r#"{"text": null, "labels": "ORGANIC", "web_entities": 3}"#,
        )
        .unwrap();
        assert_eq!(f.to_prompt(), "Extracted text: None\nLabels: ORGANIC\nWeb info: 3");
        assert_eq!(entry_count(&f.text), 0);
        assert_eq!(entry_count(&f.labels), 1);
    }

    #[test]
    fn nested_values_use_literal_notation() {
        let f = Findings {
            text: json!(["ORGANIC", "500 g", null, true]),
            web_entities: json!([{"description": "Oat milk", "score": 0.9}]),
            ..Findings::default()
        };
        assert_eq!(
            f.to_prompt(),
            "Extracted text: ['ORGANIC', '500 g', None, True]\nLabels: []\n\
             Web info: [{'description': 'Oat milk', 'score': 0.9}]"
        );
    }

    #[test]
    fn quotes_switch_for_apostrophes() {
        assert_eq!(quote("Ben's"), "\"Ben's\"");
        assert_eq!(quote("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote("it's \"x\""), "'it\\'s \"x\"'");
        assert_eq!(quote("a\\b\nc"), "'a\\\\b\\nc'");

        let f = Findings {
            labels: json!(["Ben's", "Ice cream"]),
            ..Findings::default()
        };
        assert_eq!(f.to_prompt(), "Extracted text: []\nLabels: [\"Ben's\", 'Ice cream']\nWeb info: []");
    }
}
