//! Template rendering

use crate::parser::{resolve_key, value_to_string};
use crate::schema::{Node, Template};
use crate::Result;
use serde::Serialize;

impl Template {
    /// Render the template against a data dictionary
    ///
    /// Section semantics:
    /// - list: body rendered once per element, scoped to that element; empty list drops it
    /// - `true`: body rendered in the current scope
    /// - `false`, null or missing: block dropped
    ///
    /// Scalar values are HTML-escaped and never re-scanned for placeholders.
    pub fn render(&self, data: &serde_json::Value) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, data, &mut out);
        out
    }

    /// Serialize `data` to JSON and render against it
    pub fn render_serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(self.render(&value))
    }
}

fn render_nodes(nodes: &[Node], scope: &serde_json::Value, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable(key) => {
                if let Some(value) = resolve_key(key, scope) {
                    out.push_str(&escape_html(&value_to_string(value)));
                }
            }
            Node::Section { key, children } => {
                let Some(value) = resolve_key(key, scope) else {
                    continue;
                };
                match value {
                    serde_json::Value::Array(items) => {
                        for item in items {
                            render_nodes(children, item, out);
                        }
                    }
                    serde_json::Value::Object(o) if !o.is_empty() => render_nodes(children, value, out),
                    other if is_truthy(other) => render_nodes(children, scope, out),
                    _ => {}
                }
            }
        }
    }
}

/// Check if a JSON value is truthy
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Escape text for insertion into HTML text or a double-quoted attribute
///
/// Apostrophes are kept as is; placeholders never sit in single-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(source: &str, data: serde_json::Value) -> String {
        Template::parse(source).unwrap().render(&data)
    }

    #[test]
    fn test_scalar_substitution() {
        assert_eq!(
            render("<b>{{cliente}}</b> {{pnr}}", json!({ "cliente": "Mario Rossi", "pnr": "AB1234" })),
            "<b>Mario Rossi</b> AB1234"
        );
    }

    #[test]
    fn test_apostrophe_kept_verbatim() {
        assert_eq!(
            render("<td>{{cliente}}</td>", json!({ "cliente": "Dell'Orto" })),
            "<td>Dell'Orto</td>"
        );
        assert_eq!(escape_html(r#"<a href="x">D'Amico & co</a>"#), "&lt;a href=&quot;x&quot;&gt;D'Amico &amp; co&lt;/a&gt;");
    }

    #[test]
    fn test_unknown_key_renders_empty() {
        assert_eq!(render("[{{missing}}]", json!({})), "[]");
    }

    #[test]
    fn test_list_scoped_to_element() {
        let out = render(
            "{{#cuotas}}<tr>{{numero}}|{{cliente}}</tr>{{/cuotas}}",
            json!({
                "cliente": "outer",
                "cuotas": [{ "numero": "1" }, { "numero": "2" }]
            }),
        );
        // element scope only: outer keys are not visible inside a list item
        assert_eq!(out, "<tr>1|</tr><tr>2|</tr>");
    }

    #[test]
    fn test_empty_list_removes_block() {
        assert_eq!(
            render("a{{#cuotas}}<tr>{{numero}}</tr>{{/cuotas}}b", json!({ "cuotas": [] })),
            "ab"
        );
    }

    #[test]
    fn test_true_flag_keeps_body() {
        assert_eq!(
            render("{{#tieneCuotas}}<h2>Rate</h2>{{/tieneCuotas}}", json!({ "tieneCuotas": true })),
            "<h2>Rate</h2>"
        );
    }

    #[test]
    fn test_false_flag_removes_body() {
        assert_eq!(
            render(
                "x{{#tieneCuotas}}<h2>Rate</h2>{{/tieneCuotas}}y",
                json!({ "tieneCuotas": false })
            ),
            "xy"
        );
    }

    #[test]
    fn test_missing_flag_removes_body() {
        assert_eq!(render("x{{#flag}}body{{/flag}}y", json!({})), "xy");
    }

    #[test]
    fn test_flag_keeps_outer_scope() {
        assert_eq!(
            render("{{#flag}}{{cliente}}{{/flag}}", json!({ "flag": true, "cliente": "Giulia" })),
            "Giulia"
        );
    }

    #[test]
    fn test_nested_flag_inside_list() {
        let out = render(
            "{{#righe}}{{nome}}{{#pagato}}*{{/pagato}};{{/righe}}",
            json!({
                "righe": [
                    { "nome": "a", "pagato": true },
                    { "nome": "b", "pagato": false }
                ]
            }),
        );
        assert_eq!(out, "a*;b;");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render(
            "{{cliente}}|{{pnr}}",
            json!({ "cliente": "{{pnr}}", "pnr": "SECRET" }),
        );
        assert_eq!(out, "{{pnr}}|SECRET");
    }

    #[test]
    fn test_values_are_escaped() {
        assert_eq!(
            render("{{cliente}}", json!({ "cliente": "<script>&\"'" })),
            "&lt;script&gt;&amp;&quot;'"
        );
    }

    #[test]
    fn test_list_of_strings_with_dot() {
        assert_eq!(
            render("{{#tappe}}[{{.}}]{{/tappe}}", json!({ "tappe": ["Roma", "Parigi"] })),
            "[Roma][Parigi]"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let template = Template::parse("{{a}}{{#l}}{{b}}{{/l}}").unwrap();
        let data = json!({ "a": "1", "l": [{ "b": "2" }, { "b": "3" }] });
        assert_eq!(template.render(&data), template.render(&data));
    }

    #[test]
    fn test_render_serialize() {
        #[derive(Serialize)]
        struct Data {
            cliente: String,
        }
        let template = Template::parse("{{cliente}}").unwrap();
        let out = template
            .render_serialize(&Data {
                cliente: "Mario".to_string(),
            })
            .unwrap();
        assert_eq!(out, "Mario");
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("hello")));
    }
}
