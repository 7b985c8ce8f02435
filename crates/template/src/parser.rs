//! Template source parsing

use crate::{Node, Result, Template, TemplateError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Parse template source into a node tree
///
/// Recognised tags:
/// - `{{key}}` - scalar placeholder
/// - `{{#key}}` - opens a section
/// - `{{/key}}` - closes the innermost open section, which must have the same key
///
/// Whitespace inside the braces is ignored, so `{{ cliente }}` equals `{{cliente}}`.
/// Sections nest by stack: each close tag pairs with the nearest unclosed open tag.
pub fn parse_template(source: &str) -> Result<Template> {
    // Open sections: (key, byte offset of the open tag, nodes collected before it)
    let mut stack: Vec<(String, usize, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find(OPEN) {
        let open = pos + found;
        push_text(&mut current, &source[pos..open]);

        let inner_start = open + OPEN.len();
        let close = source[inner_start..]
            .find(CLOSE)
            .map(|i| inner_start + i)
            .ok_or(TemplateError::UnterminatedTag(open))?;
        let tag = source[inner_start..close].trim();
        pos = close + CLOSE.len();

        if let Some(name) = tag.strip_prefix('#') {
            let key = tag_name(name, open)?;
            stack.push((key, open, std::mem::take(&mut current)));
        } else if let Some(name) = tag.strip_prefix('/') {
            let found = tag_name(name, open)?;
            let (key, _, parent) = stack.pop().ok_or_else(|| TemplateError::UnexpectedClose {
                key: found.clone(),
                offset: open,
            })?;
            if key != found {
                return Err(TemplateError::MismatchedClose {
                    expected: key,
                    found,
                    offset: open,
                });
            }
            let children = std::mem::replace(&mut current, parent);
            current.push(Node::Section { key, children });
        } else {
            current.push(Node::Variable(tag_name(tag, open)?));
        }
    }
    push_text(&mut current, &source[pos..]);

    if let Some((key, offset, _)) = stack.pop() {
        return Err(TemplateError::UnclosedSection { key, offset });
    }

    Ok(Template { nodes: current })
}

fn tag_name(raw: &str, offset: usize) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyTag(offset));
    }
    Ok(name.to_string())
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    // Merge with a preceding text node so the tree stays compact
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// Resolve a key against a scope
///
/// Supports:
/// - `field` - field of the scope object
/// - `object.field` - nested field
/// - `.` - the scope itself (useful for lists of plain strings)
pub fn resolve_key<'a>(key: &str, scope: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
    if key == "." {
        return Some(scope);
    }

    let mut current = scope;
    for segment in key.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Convert a JSON value to the string inserted into the output
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => String::new(),
    }
}
