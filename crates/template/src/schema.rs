//! Template node tree

use std::collections::BTreeSet;

/// A parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text copied to the output unchanged
    Text(String),
    /// `{{key}}` scalar placeholder
    Variable(String),
    /// `{{#key}}...{{/key}}` block, repeated for lists or kept/dropped for booleans
    Section { key: String, children: Vec<Node> },
}

/// A parsed template, ready to be rendered any number of times
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
}

impl Template {
    /// Parse template source into a node tree
    pub fn parse(source: &str) -> crate::Result<Self> {
        crate::parser::parse_template(source)
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every key referenced anywhere in the template, sections included
    pub fn keys(&self) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        collect_keys(&self.nodes, &mut keys);
        keys
    }

    /// Rename every reference to `from` (variables and sections) to `to`
    ///
    /// Returns the number of references rewritten.
    pub fn rename_key(&mut self, from: &str, to: &str) -> usize {
        rename_in(&mut self.nodes, from, to)
    }
}

fn collect_keys<'a>(nodes: &'a [Node], keys: &mut BTreeSet<&'a str>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Variable(key) => {
                keys.insert(key);
            }
            Node::Section { key, children } => {
                keys.insert(key);
                collect_keys(children, keys);
            }
        }
    }
}

fn rename_in(nodes: &mut [Node], from: &str, to: &str) -> usize {
    let mut count = 0;
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Variable(key) => {
                if key == from {
                    *key = to.to_string();
                    count += 1;
                }
            }
            Node::Section { key, children } => {
                if key == from {
                    *key = to.to_string();
                    count += 1;
                }
                count += rename_in(children, from, to);
            }
        }
    }
    count
}
