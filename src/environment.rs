//! Variable bindings for one document parse.

use std::collections::HashMap;

use crate::ast::Node;

/// One flat, order-sensitive scope per document. A definition overwrites any
/// previous binding of the same name, so a reference resolves to whatever
/// was bound most recently before it in the source.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Node>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` (including its `$` sigil) to a parsed value list,
    /// shadowing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, values: Node) {
        self.bindings.insert(name.into(), values);
    }

    /// The current binding for `name`. An undefined name has no default
    /// value; the caller surfaces it as a parse failure.
    pub fn resolve(&self, name: &str) -> Option<&Node> {
        self.bindings.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Node, NodeKind};

    fn values(texts: &[&str]) -> Node {
        let mut node = Node::new(NodeKind::Values, 1);
        for t in texts {
            node.push(Node::new(NodeKind::Value(t.to_string()), 1));
        }
        node
    }

    #[test]
    fn redefinition_shadows() {
        let mut env = Environment::new();
        env.define("$x", values(&["1px"]));
        env.define("$x", values(&["2px"]));
        let bound = env.resolve("$x").unwrap();
        assert_eq!(bound.children[0].text(), Some("2px"));
    }

    #[test]
    fn undefined_is_none() {
        let env = Environment::new();
        assert!(env.resolve("$missing").is_none());
    }
}
