//! Syntax tree for parsed stylesheets.
//!
//! Nodes are built bottom-up during the single parse pass and never mutated
//! afterward. Child order is significant: a ruleset is always
//! `[selector group, block]`, a declaration is `[property, values]`.

use serde::{Deserialize, Serialize};

/// One node in the stylesheet AST, carrying its source line for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub line: usize,
    pub children: Vec<Node>,
}

/// The closed set of node variants. Leaf variants carry the text captured
/// from the source; `Block` records whether its children include
/// declarations/comments and/or nested rulesets, since CSS block semantics
/// differ between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Comment(String),
    Ruleset,
    SelectorGroup,
    Selector,
    SelectorCombinator(String),
    SimpleSelectorSequence,
    SimpleSelector(String),
    AttributeSelector,
    Block {
        has_rules_or_comments: bool,
        has_rulesets: bool,
    },
    Rule,
    Property(String),
    Value(String),
    Values,
}

impl Node {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::new(),
        }
    }

    /// Construct with a capacity hint when the child count is known up front.
    pub fn with_capacity(kind: NodeKind, line: usize, capacity: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::with_capacity(capacity),
        }
    }

    /// Append a child, preserving source order.
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// The captured text of a leaf node, if this variant carries one.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Comment(s)
            | NodeKind::SelectorCombinator(s)
            | NodeKind::SimpleSelector(s)
            | NodeKind::Property(s)
            | NodeKind::Value(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_ruleset(&self) -> bool {
        matches!(self.kind, NodeKind::Ruleset)
    }

    pub fn is_rule(&self) -> bool {
        matches!(self.kind, NodeKind::Rule)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, NodeKind::Comment(_))
    }
}
