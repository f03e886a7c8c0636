//! CSS output in the nested style.
//!
//! Nested rulesets are flattened onto their ancestor selectors with the
//! descendant combinator (cartesian over comma groups), declarations print
//! two-space indented, and the closing brace shares the last declaration's
//! line:
//!
//! `a { b { color: blue; } }` compiles to `a b {\n  color: blue; }\n`.

use crate::ast::{Node, NodeKind};

/// Compile parsed top-level statements to CSS text.
pub fn emit_css(statements: &[Node]) -> String {
    let mut out = String::new();
    for node in statements {
        match &node.kind {
            NodeKind::Comment(text) => {
                out.push_str(text);
                out.push('\n');
            }
            NodeKind::Ruleset => emit_ruleset(node, &[], &mut out),
            _ => {}
        }
    }
    out
}

fn emit_ruleset(ruleset: &Node, ancestors: &[String], out: &mut String) {
    let [group, block] = ruleset.children.as_slice() else {
        return;
    };
    let NodeKind::Block {
        has_rules_or_comments,
        has_rulesets,
    } = block.kind
    else {
        return;
    };

    let selectors = combined_selectors(group, ancestors);

    if has_rules_or_comments {
        out.push_str(&selectors.join(", "));
        out.push_str(" {");
        let lines: Vec<String> = block
            .children
            .iter()
            .filter_map(|child| match &child.kind {
                NodeKind::Rule => Some(declaration_text(child)),
                NodeKind::Comment(text) => Some(text.clone()),
                _ => None,
            })
            .collect();
        for (i, line) in lines.iter().enumerate() {
            out.push('\n');
            out.push_str("  ");
            out.push_str(line);
            if i + 1 == lines.len() {
                out.push_str(" }");
            }
        }
        out.push('\n');
    }

    if has_rulesets {
        for child in &block.children {
            if child.is_ruleset() {
                emit_ruleset(child, &selectors, out);
            }
        }
    }
}

fn declaration_text(rule: &Node) -> String {
    let [prop, values] = rule.children.as_slice() else {
        return String::new();
    };
    let NodeKind::Property(name) = &prop.kind else {
        return String::new();
    };
    let value_text = values
        .children
        .iter()
        .filter_map(Node::text)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}: {};", name, value_text)
}

// Each ancestor selector is combined with each selector in the group via
// the descendant relationship; at the top level the group stands alone.
fn combined_selectors(group: &Node, ancestors: &[String]) -> Vec<String> {
    let own: Vec<String> = group.children.iter().map(selector_text).collect();
    if ancestors.is_empty() {
        return own;
    }
    let mut combined = Vec::with_capacity(ancestors.len() * own.len());
    for parent in ancestors {
        for child in &own {
            combined.push(format!("{} {}", parent, child));
        }
    }
    combined
}

/// Reconstruct the source text of one selector from its sequence and
/// combinator children.
pub fn selector_text(selector: &Node) -> String {
    let mut text = String::new();
    for child in &selector.children {
        match &child.kind {
            NodeKind::SelectorCombinator(c) if c == " " => text.push(' '),
            NodeKind::SelectorCombinator(c) => {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(c);
                text.push(' ');
            }
            NodeKind::SimpleSelectorSequence => text.push_str(&sequence_text(child)),
            _ => {}
        }
    }
    text
}

fn sequence_text(sequence: &Node) -> String {
    let mut text = String::new();
    for child in &sequence.children {
        match &child.kind {
            NodeKind::SimpleSelector(s) => text.push_str(s),
            NodeKind::AttributeSelector => {
                text.push('[');
                for part in &child.children {
                    if let Some(s) = part.text() {
                        text.push_str(s);
                    }
                }
                text.push(']');
            }
            _ => {}
        }
    }
    text
}
