//! Recursive-descent parser for the stylesheet grammar.
//!
//! One [`Document`] owns all mutable parse state: the cursor (position, line
//! counter, last matched token), the variable environment, and the top-level
//! statements it produces. Nothing is process-wide, so independent documents
//! can be parsed in parallel.
//!
//! The one place the grammar is not LL(1) is inside a block, where an
//! identifier can begin either a declaration (`prop: value;`) or a nested
//! ruleset (`selector { ... }`). [`look_for_rule`] settles this with a pure,
//! non-consuming scan before the real parse commits to either branch.

use miette::SourceSpan;

use crate::ast::{Node, NodeKind};
use crate::environment::Environment;
use crate::errors::{ParseError, Result};
use crate::matcher::{self, Matcher, Token};

const COMBINATORS: [Matcher; 3] = [
    Matcher::Exactly('+'),
    Matcher::Exactly('~'),
    Matcher::Exactly('>'),
];

const VALUE_ATOMS: [Matcher; 7] = [
    Matcher::Identifier,
    Matcher::Dimension,
    Matcher::Percentage,
    Matcher::Number,
    Matcher::HexColor,
    Matcher::StringConstant,
    Matcher::Variable,
];

const MATCH_OPS: [Matcher; 6] = [
    Matcher::ExactMatch,
    Matcher::ClassMatch,
    Matcher::DashMatch,
    Matcher::PrefixMatch,
    Matcher::SuffixMatch,
    Matcher::SubstringMatch,
];

/// Parse a complete stylesheet into its top-level statements.
pub fn parse(source: &str) -> Result<Document<'_>> {
    let mut doc = Document::new(source);
    doc.parse_document()?;
    Ok(doc)
}

/// One parse of one input buffer.
#[derive(Debug)]
pub struct Document<'src> {
    cursor: Cursor<'src>,
    env: Environment,
    statements: Vec<Node>,
}

impl<'src> Document<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            env: Environment::new(),
            statements: Vec::new(),
        }
    }

    /// The ordered top-level statements (rulesets and comments).
    pub fn statements(&self) -> &[Node] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Node> {
        self.statements
    }

    pub fn source(&self) -> &'src str {
        self.cursor.src
    }

    // document := WS ( comment | vardef ';'? | ruleset )* WS
    fn parse_document(&mut self) -> Result<()> {
        self.cursor.consume(Matcher::OptionalSpaces);
        while !self.cursor.at_end() {
            if self.cursor.consume(Matcher::BlockComment) {
                let comment = NodeKind::Comment(self.cursor.last_text().to_string());
                self.statements.push(Node::new(comment, self.cursor.line));
            } else if self.cursor.consume(Matcher::Variable) {
                self.parse_var_def()?;
                self.cursor.consume(Matcher::Exactly(';'));
            } else {
                let ruleset = self.parse_ruleset()?;
                self.statements.push(ruleset);
            }
            self.cursor.consume(Matcher::OptionalSpaces);
        }
        Ok(())
    }

    // The variable token itself has already been consumed.
    fn parse_var_def(&mut self) -> Result<()> {
        let name = self.cursor.last_text().to_string();
        self.expect(Matcher::Exactly(':'), "`:` after the variable name")?;
        let values = self.parse_values()?;
        if values.children.is_empty() {
            return Err(self.syntax_error("at least one value after `:`"));
        }
        self.env.define(name, values);
        Ok(())
    }

    fn parse_ruleset(&mut self) -> Result<Node> {
        let mut ruleset = Node::with_capacity(NodeKind::Ruleset, self.cursor.line, 2);
        ruleset.push(self.parse_selector_group()?);
        ruleset.push(self.parse_block()?);
        Ok(ruleset)
    }

    fn parse_selector_group(&mut self) -> Result<Node> {
        let mut group = Node::with_capacity(NodeKind::SelectorGroup, self.cursor.line, 1);
        group.push(self.parse_selector()?);
        while self.cursor.consume(Matcher::Exactly(',')) {
            group.push(self.parse_selector()?);
        }
        Ok(group)
    }

    fn parse_selector(&mut self) -> Result<Node> {
        let mut selector = Node::with_capacity(NodeKind::Selector, self.cursor.line, 1);
        if self.cursor.consume_any(&COMBINATORS) {
            selector.push(self.combinator_node(self.cursor.last_text()));
        }
        selector.push(self.parse_simple_selector_sequence()?);
        loop {
            if self.cursor.consume_any(&COMBINATORS) {
                selector.push(self.combinator_node(self.cursor.last_text()));
            } else if self.cursor.consume(Matcher::AncestorOf) {
                // descendant gap, normalized to a single space
                selector.push(self.combinator_node(" "));
            } else {
                break;
            }
            selector.push(self.parse_simple_selector_sequence()?);
        }
        Ok(selector)
    }

    fn combinator_node(&self, text: &str) -> Node {
        Node::new(
            NodeKind::SelectorCombinator(text.to_string()),
            self.cursor.line,
        )
    }

    fn parse_simple_selector_sequence(&mut self) -> Result<Node> {
        let mut sequence =
            Node::with_capacity(NodeKind::SimpleSelectorSequence, self.cursor.line, 1);
        if self
            .cursor
            .consume_any(&[Matcher::TypeSelector, Matcher::Universal])
        {
            sequence.push(Node::new(
                NodeKind::SimpleSelector(self.cursor.last_text().to_string()),
                self.cursor.line,
            ));
        } else {
            sequence.push(self.parse_simple_selector()?);
        }
        while !self.at_sequence_boundary() {
            sequence.push(self.parse_simple_selector()?);
        }
        Ok(sequence)
    }

    // The characters that may follow a finished sequence; none of them can
    // begin a simple selector, so a non-consuming peek is the exit test.
    fn at_sequence_boundary(&self) -> bool {
        self.cursor.at_end()
            || self.cursor.peek(Matcher::Spaces)
            || self.cursor.peek(Matcher::Exactly(','))
            || self.cursor.peek(Matcher::Exactly('{'))
            || self.cursor.peek(Matcher::Exactly('+'))
            || self.cursor.peek(Matcher::Exactly('~'))
            || self.cursor.peek(Matcher::Exactly('>'))
    }

    fn parse_simple_selector(&mut self) -> Result<Node> {
        if self
            .cursor
            .consume_any(&[Matcher::IdName, Matcher::ClassName])
        {
            Ok(Node::new(
                NodeKind::SimpleSelector(self.cursor.last_text().to_string()),
                self.cursor.line,
            ))
        } else if self.cursor.peek(Matcher::Exactly('[')) {
            self.parse_attribute_selector()
        } else {
            Err(self.syntax_error("a simple selector"))
        }
    }

    // attribute_selector := '[' type_selector? match_op? string_constant ']'
    fn parse_attribute_selector(&mut self) -> Result<Node> {
        let mut attr = Node::with_capacity(NodeKind::AttributeSelector, self.cursor.line, 3);
        self.expect(Matcher::Exactly('['), "`[` to open an attribute selector")?;
        if self.cursor.consume(Matcher::TypeSelector) {
            attr.push(self.value_node(self.cursor.last_text()));
        }
        if self.cursor.consume_any(&MATCH_OPS) {
            attr.push(self.value_node(self.cursor.last_text()));
        }
        self.expect(Matcher::StringConstant, "a quoted attribute value")?;
        attr.push(self.value_node(self.cursor.last_text()));
        self.expect(Matcher::Exactly(']'), "`]` to close the attribute selector")?;
        Ok(attr)
    }

    fn value_node(&self, text: &str) -> Node {
        Node::new(NodeKind::Value(text.to_string()), self.cursor.line)
    }

    // block := '{' block_item* '}', where rules and comments must be
    // followed by `;` before the next item (a closing `}` also ends the
    // final item), rulesets need no separator, and a stray `;` is ignored.
    fn parse_block(&mut self) -> Result<Node> {
        self.expect(Matcher::Exactly('{'), "`{` to open a block")?;
        let line = self.cursor.line;
        let mut children = Vec::new();
        let mut has_rules_or_comments = false;
        let mut has_rulesets = false;
        let mut needs_separator = false;
        loop {
            if self.cursor.consume(Matcher::Exactly('}')) {
                break;
            }
            if self.cursor.at_end_after_spaces() {
                return Err(self.syntax_error("`}` to close the block"));
            }
            if needs_separator {
                if !self.cursor.consume(Matcher::Exactly(';')) {
                    return Err(self.syntax_error("`;` after the previous declaration"));
                }
                needs_separator = false;
                continue;
            }
            if self.cursor.consume(Matcher::BlockComment) {
                let comment = NodeKind::Comment(self.cursor.last_text().to_string());
                children.push(Node::new(comment, self.cursor.line));
                has_rules_or_comments = true;
                needs_separator = true;
            } else if self.cursor.consume(Matcher::Variable) {
                self.parse_var_def()?;
                needs_separator = true;
            } else if look_for_rule(self.cursor.src, self.cursor.pos).is_some() {
                children.push(self.parse_rule()?);
                has_rules_or_comments = true;
                needs_separator = true;
            } else if !self.cursor.peek(Matcher::Exactly(';')) {
                children.push(self.parse_ruleset()?);
                has_rulesets = true;
            } else {
                // stray semicolon with no preceding item
                self.cursor.consume(Matcher::Exactly(';'));
            }
        }
        Ok(Node {
            kind: NodeKind::Block {
                has_rules_or_comments,
                has_rulesets,
            },
            line,
            children,
        })
    }

    fn parse_rule(&mut self) -> Result<Node> {
        let mut rule = Node::with_capacity(NodeKind::Rule, self.cursor.line, 2);
        self.expect(Matcher::Identifier, "a property name")?;
        rule.push(Node::new(
            NodeKind::Property(self.cursor.last_text().to_string()),
            self.cursor.line,
        ));
        self.expect(Matcher::Exactly(':'), "`:` after the property name")?;
        let values = self.parse_values()?;
        if values.children.is_empty() {
            return Err(self.syntax_error("at least one value after `:`"));
        }
        rule.push(values);
        Ok(rule)
    }

    // values := ( identifier | dimension | percentage | number | hex_color
    //           | string_constant | VARIABLE )*
    //
    // A variable reference is expanded eagerly: the bound value list's
    // children are spliced in place of the reference, flattened one level.
    fn parse_values(&mut self) -> Result<Node> {
        let mut values = Node::new(NodeKind::Values, self.cursor.line);
        while self.cursor.consume_any(&VALUE_ATOMS) {
            let text = self.cursor.last_text();
            if text.starts_with('$') {
                let bound =
                    self.env
                        .resolve(text)
                        .ok_or_else(|| ParseError::UndefinedVariable {
                            name: text.to_string(),
                            line: self.cursor.line,
                            span: span_of(self.cursor.last),
                        })?;
                values.children.extend(bound.children.iter().cloned());
            } else {
                values.push(Node::new(
                    NodeKind::Value(text.to_string()),
                    self.cursor.line,
                ));
            }
        }
        Ok(values)
    }

    fn expect(&mut self, m: Matcher, expected: &str) -> Result<()> {
        if self.cursor.consume(m) {
            Ok(())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    // Report at the next non-whitespace character so the line number names
    // the offending token, not the end of the previous one.
    fn syntax_error(&self, expected: &str) -> ParseError {
        let src = self.cursor.src;
        let at = matcher::skip_spaces(src, self.cursor.pos);
        let line = self.cursor.line + src[self.cursor.pos..at].matches('\n').count();
        let len = src[at..].chars().next().map_or(0, char::len_utf8);
        ParseError::SyntaxMismatch {
            expected: expected.to_string(),
            line,
            span: (at, len).into(),
        }
    }
}

fn span_of(tok: Token) -> SourceSpan {
    (tok.start, tok.len()).into()
}

/// Non-consuming speculative scan for `identifier ':' values (';' | '}')`
/// starting at `pos`; the block parser uses it to tell a declaration from a
/// nested ruleset before committing. Built from [`matcher::test`] calls
/// chained left-to-right, short-circuiting at the first failed step, so it
/// is side-effect-free and gives the same answer no matter how often it
/// runs. A scan that runs off the end of the buffer simply fails.
pub fn look_for_rule(src: &str, pos: usize) -> Option<usize> {
    let p = matcher::test(Matcher::Identifier, src, pos)?;
    let p = matcher::test(Matcher::Exactly(':'), src, p)?;
    let p = look_for_values(src, p)?;
    matcher::alternatives(&[Matcher::Exactly(';'), Matcher::Exactly('}')], src, p)
}

// Greedy scan over value atoms; fails if it cannot advance at all.
fn look_for_values(src: &str, pos: usize) -> Option<usize> {
    let mut p = pos;
    while let Some(next) = matcher::alternatives(&VALUE_ATOMS, src, p) {
        p = next;
    }
    (p != pos).then_some(p)
}

/// Exclusively-owned pointer into the input buffer. This is the consuming
/// half of the matcher contract: a successful [`Cursor::consume`] advances
/// the position, counts embedded line breaks, and records the matched span
/// as the last token; a failed one changes nothing.
#[derive(Debug)]
struct Cursor<'src> {
    src: &'src str,
    pos: usize,
    line: usize,
    last: Token,
}

impl<'src> Cursor<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            last: Token { start: 0, end: 0 },
        }
    }

    fn consume(&mut self, m: Matcher) -> bool {
        match matcher::probe(m, self.src, self.pos) {
            Some(tok) => {
                self.line += self.src[self.pos..tok.end].matches('\n').count();
                self.pos = tok.end;
                self.last = tok;
                true
            }
            None => false,
        }
    }

    fn consume_any(&mut self, choices: &[Matcher]) -> bool {
        choices.iter().any(|&m| self.consume(m))
    }

    fn peek(&self, m: Matcher) -> bool {
        matcher::test(m, self.src, self.pos).is_some()
    }

    fn last_text(&self) -> &'src str {
        &self.src[self.last.start..self.last.end]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn at_end_after_spaces(&self) -> bool {
        matcher::skip_spaces(self.src, self.pos) >= self.src.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead_accepts_declarations() {
        assert!(look_for_rule("color: red; }", 0).is_some());
        assert!(look_for_rule("margin: 1px 2px }", 0).is_some());
        assert!(look_for_rule("width: $w; }", 0).is_some());
    }

    #[test]
    fn lookahead_rejects_rulesets() {
        assert!(look_for_rule("a { color: red; }", 0).is_none());
        assert!(look_for_rule(".btn { }", 0).is_none());
        // identifier and colon but no terminator in sight
        assert!(look_for_rule("a: 1px b: 2px", 0).is_none());
    }

    #[test]
    fn lookahead_fails_at_end_of_buffer() {
        assert!(look_for_rule("color: red", 0).is_none());
        assert!(look_for_rule("color:", 0).is_none());
        assert!(look_for_rule("", 0).is_none());
    }

    #[test]
    fn lookahead_is_repeatable() {
        let src = "color: red; }";
        let first = look_for_rule(src, 0);
        assert_eq!(look_for_rule(src, 0), first);
        assert_eq!(look_for_rule(src, 0), first);
    }

    #[test]
    fn value_scan_requires_progress() {
        assert!(look_for_values(" red 1px", 0).is_some());
        assert!(look_for_values(";", 0).is_none());
    }
}
