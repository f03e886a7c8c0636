//! Token matchers: stateless predicates over the input buffer.
//!
//! This is the non-consuming half of the lexing contract. [`test`] answers
//! "would matcher `m` succeed at `pos`, and where would it end?" without
//! touching any parser state, so it can be chained freely for speculative
//! lookahead. The consuming half lives on the parser's cursor, which calls
//! [`probe`] and then advances.
//!
//! Every matcher except the whitespace-sensitive ones (`Spaces`,
//! `OptionalSpaces`, `AncestorOf`) skips leading whitespace before matching,
//! so grammar code never has to interleave explicit space handling.

pub type Pos = usize;

/// A matched span in the input buffer. Positions are byte offsets and always
/// fall on character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: Pos,
    pub end: Pos,
}

impl Token {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The grammar-rule identifiers the parser matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    OptionalSpaces,
    Spaces,
    BlockComment,
    Identifier,
    /// `$` followed by an identifier; the token includes the sigil.
    Variable,
    Number,
    /// A number with a trailing unit identifier, e.g. `2em`.
    Dimension,
    Percentage,
    /// `#` followed by hex digits.
    HexColor,
    /// A single- or double-quoted string, backslash escapes allowed.
    StringConstant,
    /// `#` followed by an identifier.
    IdName,
    /// `.` followed by an identifier.
    ClassName,
    TypeSelector,
    Universal,
    /// A whitespace gap between two selector sequences (the descendant
    /// combinator). Fails when the gap runs into `{ } , ;`, a symbolic
    /// combinator, or the end of input.
    AncestorOf,
    /// Attribute match operators.
    ExactMatch,
    ClassMatch,
    DashMatch,
    PrefixMatch,
    SuffixMatch,
    SubstringMatch,
    Exactly(char),
}

/// Non-consuming test: the position just past a match of `m` at `pos`, or
/// `None`. Idempotent and side-effect-free.
pub fn test(m: Matcher, src: &str, pos: Pos) -> Option<Pos> {
    probe(m, src, pos).map(|tok| tok.end)
}

/// First matcher in `choices` that succeeds wins; no backtracking across
/// alternatives once one has matched.
pub fn alternatives(choices: &[Matcher], src: &str, pos: Pos) -> Option<Pos> {
    choices.iter().find_map(|&m| test(m, src, pos))
}

/// Succeeds only if every matcher succeeds in order, each picking up where
/// the previous one ended.
pub fn sequence(steps: &[Matcher], src: &str, pos: Pos) -> Option<Pos> {
    steps.iter().try_fold(pos, |p, &m| test(m, src, p))
}

/// Like [`test`] but reports the token span, with leading whitespace
/// excluded from it. The cursor uses this to record the last matched token.
pub(crate) fn probe(m: Matcher, src: &str, pos: Pos) -> Option<Token> {
    let start = match m {
        Matcher::Spaces | Matcher::OptionalSpaces | Matcher::AncestorOf => pos,
        _ => skip_spaces(src, pos),
    };
    let end = match m {
        Matcher::OptionalSpaces => Some(skip_spaces(src, start)),
        Matcher::Spaces => spaces(src, start),
        Matcher::BlockComment => block_comment(src, start),
        Matcher::Identifier | Matcher::TypeSelector => identifier(src, start),
        Matcher::Variable => variable(src, start),
        Matcher::Dimension => dimension(src, start),
        Matcher::Percentage => percentage(src, start),
        Matcher::Number => number(src, start),
        Matcher::HexColor => hex_color(src, start),
        Matcher::StringConstant => string_constant(src, start),
        Matcher::IdName => prefixed_name(src, start, '#'),
        Matcher::ClassName => prefixed_name(src, start, '.'),
        Matcher::Universal => literal(src, start, "*"),
        Matcher::AncestorOf => ancestor_of(src, start),
        Matcher::ExactMatch => literal(src, start, "="),
        Matcher::ClassMatch => literal(src, start, "~="),
        Matcher::DashMatch => literal(src, start, "|="),
        Matcher::PrefixMatch => literal(src, start, "^="),
        Matcher::SuffixMatch => literal(src, start, "$="),
        Matcher::SubstringMatch => literal(src, start, "*="),
        Matcher::Exactly(ch) => exactly(src, start, ch),
    }?;
    Some(Token { start, end })
}

pub(crate) fn skip_spaces(src: &str, pos: Pos) -> Pos {
    let bytes = src.as_bytes();
    let mut p = pos;
    while p < bytes.len() && bytes[p].is_ascii_whitespace() {
        p += 1;
    }
    p
}

fn spaces(src: &str, pos: Pos) -> Option<Pos> {
    let end = skip_spaces(src, pos);
    (end > pos).then_some(end)
}

// An unterminated comment is not a comment token; the parser will report
// whatever it expected instead.
fn block_comment(src: &str, pos: Pos) -> Option<Pos> {
    let rest = src.get(pos..)?;
    if !rest.starts_with("/*") {
        return None;
    }
    rest.find("*/").map(|i| pos + i + 2)
}

fn literal(src: &str, pos: Pos, lit: &str) -> Option<Pos> {
    src.get(pos..)?.starts_with(lit).then(|| pos + lit.len())
}

fn exactly(src: &str, pos: Pos, ch: char) -> Option<Pos> {
    (src.get(pos..)?.chars().next()? == ch).then(|| pos + ch.len_utf8())
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-'
}

// CSS name: optional leading hyphen, a name-start character, then any run
// of name characters. Non-ASCII bytes count as name characters.
fn identifier(src: &str, pos: Pos) -> Option<Pos> {
    let bytes = src.as_bytes();
    let mut p = pos;
    if p < bytes.len() && bytes[p] == b'-' {
        p += 1;
    }
    if p >= bytes.len() || !is_name_start(bytes[p]) {
        return None;
    }
    p += 1;
    while p < bytes.len() && is_name_char(bytes[p]) {
        p += 1;
    }
    Some(p)
}

fn variable(src: &str, pos: Pos) -> Option<Pos> {
    let p = exactly(src, pos, '$')?;
    identifier(src, p)
}

fn prefixed_name(src: &str, pos: Pos, prefix: char) -> Option<Pos> {
    let p = exactly(src, pos, prefix)?;
    identifier(src, p)
}

fn digit_run(bytes: &[u8], mut p: usize) -> usize {
    while p < bytes.len() && bytes[p].is_ascii_digit() {
        p += 1;
    }
    p
}

fn number(src: &str, pos: Pos) -> Option<Pos> {
    let bytes = src.as_bytes();
    let mut p = pos;
    if p < bytes.len() && (bytes[p] == b'-' || bytes[p] == b'+') {
        p += 1;
    }
    let int_end = digit_run(bytes, p);
    if int_end == p {
        // fraction-only form like `.5`
        if int_end < bytes.len() && bytes[int_end] == b'.' {
            let frac_end = digit_run(bytes, int_end + 1);
            return (frac_end > int_end + 1).then_some(frac_end);
        }
        return None;
    }
    p = int_end;
    if p < bytes.len() && bytes[p] == b'.' {
        let frac_end = digit_run(bytes, p + 1);
        if frac_end > p + 1 {
            p = frac_end;
        }
    }
    Some(p)
}

fn dimension(src: &str, pos: Pos) -> Option<Pos> {
    let after_number = number(src, pos)?;
    identifier(src, after_number)
}

fn percentage(src: &str, pos: Pos) -> Option<Pos> {
    let after_number = number(src, pos)?;
    exactly(src, after_number, '%')
}

fn hex_color(src: &str, pos: Pos) -> Option<Pos> {
    let bytes = src.as_bytes();
    if pos >= bytes.len() || bytes[pos] != b'#' {
        return None;
    }
    let mut p = pos + 1;
    while p < bytes.len() && bytes[p].is_ascii_hexdigit() {
        p += 1;
    }
    (p > pos + 1).then_some(p)
}

fn string_constant(src: &str, pos: Pos) -> Option<Pos> {
    let bytes = src.as_bytes();
    let quote = *bytes.get(pos)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let mut p = pos + 1;
    while p < bytes.len() {
        match bytes[p] {
            b'\\' => p += 2,
            b if b == quote => return Some(p + 1),
            _ => p += 1,
        }
    }
    None
}

fn ancestor_of(src: &str, pos: Pos) -> Option<Pos> {
    let end = spaces(src, pos)?;
    let next = src[end..].chars().next()?;
    (!matches!(next, '{' | '}' | ',' | ';' | '+' | '~' | '>')).then_some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_idempotent_and_pure() {
        let src = "  margin: 1px;";
        let first = test(Matcher::Identifier, src, 0);
        for _ in 0..3 {
            assert_eq!(test(Matcher::Identifier, src, 0), first);
        }
        assert_eq!(first, Some(8));
    }

    #[test]
    fn identifier_forms() {
        assert_eq!(test(Matcher::Identifier, "color", 0), Some(5));
        assert_eq!(test(Matcher::Identifier, "-moz-box", 0), Some(8));
        assert_eq!(test(Matcher::Identifier, "font-size:", 0), Some(9));
        assert_eq!(test(Matcher::Identifier, "1px", 0), None);
        assert_eq!(test(Matcher::Identifier, "", 0), None);
    }

    #[test]
    fn leading_whitespace_is_skipped() {
        assert_eq!(test(Matcher::Exactly('{'), "   {", 0), Some(4));
        assert_eq!(test(Matcher::Variable, "\n  $pad", 0), Some(7));
        // but not for the whitespace-sensitive matchers
        assert_eq!(test(Matcher::Spaces, "x ", 0), None);
    }

    #[test]
    fn numeric_tokens() {
        assert_eq!(test(Matcher::Number, "42", 0), Some(2));
        assert_eq!(test(Matcher::Number, "-1.5em", 0), Some(4));
        assert_eq!(test(Matcher::Number, ".5", 0), Some(2));
        assert_eq!(test(Matcher::Number, ".", 0), None);
        assert_eq!(test(Matcher::Dimension, "2em;", 0), Some(3));
        assert_eq!(test(Matcher::Dimension, "2", 0), None);
        assert_eq!(test(Matcher::Percentage, "50%", 0), Some(3));
        assert_eq!(test(Matcher::Percentage, "50", 0), None);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(test(Matcher::HexColor, "#fff", 0), Some(4));
        assert_eq!(test(Matcher::HexColor, "#a1b2c3", 0), Some(7));
        assert_eq!(test(Matcher::HexColor, "#", 0), None);
        assert_eq!(test(Matcher::HexColor, "fff", 0), None);
    }

    #[test]
    fn string_constants() {
        assert_eq!(test(Matcher::StringConstant, r#""text""#, 0), Some(6));
        assert_eq!(test(Matcher::StringConstant, "'q'", 0), Some(3));
        assert_eq!(test(Matcher::StringConstant, r#""a\"b""#, 0), Some(6));
        assert_eq!(test(Matcher::StringConstant, r#""open"#, 0), None);
    }

    #[test]
    fn comments() {
        assert_eq!(test(Matcher::BlockComment, "/* hi */x", 0), Some(8));
        assert_eq!(test(Matcher::BlockComment, "/* never closed", 0), None);
        assert_eq!(test(Matcher::BlockComment, "// not css", 0), None);
    }

    #[test]
    fn selector_names() {
        assert_eq!(test(Matcher::IdName, "#main", 0), Some(5));
        assert_eq!(test(Matcher::ClassName, ".btn-lg", 0), Some(7));
        assert_eq!(test(Matcher::ClassName, ".1bad", 0), None);
        assert_eq!(test(Matcher::Universal, "*", 0), Some(1));
    }

    #[test]
    fn ancestor_gap() {
        // gap followed by another selector start
        assert_eq!(test(Matcher::AncestorOf, "a b", 1), Some(2));
        // gap running into a block open or separator is not a combinator
        assert_eq!(test(Matcher::AncestorOf, "a {", 1), None);
        assert_eq!(test(Matcher::AncestorOf, "a ,", 1), None);
        assert_eq!(test(Matcher::AncestorOf, "a > b", 1), None);
        assert_eq!(test(Matcher::AncestorOf, "a ", 1), None);
    }

    #[test]
    fn alternatives_first_match_wins() {
        let choices = [Matcher::Dimension, Matcher::Number];
        assert_eq!(alternatives(&choices, "2em", 0), Some(3));
        assert_eq!(alternatives(&choices, "2", 0), Some(1));
        assert_eq!(alternatives(&choices, "em", 0), None);
    }

    #[test]
    fn sequence_short_circuits() {
        let steps = [
            Matcher::Identifier,
            Matcher::Exactly(':'),
            Matcher::Identifier,
        ];
        assert_eq!(sequence(&steps, "a: b", 0), Some(4));
        assert_eq!(sequence(&steps, "a b", 0), None);
    }
}
