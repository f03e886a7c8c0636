// tests/emitter_tests.rs

use sassafras::emitter::emit_css;
use sassafras::parser::parse;

fn compile(source: &str) -> String {
    let doc = parse(source).unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e));
    emit_css(doc.statements())
}

#[test]
fn nested_ruleset_flattens_onto_its_ancestor() {
    assert_eq!(compile("a { b { color: blue; } }"), "a b {\n  color: blue; }\n");
}

#[test]
fn declarations_print_in_order() {
    assert_eq!(
        compile("a { x: 1px; y: 2px; }"),
        "a {\n  x: 1px;\n  y: 2px; }\n"
    );
}

#[test]
fn variables_are_already_substituted() {
    assert_eq!(compile("$c: blue;\na { color: $c; }"), "a {\n  color: blue; }\n");
}

#[test]
fn comma_groups_combine_cartesian() {
    assert_eq!(
        compile("a, b { c { x: 1px; } }"),
        "a c, b c {\n  x: 1px; }\n"
    );
}

#[test]
fn mixed_blocks_emit_parent_then_nested() {
    assert_eq!(
        compile("a { x: 1px; b { y: 2px; } }"),
        "a {\n  x: 1px; }\na b {\n  y: 2px; }\n"
    );
}

#[test]
fn symbolic_combinators_keep_their_spacing() {
    assert_eq!(compile("a > b { x: y; }"), "a > b {\n  x: y; }\n");
    assert_eq!(compile("a + b ~ c { x: y; }"), "a + b ~ c {\n  x: y; }\n");
}

#[test]
fn attribute_selectors_round_trip() {
    assert_eq!(
        compile("input[type=\"text\"] { x: y; }"),
        "input[type=\"text\"] {\n  x: y; }\n"
    );
}

#[test]
fn comments_are_preserved() {
    assert_eq!(
        compile("/* header */\na { x: y; /* inline */ }"),
        "/* header */\na {\n  x: y;\n  /* inline */ }\n"
    );
}

#[test]
fn empty_rules_emit_nothing() {
    assert_eq!(compile("a { }"), "");
    assert_eq!(compile("a { ; }"), "");
}

#[test]
fn deep_nesting_accumulates_selectors() {
    assert_eq!(
        compile("a { b { c { x: y; } } }"),
        "a b c {\n  x: y; }\n"
    );
}
