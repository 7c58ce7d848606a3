use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_code_renders_nothing() {
    let code = Code::new();
    assert!(code.is_empty());
    assert_eq!(code.to_string(), "");
}

#[test]
fn raw_text_is_merged() {
    let mut code = Code::raw("const ");
    code.push_raw("x").push_raw(" = 1;");
    assert_eq!(code.items().len(), 1);
    assert_eq!(code.to_string(), "const x = 1;");
}

#[test]
fn empty_raw_push_is_ignored() {
    let mut code = Code::new();
    code.push_raw("");
    assert!(code.is_empty());
}

#[test]
fn names_are_kept_as_handles() {
    let name = Name::new("formats0");
    let mut code = Code::raw("const ");
    code.push_name(&name).push_raw(" = {};");

    assert_eq!(code.to_string(), "const formats0 = {};");
    let names: Vec<&Name> = code.names().collect();
    assert_eq!(names, vec![&name]);
}

#[test]
fn push_code_concatenates() {
    let a = Name::new("a0");
    let mut first = Code::from(a.clone());
    first.push_raw(" + ");

    let mut second = Code::raw("1");
    second.push_raw(";");

    first.push_code(&second);
    assert_eq!(first.to_string(), "a0 + 1;");
    assert_eq!(first.items().len(), 2);
}

#[test]
fn string_literals_are_quoted() {
    let mut code = Code::new();
    code.push_str_literal("pkg/\"x\".js");
    assert_eq!(code.to_string(), r#""pkg/\"x\".js""#);
}

#[test]
fn line_separators_are_escaped() {
    let mut code = Code::new();
    code.push_str_literal("a\u{2028}b\u{2029}c\n");
    assert_eq!(code.to_string(), r#""a\u2028b\u2029c\n""#);
}

#[test]
fn owned_text_converts_to_raw_code() {
    let code = Code::from(format!("{}", 42));
    assert_eq!(code.to_string(), "42");
    assert!(code.names().next().is_none());
}
