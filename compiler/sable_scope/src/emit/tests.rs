use pretty_assertions::assert_eq;

use super::*;
use crate::{ScopeOptions, ScopeStore, Value, ValueRef, ValueStore};

// Helpers

fn store(options: CodeOptions) -> ValueStore {
    ValueStore::new(ScopeStore::new(), ScopeOptions::default(), options)
}

fn inline(code: &str) -> Value {
    Value::inline(ValueRef::new(code.to_owned())).with_code(code)
}

fn import(package: &str, name: &str) -> Value {
    Value::import(ValueRef::new(()), ImportParams::new(package, name))
}

// Declaration forms

#[test]
fn inline_values_use_const() {
    let mut vs = store(CodeOptions::default());
    vs.value("pattern", inline("new RegExp(\"^a\")")).unwrap();
    vs.value("pattern", inline("new RegExp(\"^b\")")).unwrap();

    let code = vs.scope_code(None, None, None).unwrap();
    assert_eq!(
        code.to_string(),
        "const pattern0 = new RegExp(\"^a\");const pattern1 = new RegExp(\"^b\");"
    );
}

#[test]
fn es5_uses_var() {
    let mut vs = store(CodeOptions::default().es5(true).lines(true));
    vs.value("formats", inline("{}")).unwrap();
    vs.value("func", import("sable/runtime/equal", "default"))
        .unwrap();

    let code = vs.scope_code(None, None, None).unwrap();
    assert_eq!(
        code.to_string(),
        "var formats0 = {};\nvar func0 = require(\"sable/runtime/equal\").default;\n"
    );
}

#[test]
fn esm_imports_use_named_import() {
    let mut vs = store(CodeOptions::default().esm(true).lines(true));
    vs.value("func", import("sable/runtime/equal", "default"))
        .unwrap();

    let code = vs.scope_code(None, None, None).unwrap();
    assert_eq!(
        code.to_string(),
        "import {default as func0} from \"sable/runtime/equal.js\";\n"
    );
}

#[test]
fn esm_flag_only_changes_imports() {
    let render = |esm: bool| {
        let mut vs = store(CodeOptions::default().esm(esm).lines(true));
        vs.value("pattern", inline("/x/")).unwrap();
        vs.value("func", import("m", "f")).unwrap();
        vs.scope_code(None, None, None).unwrap().to_string()
    };

    let cjs = render(false);
    let esm = render(true);
    let cjs_lines: Vec<&str> = cjs.lines().collect();
    let esm_lines: Vec<&str> = esm.lines().collect();

    assert_eq!(cjs_lines[0], "const pattern0 = /x/;");
    assert_eq!(esm_lines[0], cjs_lines[0]);
    assert_eq!(cjs_lines[1], "const func0 = require(\"m\").f;");
    assert_eq!(esm_lines[1], "import {f as func0} from \"m.js\";");
}

#[test]
fn nothing_to_emit_gives_empty_code() {
    let vs = store(CodeOptions::default().lines(true));
    let code = vs.scope_code(None, None, None).unwrap();
    assert!(code.is_empty());
}

// Fallback supplier

#[test]
fn fallback_code_is_spliced_verbatim() {
    let mut vs = store(CodeOptions::default());
    let validate = vs.value("validate", Value::inline(ValueRef::new(0_u8))).unwrap();

    let mut fallback = |name: &ValueScopeName, _: &mut UsedScopeValues| -> ScopeResult<Option<Code>> {
        let mut code = Code::raw("function ");
        code.push_name(name.name()).push_raw("(data) { return true; }");
        Ok(Some(code))
    };
    let code = vs.scope_code(None, None, Some(&mut fallback)).unwrap();

    assert_eq!(code.to_string(), "function validate0(data) { return true; }");
    assert_eq!(code.names().next(), Some(validate.name()));
}

#[test]
fn value_without_representation_fails() {
    let mut vs = store(CodeOptions::default());
    vs.value("pattern", inline("/a/")).unwrap();
    vs.value("validate", Value::inline(ValueRef::new(0_u8)))
        .unwrap();

    let err = vs.scope_code(None, None, None).unwrap_err();
    assert!(matches!(err, ScopeError::NoCode { .. }));
    assert_eq!(err.name(), Some("validate0"));
    assert_eq!(err.to_string(), "\"code\" for validate0 not defined");

    let mut nothing =
        |_: &ValueScopeName, _: &mut UsedScopeValues| -> ScopeResult<Option<Code>> { Ok(None) };
    let err = vs.scope_code(None, None, Some(&mut nothing)).unwrap_err();
    assert_eq!(err.name(), Some("validate0"));
}

#[test]
fn unusable_import_falls_back() {
    let mut vs = store(CodeOptions::default());
    vs.value("func", import("", "default")).unwrap();

    assert!(vs.scope_code(None, None, None).is_err());

    let mut fallback = |_: &ValueScopeName, _: &mut UsedScopeValues| -> ScopeResult<Option<Code>> {
        Ok(Some(Code::raw("const func0 = f;")))
    };
    let code = vs.scope_code(None, None, Some(&mut fallback)).unwrap();
    assert_eq!(code.to_string(), "const func0 = f;");
}

#[test]
fn fallback_errors_propagate() {
    let mut vs = store(CodeOptions::default());
    vs.value("validate", Value::inline(ValueRef::new(0_u8)))
        .unwrap();

    let mut failing = |_: &ValueScopeName, _: &mut UsedScopeValues| -> ScopeResult<Option<Code>> {
        Err(ScopeError::Unregistered {
            name: "ref0".to_owned(),
        })
    };
    let err = vs.scope_code(None, None, Some(&mut failing)).unwrap_err();
    assert_eq!(err.name(), Some("ref0"));
}

#[test]
fn unbound_name_in_subset_fails() {
    let mut vs = store(CodeOptions::default());
    let unbound = vs.name("validate").unwrap();
    let subset: ScopeValueSets = [unbound].into_iter().collect();

    let err = vs.scope_code(Some(&subset), None, None).unwrap_err();
    assert!(matches!(err, ScopeError::Unregistered { .. }));
}

// Re-emission guard

#[test]
fn shared_tracker_prevents_duplicates() {
    let mut vs = store(CodeOptions::default().lines(true));
    let a = vs.value("pattern", inline("/a/")).unwrap();
    let b = vs.value("pattern", inline("/b/")).unwrap();
    let c = vs.value("pattern", inline("/c/")).unwrap();

    let first: ScopeValueSets = [a.clone(), b.clone()].into_iter().collect();
    let second: ScopeValueSets = [b, c.clone()].into_iter().collect();

    let mut used = UsedScopeValues::new();
    let one = vs.scope_code(Some(&first), Some(&mut used), None).unwrap();
    let two = vs.scope_code(Some(&second), Some(&mut used), None).unwrap();

    assert_eq!(one.to_string(), "const pattern0 = /a/;\nconst pattern1 = /b/;\n");
    assert_eq!(two.to_string(), "const pattern2 = /c/;\n");
    assert_eq!(used.state(&a), Some(UsedValueState::Completed));
    assert_eq!(used.state(&c), Some(UsedValueState::Completed));
    assert_eq!(used.len(), 3);
}

#[test]
fn fresh_tracker_per_call_by_default() {
    let mut vs = store(CodeOptions::default());
    vs.value("pattern", inline("/a/")).unwrap();

    let one = vs.scope_code(None, None, None).unwrap();
    let two = vs.scope_code(None, None, None).unwrap();
    assert_eq!(one, two);
}

/// Fallback that emits a function after recursively emitting its dependencies.
fn supply(
    vs: &ValueStore,
    deps: &dyn Fn(&ValueScopeName) -> ScopeValueSets,
    name: &ValueScopeName,
    used: &mut UsedScopeValues,
) -> ScopeResult<Option<Code>> {
    assert_eq!(used.state(name), Some(UsedValueState::Started));
    let mut inner = |n: &ValueScopeName, u: &mut UsedScopeValues| supply(vs, deps, n, u);
    let mut code = vs.scope_code(Some(&deps(name)), Some(used), Some(&mut inner))?;
    code.push_raw("function ").push_name(name.name()).push_raw("() {}");
    Ok(Some(code))
}

#[test]
fn recursive_fallback_skips_value_in_progress() {
    let mut vs = store(CodeOptions::default().lines(true));
    let pattern = vs.value("pattern", inline("/a/")).unwrap();
    let user = vs.value("validate", Value::inline(ValueRef::new(1_u8))).unwrap();
    let info = vs.value("validate", Value::inline(ValueRef::new(2_u8))).unwrap();

    // user -> info -> user: mutually recursive functions.
    let deps = |name: &ValueScopeName| -> ScopeValueSets {
        if name.ptr_eq(&user) {
            [pattern.clone(), info.clone()].into_iter().collect()
        } else {
            [user.clone()].into_iter().collect()
        }
    };

    let mut used = UsedScopeValues::new();
    let subset: ScopeValueSets = [user.clone(), info.clone()].into_iter().collect();
    let mut fallback = |n: &ValueScopeName, u: &mut UsedScopeValues| supply(&vs, &deps, n, u);
    let code = vs
        .scope_code(Some(&subset), Some(&mut used), Some(&mut fallback))
        .unwrap();

    assert_eq!(
        code.to_string(),
        "const pattern0 = /a/;\nfunction validate1() {}\nfunction validate0() {}\n"
    );
    assert_eq!(used.state(&user), Some(UsedValueState::Completed));
    assert_eq!(used.state(&info), Some(UsedValueState::Completed));
}

// Store references

#[test]
fn store_refs_address_flat_store() {
    let mut vs = store(CodeOptions::default().lines(true));
    vs.value("pattern", inline("/a/")).unwrap();
    vs.value("formats", inline("{}")).unwrap();
    vs.value("pattern", inline("/b/")).unwrap();

    let code = vs.scope_refs(&Name::new("self"), None).unwrap();
    assert_eq!(
        code.to_string(),
        "const pattern0 = self.pattern[0];\nconst pattern1 = self.pattern[1];\nconst formats0 = self.formats[0];\n"
    );
}

#[test]
fn store_refs_ignore_missing_code() {
    let mut vs = store(CodeOptions::default().es5(true));
    vs.value("validate", Value::inline(ValueRef::new(0_u8)))
        .unwrap();

    let code = vs.scope_refs(&Name::new("scope"), None).unwrap();
    assert_eq!(code.to_string(), "var validate0 = scope.validate[0];");
}

#[test]
fn store_refs_on_unregistered_name_fails() {
    let mut vs = store(CodeOptions::default());
    let unbound = vs.name("pattern").unwrap();
    let subset: ScopeValueSets = [unbound].into_iter().collect();

    let err = vs.scope_refs(&Name::new("scope"), Some(&subset)).unwrap_err();
    assert_eq!(err.to_string(), "name \"pattern0\" has no value");
}
