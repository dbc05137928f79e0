//! End-to-end parsing scenarios.

use xilang_frontend::{
    ErrorClass, FrontendError, ParseTree, Rule, ScalarType, SourcePosition, TypeKind,
};

#[test]
fn use_statement_path() {
    let tree = ParseTree::parse("use a::b::C;").unwrap();
    let file = tree.file().unwrap();
    assert_eq!(file.uses.len(), 1);
    assert!(file.structs.is_empty() && file.fns.is_empty() && file.globals.is_empty());

    let use_stmt = file.uses.get(&tree, 0).unwrap().unwrap();
    assert_eq!(use_stmt.path.to_string(), "::a::b::C");
    assert_eq!(use_stmt.alias, None);
}

#[test]
fn generic_struct_with_fields() {
    let tree = ParseTree::parse("struct Pair<T> { x: T, y: T }").unwrap();
    let file = tree.file().unwrap();
    assert_eq!(file.structs.len(), 1);

    let pair = file.structs.get(&tree, 0).unwrap().unwrap();
    assert_eq!(pair.id, "Pair");
    assert_eq!(pair.generics, vec!["T".to_string()]);
    assert!(pair.impls.is_empty());

    let fields = pair.fields.resolve(&tree).unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
    for field in fields {
        let ty = field.ty.get(&tree).unwrap();
        assert!(!ty.is_arr);
        match &ty.kind {
            TypeKind::Path(path) => assert_eq!(path.to_string(), "::T"),
            other => panic!("expected path type, got {:?}", other),
        }
    }
}

#[test]
fn function_with_params_and_body() {
    let tree = ParseTree::parse("fn add(a: i32, b: i32) -> i32 { a + b }").unwrap();
    let file = tree.file().unwrap();
    assert_eq!(file.fns.len(), 1);

    let add = file.fns.get(&tree, 0).unwrap().unwrap();
    assert_eq!(add.id, "add");
    assert!(!add.has_self);
    assert_eq!(add.params.len(), 2);
    let params = add.params.resolve(&tree).unwrap();
    assert_eq!(params[0].id, "a");
    assert_eq!(params[1].id, "b");

    let ret = add.ret.unwrap().get(&tree).unwrap();
    assert_eq!(ret.kind, TypeKind::Scalar(ScalarType::I32));
    assert!(add.body.is_some());
}

#[test]
fn missing_struct_identifier_is_a_syntax_error() {
    let err = ParseTree::parse("struct { }").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Syntax);
    assert_eq!(err.position(), Some(SourcePosition::new(1, 8)));
}

#[test]
fn enum_fields_with_and_without_payload() {
    let tree = ParseTree::parse("enum Op { Add(i32), Neg() }").unwrap();
    let file = tree.file().unwrap();
    let op = file.enums.get(&tree, 0).unwrap().unwrap();
    assert_eq!(op.id, "Op");

    let fields = op.fields.resolve(&tree).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].id, "Add");
    let payload = fields[0].ty.unwrap().get(&tree).unwrap();
    assert_eq!(payload.kind, TypeKind::Scalar(ScalarType::I32));
    assert_eq!(fields[1].id, "Neg");
    assert!(fields[1].ty.is_none());
}

#[test]
fn bare_enum_variants() {
    let tree = ParseTree::parse("enum Color { Red, Green, Blue }").unwrap();
    let color = tree.file().unwrap().enums.get(&tree, 0).unwrap().unwrap();
    let fields = color.fields.resolve(&tree).unwrap();
    assert_eq!(fields.len(), 3);
    assert!(fields.iter().all(|f| f.ty.is_none()));
}

#[test]
fn file_members_keep_source_order() {
    let src = "
        fn b() {}
        use x;
        struct S1 {}
        fn a() {}
        const G: i32 = 1;
        use y;
        struct S2 {}
        interface I {}
        enum E {}
    ";
    let tree = ParseTree::parse(src).unwrap();
    let file = tree.file().unwrap();

    let fns: Vec<&str> = file
        .fns
        .resolve(&tree)
        .unwrap()
        .into_iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(fns, vec!["b", "a"]);

    let uses: Vec<String> = file
        .uses
        .resolve(&tree)
        .unwrap()
        .into_iter()
        .map(|u| u.path.to_string())
        .collect();
    assert_eq!(uses, vec!["::x", "::y"]);

    let structs: Vec<&str> = file
        .structs
        .resolve(&tree)
        .unwrap()
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(structs, vec!["S1", "S2"]);
    assert_eq!(file.interfaces.len(), 1);
    assert_eq!(file.enums.len(), 1);
    assert_eq!(file.globals.len(), 1);
}

#[test]
fn keyword_prefixed_identifiers() {
    let tree = ParseTree::parse("struct structx { fnord: i32 }").unwrap();
    let decl = tree.file().unwrap().structs.get(&tree, 0).unwrap().unwrap();
    assert_eq!(decl.id, "structx");
}

#[test]
fn reserved_words_are_not_identifiers() {
    for word in ["match", "yield", "async", "mod", "pub"] {
        let src = format!("struct {} {{}}", word);
        let err = ParseTree::parse(src).unwrap_err();
        assert!(
            matches!(err, FrontendError::Syntax { .. }),
            "{} should be reserved",
            word
        );
    }
}

#[test]
fn first_error_aborts_the_file() {
    // the second item is fine, but nothing is produced
    let err = ParseTree::parse("fn f( {}\nuse a;").unwrap_err();
    assert_eq!(err.position().map(|p| p.line), Some(1));
}

#[test]
fn comments_never_reach_the_tree() {
    let tree = ParseTree::parse("/* a */ use /* b */ a // c\n;").unwrap();
    let rules: Vec<Rule> = tree.preorder().map(|id| tree.rule(id)).collect();
    assert_eq!(
        rules,
        vec![Rule::file, Rule::use_stmt, Rule::path, Rule::id_g, Rule::id]
    );
    let use_stmt = tree.file().unwrap().uses.get(&tree, 0).unwrap().unwrap();
    assert_eq!(use_stmt.path.to_string(), "::a");
}
