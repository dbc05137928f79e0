//! Lazy lowering: caching, identity and error channels.

use xilang_frontend::{
    lower, Ast, ErrorClass, ExprAst, FileAst, FnDecl, FrontendError, ParseTree, Rule, StmtAst,
    StructDecl, TypeAst, TypeKind,
};

#[test]
fn repeated_access_returns_the_cached_payload() {
    let tree = ParseTree::parse("struct S { a: i32 } fn f() {}").unwrap();
    let first: &FileAst = tree.file().unwrap();
    let second: &FileAst = tree.data_as(tree.root()).unwrap();
    assert!(std::ptr::eq(first, second));

    let s = first.structs.get(&tree, 0).unwrap().unwrap();
    let again = first.structs.get(&tree, 0).unwrap().unwrap();
    assert!(std::ptr::eq(s, again));
}

#[test]
fn children_are_lowered_on_demand() {
    let tree = ParseTree::parse("struct S { a: i32, b: bool }").unwrap();
    let file = tree.file().unwrap();
    let s_id = file.structs.ids()[0];
    assert!(tree.node(s_id).cached().is_none());

    let s: &StructDecl = tree.data_as(s_id).unwrap();
    let field_ids = s.fields.ids();
    assert!(field_ids.iter().all(|&id| tree.node(id).cached().is_none()));

    let b = s.fields.get(&tree, 1).unwrap().unwrap();
    assert!(tree.node(field_ids[0]).cached().is_none());
    assert!(tree.node(field_ids[1]).cached().is_some());
    assert_eq!(b.id, "b");
}

#[test]
fn kind_mismatch_is_internal() {
    let tree = ParseTree::parse("fn f() {}").unwrap();
    let f_id = tree.file().unwrap().fns.ids()[0];
    let err = tree.data_as::<TypeAst>(f_id).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Internal);
    assert!(matches!(err, FrontendError::Internal { rule: Rule::fn_decl, .. }));
    // the cached payload is unaffected
    assert!(matches!(tree.data(f_id).unwrap(), Ast::Fn(_)));
}

#[test]
fn methods_lower_as_fn_kind() {
    let src = "interface I { fn get(self) -> Self; fn make() -> Self; }";
    let tree = ParseTree::parse(src).unwrap();
    let iface = tree.file().unwrap().interfaces.get(&tree, 0).unwrap().unwrap();
    let method_id = iface.methods.ids()[0];
    assert!(matches!(tree.data(method_id).unwrap(), Ast::Method(_)));
    let method: &FnDecl = tree.data_as(method_id).unwrap();
    assert!(method.has_self);
    assert!(method.params.is_empty());
    let ret = method.ret.unwrap().get(&tree).unwrap();
    assert_eq!(ret.kind, TypeKind::SelfType);

    let free = iface.fns.get(&tree, 0).unwrap().unwrap();
    assert!(!free.has_self);
}

#[test]
fn unsupported_constructs_are_distinguishable() {
    let tree = ParseTree::parse("fn f() { let (a, b) = g(); }").unwrap();
    // parsing succeeds, the whole tree lowers except the tuple pattern
    let err = tree.lower_all().unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unsupported);
    assert_eq!(err.position().map(|p| p.column), Some(14));
}

#[test]
fn lower_all_covers_every_payload_node() {
    let tree = ParseTree::parse(
        "use a::b as c;
         #[test] fn f<T>(x: T, y: (i32, bool)) -> T[] { let z = new T[2]; z[0] = x; z }
         struct S : I { a: i32, fn m(self) { self.a = -self.a; } }
         const K: u64 = 7 as u64;",
    )
    .unwrap();
    let lowered = tree.lower_all().unwrap();
    let expected = tree
        .preorder()
        .filter(|&id| lower::has_lowering(tree.rule(id)))
        .count();
    assert_eq!(lowered, expected);
}

#[test]
fn statements_lower_through_handles() {
    let tree = ParseTree::parse("fn f() { g(); let x = 1; x }").unwrap();
    let f = tree.file().unwrap().fns.get(&tree, 0).unwrap().unwrap();
    let ExprAst::Block(body) = f.body.unwrap().get(&tree).unwrap() else {
        panic!("body is not a block");
    };
    let stmts = body.stmts.resolve(&tree).unwrap();
    assert!(matches!(stmts[0], StmtAst::Expr(_)));
    assert!(matches!(stmts[1], StmtAst::Let { .. }));
    let tail = body.tail.unwrap().get(&tree).unwrap();
    assert_eq!(tail, &ExprAst::Id("x".into()));
}
