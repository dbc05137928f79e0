//! Shapes of lowered expressions.

use xilang_frontend::{
    lower, Ast, BinaryOp, ExprAst, GlobalDecl, Literal, NewInit, ParseTree, PostfixOp, UnaryOp,
};

/// Parses `const X: i32 = <expr>;` and hands the initializer to `check`.
fn with_init(expr: &str, check: impl FnOnce(&ParseTree, &ExprAst)) {
    let src = format!("const X: i32 = {};", expr);
    let tree = ParseTree::parse(src).unwrap();
    let global_id = tree.file().unwrap().globals.ids()[0];
    let global: &GlobalDecl = tree.data_as(global_id).unwrap();
    let init = global.value.get(&tree).unwrap();
    check(&tree, init);
}

#[test]
fn identifiers_in_comparisons_are_not_generics() {
    with_init("a < b", |tree, e| match e {
        ExprAst::Binary { first, rest } => {
            assert_eq!(first.get(tree).unwrap(), &ExprAst::Id("a".into()));
            assert_eq!(rest.len(), 1);
            assert_eq!(rest[0].0, BinaryOp::Lt);
        }
        other => panic!("expected comparison, got {}", other),
    });
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    with_init("1 + 2 * 3", |tree, e| match e {
        ExprAst::Binary { first, rest } => {
            assert_eq!(first.get(tree).unwrap(), &ExprAst::Literal(Literal::Int(1)));
            assert_eq!(rest[0].0, BinaryOp::Add);
            match rest[0].1.get(tree).unwrap() {
                ExprAst::Binary { rest, .. } => assert_eq!(rest[0].0, BinaryOp::Mul),
                other => panic!("expected product, got {}", other),
            }
        }
        other => panic!("expected sum, got {}", other),
    });
}

#[test]
fn parentheses_override_precedence() {
    with_init("(1 + 2) * 3", |tree, e| match e {
        ExprAst::Binary { first, rest } => {
            assert_eq!(rest[0].0, BinaryOp::Mul);
            assert!(matches!(
                first.get(tree).unwrap(),
                ExprAst::Binary { rest, .. } if rest[0].0 == BinaryOp::Add
            ));
        }
        other => panic!("expected product, got {}", other),
    });
}

#[test]
fn cast_binds_tighter_than_multiplication() {
    with_init("a * b as i64", |tree, e| match e {
        ExprAst::Binary { rest, .. } => {
            assert!(matches!(rest[0].1.get(tree).unwrap(), ExprAst::Cast { .. }));
        }
        other => panic!("expected product, got {}", other),
    });
}

#[test]
fn unary_operators_stack() {
    with_init("-!+x", |tree, e| match e {
        ExprAst::Unary { ops, operand } => {
            assert_eq!(ops, &vec![UnaryOp::Neg, UnaryOp::Not, UnaryOp::Pos]);
            assert_eq!(operand.get(tree).unwrap(), &ExprAst::Id("x".into()));
        }
        other => panic!("expected unary, got {}", other),
    });
}

#[test]
fn unary_applies_to_the_whole_postfix_chain() {
    with_init("-a.b(c)", |tree, e| match e {
        ExprAst::Unary { operand, .. } => {
            assert!(matches!(
                operand.get(tree).unwrap(),
                ExprAst::Postfix { ops, .. } if ops.len() == 2
            ));
        }
        other => panic!("expected unary, got {}", other),
    });
}

#[test]
fn call_arguments_are_expressions() {
    with_init("f(1, g(2), )", |tree, e| match e {
        ExprAst::Postfix { ops, .. } => match &ops[0] {
            PostfixOp::Call(args) => {
                let args = args.resolve(tree).unwrap();
                assert_eq!(args.len(), 2);
                assert!(matches!(args[1], ExprAst::Postfix { .. }));
            }
            other => panic!("expected call, got {:?}", other),
        },
        other => panic!("expected postfix, got {}", other),
    });
}

#[test]
fn self_and_literals() {
    with_init("self", |_, e| assert_eq!(e, &ExprAst::SelfValue));
    with_init("true", |_, e| assert_eq!(e, &ExprAst::Literal(Literal::Bool(true))));
    with_init("'\\''", |_, e| assert_eq!(e, &ExprAst::Literal(Literal::Char('\''))));
    with_init("\"\"", |_, e| assert_eq!(e, &ExprAst::Literal(Literal::Str(String::new()))));
}

#[test]
fn block_expression_as_value() {
    with_init("{ let t = 1; t * 2 }", |tree, e| match e {
        ExprAst::Block(block) => {
            assert_eq!(block.stmts.len(), 1);
            let tail = block.tail.unwrap().get(tree).unwrap();
            assert!(matches!(tail, ExprAst::Binary { .. }));
        }
        other => panic!("expected block, got {}", other),
    });
}

#[test]
fn if_as_value() {
    with_init("if c { 1 } else { 2 }", |tree, e| match e {
        ExprAst::If { cond, then, els } => {
            assert_eq!(cond.get(tree).unwrap(), &ExprAst::Id("c".into()));
            assert!(matches!(then.get(tree).unwrap(), ExprAst::Block(_)));
            assert!(els.is_some());
        }
        other => panic!("expected if, got {}", other),
    });
}

#[test]
fn new_struct_with_generic_type() {
    with_init("new Box<T> { v: 1 }", |tree, e| match e {
        ExprAst::New { ty, init } => {
            let ty = ty.get(tree).unwrap();
            assert_eq!(ty.to_string(), "Type ::Box<::T>");
            assert!(matches!(init, NewInit::Struct(fields) if fields.len() == 1));
        }
        other => panic!("expected new, got {}", other),
    });
}

#[test]
fn assignment_has_lowest_precedence() {
    let tree = ParseTree::parse("fn f() { a.b = c || d; }").unwrap();
    let (lhs, rhs) = tree
        .preorder()
        .filter(|&id| lower::has_lowering(tree.rule(id)))
        .find_map(|id| match tree.data(id) {
            Ok(Ast::Expr(ExprAst::Assign { lhs, rhs })) => Some((*lhs, *rhs)),
            _ => None,
        })
        .expect("an assignment");
    assert!(matches!(lhs.get(&tree).unwrap(), ExprAst::Postfix { .. }));
    assert!(matches!(
        rhs.get(&tree).unwrap(),
        ExprAst::Binary { rest, .. } if rest[0].0 == BinaryOp::LogOr
    ));
}
