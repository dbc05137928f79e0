//! # Lowering
//!
//! Builds the [`Ast`] payload of a single parse-tree node. The rule of the
//! node selects the payload kind; children are referenced through handles and
//! only lowered when a consumer asks for them.
//!
//! Every rule listed in [`has_lowering`] must have an arm in [`lower`] and vice
//! versa. Anything else reaching [`lower`] means the grammar and this module
//! have drifted apart and is reported as [`FrontendError::Internal`].

use xilang_core::{PathBuf, PathSeg};

use crate::ast::*;
use crate::errors::{FrontendError, SourcePosition};
use crate::grammar::Rule;
use crate::tree::{NodeId, ParseTree};

/// Whether nodes of `rule` carry an AST payload.
pub fn has_lowering(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::file
            | Rule::use_stmt
            | Rule::struct_decl
            | Rule::interface_decl
            | Rule::enum_decl
            | Rule::enum_field
            | Rule::fn_decl
            | Rule::method_decl
            | Rule::field
            | Rule::global
            | Rule::param
            | Rule::attrib
            | Rule::ty
            | Rule::let_stmt
            | Rule::expr_stmt
    ) || is_expr(rule)
}

fn is_expr(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::id
            | Rule::kw_lself
            | Rule::kw_null
            | Rule::kw_true
            | Rule::kw_false
            | Rule::int_literal
            | Rule::float_literal
            | Rule::char_literal
            | Rule::str_literal
            | Rule::type_expr
            | Rule::unary_expr
            | Rule::cast_expr
            | Rule::mul_expr
            | Rule::add_expr
            | Rule::comp_expr
            | Rule::eq_expr
            | Rule::log_and_expr
            | Rule::log_or_expr
            | Rule::call_expr
            | Rule::new_expr
            | Rule::assign_expr
            | Rule::break_expr
            | Rule::ret_expr
            | Rule::kw_continue
            | Rule::block_expr
            | Rule::if_expr
            | Rule::while_expr
    )
}

/// Lowers one node. Children are not lowered unless validation requires it.
pub(crate) fn lower(tree: &ParseTree, id: NodeId) -> Result<Ast, FrontendError> {
    let ctx = Ctx { tree, id };
    let ast = match tree.rule(id) {
        Rule::file => Ast::File(ctx.file()?),
        Rule::use_stmt => Ast::Use(ctx.use_stmt()?),
        Rule::struct_decl => Ast::Struct(ctx.struct_decl()?),
        Rule::interface_decl => Ast::Interface(ctx.interface_decl()?),
        Rule::enum_decl => Ast::Enum(ctx.enum_decl()?),
        Rule::enum_field => Ast::EnumField(ctx.enum_field()?),
        Rule::fn_decl => Ast::Fn(ctx.fn_decl()?),
        Rule::method_decl => Ast::Method(ctx.fn_decl()?),
        Rule::field => {
            let (id, ty) = ctx.typed_id()?;
            Ast::Field(FieldDecl { id, ty })
        }
        Rule::param => {
            let (id, ty) = ctx.typed_id()?;
            Ast::Param(Param { id, ty })
        }
        Rule::global => Ast::Global(ctx.global()?),
        Rule::attrib => Ast::Attrib(ctx.attrib()?),
        Rule::ty => Ast::Type(ctx.ty()?),
        Rule::let_stmt => Ast::Stmt(ctx.let_stmt()?),
        Rule::expr_stmt => Ast::Stmt(StmtAst::Expr(Handle::new(ctx.child(0)?))),
        rule if is_expr(rule) => Ast::Expr(ctx.expr()?),
        _ => return Err(ctx.internal("no lowering registered for this rule")),
    };
    Ok(ast)
}

/// Builds the path of a `path` node.
///
/// Only the first type argument of a generic argument list is kept, so
/// `Map<K, V>` becomes a `Map` segment with the single argument `K`.
pub fn build_path(tree: &ParseTree, id: NodeId) -> Result<PathBuf, FrontendError> {
    let ctx = Ctx { tree, id };
    ctx.expect(Rule::path)?;

    let mut path = PathBuf::new();
    for &child in tree.children(id) {
        match tree.rule(child) {
            Rule::dot => path.push(PathSeg::relative_marker()),
            Rule::id_g => {
                let seg_ctx = Ctx { tree, id: child };
                let name = seg_ctx.child(0)?;
                match tree.rule(name) {
                    Rule::id | Rule::kw_uself => {}
                    rule if scalar_type(rule).is_some() => {}
                    _ => return Err(seg_ctx.unexpected(name)),
                }
                let seg = match tree.children(child).get(1) {
                    None => PathSeg::new(tree.text(name)),
                    Some(&arg) => PathSeg::with_generics(
                        tree.text(name),
                        vec![generic_arg_path(tree, arg)?],
                    ),
                };
                path.push(seg);
            }
            _ => return Err(ctx.unexpected(child)),
        }
    }
    Ok(path)
}

/// A generic argument as a path. Scalars and `Self` become a single keyword
/// segment; tuples and arrays have no path form.
fn generic_arg_path(tree: &ParseTree, ty: NodeId) -> Result<PathBuf, FrontendError> {
    let lowered = tree.data_as::<TypeAst>(ty)?;
    let keyword = match &lowered.kind {
        _ if lowered.is_arr => None,
        TypeKind::Path(path) => return Ok(path.clone()),
        TypeKind::Scalar(scalar) => Some(scalar.keyword()),
        TypeKind::SelfType => Some("Self"),
        TypeKind::Tuple(_) => None,
    };
    match keyword {
        Some(keyword) => Ok(std::iter::once(PathSeg::new(keyword)).collect()),
        None => Err(FrontendError::NotImplemented {
            construct: "non-path generic argument",
            position: tree.position(ty),
        }),
    }
}

fn scalar_type(rule: Rule) -> Option<ScalarType> {
    Some(match rule {
        Rule::kw_bool => ScalarType::Bool,
        Rule::kw_char => ScalarType::Char,
        Rule::kw_f32 => ScalarType::F32,
        Rule::kw_f64 => ScalarType::F64,
        Rule::kw_isize => ScalarType::ISize,
        Rule::kw_i32 => ScalarType::I32,
        Rule::kw_i64 => ScalarType::I64,
        Rule::kw_usize => ScalarType::USize,
        Rule::kw_string => ScalarType::Str,
        Rule::kw_u8 => ScalarType::U8,
        Rule::kw_u32 => ScalarType::U32,
        Rule::kw_u64 => ScalarType::U64,
        _ => return None,
    })
}

struct Ctx<'t> {
    tree: &'t ParseTree,
    id: NodeId,
}

/// Pieces shared by struct, interface and enum declarations.
#[derive(Default)]
struct DeclParts {
    id: Option<String>,
    generics: Vec<String>,
    impls: Vec<PathBuf>,
    attribs: Vec<NodeId>,
    fields: Vec<NodeId>,
    enum_fields: Vec<NodeId>,
    fns: Vec<NodeId>,
    methods: Vec<NodeId>,
}

impl<'t> Ctx<'t> {
    fn position(&self) -> SourcePosition {
        self.tree.position(self.id)
    }

    fn internal(&self, message: impl Into<String>) -> FrontendError {
        FrontendError::internal(self.tree.rule(self.id), self.position(), message)
    }

    fn unexpected(&self, child: NodeId) -> FrontendError {
        self.internal(format!(
            "unexpected {:?} child at {}",
            self.tree.rule(child),
            self.tree.position(child)
        ))
    }

    fn expect(&self, rule: Rule) -> Result<(), FrontendError> {
        if self.tree.rule(self.id) == rule {
            Ok(())
        } else {
            Err(self.internal(format!("expected a {:?} node", rule)))
        }
    }

    fn children(&self) -> &'t [NodeId] {
        self.tree.children(self.id)
    }

    fn child(&self, n: usize) -> Result<NodeId, FrontendError> {
        self.children()
            .get(n)
            .copied()
            .ok_or_else(|| self.internal(format!("missing child {}", n)))
    }

    fn child_of(&self, n: usize, rule: Rule) -> Result<NodeId, FrontendError> {
        let child = self.child(n)?;
        if self.tree.rule(child) == rule {
            Ok(child)
        } else {
            Err(self.unexpected(child))
        }
    }

    fn text_of(&self, n: usize, rule: Rule) -> Result<String, FrontendError> {
        self.child_of(n, rule)
            .map(|child| self.tree.text(child).to_string())
    }

    fn syntax(&self, message: impl Into<String>) -> FrontendError {
        FrontendError::syntax(self.position(), message)
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    fn file(&self) -> Result<FileAst, FrontendError> {
        let mut uses = Vec::new();
        let mut interfaces = Vec::new();
        let mut structs = Vec::new();
        let mut enums = Vec::new();
        let mut fns = Vec::new();
        let mut globals = Vec::new();
        for &child in self.children() {
            match self.tree.rule(child) {
                Rule::use_stmt => uses.push(child),
                Rule::interface_decl => interfaces.push(child),
                Rule::struct_decl => structs.push(child),
                Rule::enum_decl => enums.push(child),
                Rule::fn_decl => fns.push(child),
                Rule::global => globals.push(child),
                _ => return Err(self.unexpected(child)),
            }
        }
        Ok(FileAst {
            uses: HandleList::new(uses),
            interfaces: HandleList::new(interfaces),
            structs: HandleList::new(structs),
            enums: HandleList::new(enums),
            fns: HandleList::new(fns),
            globals: HandleList::new(globals),
        })
    }

    fn use_stmt(&self) -> Result<UseStmt, FrontendError> {
        let path = build_path(self.tree, self.child_of(0, Rule::path)?)?;
        let alias = match self.children().get(1) {
            Some(_) => Some(self.text_of(1, Rule::id)?),
            None => None,
        };
        Ok(UseStmt { path, alias })
    }

    fn decl_parts(&self) -> Result<DeclParts, FrontendError> {
        let mut parts = DeclParts::default();
        for &child in self.children() {
            match self.tree.rule(child) {
                Rule::attrib => parts.attribs.push(child),
                Rule::id if parts.id.is_none() => {
                    parts.id = Some(self.tree.text(child).to_string())
                }
                Rule::generic_params => {
                    parts.generics = self
                        .tree
                        .children(child)
                        .iter()
                        .map(|&g| self.tree.text(g).to_string())
                        .collect();
                }
                Rule::impls => {
                    for &path in self.tree.children(child) {
                        parts.impls.push(build_path(self.tree, path)?);
                    }
                }
                Rule::field => parts.fields.push(child),
                Rule::enum_field => parts.enum_fields.push(child),
                Rule::fn_decl => parts.fns.push(child),
                Rule::method_decl => parts.methods.push(child),
                _ => return Err(self.unexpected(child)),
            }
        }
        Ok(parts)
    }

    fn decl_id(&self, parts: &mut DeclParts) -> Result<String, FrontendError> {
        parts
            .id
            .take()
            .ok_or_else(|| self.internal("declaration without identifier"))
    }

    fn struct_decl(&self) -> Result<StructDecl, FrontendError> {
        let mut parts = self.decl_parts()?;
        Ok(StructDecl {
            id: self.decl_id(&mut parts)?,
            generics: parts.generics,
            impls: parts.impls,
            attribs: HandleList::new(parts.attribs),
            fields: HandleList::new(parts.fields),
            fns: HandleList::new(parts.fns),
            methods: HandleList::new(parts.methods),
        })
    }

    fn interface_decl(&self) -> Result<InterfaceDecl, FrontendError> {
        let mut parts = self.decl_parts()?;
        Ok(InterfaceDecl {
            id: self.decl_id(&mut parts)?,
            generics: parts.generics,
            impls: parts.impls,
            attribs: HandleList::new(parts.attribs),
            fns: HandleList::new(parts.fns),
            methods: HandleList::new(parts.methods),
        })
    }

    fn enum_decl(&self) -> Result<EnumDecl, FrontendError> {
        let mut parts = self.decl_parts()?;
        Ok(EnumDecl {
            id: self.decl_id(&mut parts)?,
            generics: parts.generics,
            attribs: HandleList::new(parts.attribs),
            fields: HandleList::new(parts.enum_fields),
            fns: HandleList::new(parts.fns),
            methods: HandleList::new(parts.methods),
        })
    }

    fn enum_field(&self) -> Result<EnumField, FrontendError> {
        let ty = match self.children().get(1) {
            Some(_) => Some(Handle::new(self.child_of(1, Rule::ty)?)),
            None => None,
        };
        Ok(EnumField {
            id: self.text_of(0, Rule::id)?,
            ty,
        })
    }

    fn fn_decl(&self) -> Result<FnDecl, FrontendError> {
        let mut id = None;
        let mut generics = Vec::new();
        let mut attribs = Vec::new();
        let mut has_self = false;
        let mut params = Vec::new();
        let mut ret = None;
        let mut body = None;
        for &child in self.children() {
            match self.tree.rule(child) {
                Rule::attrib => attribs.push(child),
                Rule::id if id.is_none() => id = Some(self.tree.text(child).to_string()),
                Rule::generic_params => {
                    generics = self
                        .tree
                        .children(child)
                        .iter()
                        .map(|&g| self.tree.text(g).to_string())
                        .collect();
                }
                Rule::fn_params | Rule::method_params => {
                    for &p in self.tree.children(child) {
                        match self.tree.rule(p) {
                            Rule::param => params.push(p),
                            Rule::kw_lself => has_self = true,
                            _ => return Err(self.unexpected(p)),
                        }
                    }
                }
                Rule::ty => ret = Some(Handle::new(child)),
                Rule::block_expr => body = Some(Handle::new(child)),
                _ => return Err(self.unexpected(child)),
            }
        }
        Ok(FnDecl {
            id: id.ok_or_else(|| self.internal("function without identifier"))?,
            generics,
            attribs: HandleList::new(attribs),
            has_self,
            params: HandleList::new(params),
            ret,
            body,
        })
    }

    fn typed_id(&self) -> Result<(String, Handle<TypeAst>), FrontendError> {
        Ok((
            self.text_of(0, Rule::id)?,
            Handle::new(self.child_of(1, Rule::ty)?),
        ))
    }

    fn global(&self) -> Result<GlobalDecl, FrontendError> {
        Ok(GlobalDecl {
            id: self.text_of(0, Rule::id)?,
            ty: Handle::new(self.child_of(1, Rule::ty)?),
            value: Handle::new(self.child(2)?),
        })
    }

    fn attrib(&self) -> Result<Attrib, FrontendError> {
        let args = match self.children().get(1) {
            Some(_) => {
                let args = self.child_of(1, Rule::args)?;
                Some(HandleList::new(self.tree.children(args).to_vec()))
            }
            None => None,
        };
        Ok(Attrib {
            id: self.text_of(0, Rule::id)?,
            args,
        })
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    fn ty(&self) -> Result<TypeAst, FrontendError> {
        let base = self.child(0)?;
        let is_arr = match self.children().get(1) {
            Some(_) => {
                self.child_of(1, Rule::arr_suffix)?;
                true
            }
            None => false,
        };
        let rule = self.tree.rule(base);
        if let Some(scalar) = scalar_type(rule) {
            return Ok(TypeAst {
                kind: TypeKind::Scalar(scalar),
                is_arr,
            });
        }
        let kind = match rule {
            Rule::kw_uself => TypeKind::SelfType,
            Rule::path => TypeKind::Path(build_path(self.tree, base)?),
            Rule::tuple_type => {
                let elems = self.tree.children(base);
                for &elem in elems {
                    self.tree.data_as::<TypeAst>(elem)?;
                }
                TypeKind::Tuple(HandleList::new(elems.to_vec()))
            }
            _ => return Err(self.unexpected(base)),
        };
        Ok(TypeAst { kind, is_arr })
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn let_stmt(&self) -> Result<StmtAst, FrontendError> {
        let pattern = self.child(0)?;
        let name = match self.tree.rule(pattern) {
            Rule::id => self.tree.text(pattern).to_string(),
            Rule::tuple_pattern => {
                return Err(FrontendError::NotImplemented {
                    construct: "tuple pattern",
                    position: self.tree.position(pattern),
                })
            }
            _ => return Err(self.unexpected(pattern)),
        };
        let mut ty = None;
        let mut init = None;
        for &child in &self.children()[1..] {
            match self.tree.rule(child) {
                Rule::ty => ty = Some(Handle::new(child)),
                Rule::let_init => {
                    let value = Ctx {
                        tree: self.tree,
                        id: child,
                    }
                    .child(0)?;
                    init = Some(Handle::new(value));
                }
                _ => return Err(self.unexpected(child)),
            }
        }
        Ok(StmtAst::Let { name, ty, init })
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn expr(&self) -> Result<ExprAst, FrontendError> {
        let tree = self.tree;
        let expr = match tree.rule(self.id) {
            Rule::id => ExprAst::Id(tree.text(self.id).to_string()),
            Rule::kw_lself => ExprAst::SelfValue,
            Rule::kw_null => ExprAst::Literal(Literal::Null),
            Rule::kw_true => ExprAst::Literal(Literal::Bool(true)),
            Rule::kw_false => ExprAst::Literal(Literal::Bool(false)),
            Rule::int_literal => {
                let text = tree.text(self.id);
                let value = text.parse::<u64>().map_err(|e| {
                    self.syntax(format!("invalid integer literal '{}': {}", text, e))
                })?;
                ExprAst::Literal(Literal::Int(value))
            }
            Rule::float_literal => {
                let text = tree.text(self.id);
                let value = text.parse::<f64>().map_err(|e| {
                    self.syntax(format!("invalid float literal '{}': {}", text, e))
                })?;
                ExprAst::Literal(Literal::Float(value))
            }
            Rule::char_literal => {
                let text = tree.text(self.id);
                let decoded = unescape(strip_quotes(text), self.position())?;
                let mut chars = decoded.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ExprAst::Literal(Literal::Char(c)),
                    _ => {
                        return Err(
                            self.syntax(format!("character literal {} is not one character", text))
                        )
                    }
                }
            }
            Rule::str_literal => {
                let decoded = unescape(strip_quotes(tree.text(self.id)), self.position())?;
                ExprAst::Literal(Literal::Str(decoded))
            }
            Rule::type_expr => ExprAst::Type(Handle::new(self.child_of(0, Rule::ty)?)),
            Rule::unary_expr => {
                let (operand, ops) = self
                    .children()
                    .split_last()
                    .ok_or_else(|| self.internal("empty unary expression"))?;
                let ops = ops
                    .iter()
                    .map(|&op| match tree.rule(op) {
                        Rule::op_not => Ok(UnaryOp::Not),
                        Rule::op_neg => Ok(UnaryOp::Neg),
                        Rule::op_pos => Ok(UnaryOp::Pos),
                        _ => Err(self.unexpected(op)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ExprAst::Unary {
                    ops,
                    operand: Handle::new(*operand),
                }
            }
            Rule::cast_expr => {
                let operand = Handle::new(self.child(0)?);
                let tys = self.children()[1..]
                    .iter()
                    .map(|&ty| {
                        if tree.rule(ty) == Rule::ty {
                            Ok(Handle::new(ty))
                        } else {
                            Err(self.unexpected(ty))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ExprAst::Cast { operand, tys }
            }
            Rule::mul_expr
            | Rule::add_expr
            | Rule::comp_expr
            | Rule::eq_expr
            | Rule::log_and_expr
            | Rule::log_or_expr => self.binary()?,
            Rule::call_expr => self.postfix()?,
            Rule::new_expr => {
                let ty = Handle::new(self.child_of(0, Rule::ty)?);
                let init_node = self.child(1)?;
                let init = match tree.rule(init_node) {
                    Rule::struct_init_expr => NewInit::Struct(
                        tree.children(init_node)
                            .iter()
                            .map(|&field| self.field_init(field))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    Rule::arr_acc_expr => {
                        NewInit::Array(Handle::new(Ctx { tree, id: init_node }.child(0)?))
                    }
                    _ => return Err(self.unexpected(init_node)),
                };
                ExprAst::New { ty, init }
            }
            Rule::assign_expr => ExprAst::Assign {
                lhs: Handle::new(self.child(0)?),
                rhs: Handle::new(self.child(1)?),
            },
            Rule::break_expr => ExprAst::Break(self.children().first().map(|&e| Handle::new(e))),
            Rule::ret_expr => ExprAst::Return(self.children().first().map(|&e| Handle::new(e))),
            Rule::kw_continue => ExprAst::Continue,
            Rule::block_expr => ExprAst::Block(self.block()?),
            Rule::if_expr => ExprAst::If {
                cond: Handle::new(self.child(0)?),
                then: Handle::new(self.child_of(1, Rule::block_expr)?),
                els: self.children().get(2).map(|&e| Handle::new(e)),
            },
            Rule::while_expr => ExprAst::While {
                cond: Handle::new(self.child(0)?),
                body: Handle::new(self.child_of(1, Rule::block_expr)?),
            },
            _ => return Err(self.internal("no expression lowering for this rule")),
        };
        Ok(expr)
    }

    /// `operand (op operand)*`
    fn binary(&self) -> Result<ExprAst, FrontendError> {
        let first = Handle::new(self.child(0)?);
        let mut rest = Vec::new();
        for pair in self.children()[1..].chunks(2) {
            let (op, operand) = match pair {
                [op, operand] => (*op, *operand),
                _ => return Err(self.internal("operator without right operand")),
            };
            let op = match self.tree.rule(op) {
                Rule::op_log_or => BinaryOp::LogOr,
                Rule::op_log_and => BinaryOp::LogAnd,
                Rule::op_eq => BinaryOp::Eq,
                Rule::op_ne => BinaryOp::Ne,
                Rule::op_le => BinaryOp::Le,
                Rule::op_ge => BinaryOp::Ge,
                Rule::op_lt => BinaryOp::Lt,
                Rule::op_gt => BinaryOp::Gt,
                Rule::op_add => BinaryOp::Add,
                Rule::op_sub => BinaryOp::Sub,
                Rule::op_mul => BinaryOp::Mul,
                Rule::op_div => BinaryOp::Div,
                Rule::op_mod => BinaryOp::Mod,
                _ => return Err(self.unexpected(op)),
            };
            rest.push((op, Handle::new(operand)));
        }
        Ok(ExprAst::Binary { first, rest })
    }

    fn postfix(&self) -> Result<ExprAst, FrontendError> {
        let tree = self.tree;
        let base = Handle::new(self.child(0)?);
        let mut ops = Vec::new();
        for &op in &self.children()[1..] {
            let op_ctx = Ctx { tree, id: op };
            ops.push(match tree.rule(op) {
                Rule::args => PostfixOp::Call(HandleList::new(tree.children(op).to_vec())),
                Rule::obj_acc_expr => PostfixOp::Field(op_ctx.text_of(0, Rule::id)?),
                Rule::path_acc_expr => PostfixOp::Static(op_ctx.text_of(0, Rule::id)?),
                Rule::arr_acc_expr => PostfixOp::Index(Handle::new(op_ctx.child(0)?)),
                _ => return Err(self.unexpected(op)),
            });
        }
        Ok(ExprAst::Postfix { base, ops })
    }

    fn field_init(&self, field: NodeId) -> Result<FieldInit, FrontendError> {
        let ctx = Ctx {
            tree: self.tree,
            id: field,
        };
        ctx.expect(Rule::struct_field_init)?;
        Ok(FieldInit {
            id: ctx.text_of(0, Rule::id)?,
            value: ctx.children().get(1).map(|&e| Handle::new(e)),
        })
    }

    fn block(&self) -> Result<Block, FrontendError> {
        let mut stmts = Vec::new();
        let mut tail = None;
        for &child in self.children() {
            if tail.is_some() {
                return Err(self.unexpected(child));
            }
            match self.tree.rule(child) {
                Rule::let_stmt | Rule::expr_stmt => stmts.push(child),
                _ => tail = Some(Handle::new(child)),
            }
        }
        Ok(Block {
            stmts: HandleList::new(stmts),
            tail,
        })
    }
}

fn strip_quotes(text: &str) -> &str {
    let inner = text.strip_prefix(['"', '\'']).unwrap_or(text);
    inner.strip_suffix(['"', '\'']).unwrap_or(inner)
}

/// Decodes the escape sequences of a character or string literal body.
///
/// Supported: `\a \b \f \n \r \t \v \\ \" \'`, an escaped line break,
/// `\xHH`, decimal `\DDD` up to 255, `\u{H..}` and `\z`, which skips the
/// whitespace that follows it.
pub fn unescape(body: &str, position: SourcePosition) -> Result<String, FrontendError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escape = chars
            .next()
            .ok_or_else(|| FrontendError::syntax(position, "unterminated escape sequence"))?;
        match escape {
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' | '\n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '\\' | '"' | '\'' => out.push(escape),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16).map_err(|_| {
                    FrontendError::syntax(position, format!("invalid escape '\\x{}'", hex))
                })?;
                out.push(char::from(byte));
            }
            'z' => {
                while chars.next_if(|c| c.is_ascii_whitespace()).is_some() {}
            }
            'u' => {
                if chars.next() != Some('{') {
                    return Err(FrontendError::syntax(position, "expected '{' after '\\u'"));
                }
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(h) => hex.push(h),
                        None => {
                            return Err(FrontendError::syntax(
                                position,
                                "unterminated unicode escape",
                            ))
                        }
                    }
                }
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        FrontendError::syntax(position, format!("invalid escape '\\u{{{}}}'", hex))
                    })?;
                out.push(decoded);
            }
            d if d.is_ascii_digit() => {
                let mut value = d.to_digit(10).unwrap_or(0);
                for _ in 0..2 {
                    match chars.next_if(char::is_ascii_digit) {
                        Some(next) => value = value * 10 + next.to_digit(10).unwrap_or(0),
                        None => break,
                    }
                }
                let byte = u8::try_from(value).map_err(|_| {
                    let message = format!("decimal escape '\\{}' too large", value);
                    FrontendError::syntax(position, message)
                })?;
                out.push(char::from(byte));
            }
            other => {
                return Err(FrontendError::syntax(
                    position,
                    format!("invalid escape '\\{}'", other),
                ))
            }
        }
    }
    Ok(out)
}
