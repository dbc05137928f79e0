//! # Abstract Syntax Tree
//!
//! Typed payloads attached to parse-tree nodes by [`ParseTree::data`].
//!
//! ## Structure
//!
//! Every payload kind is a variant of [`Ast`]. Payloads never own other
//! payloads: a declaration refers to its members through [`Handle`]s and
//! [`HandleList`]s, which are typed [`NodeId`]s into the same tree. Resolving
//! a handle lowers the target node if it has not been lowered yet.
//!
//! A translation unit consists of:
//! - **Uses**: `use a::b as c;`
//! - **Interfaces**, **structs** and **enums** with generic parameters,
//!   attributes, fields or variants, free functions and methods
//! - **Functions**: free `fn` items
//! - **Globals**: `const` items
//!
//! Qualified names are stored as [`PathBuf`]s from `xilang-core`.

use std::fmt;
use std::marker::PhantomData;

use xilang_core::PathBuf;

use crate::errors::FrontendError;
use crate::tree::{NodeId, ParseTree};

/// A payload kind that can be extracted from an [`Ast`].
pub trait AstKind: Sized + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    fn from_ast(ast: &Ast) -> Option<&Self>;
}

/// Typed reference to the payload of another node.
pub struct Handle<T> {
    id: NodeId,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<T: AstKind> Handle<T> {
    pub fn get<'t>(&self, tree: &'t ParseTree) -> Result<&'t T, FrontendError> {
        tree.data_as::<T>(self.id)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

/// Ordered, typed references to sibling payloads.
///
/// This is an index over the declaring node's children, not separate storage.
pub struct HandleList<T> {
    ids: Vec<NodeId>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> HandleList<T> {
    pub(crate) fn new(ids: Vec<NodeId>) -> Self {
        Self {
            ids,
            _kind: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn handle(&self, n: usize) -> Option<Handle<T>> {
        self.ids.get(n).map(|&id| Handle::new(id))
    }
}

impl<T: AstKind> HandleList<T> {
    pub fn get<'t>(&self, tree: &'t ParseTree, n: usize) -> Option<Result<&'t T, FrontendError>> {
        self.ids.get(n).map(|&id| tree.data_as::<T>(id))
    }

    pub fn iter<'a, 't: 'a>(
        &'a self,
        tree: &'t ParseTree,
    ) -> impl Iterator<Item = Result<&'t T, FrontendError>> + 'a {
        self.ids.iter().map(move |&id| tree.data_as::<T>(id))
    }

    /// Resolves every element, failing on the first error.
    pub fn resolve<'t>(&self, tree: &'t ParseTree) -> Result<Vec<&'t T>, FrontendError> {
        self.iter(tree).collect()
    }
}

impl<T> Clone for HandleList<T> {
    fn clone(&self) -> Self {
        Self::new(self.ids.clone())
    }
}

impl<T> Default for HandleList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> PartialEq for HandleList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl<T> fmt::Debug for HandleList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids.iter()).finish()
    }
}

/// Payload of a parse-tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    File(FileAst),
    Use(UseStmt),
    Struct(StructDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    EnumField(EnumField),
    Fn(FnDecl),
    /// A function whose first parameter is `self`.
    Method(FnDecl),
    Field(FieldDecl),
    Global(GlobalDecl),
    Param(Param),
    Attrib(Attrib),
    Type(TypeAst),
    Stmt(StmtAst),
    Expr(ExprAst),
}

impl Ast {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Ast::File(_) => FileAst::NAME,
            Ast::Use(_) => UseStmt::NAME,
            Ast::Struct(_) => StructDecl::NAME,
            Ast::Interface(_) => InterfaceDecl::NAME,
            Ast::Enum(_) => EnumDecl::NAME,
            Ast::EnumField(_) => EnumField::NAME,
            Ast::Fn(_) => FnDecl::NAME,
            Ast::Method(_) => "Method",
            Ast::Field(_) => FieldDecl::NAME,
            Ast::Global(_) => GlobalDecl::NAME,
            Ast::Param(_) => Param::NAME,
            Ast::Attrib(_) => Attrib::NAME,
            Ast::Type(_) => TypeAst::NAME,
            Ast::Stmt(_) => StmtAst::NAME,
            Ast::Expr(_) => ExprAst::NAME,
        }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::File(x) => write!(f, "{}", x),
            Ast::Use(x) => write!(f, "{}", x),
            Ast::Struct(x) => write!(f, "{}", x),
            Ast::Interface(x) => write!(f, "{}", x),
            Ast::Enum(x) => write!(f, "{}", x),
            Ast::EnumField(x) => write!(f, "{}", x),
            Ast::Fn(x) | Ast::Method(x) => write!(f, "{}", x),
            Ast::Field(x) => write!(f, "{}", x),
            Ast::Global(x) => write!(f, "{}", x),
            Ast::Param(x) => write!(f, "{}", x),
            Ast::Attrib(x) => write!(f, "{}", x),
            Ast::Type(x) => write!(f, "{}", x),
            Ast::Stmt(x) => write!(f, "{}", x),
            Ast::Expr(x) => write!(f, "{}", x),
        }
    }
}

macro_rules! ast_kind {
    ($ty:ty, $name:literal, $($variant:ident)|+) => {
        impl AstKind for $ty {
            const NAME: &'static str = $name;

            fn from_ast(ast: &Ast) -> Option<&Self> {
                match ast {
                    $(Ast::$variant(x))|+ => Some(x),
                    _ => None,
                }
            }
        }
    };
}

ast_kind!(FileAst, "File", File);
ast_kind!(UseStmt, "UseStmt", Use);
ast_kind!(StructDecl, "Struct", Struct);
ast_kind!(InterfaceDecl, "Interface", Interface);
ast_kind!(EnumDecl, "Enum", Enum);
ast_kind!(EnumField, "EnumField", EnumField);
ast_kind!(FnDecl, "Fn", Fn | Method);
ast_kind!(FieldDecl, "Field", Field);
ast_kind!(GlobalDecl, "Global", Global);
ast_kind!(Param, "Param", Param);
ast_kind!(Attrib, "Attrib", Attrib);
ast_kind!(TypeAst, "Type", Type);
ast_kind!(StmtAst, "Stmt", Stmt);
ast_kind!(ExprAst, "Expr", Expr);

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// The translation-unit root. Each list keeps source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileAst {
    pub uses: HandleList<UseStmt>,
    pub interfaces: HandleList<InterfaceDecl>,
    pub structs: HandleList<StructDecl>,
    pub enums: HandleList<EnumDecl>,
    pub fns: HandleList<FnDecl>,
    pub globals: HandleList<GlobalDecl>,
}

impl fmt::Display for FileAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File ({} uses, {} interfaces, {} structs, {} enums, {} fns, {} globals)",
            self.uses.len(),
            self.interfaces.len(),
            self.structs.len(),
            self.enums.len(),
            self.fns.len(),
            self.globals.len()
        )
    }
}

/// `use path (as alias)?;`
#[derive(Debug, Clone, PartialEq)]
pub struct UseStmt {
    pub path: PathBuf,
    pub alias: Option<String>,
}

impl fmt::Display for UseStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UseStmt {}", self.path)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {}", alias)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub id: String,
    pub generics: Vec<String>,
    /// Implemented interfaces.
    pub impls: Vec<PathBuf>,
    pub attribs: HandleList<Attrib>,
    pub fields: HandleList<FieldDecl>,
    pub fns: HandleList<FnDecl>,
    pub methods: HandleList<FnDecl>,
}

impl fmt::Display for StructDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Struct {}", self.id)?;
        write_generic_params(f, &self.generics)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub id: String,
    pub generics: Vec<String>,
    /// Extended interfaces.
    pub impls: Vec<PathBuf>,
    pub attribs: HandleList<Attrib>,
    pub fns: HandleList<FnDecl>,
    pub methods: HandleList<FnDecl>,
}

impl fmt::Display for InterfaceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface {}", self.id)?;
        write_generic_params(f, &self.generics)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub id: String,
    pub generics: Vec<String>,
    pub attribs: HandleList<Attrib>,
    pub fields: HandleList<EnumField>,
    pub fns: HandleList<FnDecl>,
    pub methods: HandleList<FnDecl>,
}

impl fmt::Display for EnumDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enum {}", self.id)?;
        write_generic_params(f, &self.generics)
    }
}

/// An enum variant, `Id` or `Id(Type?)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumField {
    pub id: String,
    pub ty: Option<Handle<TypeAst>>,
}

impl fmt::Display for EnumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumField {}", self.id)
    }
}

/// A free function or, when `has_self` is set, a method.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub id: String,
    pub generics: Vec<String>,
    pub attribs: HandleList<Attrib>,
    pub has_self: bool,
    /// Explicit parameters; `self` is not listed.
    pub params: HandleList<Param>,
    pub ret: Option<Handle<TypeAst>>,
    /// `None` for a declaration ending in `;`.
    pub body: Option<Handle<ExprAst>>,
}

impl fmt::Display for FnDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.has_self { "Method" } else { "Fn" };
        write!(f, "{} {}", kind, self.id)?;
        write_generic_params(f, &self.generics)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub id: String,
    pub ty: Handle<TypeAst>,
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field {}", self.id)
    }
}

/// `const id: ty = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDecl {
    pub id: String,
    pub ty: Handle<TypeAst>,
    pub value: Handle<ExprAst>,
}

impl fmt::Display for GlobalDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Global {}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub id: String,
    pub ty: Handle<TypeAst>,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param {}", self.id)
    }
}

/// One entry of `#[...]`, optionally with call-style arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Attrib {
    pub id: String,
    pub args: Option<HandleList<ExprAst>>,
}

impl fmt::Display for Attrib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attrib {}", self.id)?;
        if let Some(args) = &self.args {
            write!(f, "({} args)", args.len())?;
        }
        Ok(())
    }
}

fn write_generic_params(f: &mut fmt::Formatter<'_>, generics: &[String]) -> fmt::Result {
    if !generics.is_empty() {
        write!(f, "<{}>", generics.join(", "))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Char,
    F32,
    F64,
    ISize,
    I32,
    I64,
    USize,
    Str,
    U8,
    U32,
    U64,
}

impl ScalarType {
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Char => "char",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::ISize => "isize",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::USize => "usize",
            ScalarType::Str => "string",
            ScalarType::U8 => "u8",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Scalar(ScalarType),
    /// `Self`
    SelfType,
    Path(PathBuf),
    Tuple(HandleList<TypeAst>),
}

/// A type, optionally marked as an array by a `[]` suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAst {
    pub kind: TypeKind,
    pub is_arr: bool,
}

impl fmt::Display for TypeAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Type ")?;
        match &self.kind {
            TypeKind::Scalar(scalar) => write!(f, "{}", scalar)?,
            TypeKind::SelfType => f.write_str("Self")?,
            TypeKind::Path(path) => write!(f, "{}", path)?,
            TypeKind::Tuple(elems) => write!(f, "tuple({})", elems.len())?,
        }
        if self.is_arr {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Statements and expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StmtAst {
    Let {
        name: String,
        ty: Option<Handle<TypeAst>>,
        init: Option<Handle<ExprAst>>,
    },
    Expr(Handle<ExprAst>),
}

impl fmt::Display for StmtAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StmtAst::Let { name, .. } => write!(f, "Stmt let {}", name),
            StmtAst::Expr(_) => f.write_str("Stmt expr"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Unsigned; a leading `-` is a separate unary operator.
    Int(u64),
    Float(f64),
    Char(char),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Char(c) => write!(f, "{:?}", c),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    LogOr,
    LogAnd,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::LogOr => "||",
            BinaryOp::LogAnd => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// One link of a call/access chain.
#[derive(Debug, Clone, PartialEq)]
pub enum PostfixOp {
    /// `(args)`
    Call(HandleList<ExprAst>),
    /// `.id`
    Field(String),
    /// `::id`
    Static(String),
    /// `[expr]`
    Index(Handle<ExprAst>),
}

/// `id` or `id: expr` inside `new T { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub id: String,
    /// `None` for the shorthand form.
    pub value: Option<Handle<ExprAst>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NewInit {
    Struct(Vec<FieldInit>),
    /// Array length.
    Array(Handle<ExprAst>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: HandleList<StmtAst>,
    /// Trailing expression without `;`.
    pub tail: Option<Handle<ExprAst>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprAst {
    Literal(Literal),
    Id(String),
    /// `self`
    SelfValue,
    /// A type in value position, e.g. the callee of `i32::parse(s)`.
    Type(Handle<TypeAst>),
    /// Prefix operators in source order, outermost first.
    Unary {
        ops: Vec<UnaryOp>,
        operand: Handle<ExprAst>,
    },
    /// `operand as T1 as T2 ...`
    Cast {
        operand: Handle<ExprAst>,
        tys: Vec<Handle<TypeAst>>,
    },
    /// Left-associative chain of operators of one precedence level.
    Binary {
        first: Handle<ExprAst>,
        rest: Vec<(BinaryOp, Handle<ExprAst>)>,
    },
    Postfix {
        base: Handle<ExprAst>,
        ops: Vec<PostfixOp>,
    },
    New {
        ty: Handle<TypeAst>,
        init: NewInit,
    },
    Assign {
        lhs: Handle<ExprAst>,
        rhs: Handle<ExprAst>,
    },
    Break(Option<Handle<ExprAst>>),
    Return(Option<Handle<ExprAst>>),
    Continue,
    Block(Block),
    If {
        cond: Handle<ExprAst>,
        then: Handle<ExprAst>,
        /// A block or another `if`.
        els: Option<Handle<ExprAst>>,
    },
    While {
        cond: Handle<ExprAst>,
        body: Handle<ExprAst>,
    },
}

impl fmt::Display for ExprAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Expr ")?;
        match self {
            ExprAst::Literal(lit) => write!(f, "{}", lit),
            ExprAst::Id(id) => write!(f, "id {}", id),
            ExprAst::SelfValue => f.write_str("self"),
            ExprAst::Type(_) => f.write_str("type"),
            ExprAst::Unary { ops, .. } => {
                let ops: String = ops.iter().map(|op| op.symbol()).collect();
                write!(f, "unary {}", ops)
            }
            ExprAst::Cast { tys, .. } => write!(f, "cast({})", tys.len()),
            ExprAst::Binary { rest, .. } => {
                let ops: Vec<&str> = rest.iter().map(|(op, _)| op.symbol()).collect();
                write!(f, "binary {}", ops.join(" "))
            }
            ExprAst::Postfix { ops, .. } => write!(f, "postfix({})", ops.len()),
            ExprAst::New { init, .. } => match init {
                NewInit::Struct(fields) => write!(f, "new struct({})", fields.len()),
                NewInit::Array(_) => f.write_str("new array"),
            },
            ExprAst::Assign { .. } => f.write_str("assign"),
            ExprAst::Break(_) => f.write_str("break"),
            ExprAst::Return(_) => f.write_str("return"),
            ExprAst::Continue => f.write_str("continue"),
            ExprAst::Block(block) => write!(
                f,
                "block({} stmts{})",
                block.stmts.len(),
                if block.tail.is_some() { ", tail" } else { "" }
            ),
            ExprAst::If { els, .. } => {
                f.write_str("if")?;
                if els.is_some() {
                    f.write_str(" else")?;
                }
                Ok(())
            }
            ExprAst::While { .. } => f.write_str("while"),
        }
    }
}
