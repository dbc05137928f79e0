//! # Parse Tree
//!
//! The untyped tree produced by running [`XiParser`] over a source file.
//!
//! pest hands back a pair for every non-silent rule it matched, which is far
//! deeper than anything later stages care about: an identifier in expression
//! position is wrapped in a dozen precedence levels. [`Selection::of`] decides
//! per rule whether a pair becomes a node, is folded into its only child, or is
//! dropped, and the surviving nodes are stored in an arena owned by
//! [`ParseTree`]. Nodes refer to each other through [`NodeId`]s.
//!
//! Every node has a write-once slot for its AST payload. [`ParseTree::data`]
//! fills it on first access through [`crate::lower`] and returns the cached
//! value afterwards.
//!
//! ## Threading
//!
//! The payload slots are [`OnceCell`]s, so a tree is `Send` but not `Sync`.
//! Lowering is expected to be driven from a single thread.

use std::cell::OnceCell;
use std::fmt;
use std::ops::Range;

use pest::iterators::Pair;
use pest::Parser;

use crate::ast::{Ast, AstKind, FileAst};
use crate::errors::{FrontendError, SourcePosition};
use crate::grammar::{Rule, XiParser};
use crate::lower;

/// Index of a node in its [`ParseTree`].
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What happens to a matched rule when the tree is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// No node; children are dropped too. Used for keywords that only steer
    /// the parse and for end-of-input.
    Discard,
    /// Replaced by its child when it has exactly one, kept otherwise.
    FoldOne,
    /// Always kept, with its matched text.
    Store,
}

impl Selection {
    pub const fn of(rule: Rule) -> Self {
        match rule {
            Rule::EOI
            | Rule::kw_as
            | Rule::kw_break
            | Rule::kw_const
            | Rule::kw_else
            | Rule::kw_enum
            | Rule::kw_fn
            | Rule::kw_if
            | Rule::kw_interface
            | Rule::kw_let
            | Rule::kw_new
            | Rule::kw_return
            | Rule::kw_struct
            | Rule::kw_use
            | Rule::kw_while => Selection::Discard,

            Rule::basic_type
            | Rule::non_arr_type
            | Rule::expr
            | Rule::expr_wo_block
            | Rule::expr_w_block
            | Rule::assign_expr
            | Rule::log_or_expr
            | Rule::log_and_expr
            | Rule::eq_expr
            | Rule::comp_expr
            | Rule::add_expr
            | Rule::mul_expr
            | Rule::cast_expr
            | Rule::unary_expr
            | Rule::call_expr
            | Rule::primary_expr
            | Rule::grouped_expr
            | Rule::literal_expr => Selection::FoldOne,

            _ => Selection::Store,
        }
    }
}

/// One retained node of the parse tree.
#[derive(Debug)]
pub struct ParseTreeNode {
    rule: Rule,
    span: Range<usize>,
    position: SourcePosition,
    children: Vec<NodeId>,
    data: OnceCell<Ast>,
}

impl ParseTreeNode {
    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn is(&self, rule: Rule) -> bool {
        self.rule == rule
    }

    /// Byte range of the matched text.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Position of the first matched character.
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The payload if it has already been materialized.
    pub fn cached(&self) -> Option<&Ast> {
        self.data.get()
    }
}

/// Arena of [`ParseTreeNode`]s together with the source text they span.
#[derive(Debug)]
pub struct ParseTree {
    source: String,
    nodes: Vec<ParseTreeNode>,
    root: NodeId,
}

impl ParseTree {
    /// Parses a complete translation unit.
    ///
    /// The first mismatch aborts the parse; no partial tree is returned.
    pub fn parse(source: impl Into<String>) -> Result<Self, FrontendError> {
        let source = source.into();
        let mut pairs = XiParser::parse(Rule::file, &source)?;
        let start = SourcePosition::new(1, 1);
        let file = pairs
            .next()
            .ok_or_else(|| FrontendError::internal(Rule::file, start, "empty parse result"))?;

        let mut builder = Builder { nodes: Vec::new() };
        let root = builder.select(file)?.ok_or_else(|| {
            FrontendError::internal(Rule::file, start, "file node was not retained")
        })?;
        let nodes = builder.nodes;

        Ok(Self {
            source,
            nodes,
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of retained nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &ParseTreeNode {
        &self.nodes[id.index()]
    }

    pub fn rule(&self, id: NodeId) -> Rule {
        self.node(id).rule
    }

    pub fn position(&self, id: NodeId) -> SourcePosition {
        self.node(id).position
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Matched source text of a node, verbatim.
    pub fn text(&self, id: NodeId) -> &str {
        &self.source[self.node(id).span.clone()]
    }

    /// Node ids in depth-first, parent-before-children order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// The AST payload of a node, lowering it on first access.
    ///
    /// Lowering a node requests the payloads of whichever children it needs,
    /// so this may materialize a whole subtree.
    pub fn data(&self, id: NodeId) -> Result<&Ast, FrontendError> {
        let node = self.node(id);
        if let Some(ast) = node.data.get() {
            return Ok(ast);
        }
        let ast = lower::lower(self, id)?;
        tracing::trace!("lowered {:?} at {} into {}", node.rule, node.position, ast);
        Ok(node.data.get_or_init(|| ast))
    }

    /// The AST payload of a node as a specific kind.
    ///
    /// A kind mismatch means the grammar and the lowering disagree and is
    /// reported as [`FrontendError::Internal`].
    pub fn data_as<T: AstKind>(&self, id: NodeId) -> Result<&T, FrontendError> {
        let ast = self.data(id)?;
        T::from_ast(ast).ok_or_else(|| {
            FrontendError::internal(
                self.rule(id),
                self.position(id),
                format!("expected {} payload, found {}", T::NAME, ast.kind_name()),
            )
        })
    }

    /// The translation unit.
    pub fn file(&self) -> Result<&FileAst, FrontendError> {
        self.data_as::<FileAst>(self.root)
    }

    /// Materializes the payload of every node that has one and returns how
    /// many nodes carry a payload afterwards.
    pub fn lower_all(&self) -> Result<usize, FrontendError> {
        let mut lowered = 0;
        for id in self.preorder() {
            if lower::has_lowering(self.rule(id)) {
                self.data(id)?;
                lowered += 1;
            }
        }
        Ok(lowered)
    }
}

/// Iterator returned by [`ParseTree::preorder`].
pub struct Preorder<'t> {
    tree: &'t ParseTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

struct Builder {
    nodes: Vec<ParseTreeNode>,
}

impl Builder {
    /// Turns a pest pair into a node according to [`Selection::of`].
    ///
    /// Children are pushed before their parent, so the root ends up last.
    fn select(&mut self, pair: Pair<'_, Rule>) -> Result<Option<NodeId>, FrontendError> {
        let rule = pair.as_rule();
        let selection = Selection::of(rule);
        if selection == Selection::Discard {
            return Ok(None);
        }

        let span = pair.as_span();
        let position = SourcePosition::from(span.start_pos().line_col());
        let range = span.start()..span.end();

        let mut children = Vec::new();
        for inner in pair.into_inner() {
            if let Some(child) = self.select(inner)? {
                children.push(child);
            }
        }

        if selection == Selection::FoldOne && children.len() == 1 {
            return Ok(children.pop());
        }

        let id = u32::try_from(self.nodes.len())
            .map(NodeId)
            .map_err(|_| FrontendError::internal(rule, position, "too many parse tree nodes"))?;
        self.nodes.push(ParseTreeNode {
            rule,
            span: range,
            position,
            children,
            data: OnceCell::new(),
        });
        Ok(Some(id))
    }
}
