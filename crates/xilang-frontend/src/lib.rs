//! # Xilang Frontend
//!
//! Grammar, parse tree, and AST lowering for xilang.
//!
//! ```
//! use xilang_frontend::{ParseTree, UseStmt};
//!
//! let tree = ParseTree::parse("use a::b::C;").unwrap();
//! let file = tree.file().unwrap();
//! let use_stmt: &UseStmt = file.uses.get(&tree, 0).unwrap().unwrap();
//! assert_eq!(use_stmt.path.to_string(), "::a::b::C");
//! ```

pub mod ast;
pub mod config;
pub mod dot;
pub mod errors;
pub mod file_parser;
pub mod grammar;
pub mod lower;
pub mod tree;

// Re-export commonly used types
pub use ast::*;
pub use config::Config;
pub use errors::{ErrorClass, FrontendError, SourcePosition};
pub use file_parser::FileParser;
pub use grammar::{Rule, XiParser};
pub use tree::{NodeId, ParseTree, ParseTreeNode, Selection};
