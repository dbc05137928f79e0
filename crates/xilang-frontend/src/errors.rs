//! Error types for parsing and lowering.

use std::fmt;

use thiserror::Error;

use crate::grammar::Rule;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<(usize, usize)> for SourcePosition {
    /// Converts a pest `(line, column)` pair, saturating on absurdly long files.
    fn from((line, column): (usize, usize)) -> Self {
        Self {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Coarse classification of a [`FrontendError`], used by tooling to decide
/// whether to report, skip or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The source text does not match the grammar.
    Syntax,
    /// The source parsed, but a construct in it has no lowering yet.
    Unsupported,
    /// The grammar and the lowering disagree. Always a compiler bug.
    Internal,
    /// The source could not be loaded.
    Io,
}

/// Errors that can occur while parsing a file or lowering its parse tree.
///
/// `Clone` so that a cached failure can be handed out again.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrontendError {
    /// The grammar failed to match. `position` is the furthest point reached.
    #[error("syntax error at {position}: {message}")]
    Syntax {
        position: SourcePosition,
        message: String,
    },

    /// A construct that parses but cannot be lowered to an AST yet.
    #[error("not implemented at {position}: {construct}")]
    NotImplemented {
        construct: &'static str,
        position: SourcePosition,
    },

    /// Lowering met a node it does not expect.
    #[error("internal error at {position} ({rule:?}): {message}")]
    Internal {
        message: String,
        rule: Rule,
        position: SourcePosition,
    },

    /// Reading the source file failed.
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
}

impl FrontendError {
    pub fn syntax(position: SourcePosition, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn internal(rule: Rule, position: SourcePosition, message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            rule,
            position,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Syntax { .. } => ErrorClass::Syntax,
            Self::NotImplemented { .. } => ErrorClass::Unsupported,
            Self::Internal { .. } => ErrorClass::Internal,
            Self::Io { .. } => ErrorClass::Io,
        }
    }

    /// Source position of the error, if it has one.
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::Syntax { position, .. }
            | Self::NotImplemented { position, .. }
            | Self::Internal { position, .. } => Some(*position),
            Self::Io { .. } => None,
        }
    }
}

impl From<pest::error::Error<Rule>> for FrontendError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let position = match e.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        Self::Syntax {
            position: position.into(),
            message: e.variant.message().into_owned(),
        }
    }
}
