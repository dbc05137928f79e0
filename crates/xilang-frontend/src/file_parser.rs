//! Loads a source file and parses it once.

use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::errors::FrontendError;
use crate::tree::ParseTree;

/// Owns the parse tree of one source file.
///
/// The first call to [`FileParser::parse`] reads and parses the file; every
/// later call returns the cached outcome, success or failure, without
/// touching the file system again. Construct a new `FileParser` to re-parse.
#[derive(Debug)]
pub struct FileParser {
    path: PathBuf,
    tree: OnceCell<Result<ParseTree, FrontendError>>,
}

impl FileParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tree: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`FileParser::parse`] has already run.
    pub fn is_parsed(&self) -> bool {
        self.tree.get().is_some()
    }

    pub fn parse(&self) -> Result<&ParseTree, FrontendError> {
        self.tree
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn load(&self) -> Result<ParseTree, FrontendError> {
        let start = Instant::now();
        let source = fs::read_to_string(&self.path).map_err(|e| FrontendError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let bytes = source.len();
        let tree = ParseTree::parse(source)?;
        tracing::debug!(
            "parsed {} ({} bytes, {} nodes) in {:?}",
            self.path.display(),
            bytes,
            tree.len(),
            start.elapsed()
        );
        Ok(tree)
    }
}
