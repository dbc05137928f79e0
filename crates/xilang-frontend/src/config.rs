//! Driver configuration.

use std::path::{Path, PathBuf};

use crate::file_parser::FileParser;

/// Name of the default cache directory, created next to the entry file.
pub const DEFAULT_CACHE_DIR: &str = ".xicache";

/// What the driver was asked to do.
///
/// `compile` and `no_sys` are carried for the later pipeline stages; the
/// front end itself only consults `entry`, `dump_ast` and `cache_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source file to start from.
    pub entry: PathBuf,
    /// Emit bytecode only, do not run.
    pub compile: bool,
    /// Dump the parse tree as DOT and JSON into `cache_dir`.
    pub dump_ast: bool,
    /// Do not load the system modules.
    pub no_sys: bool,
    pub cache_dir: PathBuf,
}

impl Config {
    /// Configuration with every flag off and the default cache directory.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        let entry = entry.into();
        let cache_dir = default_cache_dir(&entry);
        Self {
            entry,
            compile: false,
            dump_ast: false,
            no_sys: false,
            cache_dir,
        }
    }

    pub fn entry_parser(&self) -> FileParser {
        FileParser::new(&self.entry)
    }

    /// File stem of the entry, used to name dump files.
    pub fn entry_stem(&self) -> String {
        self.entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "main".to_string())
    }
}

/// `.xicache` in the directory containing `entry`.
pub fn default_cache_dir(entry: &Path) -> PathBuf {
    entry
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_CACHE_DIR)
}
