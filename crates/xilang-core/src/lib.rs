//! # Xilang Core
//!
//! Value types shared by every stage of the xilang compiler.

pub mod errors;
pub mod path;

// Re-export commonly used types
pub use errors::RangeError;
pub use path::{Path, PathBuf, PathSeg};
