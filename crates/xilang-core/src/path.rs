//! # Qualified Paths
//!
//! A qualified name such as `a::b::C<T>` is stored as a [`PathBuf`]: an
//! append-only list of [`PathSeg`]s, each an identifier with an optional list
//! of generic arguments. A [`Path`] is a borrowed `[begin, end)` window onto a
//! `PathBuf` and is what most consumers take.
//!
//! Only ASCII identifiers are supported.
//!
//! ## Rendering
//!
//! Every segment is rendered with a leading `::`. The one exception is the
//! relative marker `.`: while it is part of the run of markers that starts a
//! path it is written bare, so `[".", ".", "a"]` renders as `..::a`.
//!
//! ```
//! use xilang_core::path::{PathBuf, PathSeg};
//!
//! let mut path = PathBuf::new();
//! path.push(PathSeg::new("a"));
//! path.push(PathSeg::new("b"));
//! assert_eq!(path.to_string(), "::a::b");
//! assert_eq!(path.range(1, 2).unwrap().to_string(), "::b");
//! ```

use std::fmt;
use std::slice;

use serde::Serialize;

use crate::errors::RangeError;

/// Identifier of the relative-path marker segment.
pub const RELATIVE_MARKER: &str = ".";

/// One component of a qualified path.
///
/// `generics` distinguishes "no argument list" (`None`) from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathSeg {
    id: String,
    generics: Option<Vec<PathBuf>>,
}

impl PathSeg {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            generics: None,
        }
    }

    pub fn with_generics(id: impl Into<String>, generics: Vec<PathBuf>) -> Self {
        Self {
            id: id.into(),
            generics: Some(generics),
        }
    }

    /// The leading `.` segment of a relative path.
    pub fn relative_marker() -> Self {
        Self::new(RELATIVE_MARKER)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generics(&self) -> Option<&[PathBuf]> {
        self.generics.as_deref()
    }

    pub fn is_relative_marker(&self) -> bool {
        self.id == RELATIVE_MARKER
    }
}

/// Owning, append-only sequence of path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PathBuf {
    segs: Vec<PathSeg>,
}

impl PathBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment. Segments are never reordered or removed.
    pub fn push(&mut self, seg: PathSeg) {
        self.segs.push(seg);
    }

    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    pub fn get(&self, n: usize) -> Option<&PathSeg> {
        self.segs.get(n)
    }

    pub fn segments(&self) -> &[PathSeg] {
        &self.segs
    }

    /// The innermost segment, `None` for an empty path.
    pub fn last(&self) -> Option<&PathSeg> {
        self.segs.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, PathSeg> {
        self.segs.iter()
    }

    /// View over every segment.
    pub fn as_path(&self) -> Path<'_> {
        Path {
            buf: self,
            begin: 0,
            end: self.segs.len(),
        }
    }

    /// View over segments `[begin, end)`.
    pub fn range(&self, begin: usize, end: usize) -> Result<Path<'_>, RangeError> {
        self.as_path().range(begin, end)
    }

    /// View over segments `[0, end)`.
    pub fn range_to(&self, end: usize) -> Result<Path<'_>, RangeError> {
        self.range(0, end)
    }
}

impl FromIterator<PathSeg> for PathBuf {
    fn from_iter<I: IntoIterator<Item = PathSeg>>(iter: I) -> Self {
        Self {
            segs: iter.into_iter().collect(),
        }
    }
}

impl Extend<PathSeg> for PathBuf {
    fn extend<I: IntoIterator<Item = PathSeg>>(&mut self, iter: I) {
        self.segs.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PathBuf {
    type Item = &'a PathSeg;
    type IntoIter = slice::Iter<'a, PathSeg>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_path(), f)
    }
}

/// Borrowed half-open window `[begin, end)` onto a [`PathBuf`].
///
/// Indices are stored relative to the owner, so a view taken from a view
/// still points into the original buffer.
#[derive(Debug, Clone, Copy)]
pub struct Path<'a> {
    buf: &'a PathBuf,
    begin: usize,
    end: usize,
}

impl<'a> Path<'a> {
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn segments(&self) -> &'a [PathSeg] {
        &self.buf.segs[self.begin..self.end]
    }

    pub fn get(&self, n: usize) -> Option<&'a PathSeg> {
        self.segments().get(n)
    }

    /// The innermost segment, `None` for an empty view.
    pub fn last(&self) -> Option<&'a PathSeg> {
        self.segments().last()
    }

    pub fn iter(&self) -> slice::Iter<'a, PathSeg> {
        self.segments().iter()
    }

    /// Sub-view over `[begin, end)` of this view, re-based onto the owner.
    ///
    /// Fails when `begin >= end` or `end` exceeds this view's length.
    pub fn range(&self, begin: usize, end: usize) -> Result<Path<'a>, RangeError> {
        RangeError::check(begin, end, self.len())?;
        Ok(Path {
            buf: self.buf,
            begin: self.begin + begin,
            end: self.begin + end,
        })
    }

    pub fn range_to(&self, end: usize) -> Result<Path<'a>, RangeError> {
        self.range(0, end)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.iter().cloned().collect()
    }
}

impl PartialEq for Path<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for Path<'_> {}

impl<'a> IntoIterator for Path<'a> {
    type Item = &'a PathSeg;
    type IntoIter = slice::Iter<'a, PathSeg>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Path<'_>> for PathBuf {
    fn from(path: Path<'_>) -> Self {
        path.to_path_buf()
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut leading = true;
        for seg in self.iter() {
            if leading && seg.is_relative_marker() {
                f.write_str(RELATIVE_MARKER)?;
                continue;
            }
            leading = false;
            write!(f, "::{}", seg.id)?;
            if let Some(generics) = seg.generics().filter(|g| !g.is_empty()) {
                f.write_str("<")?;
                for (i, g) in generics.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", g)?;
                }
                f.write_str(">")?;
            }
        }
        Ok(())
    }
}
