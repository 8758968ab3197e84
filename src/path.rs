//! Key paths for locating values in nested documents.
//!
//! This module provides [`KeyPath`] and [`PathSegment`] for building dotted
//! paths to values in nested document structures (e.g. `user.tags.0`).

use std::fmt::{self, Display};

/// A segment of a key path.
///
/// Paths are built from segments that represent either a field key or a
/// list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/key access (e.g. `user`, `email`)
    Key(String),
    /// A list index access (e.g. `0`, `42`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A dotted path to a value in a nested document.
///
/// `KeyPath` represents locations like `user.tags.0` and provides methods
/// for building paths incrementally. List indices render as plain dotted
/// segments, matching the key-path convention of error records.
///
/// # Example
///
/// ```rust
/// use docshape::KeyPath;
///
/// let path = KeyPath::root().push_key("user").push_key("tags").push_index(0);
/// assert_eq!(path.to_string(), "user.tags.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single key segment.
    pub fn from_key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// Returns a new path with a key segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                PathSegment::Key(name) => write!(f, "{}", name)?,
                PathSegment::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let path = KeyPath::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_single_key() {
        let path = KeyPath::root().push_key("user");
        assert_eq!(path.to_string(), "user");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_nested_keys() {
        let path = KeyPath::root().push_key("user").push_key("email");
        assert_eq!(path.to_string(), "user.email");
    }

    #[test]
    fn test_index_renders_dotted() {
        let path = KeyPath::root().push_key("tags").push_index(3);
        assert_eq!(path.to_string(), "tags.3");
    }

    #[test]
    fn test_deeply_nested() {
        let path = KeyPath::root()
            .push_key("body")
            .push_key("items")
            .push_index(0)
            .push_key("name");
        assert_eq!(path.to_string(), "body.items.0.name");
    }

    #[test]
    fn test_path_immutability() {
        let base = KeyPath::root().push_key("users");
        let path_a = base.push_index(0);
        let path_b = base.push_index(1);

        assert_eq!(base.to_string(), "users");
        assert_eq!(path_a.to_string(), "users.0");
        assert_eq!(path_b.to_string(), "users.1");
    }

    #[test]
    fn test_last_segment() {
        let path = KeyPath::root().push_key("tags").push_index(0);
        assert_eq!(path.last(), Some(&PathSegment::Index(0)));
        assert_eq!(KeyPath::root().last(), None);
    }

    #[test]
    fn test_equality() {
        let path1 = KeyPath::root().push_key("a").push_index(0);
        let path2 = KeyPath::root().push_key("a").push_index(0);
        let path3 = KeyPath::root().push_key("a").push_index(1);

        assert_eq!(path1, path2);
        assert_ne!(path1, path3);
    }
}
