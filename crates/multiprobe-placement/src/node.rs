//! Node identifiers.

use std::borrow::Borrow;
use std::fmt;

/// Unique, human-readable identifier of a node.
///
/// Ordering is byte-lexicographic on the UTF-8 representation. The selector
/// visits nodes in this order, which makes tie-breaks independent of the
/// order nodes were added in.
#[derive(Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node ID from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the raw bytes that are appended to keys before probing.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consume the ID and return the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for NodeId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
