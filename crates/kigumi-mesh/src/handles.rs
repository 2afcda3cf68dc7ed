//! Lightweight index handles into a mesh's vertex and face arrays.

use std::fmt;

/// A handle to a vertex in a [`crate::Mesh`] or [`crate::PointInterner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexHandle(pub u32);

impl fmt::Display for VertexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A handle to a face in a [`crate::Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceHandle(pub u32);

impl fmt::Display for FaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// An unordered pair of vertex handles identifying an edge, normalized so
/// the smaller handle always comes first — two edges compare equal
/// regardless of which direction they were walked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(pub VertexHandle, pub VertexHandle);

impl Edge {
    /// Build the normalized edge between `a` and `b`.
    pub fn new(a: VertexHandle, b: VertexHandle) -> Self {
        if a.0 <= b.0 {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }
}
