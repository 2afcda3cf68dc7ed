//! Deduplicating table from exact points to dense vertex handles.

use std::collections::HashMap;

use kigumi_math::Point3;

use crate::VertexHandle;

/// A bitwise key for a [`Point3`], used because `f64` has no `Eq`/`Hash`
/// impl. Two points with bit-identical coordinates are always the same
/// key; this is intentional — the interner's bijection invariant is
/// defined on exact coordinate equality, not approximate proximity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey(u64, u64, u64);

impl PointKey {
    fn new(p: Point3) -> Self {
        PointKey(p.x.to_bits(), p.y.to_bits(), p.z.to_bits())
    }
}

/// Interns [`Point3`] values into dense [`VertexHandle`]s.
///
/// Every distinct bit pattern gets its own handle; inserting the same
/// point twice returns the same handle (I5: the point-to-handle map is a
/// bijection on distinct points actually present in the mesh).
#[derive(Default)]
pub struct PointInterner {
    points: Vec<Point3>,
    index: HashMap<PointKey, VertexHandle>,
}

impl PointInterner {
    /// An empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `p`, returning its handle (new or pre-existing).
    pub fn insert(&mut self, p: Point3) -> VertexHandle {
        let key = PointKey::new(p);
        if let Some(&handle) = self.index.get(&key) {
            return handle;
        }
        let handle = VertexHandle(self.points.len() as u32);
        self.points.push(p);
        self.index.insert(key, handle);
        handle
    }

    /// The point a handle refers to.
    pub fn get(&self, handle: VertexHandle) -> Point3 {
        self.points[handle.0 as usize]
    }

    /// Number of distinct points interned so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no points have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume the interner, returning its points in handle order.
    pub fn into_vec(self) -> Vec<Point3> {
        self.points
    }
}
