//! Wraps a [`spade`] constrained Delaunay triangulation over one face's
//! plane, re-emitting the refined face set as 3D triangles once
//! corefinement has inserted every intersection it found against this
//! face.

use spade::{ConstrainedDelaunayTriangulation, HasPosition, Point2 as SpadePoint2, Triangulation};

use kigumi_math::{Point3, Triangle3};

use crate::projector::PointProjector;

/// Errors raised while feeding constraints into a [`Triangulator`].
#[derive(Debug, thiserror::Error)]
pub enum TriangulateError {
    /// The new constraint edge would cross a constraint already present;
    /// inserting it would leave the triangulation inconsistent, so the
    /// caller should drop it (corefinement does, same as the library
    /// this crate is modeled on).
    #[error("constraint would cross an existing constraint edge")]
    IntersectingConstraint,
}

/// A handle to a vertex inserted into a [`Triangulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexHandle(spade::FixedVertexHandle);

#[derive(Clone, Copy, PartialEq)]
struct TriVertex {
    position: SpadePoint2<f64>,
    original: Point3,
}

impl HasPosition for TriVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint2<f64> {
        self.position
    }
}

/// Constrained Delaunay triangulation of one triangular face, refined by
/// inserting the points and segments where other faces cross it.
pub struct Triangulator {
    cdt: ConstrainedDelaunayTriangulation<TriVertex>,
    projector: PointProjector,
}

impl Triangulator {
    /// Start a triangulator seeded with `triangle`'s own three corners.
    pub fn new(triangle: Triangle3) -> Self {
        let projector = PointProjector::for_triangle(triangle);
        let mut t = Self {
            cdt: ConstrainedDelaunayTriangulation::new(),
            projector,
        };
        t.insert(triangle.p);
        t.insert(triangle.q);
        t.insert(triangle.r);
        t
    }

    /// Insert a point (projecting it into this face's 2D frame first),
    /// returning its handle. Inserting the same point twice returns the
    /// same handle; `spade` deduplicates by position.
    pub fn insert(&mut self, p: Point3) -> VertexHandle {
        let projected = self.projector.project(p);
        let position = SpadePoint2::new(projected.x, projected.y);
        let vertex = TriVertex { position, original: p };
        let fixed = self
            .cdt
            .insert(vertex)
            .expect("triangulation point coordinates must be finite");
        VertexHandle(fixed)
    }

    /// Constrain the triangulation to keep an edge between `a` and `b`.
    ///
    /// If the new edge would cross a constraint already inserted, the
    /// request is rejected rather than corrupting the triangulation —
    /// same policy as the corefinement loop this feeds, which is built
    /// to tolerate a dropped constraint from a near-degenerate input.
    pub fn insert_constraint(
        &mut self,
        a: VertexHandle,
        b: VertexHandle,
    ) -> Result<(), TriangulateError> {
        if a.0 == b.0 {
            return Ok(());
        }
        if !self.cdt.can_add_constraint(a.0, b.0) {
            return Err(TriangulateError::IntersectingConstraint);
        }
        self.cdt.add_constraint(a.0, b.0);
        Ok(())
    }

    /// The triangles of the refined triangulation, in 3D.
    pub fn triangles(&self) -> Vec<Triangle3> {
        self.cdt
            .inner_faces()
            .map(|face| {
                let [v0, v1, v2] = face.vertices();
                Triangle3::new(
                    v0.data().original,
                    v1.data().original,
                    v2.data().original,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_math::Point3;

    #[test]
    fn test_seed_triangle_alone_yields_one_triangle() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let t = Triangulator::new(tri);
        assert_eq!(t.triangles().len(), 1);
    }

    #[test]
    fn test_interior_point_splits_into_three() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );
        let mut t = Triangulator::new(tri);
        t.insert(Point3::new(1.0, 1.0, 0.0));
        assert_eq!(t.triangles().len(), 3);
    }

    #[test]
    fn test_constraint_segment_is_kept() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        );
        let mut t = Triangulator::new(tri);
        let a = t.insert(Point3::new(1.0, 0.5, 0.0));
        let b = t.insert(Point3::new(0.5, 1.0, 0.0));
        assert!(t.insert_constraint(a, b).is_ok());
        assert!(t.triangles().len() >= 3);
    }
}
