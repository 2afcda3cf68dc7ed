//! Maps 3D points onto the plane of a triangle by dropping whichever
//! axis its normal is most aligned with.

use kigumi_math::{Point2, Point3, Triangle3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    Xy,
    Xz,
    Yx,
    Yz,
    Zx,
    Zy,
}

/// A fixed 3D-to-2D projection chosen once from a triangle's normal, so
/// that every point projected through it keeps a non-degenerate image
/// (the dropped axis is never the one the triangle is nearly
/// perpendicular to).
#[derive(Debug, Clone, Copy)]
pub struct PointProjector {
    projection: Projection,
}

impl PointProjector {
    /// Choose a projection for `triangle` based on its dominant normal
    /// component.
    pub fn for_triangle(triangle: Triangle3) -> Self {
        let n = triangle.normal();
        let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
        let projection = if ax >= ay && ax >= az {
            if n.x >= 0.0 {
                Projection::Yz
            } else {
                Projection::Zy
            }
        } else if ay >= ax && ay >= az {
            if n.y >= 0.0 {
                Projection::Zx
            } else {
                Projection::Xz
            }
        } else if n.z >= 0.0 {
            Projection::Xy
        } else {
            Projection::Yx
        };
        Self { projection }
    }

    /// Project a 3D point through this projector.
    pub fn project(&self, p: Point3) -> Point2 {
        match self.projection {
            Projection::Xy => Point2::new(p.x, p.y),
            Projection::Xz => Point2::new(p.x, p.z),
            Projection::Yx => Point2::new(p.y, p.x),
            Projection::Yz => Point2::new(p.y, p.z),
            Projection::Zx => Point2::new(p.z, p.x),
            Projection::Zy => Point2::new(p.z, p.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_dominant_normal_projects_to_xy() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let projector = PointProjector::for_triangle(tri);
        let p = projector.project(Point3::new(2.0, 3.0, 4.0));
        assert_eq!(p, Point2::new(2.0, 3.0));
    }

    #[test]
    fn test_projection_is_non_degenerate_for_the_source_triangle() {
        let tri = Triangle3::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(1.0, 0.0, 5.0),
            Point3::new(0.0, 1.0, 6.0),
        );
        let projector = PointProjector::for_triangle(tri);
        let a = projector.project(tri.p);
        let b = projector.project(tri.q);
        let c = projector.project(tri.r);
        let area2 = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        assert!(area2.abs() > 1e-12);
    }
}
