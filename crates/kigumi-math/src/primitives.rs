//! Segments, triangles, rays, planes, and axis-aligned bounding boxes.

use crate::predicates::{orient3d, Sign};
use crate::{Point3, Vector3};

/// An axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Bbox3 {
    /// Bounding box of a single point (zero volume).
    pub fn from_point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest bbox containing both `self` and `other`.
    pub fn union(self, other: Bbox3) -> Bbox3 {
        Bbox3 {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Whether `self` and `other` overlap (touching counts as overlapping).
    pub fn overlaps(&self, other: &Bbox3) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Minimum coordinate along axis `i`.
    pub fn min_coord(&self, i: usize) -> f64 {
        self.min.coord(i)
    }

    /// Maximum coordinate along axis `i`.
    pub fn max_coord(&self, i: usize) -> f64 {
        self.max.coord(i)
    }

    /// The axis (0, 1, or 2) along which this box is longest.
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        let ext = [d.x.abs(), d.y.abs(), d.z.abs()];
        if ext[0] >= ext[1] && ext[0] >= ext[2] {
            0
        } else if ext[1] >= ext[2] {
            1
        } else {
            2
        }
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3 {
    /// Segment source.
    pub source: Point3,
    /// Segment target.
    pub target: Point3,
}

impl Segment3 {
    /// Create a new segment.
    pub fn new(source: Point3, target: Point3) -> Self {
        Self { source, target }
    }

    /// Bounding box of the segment.
    pub fn bbox(&self) -> Bbox3 {
        Bbox3::from_point(self.source).union(Bbox3::from_point(self.target))
    }
}

/// A triangle given by its three corners, `(p, q, r)`.
///
/// The cyclic order `p, q, r` encodes orientation: looking from the side
/// the normal `(q-p) × (r-p)` points to, the triangle winds
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3 {
    /// First vertex.
    pub p: Point3,
    /// Second vertex.
    pub q: Point3,
    /// Third vertex.
    pub r: Point3,
}

impl Triangle3 {
    /// Create a new triangle.
    pub fn new(p: Point3, q: Point3, r: Point3) -> Self {
        Self { p, q, r }
    }

    /// Vertex by index (0, 1, or 2).
    pub fn vertex(&self, i: usize) -> Point3 {
        match i {
            0 => self.p,
            1 => self.q,
            2 => self.r,
            _ => panic!("triangle vertex index out of range: {i}"),
        }
    }

    /// Bounding box of the triangle.
    pub fn bbox(&self) -> Bbox3 {
        Bbox3::from_point(self.p)
            .union(Bbox3::from_point(self.q))
            .union(Bbox3::from_point(self.r))
    }

    /// The (non-unit) normal vector `(q-p) × (r-p)`.
    pub fn normal(&self) -> Vector3 {
        normal(self.p, self.q, self.r)
    }

    /// A triangle is degenerate if its three corners are collinear
    /// (including the case of repeated vertices).
    pub fn is_degenerate(&self) -> bool {
        crate::predicates::collinear(self.p, self.q, self.r)
    }

    /// The plane through the triangle's three corners, oriented so its
    /// normal matches [`Triangle3::normal`].
    pub fn supporting_plane(&self) -> Plane3 {
        Plane3::through_points(self.p, self.q, self.r)
    }
}

/// The (non-unit, right-hand-rule) normal of the triangle `p, q, r`.
pub fn normal(p: Point3, q: Point3, r: Point3) -> Vector3 {
    (q - p).cross(r - p)
}

/// Squared Euclidean distance between two points.
pub fn squared_distance(p: Point3, q: Point3) -> f64 {
    (q - p).squared_length()
}

/// A ray starting at `source` and passing through `through` (and beyond).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3 {
    /// Ray origin.
    pub source: Point3,
    /// A second point on the ray, defining its direction.
    pub through: Point3,
}

impl Ray3 {
    /// Create a ray from `source` through `through`.
    pub fn new(source: Point3, through: Point3) -> Self {
        Self { source, through }
    }

    /// Direction vector of the ray (not normalized).
    pub fn direction(&self) -> Vector3 {
        self.through - self.source
    }

    /// Point at parameter `t` along the ray (`t = 0` is `source`, `t = 1`
    /// is `through`).
    pub fn at(&self, t: f64) -> Point3 {
        self.source.lerp(self.through, t)
    }
}

/// A plane, represented by a point on the plane and a normal vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3 {
    /// A point on the plane.
    pub point: Point3,
    /// The plane's normal vector (not necessarily unit length).
    pub normal: Vector3,
}

impl Plane3 {
    /// Create a plane from a point and a normal vector.
    pub fn new(point: Point3, normal: Vector3) -> Self {
        Self { point, normal }
    }

    /// The plane through three points, oriented by their winding.
    pub fn through_points(p: Point3, q: Point3, r: Point3) -> Self {
        Self::new(p, normal(p, q, r))
    }

    /// Which side of the plane `p` is on.
    ///
    /// `Positive` is the side the normal points to, `Negative` the
    /// opposite side, `Zero` means `p` lies on the plane.
    pub fn oriented_side(&self, p: Point3) -> Sign {
        // orient3d(a, b, c, d) is positive when d is "below" the plane
        // a,b,c (i.e. opposite the normal (b-a)x(c-a)); negate it so that
        // Positive here means "on the side the normal points to".
        let a = self.point;
        let b = a + self.normal.orthogonal_basis().0;
        let c = a + self.normal.orthogonal_basis().1;
        match orient3d(a, b, c, p) {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
        }
    }

    /// Two vectors spanning the plane (the plane's 2D basis), used by the
    /// faces-around-edge classifier to project a third vertex into the
    /// edge's local 2D frame.
    pub fn base(&self) -> (Vector3, Vector3) {
        self.normal.orthogonal_basis()
    }
}

impl Vector3 {
    /// An arbitrary pair of vectors orthogonal to `self` and to each
    /// other, spanning the plane perpendicular to `self`.
    pub fn orthogonal_basis(self) -> (Vector3, Vector3) {
        // Pick whichever axis is least aligned with `self` to cross
        // against, to avoid a near-zero cross product.
        let ax = self.abs();
        let helper = if ax.x <= ax.y && ax.x <= ax.z {
            Vector3::new(1.0, 0.0, 0.0)
        } else if ax.y <= ax.z {
            Vector3::new(0.0, 1.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };
        let u = self.cross(helper);
        let v = self.cross(u);
        (u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_overlap() {
        let a = Bbox3 {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let b = Bbox3 {
            min: Point3::new(0.5, 0.5, 0.5),
            max: Point3::new(1.5, 1.5, 1.5),
        };
        let c = Bbox3 {
            min: Point3::new(2.0, 2.0, 2.0),
            max: Point3::new(3.0, 3.0, 3.0),
        };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_triangle_degenerate() {
        let p = Point3::new(0.0, 0.0, 0.0);
        let q = Point3::new(1.0, 0.0, 0.0);
        let r = Point3::new(2.0, 0.0, 0.0);
        assert!(Triangle3::new(p, q, r).is_degenerate());
        let s = Point3::new(0.0, 1.0, 0.0);
        assert!(!Triangle3::new(p, q, s).is_degenerate());
    }

    #[test]
    fn test_oriented_side() {
        let plane = Plane3::through_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(
            plane.oriented_side(Point3::new(0.0, 0.0, 1.0)),
            Sign::Positive
        );
        assert_eq!(
            plane.oriented_side(Point3::new(0.0, 0.0, -1.0)),
            Sign::Negative
        );
        assert_eq!(
            plane.oriented_side(Point3::new(0.5, 0.5, 0.0)),
            Sign::Zero
        );
    }
}
