//! Exact-predicate intersection tests between triangles and between a
//! triangle and a ray.
//!
//! Classification (whether the two primitives meet, and in what
//! dimension) is driven by [`crate::predicates::orient3d`] sign tests.
//! The actual intersection points are then built with plain `f64`
//! interpolation along the already-classified line or plane, in keeping
//! with this crate's "exact predicates, inexact constructions" design.

use crate::predicates::{orient3d, Sign};
use crate::{Plane3, Point2, Point3, Ray3, Triangle3, Vector2, Vector3};

/// The result of intersecting two triangles.
///
/// Mirrors the shape of `CGAL::intersection(Triangle_3, Triangle_3)`:
/// two triangles can meet in nothing, a point, a segment, a triangle (one
/// contained in the other's plane), or a general convex polygon of 4 to
/// 6 vertices (the overlap of two coplanar triangles).
#[derive(Debug, Clone, PartialEq)]
pub enum TriangleIntersection {
    /// The triangles do not meet.
    Empty,
    /// The triangles meet at a single point.
    Point(Point3),
    /// The triangles meet along a segment.
    Segment(Point3, Point3),
    /// The triangles are coplanar and one fully covers the other (or
    /// their overlap happens to be triangular).
    Triangle(Point3, Point3, Point3),
    /// The triangles are coplanar and overlap in a convex polygon of 4
    /// to 6 vertices, listed in order around the boundary.
    Polygon(Vec<Point3>),
}

/// The result of intersecting a triangle with a ray.
#[derive(Debug, Clone, PartialEq)]
pub enum RayIntersection {
    /// The ray does not meet the triangle.
    Empty,
    /// The ray meets the triangle at a single point.
    Point(Point3),
    /// The ray lies in the triangle's plane and overlaps it along a
    /// segment.
    Segment(Point3, Point3),
}

fn classify_signs(tri: Triangle3, plane: Plane3) -> [Sign; 3] {
    [
        plane.oriented_side(tri.p),
        plane.oriented_side(tri.q),
        plane.oriented_side(tri.r),
    ]
}

/// `true` if `signs` has at least one strictly positive and one strictly
/// negative entry, meaning the triangle properly straddles the plane.
fn straddles(signs: [Sign; 3]) -> bool {
    let has_pos = signs.iter().any(|s| *s == Sign::Positive);
    let has_neg = signs.iter().any(|s| *s == Sign::Negative);
    has_pos && has_neg
}

fn all_zero(signs: [Sign; 3]) -> bool {
    signs.iter().all(|s| *s == Sign::Zero)
}

/// Groups a vertex's sign into "negative" or "not negative" (zero counts
/// as not-negative), so that a straddling triangle always splits 2-1.
fn is_neg(s: Sign) -> bool {
    s == Sign::Negative
}

/// Find the index of the triangle vertex alone in its sign group (the
/// other two share the opposite group). Triangle must straddle the
/// plane (checked by the caller via [`straddles`] on the raw signs, but
/// grouping here ignores `Zero` by folding it into the non-negative
/// group).
fn isolated_vertex(signs: [Sign; 3]) -> Option<usize> {
    let groups = [is_neg(signs[0]), is_neg(signs[1]), is_neg(signs[2])];
    if groups[0] == groups[1] && groups[1] == groups[2] {
        return None;
    }
    Some(if groups[0] != groups[1] && groups[0] != groups[2] {
        0
    } else if groups[1] != groups[0] && groups[1] != groups[2] {
        1
    } else {
        2
    })
}

fn signed_distance(plane: Plane3, p: Point3) -> f64 {
    plane.normal.dot(p - plane.point)
}

/// The two points where `tri`'s boundary crosses `plane`, given that
/// `tri` straddles it. Returned together with their scalar position
/// along `axis` (projection of the crossing point onto `axis`), used by
/// the caller to order the two triangles' crossing segments along the
/// planes' intersection line.
fn crossing_segment(tri: Triangle3, plane: Plane3, axis: Vector3) -> [(f64, Point3); 2] {
    let idx = isolated_vertex(classify_signs(tri, plane))
        .expect("crossing_segment called on a non-straddling triangle");
    let iso = tri.vertex(idx);
    let others = [tri.vertex((idx + 1) % 3), tri.vertex((idx + 2) % 3)];
    let d_iso = signed_distance(plane, iso);
    others.map(|other| {
        let d_other = signed_distance(plane, other);
        let t = d_iso / (d_iso - d_other);
        let p = iso.lerp(other, t);
        (axis.dot(p - Point3::origin()), p)
    })
}

/// Intersect two triangles.
pub fn intersect_triangles(t1: Triangle3, t2: Triangle3) -> TriangleIntersection {
    let plane1 = t1.supporting_plane();
    let plane2 = t2.supporting_plane();

    let signs2 = classify_signs(t2, plane1);
    let signs1 = classify_signs(t1, plane2);

    if all_zero(signs2) && all_zero(signs1) {
        return coplanar_intersection(t1, t2, plane1);
    }

    if !straddles(signs2) && !all_zero(signs2) {
        return TriangleIntersection::Empty;
    }
    if !straddles(signs1) && !all_zero(signs1) {
        return TriangleIntersection::Empty;
    }
    // A triangle with some zero and some same-strict-sign entries only
    // touches the other's plane at a vertex or edge; treat conservatively
    // as no proper crossing for the interval method below.
    if !straddles(signs2) || !straddles(signs1) {
        return TriangleIntersection::Empty;
    }

    let axis = plane1.normal.cross(plane2.normal);
    let [mut a0, mut a1] = crossing_segment(t1, plane2, axis);
    let [mut b0, mut b1] = crossing_segment(t2, plane1, axis);
    if a0.0 > a1.0 {
        std::mem::swap(&mut a0, &mut a1);
    }
    if b0.0 > b1.0 {
        std::mem::swap(&mut b0, &mut b1);
    }

    let lo = if a0.0 >= b0.0 { a0 } else { b0 };
    let hi = if a1.0 <= b1.0 { a1 } else { b1 };

    if lo.0 > hi.0 {
        return TriangleIntersection::Empty;
    }
    // `lo`/`hi` are two of the four already-computed crossing parameters,
    // not a fresh measurement; comparing them exactly (rather than within
    // a tolerance) is what tells a degenerate point-touch apart from a
    // proper overlap segment.
    if lo.0 == hi.0 {
        TriangleIntersection::Point(lo.1)
    } else {
        TriangleIntersection::Segment(lo.1, hi.1)
    }
}

fn project_2d(plane: Plane3, p: Point3) -> Point2 {
    let (u, v) = plane.base();
    let d = p - plane.point;
    Point2::new(d.dot(u), d.dot(v))
}

fn unproject_2d(plane: Plane3, p: Point2) -> Point3 {
    let (u, v) = plane.base();
    plane.point + u * p.x + v * p.y
}

fn cross2(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Sutherland-Hodgman clip of convex polygon `subject` against the
/// convex polygon `clip`, both wound counter-clockwise.
fn clip_convex_2d(subject: &[Point2], clip: &[Point2]) -> Vec<Point2> {
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let input = output;
        output = Vec::with_capacity(input.len() + 1);
        for j in 0..input.len() {
            let cur = input[j];
            let prev = input[(j + input.len() - 1) % input.len()];
            let cur_inside = cross2(a, b, cur) >= 0.0;
            let prev_inside = cross2(a, b, prev) >= 0.0;
            if cur_inside {
                if !prev_inside {
                    output.push(segment_intersection_2d(prev, cur, a, b));
                }
                output.push(cur);
            } else if prev_inside {
                output.push(segment_intersection_2d(prev, cur, a, b));
            }
        }
    }
    output
}

fn segment_intersection_2d(p0: Point2, p1: Point2, a: Point2, b: Point2) -> Point2 {
    let d1x = p1.x - p0.x;
    let d1y = p1.y - p0.y;
    let d2x = b.x - a.x;
    let d2y = b.y - a.y;
    let denom = d1x * d2y - d1y * d2x;
    let t = ((a.x - p0.x) * d2y - (a.y - p0.y) * d2x) / denom;
    Point2::new(p0.x + d1x * t, p0.y + d1y * t)
}

fn coplanar_intersection(t1: Triangle3, t2: Triangle3, plane: Plane3) -> TriangleIntersection {
    let subject = [
        project_2d(plane, t1.p),
        project_2d(plane, t1.q),
        project_2d(plane, t1.r),
    ];
    let mut clip = [
        project_2d(plane, t2.p),
        project_2d(plane, t2.q),
        project_2d(plane, t2.r),
    ];
    // Both triangles are wound the same way in 3D (consistent with
    // `plane`'s normal), so their 2D projections share a winding too;
    // the clip loop assumes counter-clockwise, so flip if needed.
    if cross2(clip[0], clip[1], clip[2]) < 0.0 {
        clip.swap(1, 2);
    }
    let mut subject = subject;
    if cross2(subject[0], subject[1], subject[2]) < 0.0 {
        subject.swap(1, 2);
    }

    let result = clip_convex_2d(&subject, &clip);
    let points: Vec<Point3> = result.iter().map(|p| unproject_2d(plane, *p)).collect();

    match points.len() {
        0 => TriangleIntersection::Empty,
        1 => TriangleIntersection::Point(points[0]),
        2 => TriangleIntersection::Segment(points[0], points[1]),
        3 => TriangleIntersection::Triangle(points[0], points[1], points[2]),
        _ => TriangleIntersection::Polygon(points),
    }
}

/// Exact sign of `n . ((b - a) x (x - a))`: which side of the directed
/// edge `a -> b`, within the plane normal to `n`, the point `x` falls on.
/// Built the same way as [`Plane3::oriented_side`]: an `orient3d` call
/// against the auxiliary point `a + n`, negated to match the "positive is
/// the side `n` points to" convention, rather than taking the sign of the
/// raw dot-of-cross directly.
fn edge_side(a: Point3, b: Point3, x: Point3, n: Vector3) -> Sign {
    match orient3d(a, b, x, a + n) {
        Sign::Positive => Sign::Negative,
        Sign::Negative => Sign::Positive,
        Sign::Zero => Sign::Zero,
    }
}

fn point_in_triangle(tri: Triangle3, x: Point3) -> Option<Sign> {
    let n = tri.normal();
    let s0 = edge_side(tri.p, tri.q, x, n);
    let s1 = edge_side(tri.q, tri.r, x, n);
    let s2 = edge_side(tri.r, tri.p, x, n);
    let has_pos = [s0, s1, s2].iter().any(|s| *s == Sign::Positive);
    let has_neg = [s0, s1, s2].iter().any(|s| *s == Sign::Negative);
    if has_pos && has_neg {
        None
    } else if has_neg {
        Some(Sign::Negative)
    } else if has_pos {
        Some(Sign::Positive)
    } else {
        Some(Sign::Zero)
    }
}

/// Intersect a triangle with a ray.
pub fn intersect_triangle_ray(tri: Triangle3, ray: Ray3) -> RayIntersection {
    let n = tri.normal();
    let d = ray.direction();
    let denom = n.dot(d);

    if denom != 0.0 {
        let plane = tri.supporting_plane();
        let t = n.dot(plane.point - ray.source) / denom;
        if t < 0.0 {
            return RayIntersection::Empty;
        }
        let p = ray.at(t);
        return match point_in_triangle(tri, p) {
            Some(_) => RayIntersection::Point(p),
            None => RayIntersection::Empty,
        };
    }

    // Ray direction lies in the triangle's plane. If the ray's origin is
    // off-plane, they never meet; otherwise clip the ray against the
    // triangle's three edges in the shared 2D frame.
    let plane = tri.supporting_plane();
    if signed_distance(plane, ray.source) != 0.0 {
        return RayIntersection::Empty;
    }

    let o2 = project_2d(plane, ray.source);
    let d2 = project_2d(plane, ray.source + d) - o2;
    let poly = {
        let mut pts = [
            project_2d(plane, tri.p),
            project_2d(plane, tri.q),
            project_2d(plane, tri.r),
        ];
        if cross2(pts[0], pts[1], pts[2]) < 0.0 {
            pts.swap(1, 2);
        }
        pts
    };

    let mut t_min = 0.0_f64;
    let mut t_max = f64::INFINITY;
    for i in 0..3 {
        let a = poly[i];
        let b = poly[(i + 1) % 3];
        let edge = Vector2::new(b.x - a.x, b.y - a.y);
        let normal_in = Vector2::new(-edge.y, edge.x);
        let num = normal_in.x * (a.x - o2.x) + normal_in.y * (a.y - o2.y);
        let den = normal_in.x * d2.x + normal_in.y * d2.y;
        if den.abs() < f64::EPSILON {
            if num < 0.0 {
                return RayIntersection::Empty;
            }
            continue;
        }
        let t = num / den;
        if den > 0.0 {
            t_max = t_max.min(t);
        } else {
            t_min = t_min.max(t);
        }
    }

    if t_min > t_max {
        RayIntersection::Empty
    } else if t_max == f64::INFINITY {
        RayIntersection::Empty
    } else if t_min == t_max {
        let p2 = Point2::new(o2.x + d2.x * t_min, o2.y + d2.y * t_min);
        RayIntersection::Point(unproject_2d(plane, p2))
    } else {
        let p_lo = Point2::new(o2.x + d2.x * t_min, o2.y + d2.y * t_min);
        let p_hi = Point2::new(o2.x + d2.x * t_max, o2.y + d2.y * t_max);
        RayIntersection::Segment(unproject_2d(plane, p_lo), unproject_2d(plane, p_hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_triangles_empty() {
        let t1 = Triangle3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let t2 = Triangle3::new(
            Point3::new(10.0, 10.0, 10.0),
            Point3::new(11.0, 10.0, 10.0),
            Point3::new(10.0, 11.0, 10.0),
        );
        assert_eq!(intersect_triangles(t1, t2), TriangleIntersection::Empty);
    }

    #[test]
    fn test_crossing_triangles_segment() {
        let t1 = Triangle3::new(
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 2.0),
        );
        let t2 = Triangle3::new(
            Point3::new(0.0, -1.0, -1.0),
            Point3::new(0.0, 1.0, -1.0),
            Point3::new(0.0, 0.0, 2.0),
        );
        match intersect_triangles(t1, t2) {
            TriangleIntersection::Segment(_, _) | TriangleIntersection::Point(_) => {}
            other => panic!("expected segment or point, got {other:?}"),
        }
    }

    #[test]
    fn test_coplanar_overlap_is_polygon_like() {
        let plane_z = 0.0;
        let t1 = Triangle3::new(
            Point3::new(0.0, 0.0, plane_z),
            Point3::new(2.0, 0.0, plane_z),
            Point3::new(0.0, 2.0, plane_z),
        );
        let t2 = Triangle3::new(
            Point3::new(0.5, 0.5, plane_z),
            Point3::new(2.5, 0.5, plane_z),
            Point3::new(0.5, 2.5, plane_z),
        );
        match intersect_triangles(t1, t2) {
            TriangleIntersection::Empty => panic!("expected a nonempty overlap"),
            _ => {}
        }
    }

    #[test]
    fn test_ray_hits_triangle() {
        let tri = Triangle3::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray3::new(Point3::new(0.0, 0.0, -5.0), Point3::new(0.0, 0.0, -1.0));
        match intersect_triangle_ray(tri, ray) {
            RayIntersection::Point(p) => {
                assert!((p.z - 0.0).abs() < 1e-9);
            }
            other => panic!("expected a point hit, got {other:?}"),
        }
    }

    #[test]
    fn test_ray_misses_triangle() {
        let tri = Triangle3::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray3::new(Point3::new(5.0, 5.0, -5.0), Point3::new(5.0, 5.0, -1.0));
        assert_eq!(intersect_triangle_ray(tri, ray), RayIntersection::Empty);
    }

    #[test]
    fn test_ray_behind_origin_misses() {
        let tri = Triangle3::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray3::new(Point3::new(0.0, 0.0, -5.0), Point3::new(0.0, 0.0, -6.0));
        assert_eq!(intersect_triangle_ray(tri, ray), RayIntersection::Empty);
    }
}
