//! Retriangulates two polygon soups so every intersection curve between
//! them is represented as mesh edges in both outputs.

use std::collections::HashMap;

use kigumi_math::{intersect_triangles, Point3, Triangle3, TriangleIntersection};
use kigumi_mesh::PolygonSoup;
use kigumi_triangulate::Triangulator;
use rayon::prelude::*;

use crate::pair_finder::find_face_pairs;

struct Hit {
    left_face: usize,
    right_face: usize,
    intersection: TriangleIntersection,
}

/// Corefine `left` against `right`, returning each side's triangle stream
/// after retriangulation.
pub fn corefine(left: &PolygonSoup, right: &PolygonSoup) -> (Vec<Triangle3>, Vec<Triangle3>) {
    let pairs = find_face_pairs(left, right);
    tracing::debug!(pairs = pairs.len(), "corefine: candidate face pairs");

    let hits: Vec<Hit> = pairs
        .into_par_iter()
        .filter_map(|(i, j)| {
            let lt = left.triangle(i);
            let rt = right.triangle(j);
            if lt.is_degenerate() || rt.is_degenerate() {
                return None;
            }
            match intersect_triangles(lt, rt) {
                TriangleIntersection::Empty => None,
                intersection => Some(Hit {
                    left_face: i,
                    right_face: j,
                    intersection,
                }),
            }
        })
        .collect();
    tracing::debug!(hits = hits.len(), "corefine: intersecting pairs found");

    let mut left_triangulators: HashMap<usize, Triangulator> = HashMap::new();
    let mut right_triangulators: HashMap<usize, Triangulator> = HashMap::new();
    for hit in &hits {
        left_triangulators
            .entry(hit.left_face)
            .or_insert_with(|| Triangulator::new(left.triangle(hit.left_face)));
        right_triangulators
            .entry(hit.right_face)
            .or_insert_with(|| Triangulator::new(right.triangle(hit.right_face)));
    }

    let mut by_left: Vec<usize> = (0..hits.len()).collect();
    by_left.sort_by_key(|&k| hits[k].left_face);
    for &k in &by_left {
        let triangulator = left_triangulators
            .get_mut(&hits[k].left_face)
            .expect("triangulator created for every face with a hit");
        insert_intersection(triangulator, hits[k].left_face, &hits[k].intersection);
    }

    let mut by_right: Vec<usize> = (0..hits.len()).collect();
    by_right.sort_by_key(|&k| hits[k].right_face);
    for &k in &by_right {
        let triangulator = right_triangulators
            .get_mut(&hits[k].right_face)
            .expect("triangulator created for every face with a hit");
        insert_intersection(triangulator, hits[k].right_face, &hits[k].intersection);
    }

    let left_tris = emit_triangles(left, &left_triangulators);
    let right_tris = emit_triangles(right, &right_triangulators);
    (left_tris, right_tris)
}

fn emit_triangles(soup: &PolygonSoup, triangulators: &HashMap<usize, Triangulator>) -> Vec<Triangle3> {
    let mut out = Vec::new();
    for i in 0..soup.num_faces() {
        match triangulators.get(&i) {
            Some(t) => out.extend(t.triangles()),
            None => out.push(soup.triangle(i)),
        }
    }
    out
}

/// Translate one triangle-triangle intersection into inserts and
/// constraints on a face's triangulator. A dropped constraint (crossing
/// one already present) is logged and tolerated; downstream
/// classification is built to survive a few missing constraints.
fn insert_intersection(triangulator: &mut Triangulator, face: usize, intersection: &TriangleIntersection) {
    match intersection {
        TriangleIntersection::Empty => {}
        TriangleIntersection::Point(p) => {
            triangulator.insert(*p);
        }
        TriangleIntersection::Segment(p, q) => {
            insert_constrained_cycle(triangulator, face, &[*p, *q]);
        }
        TriangleIntersection::Triangle(p, q, r) => {
            insert_constrained_cycle(triangulator, face, &[*p, *q, *r]);
        }
        TriangleIntersection::Polygon(points) => {
            insert_constrained_cycle(triangulator, face, points);
        }
    }
}

fn insert_constrained_cycle(triangulator: &mut Triangulator, face: usize, points: &[Point3]) {
    let handles: Vec<_> = points.iter().map(|&p| triangulator.insert(p)).collect();
    for i in 0..handles.len() {
        let j = (i + 1) % handles.len();
        if let Err(err) = triangulator.insert_constraint(handles[i], handles[j]) {
            tracing::warn!(
                face,
                from = ?points[i],
                to = ?points[j],
                %err,
                "corefine: dropped a constraint crossing one already present"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_math::Point3;

    fn cube_at(offset: f64) -> PolygonSoup {
        let o = offset;
        let points = vec![
            Point3::new(o, o, o),
            Point3::new(o + 1.0, o, o),
            Point3::new(o + 1.0, o + 1.0, o),
            Point3::new(o, o + 1.0, o),
            Point3::new(o, o, o + 1.0),
            Point3::new(o + 1.0, o, o + 1.0),
            Point3::new(o + 1.0, o + 1.0, o + 1.0),
            Point3::new(o, o + 1.0, o + 1.0),
        ];
        let faces = vec![
            [0, 3, 2], [0, 2, 1], // bottom
            [4, 5, 6], [4, 6, 7], // top
            [0, 1, 5], [0, 5, 4], // front
            [2, 3, 7], [2, 7, 6], // back
            [1, 2, 6], [1, 6, 5], // right
            [3, 0, 4], [3, 4, 7], // left
        ];
        PolygonSoup::new(points, faces)
    }

    #[test]
    fn test_disjoint_cubes_pass_through_unchanged() {
        let left = cube_at(0.0);
        let right = cube_at(10.0);
        let (lt, rt) = corefine(&left, &right);
        assert_eq!(lt.len(), 12);
        assert_eq!(rt.len(), 12);
    }

    #[test]
    fn test_overlapping_cubes_gain_faces_from_retriangulation() {
        let left = cube_at(0.0);
        let right = cube_at(0.5);
        let (lt, rt) = corefine(&left, &right);
        assert!(lt.len() >= 12);
        assert!(rt.len() >= 12);
    }
}
