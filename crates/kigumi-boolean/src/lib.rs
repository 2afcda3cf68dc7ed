#![warn(missing_docs)]

//! Exact boolean operations on closed, orientable triangle meshes.
//!
//! [`boolean`] runs the full corefinement pipeline once per pair of
//! operands and extracts as many results as there are requested
//! [`Operator`]s, sharing the expensive corefinement and classification
//! work across all of them:
//!
//! 1. [`corefine`] retriangulates each operand along the other's
//!    intersection curves.
//! 2. The retriangulated triangles are assembled into one
//!    [`MixedMesh`], tagged by which operand they came from.
//! 3. [`find_shared_edges`] finds the border between the two operands.
//! 4. [`classify_faces_around_edge`] locally tags every face touching
//!    that border.
//! 5. [`propagate_all`] floods each local tag across untagged faces.
//! 6. [`classify_globally`] resolves any component the flood didn't
//!    reach, by ray-casting.
//! 7. [`extract`] reads out the faces selected by each operator.

mod config;
mod corefine;
mod error;
mod extract;
mod global_classify;
mod operator;
mod pair_finder;
mod propagate;
mod radial;
mod shared_edges;

use kigumi_mesh::{Mesh, MixedMesh, PointInterner, PolygonSoup};

pub use config::BooleanConfig;
pub use corefine::corefine;
pub use error::KigumiError;
pub use extract::extract;
pub use global_classify::classify_globally;
pub use operator::{coplanar_mask, intersection_mask, opposite_mask, union_mask, Mask, Operator};
pub use pair_finder::find_face_pairs;
pub use propagate::{propagate_all, propagate_from_seed};
pub use radial::classify_faces_around_edge;
pub use shared_edges::find_shared_edges;

/// Run the full boolean pipeline on `left` and `right`, returning one
/// [`PolygonSoup`] per requested operator, in the same order.
pub fn boolean(
    left: &PolygonSoup,
    right: &PolygonSoup,
    ops: &[Operator],
    config: &BooleanConfig,
) -> Result<Vec<PolygonSoup>, KigumiError> {
    let (left_tris, right_tris) = corefine(left, right);
    tracing::debug!(
        left_faces = left_tris.len(),
        right_faces = right_tris.len(),
        "boolean: corefinement complete"
    );

    let mut m: MixedMesh = Mesh::new();
    for tri in &left_tris {
        let face = [
            m.add_vertex(tri.p),
            m.add_vertex(tri.q),
            m.add_vertex(tri.r),
        ];
        let fh = m.add_face(face);
        m.data_mut(fh).from_left = true;
    }
    for tri in &right_tris {
        let face = [
            m.add_vertex(tri.p),
            m.add_vertex(tri.q),
            m.add_vertex(tri.r),
        ];
        let fh = m.add_face(face);
        m.data_mut(fh).from_left = false;
    }
    m.finalize();

    let border = find_shared_edges(&m);
    tracing::debug!(border_edges = border.len(), "boolean: border edges found");
    for &edge in &border {
        classify_faces_around_edge(&mut m, edge)?;
    }

    propagate_all(&mut m, &border);
    classify_globally(&mut m, &border, config)?;

    let mut results = Vec::with_capacity(ops.len());
    for &op in ops {
        let triangles = extract(&m, op);
        results.push(triangles_to_soup(&triangles));
    }
    Ok(results)
}

fn triangles_to_soup(triangles: &[[kigumi_math::Point3; 3]]) -> PolygonSoup {
    let mut interner = PointInterner::new();
    let faces: Vec<[usize; 3]> = triangles
        .iter()
        .map(|tri| {
            [
                interner.insert(tri[0]).0 as usize,
                interner.insert(tri[1]).0 as usize,
                interner.insert(tri[2]).0 as usize,
            ]
        })
        .collect();
    PolygonSoup::new(interner.into_vec(), faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_math::Point3;

    fn cube_at(offset: f64, size: f64) -> PolygonSoup {
        let o = offset;
        let points = vec![
            Point3::new(o, o, o),
            Point3::new(o + size, o, o),
            Point3::new(o + size, o + size, o),
            Point3::new(o, o + size, o),
            Point3::new(o, o, o + size),
            Point3::new(o + size, o, o + size),
            Point3::new(o + size, o + size, o + size),
            Point3::new(o, o + size, o + size),
        ];
        let faces = vec![
            [0, 3, 2], [0, 2, 1],
            [4, 5, 6], [4, 6, 7],
            [0, 1, 5], [0, 5, 4],
            [2, 3, 7], [2, 7, 6],
            [1, 2, 6], [1, 6, 5],
            [3, 0, 4], [3, 4, 7],
        ];
        PolygonSoup::new(points, faces)
    }

    fn signed_volume(soup: &PolygonSoup) -> f64 {
        let mut total = 0.0;
        for i in 0..soup.num_faces() {
            let tri = soup.triangle(i);
            total += tri.p.x * (tri.q.y * tri.r.z - tri.r.y * tri.q.z)
                - tri.p.y * (tri.q.x * tri.r.z - tri.r.x * tri.q.z)
                + tri.p.z * (tri.q.x * tri.r.y - tri.r.x * tri.q.y);
        }
        (total / 6.0).abs()
    }

    #[test]
    fn test_disjoint_cubes_union_has_combined_volume_and_no_intersection() {
        let a = cube_at(0.0, 1.0);
        let b = cube_at(2.0, 1.0);
        let config = BooleanConfig::default();
        let results = boolean(&a, &b, &[Operator::UNION, Operator::INTERSECTION], &config).unwrap();

        assert_eq!(results[0].num_faces(), 24);
        assert!((signed_volume(&results[0]) - 2.0).abs() < 1e-9);
        assert_eq!(results[1].num_faces(), 0);
    }

    #[test]
    fn test_overlapping_cubes_intersection_and_union_volumes() {
        let a = cube_at(0.0, 1.0);
        let b = cube_at(0.5, 1.0);
        let config = BooleanConfig::default();
        let results = boolean(
            &a,
            &b,
            &[Operator::INTERSECTION, Operator::UNION, Operator::DIFFERENCE],
            &config,
        )
        .unwrap();

        assert!((signed_volume(&results[0]) - 0.125).abs() < 1e-6);
        assert!((signed_volume(&results[1]) - 1.875).abs() < 1e-6);
        assert!((signed_volume(&results[2]) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_self_union_reproduces_same_volume() {
        let a = cube_at(0.0, 1.0);
        let config = BooleanConfig::default();
        let results = boolean(&a, &a, &[Operator::UNION], &config).unwrap();
        assert!((signed_volume(&results[0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_difference_is_empty() {
        let a = cube_at(0.0, 1.0);
        let config = BooleanConfig::default();
        let results = boolean(&a, &a, &[Operator::DIFFERENCE], &config).unwrap();
        assert_eq!(results[0].num_faces(), 0);
    }
}
