//! Broad-phase candidate face pairs between two polygon soups.

use kigumi_mesh::PolygonSoup;
use rayon::prelude::*;

/// Every `(left_face, right_face)` pair whose bounding boxes overlap.
///
/// Queries whichever soup has fewer faces with the other soup's
/// triangles, to minimize tree-descent cost, and runs the outer loop in
/// parallel with per-thread scratch merged at the end. May contain
/// duplicates in adversarial cases but never misses an overlapping pair.
pub fn find_face_pairs(left: &PolygonSoup, right: &PolygonSoup) -> Vec<(usize, usize)> {
    if left.num_faces() < right.num_faces() {
        (0..right.num_faces())
            .into_par_iter()
            .flat_map_iter(|j| {
                let tri = right.triangle(j);
                left.overlapping_faces(tri)
                    .into_iter()
                    .map(move |i| (i, j))
            })
            .collect()
    } else {
        (0..left.num_faces())
            .into_par_iter()
            .flat_map_iter(|i| {
                let tri = left.triangle(i);
                right
                    .overlapping_faces(tri)
                    .into_iter()
                    .map(move |j| (i, j))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_math::Point3;

    fn unit_square_soup(offset: f64) -> PolygonSoup {
        let points = vec![
            Point3::new(offset, 0.0, 0.0),
            Point3::new(offset + 1.0, 0.0, 0.0),
            Point3::new(offset + 1.0, 1.0, 0.0),
            Point3::new(offset, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        PolygonSoup::new(points, faces)
    }

    #[test]
    fn test_overlapping_soups_report_all_pairs() {
        let left = unit_square_soup(0.0);
        let right = unit_square_soup(0.5);
        let pairs = find_face_pairs(&left, &right);
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_disjoint_soups_report_no_pairs() {
        let left = unit_square_soup(0.0);
        let right = unit_square_soup(10.0);
        assert!(find_face_pairs(&left, &right).is_empty());
    }
}
