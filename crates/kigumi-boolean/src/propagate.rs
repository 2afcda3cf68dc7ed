//! Breadth-first tag propagation over the mixed mesh's face adjacency,
//! stopping at border edges.

use std::collections::{HashSet, VecDeque};

use kigumi_mesh::{Edge, FaceHandle, FaceTag, MixedMesh};

use crate::error::KigumiError;

/// Enqueue every face already tagged `Union` or `Intersection` and flood
/// that tag to every reachable `Unknown` neighbor.
pub fn propagate_all(m: &mut MixedMesh, border: &HashSet<Edge>) {
    let queue: VecDeque<FaceHandle> = m
        .faces()
        .filter(|&fh| matches!(m.data(fh).tag, FaceTag::Union | FaceTag::Intersection))
        .collect();
    run_bfs(m, border, queue);
}

/// Flood `seed`'s tag to every reachable `Unknown` neighbor. Fails if
/// `seed` is not already tagged `Union` or `Intersection` — the caller is
/// responsible for tagging it first (this is what the global classifier
/// does just before calling this).
pub fn propagate_from_seed(
    m: &mut MixedMesh,
    border: &HashSet<Edge>,
    seed: FaceHandle,
) -> Result<(), KigumiError> {
    if !matches!(m.data(seed).tag, FaceTag::Union | FaceTag::Intersection) {
        return Err(KigumiError::InternalInvariantViolated {
            message: "single-seed propagation started from an untagged face".to_string(),
            face: Some(seed),
        });
    }
    let mut queue = VecDeque::new();
    queue.push_back(seed);
    run_bfs(m, border, queue);
    Ok(())
}

fn run_bfs(m: &mut MixedMesh, border: &HashSet<Edge>, mut queue: VecDeque<FaceHandle>) {
    while let Some(fh) = queue.pop_front() {
        let tag = m.data(fh).tag;
        for neighbor in m.faces_around_face(fh, border) {
            if m.data(neighbor).tag == FaceTag::Unknown {
                m.data_mut(neighbor).tag = tag;
                queue.push_back(neighbor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_mesh::Mesh;
    use kigumi_math::Point3;

    fn two_triangle_fan() -> (MixedMesh, FaceHandle, FaceHandle) {
        let mut m: MixedMesh = Mesh::new();
        let a = m.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = m.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = m.add_vertex(Point3::new(0.5, 1.0, 0.0));
        let d = m.add_vertex(Point3::new(1.5, 1.0, 0.0));
        let f1 = m.add_face([a, b, c]);
        let f2 = m.add_face([b, d, c]);
        m.finalize();
        (m, f1, f2)
    }

    #[test]
    fn test_tag_floods_across_non_border_edge() {
        let (mut m, f1, f2) = two_triangle_fan();
        m.data_mut(f1).tag = FaceTag::Union;
        propagate_all(&mut m, &HashSet::new());
        assert_eq!(m.data(f2).tag, FaceTag::Union);
    }

    #[test]
    fn test_border_edge_blocks_propagation() {
        let (mut m, f1, f2) = two_triangle_fan();
        let shared_edge = {
            let f = m.face(f1);
            let g = m.face(f2);
            let shared: Vec<_> = f.into_iter().filter(|v| g.contains(v)).collect();
            Edge::new(shared[0], shared[1])
        };
        m.data_mut(f1).tag = FaceTag::Union;
        let mut border = HashSet::new();
        border.insert(shared_edge);
        propagate_all(&mut m, &border);
        assert_eq!(m.data(f2).tag, FaceTag::Unknown);
    }

    #[test]
    fn test_single_seed_requires_already_tagged_face() {
        let (mut m, f1, _f2) = two_triangle_fan();
        assert!(propagate_from_seed(&mut m, &HashSet::new(), f1).is_err());
    }
}
