//! Resolves connected components of faces the local classifier left
//! `Unknown` by ray-casting a representative face against the opposite
//! operand.

use std::collections::{HashSet, VecDeque};

use kigumi_math::{
    intersect_triangle_ray, squared_distance, Point3, RayIntersection, Ray3, Sign, Triangle3,
};
use kigumi_mesh::{Edge, FaceHandle, FaceTag, MixedMesh};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::BooleanConfig;
use crate::error::KigumiError;
use crate::propagate::propagate_from_seed;

/// Resolve every component still containing `Unknown` faces, up to
/// `config.max_ray_retries` ray-cast attempts each. A component that
/// exhausts its budget is left `Unknown` (extraction skips it).
pub fn classify_globally(
    m: &mut MixedMesh,
    border: &HashSet<Edge>,
    config: &BooleanConfig,
) -> Result<(), KigumiError> {
    let representatives = find_unclassified_components(m, border);
    tracing::debug!(
        components = representatives.len(),
        "global classifier: unclassified components to resolve"
    );

    let mut rng = make_rng(config);
    for fh_src in representatives {
        let src_from_left = m.data(fh_src).from_left;
        let mut classified = false;

        for attempt in 0..config.max_ray_retries {
            let idx = rng.gen_range(0..m.num_faces());
            let fh_trg = FaceHandle(idx as u32);
            if m.data(fh_trg).from_left == src_from_left {
                continue;
            }

            let p_src = random_point_in_triangle(m.triangle(fh_src), &mut rng);
            let p_trg = random_point_in_triangle(m.triangle(fh_trg), &mut rng);

            match bounded_side(m, p_src, p_trg, src_from_left) {
                Some(Sign::Positive) => {
                    m.data_mut(fh_src).tag = FaceTag::Union;
                    propagate_from_seed(m, border, fh_src)?;
                    classified = true;
                    break;
                }
                Some(Sign::Negative) => {
                    m.data_mut(fh_src).tag = FaceTag::Intersection;
                    propagate_from_seed(m, border, fh_src)?;
                    classified = true;
                    break;
                }
                Some(Sign::Zero) | None => {
                    tracing::trace!(face = ?fh_src, attempt, "global classifier: ambiguous ray, retrying");
                }
            }
        }

        if !classified {
            tracing::warn!(
                face = ?fh_src,
                "global classifier: exhausted retry budget, leaving component Unknown"
            );
        }
    }

    Ok(())
}

fn make_rng(config: &BooleanConfig) -> ChaCha8Rng {
    match config.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Which side of the opposite operand `p_src` is on, determined by
/// casting a ray to `p_trg` and examining the nearest crossing of a face
/// from the opposite operand. `None` means the attempt is ambiguous (a
/// coplanar/segment hit, or a tie for nearest) and should be retried.
fn bounded_side(
    m: &MixedMesh,
    p_src: Point3,
    p_trg: Point3,
    src_from_left: bool,
) -> Option<Sign> {
    if p_src == p_trg {
        return Some(Sign::Zero);
    }

    let ray = Ray3::new(p_src, p_trg);
    struct Hit {
        distance: f64,
        fh: FaceHandle,
    }
    let mut hits: Vec<Hit> = Vec::new();

    for fh in m.faces_along_ray(ray) {
        if m.data(fh).from_left == src_from_left {
            continue;
        }
        let tri = m.triangle(fh);
        if tri.is_degenerate() {
            continue;
        }
        match intersect_triangle_ray(tri, ray) {
            RayIntersection::Empty => {}
            RayIntersection::Segment(_, _) => return None,
            RayIntersection::Point(p) => {
                hits.push(Hit {
                    distance: squared_distance(p_src, p),
                    fh,
                });
            }
        }
    }

    if hits.is_empty() {
        return None;
    }
    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).expect("finite distance"));
    if hits.len() >= 2 && hits[0].distance == hits[1].distance {
        return None;
    }

    let nearest = m.triangle(hits[0].fh);
    Some(nearest.supporting_plane().oriented_side(p_src))
}

/// Faithful to the original's unbiased barycentric draw: two sorted `f32`
/// fractions split the unit interval into three weights, avoiding the
/// distribution skew a naive `(a, b, 1-a-b)` draw with rejection would
/// have.
fn random_point_in_triangle(tri: Triangle3, rng: &mut impl Rng) -> Point3 {
    let mut a1: f32 = rng.gen_range(0.0..1.0);
    let mut a2: f32 = rng.gen_range(0.0..1.0);
    if a1 > a2 {
        std::mem::swap(&mut a1, &mut a2);
    }
    let b1 = a1 as f64;
    let b2 = (a2 - a1) as f64;
    let b3 = (1.0 - a2) as f64;
    tri.p.barycentric(tri.q, tri.r, b1, b2, b3)
}

/// One representative face per connected component (walked via
/// non-border adjacency) that contains at least one `Unknown` face.
fn find_unclassified_components(m: &MixedMesh, border: &HashSet<Edge>) -> Vec<FaceHandle> {
    let mut visited = vec![false; m.num_faces()];
    let mut representatives = Vec::new();

    for fh in m.faces() {
        if visited[fh.0 as usize] {
            continue;
        }
        visited[fh.0 as usize] = true;

        let mut representative = (m.data(fh).tag == FaceTag::Unknown).then_some(fh);
        let mut queue = VecDeque::new();
        queue.push_back(fh);
        while let Some(cur) = queue.pop_front() {
            for adj in m.faces_around_face(cur, border) {
                if visited[adj.0 as usize] {
                    continue;
                }
                visited[adj.0 as usize] = true;
                if representative.is_none() && m.data(adj).tag == FaceTag::Unknown {
                    representative = Some(adj);
                }
                queue.push_back(adj);
            }
        }

        if let Some(repr) = representative {
            representatives.push(repr);
        }
    }

    representatives
}
