#![warn(missing_docs)]

//! A bounding volume hierarchy over triangle leaves, used for broad-phase
//! triangle/triangle and triangle/ray overlap queries.
//!
//! The tree is built once from a fixed leaf set and never mutated after
//! that; callers needing a tree over a changing mesh (see
//! `kigumi-mesh`'s polygon soup and mixed mesh) build it lazily on first
//! query and cache it behind a mutex.

use kigumi_math::{Bbox3, Ray3, Triangle3};

/// Something that can sit at a leaf of the tree: anything with a
/// bounding box.
pub trait Leaf {
    /// The leaf's bounding box.
    fn bbox(&self) -> Bbox3;
}

enum Child {
    Node(u32),
    Leaf(u32),
}

struct Node {
    bbox: Bbox3,
    left: Child,
    right: Child,
}

/// A static bounding volume hierarchy over a set of leaves.
pub struct AabbTree<L> {
    nodes: Vec<Node>,
    leaves: Vec<L>,
}

impl<L: Leaf> AabbTree<L> {
    /// Build a tree over `leaves`. Returns `None` if `leaves` is empty;
    /// an empty tree overlaps nothing, so callers should treat `None`
    /// the same as a tree that matches no query.
    pub fn build(leaves: Vec<L>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }
        let mut nodes = Vec::with_capacity(leaves.len().saturating_sub(1));
        let mut indices: Vec<u32> = (0..leaves.len() as u32).collect();
        build_recursive(&leaves, &mut indices, &mut nodes);
        Some(Self { nodes, leaves })
    }

    /// Number of leaves in the tree.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the tree has no leaves. Always `false` in practice since
    /// [`AabbTree::build`] returns `None` for an empty leaf set, kept for
    /// API symmetry with other collections.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// The leaf at `index`.
    pub fn leaf(&self, index: u32) -> &L {
        &self.leaves[index as usize]
    }

    /// All leaves whose bounding box overlaps `triangle`'s bounding box.
    ///
    /// This mirrors the original library's own broad-phase test, which
    /// compares bounding boxes rather than the triangle itself against
    /// node boxes — the triangle/triangle narrow-phase test happens
    /// afterwards, in the corefinement stage.
    pub fn query_triangle(&self, triangle: Triangle3) -> Vec<u32> {
        let mut out = Vec::new();
        self.query_bbox(triangle.bbox(), &mut out);
        out
    }

    /// All leaves whose bounding box the given ray passes through.
    pub fn query_ray(&self, ray: Ray3) -> Vec<u32> {
        let mut out = Vec::new();
        if self.nodes.is_empty() {
            if self.leaves.len() == 1 && ray_intersects_bbox(self.leaves[0].bbox(), ray) {
                out.push(0);
            }
            return out;
        }
        self.query_ray_from(0, ray, &mut out);
        out
    }

    fn query_bbox(&self, query: Bbox3, out: &mut Vec<u32>) {
        if self.nodes.is_empty() {
            if self.leaves.len() == 1 && self.leaves[0].bbox().overlaps(&query) {
                out.push(0);
            }
            return;
        }
        self.query_bbox_from(0, query, out);
    }

    fn query_bbox_from(&self, node_index: u32, query: Bbox3, out: &mut Vec<u32>) {
        let node = &self.nodes[node_index as usize];
        if !node.bbox.overlaps(&query) {
            return;
        }
        match node.left {
            Child::Node(i) => self.query_bbox_from(i, query, out),
            Child::Leaf(i) => {
                if self.leaves[i as usize].bbox().overlaps(&query) {
                    out.push(i);
                }
            }
        }
        match node.right {
            Child::Node(i) => self.query_bbox_from(i, query, out),
            Child::Leaf(i) => {
                if self.leaves[i as usize].bbox().overlaps(&query) {
                    out.push(i);
                }
            }
        }
    }

    fn query_ray_from(&self, node_index: u32, ray: Ray3, out: &mut Vec<u32>) {
        let node = &self.nodes[node_index as usize];
        if !ray_intersects_bbox(node.bbox, ray) {
            return;
        }
        match node.left {
            Child::Node(i) => self.query_ray_from(i, ray, out),
            Child::Leaf(i) => {
                if ray_intersects_bbox(self.leaves[i as usize].bbox(), ray) {
                    out.push(i);
                }
            }
        }
        match node.right {
            Child::Node(i) => self.query_ray_from(i, ray, out),
            Child::Leaf(i) => {
                if ray_intersects_bbox(self.leaves[i as usize].bbox(), ray) {
                    out.push(i);
                }
            }
        }
    }
}

/// Recursively partitions `indices` (into `leaves`) by splitting on the
/// midpoint of the longest axis of the current bbox, appending internal
/// nodes to `nodes` bottom-up. Returns the child describing the subtree
/// just built.
fn build_recursive<L: Leaf>(leaves: &[L], indices: &mut [u32], nodes: &mut Vec<Node>) -> Child {
    if indices.len() == 1 {
        return Child::Leaf(indices[0]);
    }

    let bbox = indices
        .iter()
        .map(|&i| leaves[i as usize].bbox())
        .reduce(Bbox3::union)
        .expect("indices is non-empty");
    let axis = bbox.longest_axis();

    indices.sort_by(|&a, &b| {
        let ca = leaves[a as usize].bbox();
        let cb = leaves[b as usize].bbox();
        let pa = ca.min_coord(axis) + ca.max_coord(axis);
        let pb = cb.min_coord(axis) + cb.max_coord(axis);
        pa.partial_cmp(&pb).expect("bbox coordinates are finite")
    });

    let mid = indices.len() / 2;
    let (left_indices, right_indices) = indices.split_at_mut(mid);
    let left = build_recursive(leaves, left_indices, nodes);
    let right = build_recursive(leaves, right_indices, nodes);

    nodes.push(Node { bbox, left, right });
    Child::Node((nodes.len() - 1) as u32)
}

/// Slab-method ray/box intersection test.
///
/// A ray parallel to one of the box's axis-aligned faces and outside the
/// box's slab on that axis never hits it; otherwise each axis narrows
/// the feasible parameter interval `[t_min, t_max]`, and the ray hits
/// the box iff that interval survives non-empty and extends to `t >= 0`.
pub fn ray_intersects_bbox(bbox: Bbox3, ray: Ray3) -> bool {
    let p = ray.source;
    let d = ray.direction();

    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for axis in 0..3 {
        let delta = d.coord_or(axis);
        let pi = p.coord(axis);
        let lo = bbox.min_coord(axis);
        let hi = bbox.max_coord(axis);

        if delta == 0.0 {
            if pi < lo || pi > hi {
                return false;
            }
            continue;
        }

        let mut t_lo = (lo - pi) / delta;
        let mut t_hi = (hi - pi) / delta;
        if t_lo > t_hi {
            std::mem::swap(&mut t_lo, &mut t_hi);
        }
        t_min = t_min.max(t_lo);
        t_max = t_max.min(t_hi);
        if t_min > t_max || t_max < 0.0 {
            return false;
        }
    }

    true
}

trait CoordOr {
    fn coord_or(self, i: usize) -> f64;
}

impl CoordOr for kigumi_math::Vector3 {
    fn coord_or(self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("vector coordinate index out of range: {i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_math::Point3;

    struct BoxLeaf(Bbox3);
    impl Leaf for BoxLeaf {
        fn bbox(&self) -> Bbox3 {
            self.0
        }
    }

    fn leaf_at(x: f64, y: f64, z: f64) -> BoxLeaf {
        BoxLeaf(Bbox3::from_point(Point3::new(x, y, z)).union(Bbox3 {
            min: Point3::new(x - 0.1, y - 0.1, z - 0.1),
            max: Point3::new(x + 0.1, y + 0.1, z + 0.1),
        }))
    }

    fn brute_force_triangle(leaves: &[Bbox3], query: Bbox3) -> Vec<u32> {
        leaves
            .iter()
            .enumerate()
            .filter(|(_, b)| b.overlaps(&query))
            .map(|(i, _)| i as u32)
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree: Option<AabbTree<BoxLeaf>> = AabbTree::build(Vec::new());
        assert!(tree.is_none());
    }

    #[test]
    fn test_query_matches_brute_force() {
        let leaves: Vec<BoxLeaf> = (0..50)
            .map(|i| leaf_at(i as f64, (i * 7 % 11) as f64, (i * 3 % 5) as f64))
            .collect();
        let boxes: Vec<Bbox3> = leaves.iter().map(|l| l.0).collect();
        let tree = AabbTree::build(leaves).unwrap();

        let query = Bbox3 {
            min: Point3::new(2.0, 0.0, 0.0),
            max: Point3::new(8.0, 10.0, 5.0),
        };
        let triangle = Triangle3::new(
            Point3::new(query.min.x, query.min.y, query.min.z),
            Point3::new(query.max.x, query.min.y, query.min.z),
            Point3::new(query.min.x, query.max.y, query.max.z),
        );

        let mut from_tree = tree.query_triangle(triangle);
        from_tree.sort_unstable();
        let mut from_brute = brute_force_triangle(&boxes, triangle.bbox());
        from_brute.sort_unstable();
        assert_eq!(from_tree, from_brute);
    }

    #[test]
    fn test_ray_through_single_leaf() {
        let leaves = vec![leaf_at(0.0, 0.0, 0.0)];
        let tree = AabbTree::build(leaves).unwrap();
        let hit = Ray3::new(Point3::new(0.0, 0.0, -5.0), Point3::new(0.0, 0.0, -1.0));
        let miss = Ray3::new(Point3::new(5.0, 5.0, -5.0), Point3::new(5.0, 5.0, -1.0));
        assert_eq!(tree.query_ray(hit), vec![0]);
        assert!(tree.query_ray(miss).is_empty());
    }

    #[test]
    fn test_ray_behind_source_does_not_hit() {
        let leaves = vec![leaf_at(0.0, 0.0, 5.0)];
        let tree = AabbTree::build(leaves).unwrap();
        let ray = Ray3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, -1.0));
        assert!(tree.query_ray(ray).is_empty());
    }
}
