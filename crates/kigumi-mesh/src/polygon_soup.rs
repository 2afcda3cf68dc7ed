//! An indexed triangle soup with a lazily built broad-phase tree.

use std::sync::Mutex;

use kigumi_aabb::{AabbTree, Leaf as LeafTrait};
use kigumi_math::{Bbox3, Point3, Ray3, Triangle3};

struct SoupLeaf {
    bbox: Bbox3,
    face_index: usize,
}

impl LeafTrait for SoupLeaf {
    fn bbox(&self) -> Bbox3 {
        self.bbox
    }
}

/// An indexed triangle mesh with no topology beyond its face list: just
/// points and index triples. Used as the raw input and output format at
/// the edges of the boolean engine (the mixed mesh, by contrast, carries
/// per-face tags and adjacency).
pub struct PolygonSoup {
    points: Vec<Point3>,
    faces: Vec<[usize; 3]>,
    aabb_tree: Mutex<Option<AabbTree<SoupLeaf>>>,
}

impl PolygonSoup {
    /// Build a polygon soup from points and triangle index triples.
    pub fn new(points: Vec<Point3>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            points,
            faces,
            aabb_tree: Mutex::new(None),
        }
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// All points, in index order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// All faces, as index triples into [`PolygonSoup::points`].
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// The triangle at face index `i`.
    pub fn triangle(&self, i: usize) -> Triangle3 {
        let f = self.faces[i];
        Triangle3::new(self.points[f[0]], self.points[f[1]], self.points[f[2]])
    }

    /// Flip every face's winding in place (swaps the second and third
    /// index of each face), inverting the mesh's orientation.
    pub fn invert(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        *self.aabb_tree.get_mut().expect("aabb tree mutex poisoned") = None;
    }

    fn ensure_tree(&self) {
        let mut guard = self.aabb_tree.lock().expect("aabb tree mutex poisoned");
        if guard.is_none() {
            let leaves: Vec<SoupLeaf> = (0..self.faces.len())
                .map(|i| SoupLeaf {
                    bbox: self.triangle(i).bbox(),
                    face_index: i,
                })
                .collect();
            *guard = AabbTree::build(leaves);
        }
    }

    /// Indices of faces whose bounding box overlaps `triangle`'s.
    pub fn overlapping_faces(&self, triangle: Triangle3) -> Vec<usize> {
        self.ensure_tree();
        let guard = self.aabb_tree.lock().expect("aabb tree mutex poisoned");
        match guard.as_ref() {
            Some(tree) => tree
                .query_triangle(triangle)
                .into_iter()
                .map(|i| tree.leaf(i).face_index)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Indices of faces whose bounding box the given ray passes through.
    pub fn faces_along_ray(&self, ray: Ray3) -> Vec<usize> {
        self.ensure_tree();
        let guard = self.aabb_tree.lock().expect("aabb tree mutex poisoned");
        match guard.as_ref() {
            Some(tree) => tree
                .query_ray(ray)
                .into_iter()
                .map(|i| tree.leaf(i).face_index)
                .collect(),
            None => Vec::new(),
        }
    }
}
