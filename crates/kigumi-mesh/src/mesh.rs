//! An indexed triangle mesh with per-face payload and adjacency queries.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Mutex;

use kigumi_aabb::{AabbTree, Leaf as LeafTrait};
use kigumi_math::{Bbox3, Point3, Ray3, Triangle3};

use crate::{Edge, FaceHandle, PointInterner, VertexHandle};

/// How a face of the mixed mesh relates to the two input solids, once
/// classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceTag {
    /// The face lies outside the other operand (contributes to a union).
    Union,
    /// The face lies inside the other operand (contributes to an
    /// intersection).
    Intersection,
    /// The face is coplanar with, and wound the same way as, a face of
    /// the other operand.
    Coplanar,
    /// The face is coplanar with, and wound oppositely to, a face of the
    /// other operand.
    Opposite,
    /// Not yet classified.
    Unknown,
}

/// Per-face payload of a [`MixedMesh`]: which input solid the face came
/// from, and its current classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceData {
    /// `true` if this face originated from the left operand.
    pub from_left: bool,
    /// The face's current tag.
    pub tag: FaceTag,
}

impl Default for FaceData {
    fn default() -> Self {
        FaceData {
            from_left: false,
            tag: FaceTag::Unknown,
        }
    }
}

struct MeshLeaf {
    bbox: Bbox3,
    face: FaceHandle,
}

impl LeafTrait for MeshLeaf {
    fn bbox(&self) -> Bbox3 {
        self.bbox
    }
}

/// An indexed triangle mesh carrying a `D` payload per face, with
/// adjacency queries (`faces_around_edge`, `faces_around_face`) built
/// from a compressed, vertex-sorted index.
///
/// `D` defaults to `()` for a plain topology-only mesh; the boolean
/// engine instantiates it as [`FaceData`] (see [`MixedMesh`]).
pub struct Mesh<D = ()> {
    interner: PointInterner,
    faces: Vec<[VertexHandle; 3]>,
    face_data: Vec<D>,
    starts: Vec<u32>,
    face_indices: Vec<FaceHandle>,
    aabb_tree: Mutex<Option<AabbTree<MeshLeaf>>>,
}

impl<D: Default> Default for Mesh<D> {
    fn default() -> Self {
        Mesh {
            interner: PointInterner::new(),
            faces: Vec::new(),
            face_data: Vec::new(),
            starts: Vec::new(),
            face_indices: Vec::new(),
            aabb_tree: Mutex::new(None),
        }
    }
}

impl<D: Default> Mesh<D> {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a point, returning its vertex handle.
    pub fn add_vertex(&mut self, p: Point3) -> VertexHandle {
        self.interner.insert(p)
    }

    /// Add a triangular face over three existing vertices, returning its
    /// handle. `D`'s default value is used as the new face's payload.
    pub fn add_face(&mut self, face: [VertexHandle; 3]) -> FaceHandle {
        self.faces.push(face);
        self.face_data.push(D::default());
        FaceHandle((self.faces.len() - 1) as u32)
    }

    /// Build the vertex-to-incident-faces index used by
    /// [`Mesh::faces_around_edge`] and [`Mesh::faces_around_face`].
    ///
    /// Must be called after all faces are added and before any adjacency
    /// query; invalidates any previously built index (and, since the
    /// winding or face set may have changed, the cached AABB tree).
    pub fn finalize(&mut self) {
        let num_vertices = self.interner.len();
        let mut pairs: Vec<(VertexHandle, FaceHandle)> = Vec::with_capacity(self.faces.len() * 3);
        for (i, face) in self.faces.iter().enumerate() {
            let fh = FaceHandle(i as u32);
            for &vh in face {
                pairs.push((vh, fh));
            }
        }
        pairs.sort_unstable_by_key(|&(vh, fh)| (vh.0, fh.0));

        let mut starts = vec![0u32; num_vertices + 1];
        for &(vh, _) in &pairs {
            starts[vh.0 as usize + 1] += 1;
        }
        for i in 0..num_vertices {
            starts[i + 1] += starts[i];
        }

        self.face_indices = pairs.into_iter().map(|(_, fh)| fh).collect();
        self.starts = starts;
        *self.aabb_tree.get_mut().expect("aabb tree mutex poisoned") = None;
    }
}

impl<D> Mesh<D> {
    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of distinct vertices interned so far.
    pub fn num_vertices(&self) -> usize {
        self.interner.len()
    }

    /// All face handles, in index order.
    pub fn faces(&self) -> impl Iterator<Item = FaceHandle> {
        (0..self.faces.len() as u32).map(FaceHandle)
    }

    /// The three vertex handles of a face.
    pub fn face(&self, fh: FaceHandle) -> [VertexHandle; 3] {
        self.faces[fh.0 as usize]
    }

    /// The coordinates of a vertex.
    pub fn point(&self, vh: VertexHandle) -> Point3 {
        self.interner.get(vh)
    }

    /// A face's three corners as a triangle.
    pub fn triangle(&self, fh: FaceHandle) -> Triangle3 {
        let f = self.face(fh);
        Triangle3::new(self.point(f[0]), self.point(f[1]), self.point(f[2]))
    }

    /// A face's payload.
    pub fn data(&self, fh: FaceHandle) -> &D {
        &self.face_data[fh.0 as usize]
    }

    /// A face's payload, mutably.
    pub fn data_mut(&mut self, fh: FaceHandle) -> &mut D {
        &mut self.face_data[fh.0 as usize]
    }

    /// Faces incident to both endpoints of `edge`, i.e. faces sharing
    /// that edge (including, for a 2-manifold mesh, the face `edge` was
    /// taken from). Requires [`Mesh::finalize`] to have been called.
    pub fn faces_around_edge(&self, edge: Edge) -> FacesAroundEdge<'_> {
        let a = edge.0 .0 as usize;
        let b = edge.1 .0 as usize;
        FacesAroundEdge {
            a: &self.face_indices[self.starts[a] as usize..self.starts[a + 1] as usize],
            b: &self.face_indices[self.starts[b] as usize..self.starts[b + 1] as usize],
            i: 0,
            j: 0,
        }
    }

    /// Faces sharing a non-border edge with `fh`: for each of `fh`'s
    /// three edges not listed in `border`, every face incident to that
    /// edge (including `fh` itself). Traversal order differs from a
    /// literal edge-by-edge interleave but visits the same set of faces,
    /// which is all [`Mesh::faces_around_face`]'s callers rely on.
    pub fn faces_around_face(&self, fh: FaceHandle, border: &HashSet<Edge>) -> Vec<FaceHandle> {
        let f = self.face(fh);
        let edges = [
            Edge::new(f[0], f[1]),
            Edge::new(f[1], f[2]),
            Edge::new(f[2], f[0]),
        ];
        let mut result = Vec::new();
        for edge in edges {
            if !border.contains(&edge) {
                result.extend(self.faces_around_edge(edge));
            }
        }
        result
    }

    fn ensure_tree(&self) {
        let mut guard = self.aabb_tree.lock().expect("aabb tree mutex poisoned");
        if guard.is_none() {
            let leaves: Vec<MeshLeaf> = self
                .faces()
                .map(|fh| MeshLeaf {
                    bbox: self.triangle(fh).bbox(),
                    face: fh,
                })
                .collect();
            *guard = AabbTree::build(leaves);
        }
    }

    /// Face handles whose bounding box overlaps `triangle`'s.
    pub fn overlapping_faces(&self, triangle: Triangle3) -> Vec<FaceHandle> {
        self.ensure_tree();
        let guard = self.aabb_tree.lock().expect("aabb tree mutex poisoned");
        match guard.as_ref() {
            Some(tree) => tree
                .query_triangle(triangle)
                .into_iter()
                .map(|i| tree.leaf(i).face)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Face handles whose bounding box the given ray passes through.
    pub fn faces_along_ray(&self, ray: Ray3) -> Vec<FaceHandle> {
        self.ensure_tree();
        let guard = self.aabb_tree.lock().expect("aabb tree mutex poisoned");
        match guard.as_ref() {
            Some(tree) => tree
                .query_ray(ray)
                .into_iter()
                .map(|i| tree.leaf(i).face)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Merge-join iterator over the faces shared by two vertices' sorted
/// incidence lists.
pub struct FacesAroundEdge<'a> {
    a: &'a [FaceHandle],
    b: &'a [FaceHandle],
    i: usize,
    j: usize,
}

impl<'a> Iterator for FacesAroundEdge<'a> {
    type Item = FaceHandle;

    fn next(&mut self) -> Option<FaceHandle> {
        loop {
            if self.i >= self.a.len() || self.j >= self.b.len() {
                return None;
            }
            match self.a[self.i].cmp(&self.b[self.j]) {
                Ordering::Equal => {
                    let result = self.a[self.i];
                    self.i += 1;
                    self.j += 1;
                    return Some(result);
                }
                Ordering::Less => self.i += 1,
                Ordering::Greater => self.j += 1,
            }
        }
    }
}

/// A mesh whose faces carry the boolean engine's provenance/tag payload.
pub type MixedMesh = Mesh<FaceData>;

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh<()> {
        let mut m = Mesh::new();
        let a = m.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = m.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = m.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let d = m.add_vertex(Point3::new(0.0, 0.0, 1.0));
        m.add_face([a, c, b]);
        m.add_face([a, b, d]);
        m.add_face([b, c, d]);
        m.add_face([c, a, d]);
        m.finalize();
        m
    }

    #[test]
    fn test_faces_around_edge_shared_by_two() {
        let m = tetrahedron();
        let f = m.face(FaceHandle(0));
        let edge = Edge::new(f[0], f[1]);
        let around: Vec<_> = m.faces_around_edge(edge).collect();
        assert_eq!(around.len(), 2);
        assert!(around.contains(&FaceHandle(0)));
    }

    #[test]
    fn test_faces_around_face_closed_mesh_has_three_neighbors() {
        let m = tetrahedron();
        let border = HashSet::new();
        let neighbors = m.faces_around_face(FaceHandle(0), &border);
        let distinct: HashSet<FaceHandle> = neighbors
            .into_iter()
            .filter(|&fh| fh != FaceHandle(0))
            .collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_border_edge_excluded_from_traversal() {
        let m = tetrahedron();
        let f = m.face(FaceHandle(0));
        let mut border = HashSet::new();
        border.insert(Edge::new(f[0], f[1]));
        let neighbors = m.faces_around_face(FaceHandle(0), &border);
        let distinct: HashSet<FaceHandle> = neighbors
            .into_iter()
            .filter(|&fh| fh != FaceHandle(0))
            .collect();
        assert_eq!(distinct.len(), 2);
    }

    #[test]
    fn test_overlapping_faces_finds_self() {
        let m = tetrahedron();
        let tri = m.triangle(FaceHandle(0));
        let hits = m.overlapping_faces(tri);
        assert!(hits.contains(&FaceHandle(0)));
    }
}
