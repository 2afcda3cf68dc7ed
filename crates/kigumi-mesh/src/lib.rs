#![warn(missing_docs)]

//! Indexed triangle meshes for the kigumi boolean engine: a
//! deduplicating point interner, a plain polygon soup for mesh
//! input/output, and an adjacency-indexed [`Mesh`] whose tagged
//! specialization ([`MixedMesh`]) carries corefinement's per-face
//! provenance and classification.

mod handles;
mod mesh;
mod point_interner;
mod polygon_soup;

pub use handles::{Edge, FaceHandle, VertexHandle};
pub use mesh::{FaceData, FaceTag, FacesAroundEdge, Mesh, MixedMesh};
pub use point_interner::PointInterner;
pub use polygon_soup::PolygonSoup;
