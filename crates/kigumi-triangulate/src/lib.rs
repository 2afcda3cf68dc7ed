#![warn(missing_docs)]

//! Per-face constrained Delaunay triangulation: projects a triangle's
//! plane to 2D, accumulates the points and constraint edges corefinement
//! finds crossing it, and re-triangulates.

mod projector;
mod triangulator;

pub use projector::PointProjector;
pub use triangulator::{TriangulateError, Triangulator, VertexHandle};
