#![warn(missing_docs)]

//! Exact-predicate arithmetic facade for the kigumi boolean engine.
//!
//! Points carry `f64` coordinates, but every predicate that affects face
//! tagging — orientation, sidedness, coplanarity, collinearity — is routed
//! through the `robust` crate's adaptive-precision implementation of
//! Shewchuk's algorithms, which is exact for `f64` inputs. Constructions
//! (intersection points, normals, projections) are computed with plain
//! `f64` arithmetic once the controlling predicate has fixed a sign; this is
//! the "exact predicates, inexact constructions" style CGAL calls
//! `Exact_predicates_inexact_constructions_kernel`, and it is what this
//! crate implements.
//!
//! Only predicates affecting tagging must be exact (see the boolean
//! engine's invariants); this facade exists so every other crate in the
//! workspace goes through one place for that guarantee.

mod intersect;
mod point;
pub mod predicates;
mod primitives;

pub use intersect::{intersect_triangle_ray, intersect_triangles, RayIntersection, TriangleIntersection};
pub use point::{Point2, Point3, Vector2, Vector3};
pub use predicates::Sign;
pub use primitives::{Bbox3, Plane3, Ray3, Segment3, Triangle3};

/// Errors surfaced by the arithmetic facade.
///
/// Per the exact-arithmetic facade's contract, this is only ever returned
/// if the underlying kernel cannot represent an exact result — never
/// expected for rational/finite `f64` input, but modeled as a `Result` so
/// callers have a path to propagate a kernel failure instead of panicking.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArithmeticError {
    /// The kernel could not represent an exact result for the given inputs.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}
