//! Error types surfaced at the boolean engine's boundary.

use kigumi_mesh::{Edge, FaceHandle};
use thiserror::Error;

/// Errors returned by [`crate::boolean`].
///
/// `IntersectionOfConstraints`, `SeedNotTagged`, and `AmbiguousRay` never
/// reach this enum directly: they are caught and retried or dropped at the
/// innermost loop that can produce them. The one
/// exception is `SeedNotTagged`, which can only fire on a programming
/// error (the global classifier always tags its representative face before
/// seeding), so it is upgraded to `InternalInvariantViolated` if it is ever
/// observed escaping that loop.
#[derive(Error, Debug)]
pub enum KigumiError {
    /// The input is not a triangle mesh, or the faces-around-edge
    /// classifier found conflicting tags on the same face.
    #[error("invalid input mesh: {message}")]
    InvalidInputMesh {
        /// Human-readable description.
        message: String,
        /// The face whose classification was inconsistent, if known.
        face: Option<FaceHandle>,
        /// The shared edge being classified, if known.
        edge: Option<Edge>,
    },

    /// A propagator produced conflicting tags on a previously tagged face,
    /// or a single-seed propagation was asked to start from an untagged
    /// face.
    #[error("internal invariant violated: {message}")]
    InternalInvariantViolated {
        /// Human-readable description.
        message: String,
        /// The face that violated the invariant, if known.
        face: Option<FaceHandle>,
    },

    /// The exact-arithmetic kernel could not represent a result.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(#[from] kigumi_math::ArithmeticError),
}
