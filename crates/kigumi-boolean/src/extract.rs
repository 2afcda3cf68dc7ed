//! Builds the output triangle soup from a fully tagged mixed mesh and an
//! operator.

use kigumi_mesh::{FaceTag, MixedMesh};

use crate::operator::{Mask, Operator};

/// Extract the faces selected by `op`, flipping winding on faces that are
/// included only with inverted orientation.
///
/// A face can independently satisfy "include as-is" and "include
/// inverted" for a pathological operator; inverted wins, matching the
/// priority of the original extraction loop.
pub fn extract(m: &MixedMesh, op: Operator) -> Vec<[kigumi_math::Point3; 3]> {
    let union_mask = crate::operator::union_mask(op);
    let intersection_mask = crate::operator::intersection_mask(op);
    let coplanar_mask = crate::operator::coplanar_mask(op, true);
    let opposite_mask = crate::operator::opposite_mask(op, true);

    let mut out = Vec::new();
    for fh in m.faces() {
        let data = m.data(fh);
        let mask = match data.tag {
            FaceTag::Union => union_mask,
            FaceTag::Intersection => intersection_mask,
            FaceTag::Coplanar => coplanar_mask,
            FaceTag::Opposite => opposite_mask,
            FaceTag::Unknown => {
                tracing::warn!(face = ?fh, "extract: face left unclassified, skipping");
                continue;
            }
        };

        let side = if data.from_left { Mask::A } else { Mask::B };
        let side_inv = if data.from_left { Mask::A_INV } else { Mask::B_INV };
        let output_inv = mask.intersects(side_inv);
        let output = mask.intersects(side);

        let tri = m.triangle(fh);
        if output_inv {
            out.push([tri.p, tri.r, tri.q]);
        } else if output {
            out.push([tri.p, tri.q, tri.r]);
        }
    }
    out
}
