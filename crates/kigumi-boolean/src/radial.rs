//! Classifies the faces sharing an edge by sorting them radially around
//! it and propagating Union/Intersection/Coplanar/Opposite tags from
//! winding-orientation switches.

use kigumi_mesh::{Edge, FaceHandle, FaceTag, MixedMesh, VertexHandle};

use crate::error::KigumiError;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vector2 {
    x: f64,
    y: f64,
}

struct FaceAroundEdge {
    fh: FaceHandle,
    vh_r: VertexHandle,
    r: Vector2,
    bin: i32,
    /// `true` if the face winds `(p, q, r)` (counter-clockwise around the
    /// edge), `false` if it winds `(q, p, r)` (clockwise).
    ccw: bool,
}

/// Eight angular sectors by sign of `(x, y)`; ties inside a sector are
/// broken by the 2D cross product. `None` for the degenerate case where a
/// face's third vertex projects to the edge's own line.
fn radial_bin(r: Vector2) -> Option<i32> {
    let u = r.x.partial_cmp(&0.0).expect("coordinate is finite");
    let v = r.y.partial_cmp(&0.0).expect("coordinate is finite");
    use std::cmp::Ordering::*;
    Some(match (u, v) {
        (Greater, Greater) => 1,
        (Greater, Less) => 7,
        (Greater, Equal) => 0,
        (Less, Greater) => 3,
        (Less, Less) => 5,
        (Less, Equal) => 4,
        (Equal, Greater) => 2,
        (Equal, Less) => 6,
        (Equal, Equal) => return None,
    })
}

fn radial_cmp(a: &FaceAroundEdge, b: &FaceAroundEdge) -> std::cmp::Ordering {
    use std::cmp::Ordering::*;
    if a.vh_r == b.vh_r {
        return Equal;
    }
    if a.bin != b.bin {
        return a.bin.cmp(&b.bin);
    }
    let cross = a.r.x * b.r.y - b.r.x * a.r.y;
    if cross > 0.0 {
        Less
    } else if cross < 0.0 {
        Greater
    } else {
        Equal
    }
}

/// Classify every face sharing `edge`, mutating their tags in place.
/// Leaves faces `Unknown` if the local neighborhood doesn't determine a
/// consistent configuration (the global classifier handles those).
pub fn classify_faces_around_edge(m: &mut MixedMesh, edge: Edge) -> Result<(), KigumiError> {
    let p = m.point(edge.0);
    let q = m.point(edge.1);
    let plane = kigumi_math::Plane3::new(p, q - p);
    let (u, v) = plane.base();

    let mut entries: Vec<FaceAroundEdge> = Vec::new();
    for fh in m.faces_around_edge(edge) {
        let f = m.face(fh);
        let i = f
            .iter()
            .position(|&vh| vh == edge.0)
            .expect("shared edge's endpoint is a corner of every incident face");
        let j = f
            .iter()
            .position(|&vh| vh == edge.1)
            .expect("shared edge's endpoint is a corner of every incident face");
        let k = 3 - i - j;
        let vh_r = f[k];
        let d = m.point(vh_r) - p;
        let r = Vector2 {
            x: d.dot(u),
            y: d.dot(v),
        };
        let bin = radial_bin(r).ok_or_else(|| KigumiError::InvalidInputMesh {
            message: "face's third vertex lies on the shared edge's line".to_string(),
            face: Some(fh),
            edge: Some(edge),
        })?;
        let ccw = j == (i + 1) % 3;
        entries.push(FaceAroundEdge {
            fh,
            vh_r,
            r,
            bin,
            ccw,
        });
    }

    let n = entries.len();
    if n == 0 {
        return Ok(());
    }
    entries.sort_by(radial_cmp);

    for i in 0..n {
        let j = (i + 1) % n;
        if entries[i].vh_r == entries[j].vh_r {
            let tag = if entries[i].ccw == entries[j].ccw {
                FaceTag::Coplanar
            } else {
                FaceTag::Opposite
            };
            m.data_mut(entries[i].fh).tag = tag;
            m.data_mut(entries[j].fh).tag = tag;
        }
    }

    let mut defined = false;
    let mut seed = 0usize;
    for i in 0..n {
        let j = (i + 1) % n;
        let (fi, fj) = (entries[i].fh, entries[j].fh);
        if m.data(fi).tag != FaceTag::Unknown || m.data(fj).tag != FaceTag::Unknown {
            continue;
        }
        if entries[i].ccw == entries[j].ccw {
            if entries[i].ccw {
                m.data_mut(fi).tag = FaceTag::Intersection;
                m.data_mut(fj).tag = FaceTag::Union;
            } else {
                m.data_mut(fi).tag = FaceTag::Union;
                m.data_mut(fj).tag = FaceTag::Intersection;
            }
            defined = true;
            seed = j;
        }
    }

    if !defined {
        tracing::trace!(?edge, "faces-around-edge: no defined orientation, leaving Unknown");
        return Ok(());
    }

    let mut tag = m.data(entries[seed].fh).tag;
    let mut orientation = entries[seed].ccw;
    for step in (seed + 1)..=(seed + n) {
        let idx = step % n;
        let face = &entries[idx];
        if face.ccw == orientation {
            tag = if tag == FaceTag::Union {
                FaceTag::Intersection
            } else {
                FaceTag::Union
            };
        }
        orientation = face.ccw;

        let data = m.data_mut(face.fh);
        if data.tag == FaceTag::Unknown {
            data.tag = tag;
        } else if matches!(data.tag, FaceTag::Union | FaceTag::Intersection) && data.tag != tag {
            return Err(KigumiError::InvalidInputMesh {
                message: "faces-around-edge classification is inconsistent".to_string(),
                face: Some(face.fh),
                edge: Some(edge),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigumi_mesh::Mesh;
    use kigumi_math::Point3;

    /// Two tetrahedra sharing a single edge, one face from each meeting
    /// it transversally, so the local configuration is defined.
    #[test]
    fn test_transversal_pair_gets_union_and_intersection() {
        let mut m: MixedMesh = Mesh::new();
        let p = m.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let q = m.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let a = m.add_vertex(Point3::new(0.5, 1.0, 0.0));
        let b = m.add_vertex(Point3::new(0.5, -1.0, 0.0));
        let fa = m.add_face([p, q, a]);
        m.data_mut(fa).from_left = true;
        let fb = m.add_face([q, p, b]);
        m.data_mut(fb).from_left = false;
        m.finalize();

        let edge = Edge::new(p, q);
        classify_faces_around_edge(&mut m, edge).unwrap();

        let tags: Vec<FaceTag> = vec![m.data(fa).tag, m.data(fb).tag];
        assert!(tags.contains(&FaceTag::Union));
        assert!(tags.contains(&FaceTag::Intersection));
        assert_ne!(m.data(fa).tag, m.data(fb).tag);
    }
}
