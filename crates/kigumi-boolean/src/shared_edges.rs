//! Finds the border between the two operands: edges incident to at
//! least one face from each side.

use std::collections::HashSet;

use kigumi_mesh::{Edge, MixedMesh};

/// Every edge of `m` incident to at least one `from_left` face and at
/// least one `!from_left` face.
pub fn find_shared_edges(m: &MixedMesh) -> HashSet<Edge> {
    let mut shared = HashSet::new();
    for fh in m.faces() {
        let f = m.face(fh);
        let edges = [
            Edge::new(f[0], f[1]),
            Edge::new(f[1], f[2]),
            Edge::new(f[2], f[0]),
        ];
        for edge in edges {
            if shared.contains(&edge) {
                continue;
            }
            let mut has_left = false;
            let mut has_right = false;
            for around in m.faces_around_edge(edge) {
                if m.data(around).from_left {
                    has_left = true;
                } else {
                    has_right = true;
                }
                if has_left && has_right {
                    break;
                }
            }
            if has_left && has_right {
                shared.insert(edge);
            }
        }
    }
    shared
}
