//! The 16-element Boolean algebra over two operands, in Bocheński
//! notation, and the per-tag output masks the extractor consults.

use std::ops::{BitAnd, BitOr};

/// One of the 16 possible Boolean combinations of two operands `A`, `B`.
///
/// Named aliases: `Union = A`, `SymmetricDifference = J`,
/// `Intersection = K`, `Difference = L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operator {
    /// The universe (both operands, unconditionally).
    V,
    /// `A ∪ B`.
    A,
    /// `(B ⧵ A)ᶜ`.
    B,
    /// `(A ⧵ B)ᶜ`.
    C,
    /// `(A ∩ B)ᶜ`.
    D,
    /// `(A △ B)ᶜ`.
    E,
    /// `Aᶜ`.
    F,
    /// `Bᶜ`.
    G,
    /// `B`.
    H,
    /// `A`.
    I,
    /// `A △ B`.
    J,
    /// `A ∩ B`.
    K,
    /// `A ⧵ B`.
    L,
    /// `B ⧵ A`.
    M,
    /// `(A ∪ B)ᶜ`.
    X,
    /// `∅`.
    O,
}

impl Operator {
    /// `A ∪ B`.
    pub const UNION: Operator = Operator::A;
    /// `A △ B`.
    pub const SYMMETRIC_DIFFERENCE: Operator = Operator::J;
    /// `A ∩ B`.
    pub const INTERSECTION: Operator = Operator::K;
    /// `A ⧵ B`.
    pub const DIFFERENCE: Operator = Operator::L;

    /// Decode a 4-bit wire value (0..15) in `V, A, B, C, D, E, F, G, H, I,
    /// J, K, L, M, X, O` order.
    pub fn from_wire(code: u8) -> Option<Operator> {
        use Operator::*;
        const ORDER: [Operator; 16] = [V, A, B, C, D, E, F, G, H, I, J, K, L, M, X, O];
        ORDER.get(code as usize).copied()
    }

    /// Encode as the 4-bit wire value from [`Operator::from_wire`].
    pub fn to_wire(self) -> u8 {
        use Operator::*;
        match self {
            V => 0,
            A => 1,
            B => 2,
            C => 3,
            D => 4,
            E => 5,
            F => 6,
            G => 7,
            H => 8,
            I => 9,
            J => 10,
            K => 11,
            L => 12,
            M => 13,
            X => 14,
            O => 15,
        }
    }
}

/// Which of the two operands (identity or inverted winding) a tag
/// contributes to an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask(u8);

impl Mask {
    /// Contributes nothing.
    pub const NONE: Mask = Mask(0);
    /// Operand A, identity winding.
    pub const A: Mask = Mask(1);
    /// Operand B, identity winding.
    pub const B: Mask = Mask(2);
    /// Operand A, inverted winding.
    pub const A_INV: Mask = Mask(4);
    /// Operand B, inverted winding.
    pub const B_INV: Mask = Mask(8);

    /// Whether this mask has any bit of `other` set.
    pub fn intersects(self, other: Mask) -> bool {
        (self & other) != Mask::NONE
    }
}

impl BitOr for Mask {
    type Output = Mask;
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitAnd for Mask {
    type Output = Mask;
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

/// The mask a face tagged `Union` contributes, as a function of `op`.
pub fn union_mask(op: Operator) -> Mask {
    use Operator::*;
    match op {
        I | L => Mask::A,
        H | M => Mask::B,
        A | J => Mask::A | Mask::B,
        C | F => Mask::A_INV,
        B | G => Mask::B_INV,
        E | X => Mask::A_INV | Mask::B_INV,
        _ => Mask::NONE,
    }
}

/// The mask a face tagged `Intersection` contributes, as a function of
/// `op`.
pub fn intersection_mask(op: Operator) -> Mask {
    use Operator::*;
    match op {
        B | I => Mask::A,
        C | H => Mask::B,
        E | K => Mask::A | Mask::B,
        F | M => Mask::A_INV,
        G | L => Mask::B_INV,
        D | J => Mask::A_INV | Mask::B_INV,
        _ => Mask::NONE,
    }
}

/// The mask a face tagged `Coplanar` contributes, as a function of `op`.
/// `prefer_a` breaks the tie when the operator would otherwise emit
/// either operand arbitrarily (both sides are geometrically identical at
/// a coplanar face, so only one copy should survive).
pub fn coplanar_mask(op: Operator, prefer_a: bool) -> Mask {
    use Operator::*;
    match op {
        I => Mask::A,
        H => Mask::B,
        A | K => {
            if prefer_a {
                Mask::A
            } else {
                Mask::B
            }
        }
        F => Mask::A_INV,
        G => Mask::B_INV,
        D | X => {
            if prefer_a {
                Mask::A_INV
            } else {
                Mask::B_INV
            }
        }
        _ => Mask::NONE,
    }
}

/// The mask a face tagged `Opposite` contributes, as a function of `op`.
pub fn opposite_mask(op: Operator, prefer_a: bool) -> Mask {
    use Operator::*;
    match op {
        I => Mask::A,
        H => Mask::B,
        B | L => {
            if prefer_a {
                Mask::A
            } else {
                Mask::B_INV
            }
        }
        F => Mask::A_INV,
        G => Mask::B_INV,
        C | M => {
            if prefer_a {
                Mask::A_INV
            } else {
                Mask::B
            }
        }
        _ => Mask::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_operator_emits_both_full_operands() {
        assert_eq!(union_mask(Operator::A), Mask::A | Mask::B);
    }

    #[test]
    fn test_universe_emits_nothing_from_any_tag() {
        assert_eq!(union_mask(Operator::V), Mask::NONE);
        assert_eq!(intersection_mask(Operator::V), Mask::NONE);
        assert_eq!(coplanar_mask(Operator::V, true), Mask::NONE);
        assert_eq!(opposite_mask(Operator::V, true), Mask::NONE);
    }

    #[test]
    fn test_empty_set_emits_nothing_from_any_tag() {
        assert_eq!(union_mask(Operator::O), Mask::NONE);
        assert_eq!(intersection_mask(Operator::O), Mask::NONE);
    }

    #[test]
    fn test_intersection_operator_emits_overlap_only() {
        assert_eq!(intersection_mask(Operator::K), Mask::A | Mask::B);
        assert_eq!(union_mask(Operator::K), Mask::NONE);
    }

    #[test]
    fn test_difference_operator_keeps_a_drops_overlap_with_b() {
        assert_eq!(union_mask(Operator::L), Mask::A);
        assert_eq!(intersection_mask(Operator::L), Mask::B_INV);
    }

    #[test]
    fn test_wire_roundtrip_covers_all_sixteen_operators() {
        for code in 0..16u8 {
            let op = Operator::from_wire(code).expect("valid code");
            assert_eq!(op.to_wire(), code);
        }
        assert!(Operator::from_wire(16).is_none());
    }

    #[test]
    fn test_named_aliases_match_bocheński_letters() {
        assert_eq!(Operator::UNION, Operator::A);
        assert_eq!(Operator::SYMMETRIC_DIFFERENCE, Operator::J);
        assert_eq!(Operator::INTERSECTION, Operator::K);
        assert_eq!(Operator::DIFFERENCE, Operator::L);
    }
}
