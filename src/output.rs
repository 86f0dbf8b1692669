//! Output values attached to transducer arcs.
//!
//! The builder does not interpret outputs beyond the operations below: it
//! splits them at shared prefixes, pushes the remainders down the automaton,
//! and reassembles them at query time. Any type forming a monoid that can
//! recover a suffix from a known prefix works as an output.

use core::fmt::Debug;
use core::hash::Hash;

/// An output value: a monoid with difference.
///
/// `concat` must be associative with [`empty`](Output::empty) as its
/// identity, and `subtract` must invert it on the left:
/// `concat(p, s).subtract(&p) == s`. `common` must return a maximal shared
/// prefix of its operands under `concat`.
pub trait Output: Clone + Eq + Hash + Debug {
    /// The identity element. An arc carrying the identity contributes
    /// nothing to a key's emission.
    fn empty() -> Self;

    /// Whether this value is the identity.
    fn is_empty(&self) -> bool;

    /// The longest shared prefix of `self` and `other`; the identity when
    /// they share nothing.
    fn common(&self, other: &Self) -> Self;

    /// The unique tail such that `prefix · tail == self`.
    ///
    /// `prefix` must actually be a prefix of `self` (the builder only calls
    /// this where that holds); passing the identity returns `self` unchanged.
    fn subtract(&self, prefix: &Self) -> Self;

    /// Left-to-right concatenation `self · other`.
    fn concat(&self, other: &Self) -> Self;

    /// Concatenation with the operands flipped: `other · self`.
    ///
    /// Equivalent to `other.concat(self)`, kept separate because pushing
    /// outputs down the automaton grafts many prefixes in place.
    fn prepend(&self, other: &Self) -> Self;
}

/// The canonical output: an ordered sequence of 32-bit integers under
/// concatenation.
impl Output for Vec<i32> {
    fn empty() -> Self {
        Vec::new()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn common(&self, other: &Self) -> Self {
        let len = self
            .iter()
            .zip(other)
            .take_while(|(a, b)| a == b)
            .count();
        self[..len].to_vec()
    }

    fn subtract(&self, prefix: &Self) -> Self {
        debug_assert!(
            self.starts_with(prefix),
            "subtract requires {prefix:?} to be a prefix of {self:?}"
        );
        self.get(prefix.len()..).map_or_else(Vec::new, <[i32]>::to_vec)
    }

    fn concat(&self, other: &Self) -> Self {
        let mut out = Vec::with_capacity(self.len() + other.len());
        out.extend_from_slice(self);
        out.extend_from_slice(other);
        out
    }

    fn prepend(&self, other: &Self) -> Self {
        other.concat(self)
    }
}

/// The trivial output, turning the transducer into a plain acceptor.
impl Output for () {
    fn empty() -> Self {}

    fn is_empty(&self) -> bool {
        true
    }

    fn common(&self, _other: &Self) -> Self {}

    fn subtract(&self, _prefix: &Self) -> Self {}

    fn concat(&self, _other: &Self) -> Self {}

    fn prepend(&self, _other: &Self) -> Self {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_laws() {
        let e = <Vec<i32> as Output>::empty();
        let x = vec![4, 5];
        assert!(Output::is_empty(&e));
        assert_eq!(e.concat(&x), x);
        assert_eq!(x.concat(&e), x);
        assert_eq!(x.subtract(&e), x);
        assert_eq!(x.prepend(&e), x);
    }

    #[test]
    fn concat_associative() {
        let a = vec![1];
        let b = vec![2, 3];
        let c = vec![4];
        assert_eq!(a.concat(&b).concat(&c), a.concat(&b.concat(&c)));
    }

    #[test]
    fn common_is_maximal_prefix() {
        let cases: &[(&[i32], &[i32], &[i32])] = &[
            (&[], &[], &[]),
            (&[1], &[2], &[]),
            (&[1, 2, 3], &[1, 2, 4], &[1, 2]),
            (&[1, 2], &[1, 2, 9], &[1, 2]),
            (&[7], &[7], &[7]),
        ];
        for &(a, b, want) in cases {
            let (a, b) = (a.to_vec(), b.to_vec());
            let got = a.common(&b);
            assert_eq!(got, want.to_vec());
            assert!(a.starts_with(&got) && b.starts_with(&got));
        }
    }

    #[test]
    fn subtract_inverts_concat() {
        let p = vec![1, 2];
        let s = vec![3];
        assert_eq!(p.concat(&s).subtract(&p), s);
    }

    #[test]
    fn prepend_flips_concat() {
        let a = vec![3, 4];
        let b = vec![1, 2];
        assert_eq!(a.prepend(&b), b.concat(&a));
        assert_eq!(a.prepend(&b), vec![1, 2, 3, 4]);
    }
}
