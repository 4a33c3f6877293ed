//! Packed bit-vector over tile indices `[0, N)`.
//!
//! Backed by [`fixedbitset::FixedBitSet`]. `BitDomain` wraps it in a
//! width-checked contract (every operation asserts matching widths)
//! plus a `Hash` impl, since `FixedBitSet` alone isn't usable as a
//! `HashMap` key.

use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;

use crate::error::DomainError;

/// A mutable set over `[0, width)`. Two domains are only comparable
/// (and only ever combined) when their widths are equal; a width
/// mismatch is a programmer error (see [`DomainError::WidthMismatch`]).
#[derive(Debug, Clone)]
pub struct BitDomain {
    bits: FixedBitSet,
    width: usize,
}

impl BitDomain {
    /// An empty domain of the given width.
    pub fn new(width: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(width),
            width,
        }
    }

    /// A domain with every bit in `[0, width)` set.
    pub fn full(width: usize) -> Self {
        let mut bits = FixedBitSet::with_capacity(width);
        bits.insert_range(..);
        Self { bits, width }
    }

    /// A domain of the given width with exactly the given bits set.
    pub fn from_indices(width: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut domain = Self::new(width);
        for i in indices {
            domain.set(i, true);
        }
        domain
    }

    /// The domain's fixed width (capacity).
    pub fn width(&self) -> usize {
        self.width
    }

    fn assert_same_width(&self, other: &Self) {
        assert_eq!(
            self.width, other.width,
            "{}",
            DomainError::WidthMismatch {
                expected: self.width,
                found: other.width,
            }
        );
    }

    fn assert_in_bounds(&self, index: usize) {
        assert!(
            index < self.width,
            "{}",
            DomainError::IndexOutOfBounds {
                index,
                width: self.width,
            }
        );
    }

    /// Whether bit `index` is set.
    pub fn get(&self, index: usize) -> bool {
        self.assert_in_bounds(index);
        self.bits.contains(index)
    }

    /// Set or clear bit `index`.
    pub fn set(&mut self, index: usize, value: bool) {
        self.assert_in_bounds(index);
        self.bits.set(index, value);
    }

    /// Clear every bit, leaving the domain empty at the same width.
    pub fn clear_all(&mut self) {
        self.bits.clear();
    }

    /// Flip bit `index`.
    pub fn toggle(&mut self, index: usize) {
        self.assert_in_bounds(index);
        self.bits.toggle(index);
    }

    /// Cardinality (population count).
    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether every bit in `[0, width)` is set.
    pub fn is_full(&self) -> bool {
        self.count() == self.width
    }

    /// Whether two domains have the same width and the same bits set.
    pub fn equals(&self, other: &Self) -> bool {
        self.width == other.width && self.bits == other.bits
    }

    /// Whether every bit set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.assert_same_width(other);
        self.bits.is_subset(&other.bits)
    }

    /// `self ∪ other`, as a new domain.
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_into(other);
        result
    }

    /// `self ∩ other`, as a new domain.
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_into(other);
        result
    }

    /// `self \ other`, as a new domain.
    pub fn difference(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.bits.difference_with(&other.bits);
        result
    }

    /// Mutate `self` into `self ∪ other`. Hot path: used by
    /// [`crate::support_cache::SupportCache`] to accumulate support
    /// across every tile in a cell domain.
    pub fn union_into(&mut self, other: &Self) {
        self.assert_same_width(other);
        self.bits.union_with(&other.bits);
    }

    /// Mutate `self` into `self ∩ other`. Hot path: used by
    /// [`crate::propagator::propagate`] on every neighbor visit.
    pub fn intersect_into(&mut self, other: &Self) {
        self.assert_same_width(other);
        self.bits.intersect_with(&other.bits);
    }

    /// The set indices, in ascending order. Finite, not restartable.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    /// The smallest set index, if any.
    pub fn first_set(&self) -> Option<usize> {
        self.bits.ones().next()
    }
}

impl PartialEq for BitDomain {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for BitDomain {}

impl Hash for BitDomain {
    /// Word-wise over the set bits (ascending index order, which is
    /// exactly the `FixedBitSet` storage order), so equal domains
    /// always hash equal regardless of how they were constructed.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        for bit in self.bits.ones() {
            bit.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let d = BitDomain::new(8);
        assert!(d.is_empty());
        assert_eq!(d.count(), 0);
    }

    #[test]
    fn full_has_every_bit() {
        let d = BitDomain::full(5);
        assert!(d.is_full());
        assert_eq!(d.count(), 5);
        for i in 0..5 {
            assert!(d.get(i));
        }
    }

    #[test]
    fn set_and_get() {
        let mut d = BitDomain::new(4);
        d.set(2, true);
        assert!(d.get(2));
        assert!(!d.get(0));
        d.set(2, false);
        assert!(!d.get(2));
    }

    #[test]
    #[should_panic]
    fn get_out_of_bounds_panics() {
        let d = BitDomain::new(4);
        d.get(4);
    }

    #[test]
    #[should_panic]
    fn mismatched_width_union_panics() {
        let mut a = BitDomain::new(4);
        let b = BitDomain::new(5);
        a.union_into(&b);
    }

    #[test]
    fn union_intersection_difference() {
        let a = BitDomain::from_indices(8, [0, 1, 2]);
        let b = BitDomain::from_indices(8, [2, 3, 4]);

        let u = a.union(&b);
        assert_eq!(u.iter_set().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        let i = a.intersection(&b);
        assert_eq!(i.iter_set().collect::<Vec<_>>(), vec![2]);

        let d = a.difference(&b);
        assert_eq!(d.iter_set().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn subset() {
        let a = BitDomain::from_indices(8, [1, 2]);
        let b = BitDomain::from_indices(8, [1, 2, 3]);
        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
    }

    #[test]
    fn first_set_and_iter_order() {
        let d = BitDomain::from_indices(16, [7, 3, 9, 0]);
        assert_eq!(d.first_set(), Some(0));
        assert_eq!(d.iter_set().collect::<Vec<_>>(), vec![0, 3, 7, 9]);
    }

    #[test]
    fn equal_domains_hash_equal() {
        use std::collections::hash_map::DefaultHasher;

        let a = BitDomain::from_indices(10, [1, 4, 6]);
        let b = BitDomain::from_indices(10, [6, 1, 4]);
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn clone_is_independent() {
        let mut a = BitDomain::from_indices(8, [0, 1]);
        let b = a.clone();
        a.set(2, true);
        assert!(!b.get(2));
    }
}
