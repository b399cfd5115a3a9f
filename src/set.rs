//! An ordered set over the tree engine.
//!
//! This module provides [`FixedSet<K, N, C>`], a wrapper around a
//! [`FixedRedBlackTree`] with unit values. Like
//! [`FixedMap`](crate::FixedMap), it reports a full container as a
//! [`CapacityError`].

use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::RangeBounds;

use generic_array::ArrayLength;

use crate::common::{Compare, Natural};
use crate::error::CapacityError;
use crate::tree::{FixedRedBlackTree, IntoKeys, Keys, Range};

/// An ordered set holding at most `N` elements, without heap allocation.
///
/// # Example
///
/// ```
/// use fixed_rbtree::FixedSet;
/// use typenum::U8;
///
/// let mut set = FixedSet::<u32, U8>::new();
/// for x in [4, 1, 4, 9] {
///     set.insert(x).unwrap();
/// }
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 4, 9]);
/// ```
pub struct FixedSet<K, N: ArrayLength, C = Natural> {
    tree: FixedRedBlackTree<K, (), N, C>,
}

impl<K, N: ArrayLength> FixedSet<K, N> {
    /// Creates an empty set ordered by [`Ord`].
    #[inline]
    pub fn new() -> Self {
        Self {
            tree: FixedRedBlackTree::new(),
        }
    }
}

impl<K, N: ArrayLength, C: Default> Default for FixedSet<K, N, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, N: ArrayLength, C> FixedSet<K, N, C> {
    /// Creates an empty set ordered by `compare`.
    #[inline]
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: FixedRedBlackTree::with_comparator(compare),
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the maximum number of elements the set can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Returns `true` if inserting a new element would fail.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.tree.is_full()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the smallest element.
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|(k, _)| k)
    }

    /// Returns the largest element.
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|(k, _)| k)
    }

    /// Gets an iterator over the elements, in order.
    pub fn iter(&self) -> Iter<'_, K, N> {
        Iter {
            inner: self.tree.keys(),
        }
    }

    /// The underlying tree, for cursors and handles.
    pub fn as_tree(&self) -> &FixedRedBlackTree<K, (), N, C> {
        &self.tree
    }
}

impl<K, N: ArrayLength, C: Compare<K>> FixedSet<K, N, C> {
    /// Adds `key` to the set.
    ///
    /// Returns whether the element was newly inserted. An equivalent element
    /// already present is kept and `key` is dropped.
    ///
    /// # Errors
    ///
    /// Returns `key` back if it is absent and the set is full.
    pub fn insert(&mut self, key: K) -> Result<bool, CapacityError<K>> {
        if self.tree.is_full() && !self.tree.contains_key(&key) {
            let capacity = self.capacity();
            crate::trace!(capacity, "refusing insert into full set");
            return Err(CapacityError::new(capacity, key));
        }
        Ok(self.tree.insert(key, ()).1)
    }

    /// Returns `true` if the set contains an element equivalent to `key`.
    pub fn contains<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.contains_key(key)
    }

    /// Returns the stored element equivalent to `key`.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.find(key).key()
    }

    /// Removes the element equivalent to `key`, returning whether it was
    /// present.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.remove(key).is_some()
    }

    /// Removes and returns the element equivalent to `key`.
    pub fn take<Q: ?Sized>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.remove(key).map(|(k, ())| k)
    }

    /// Removes and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first().map(|(k, ())| k)
    }

    /// Removes and returns the largest element.
    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last().map(|(k, ())| k)
    }

    /// Gets an iterator over the elements that fall within `range`.
    pub fn range<Q: ?Sized, R>(&self, range: R) -> SetRange<'_, K, N>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        SetRange {
            inner: self.tree.range(range),
        }
    }

    /// Keeps only the elements for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.tree.retain(|k, _| keep(k));
    }
}

/// An iterator over the elements of a `FixedSet`, in order.
///
/// This struct is created by the [`iter`](FixedSet::iter) method on [`FixedSet`].
pub struct Iter<'a, K, N: ArrayLength> {
    inner: Keys<'a, K, (), N>,
}

impl<'a, K, N: ArrayLength> Iterator for Iter<'a, K, N> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, N: ArrayLength> DoubleEndedIterator for Iter<'_, K, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, N: ArrayLength> ExactSizeIterator for Iter<'_, K, N> {}

impl<K, N: ArrayLength> FusedIterator for Iter<'_, K, N> {}

/// An iterator over a sub-range of the elements of a `FixedSet`.
///
/// This struct is created by the [`range`](FixedSet::range) method on [`FixedSet`].
pub struct SetRange<'a, K, N: ArrayLength> {
    inner: Range<'a, K, (), N>,
}

impl<'a, K, N: ArrayLength> Iterator for SetRange<'a, K, N> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, N: ArrayLength> DoubleEndedIterator for SetRange<'_, K, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, N: ArrayLength> FusedIterator for SetRange<'_, K, N> {}

impl<K: Clone, N: ArrayLength, C: Compare<K> + Clone> Clone for FixedSet<K, N, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, N: ArrayLength, C> PartialEq for FixedSet<K, N, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, N: ArrayLength, C> Eq for FixedSet<K, N, C> {}

impl<K: fmt::Debug, N: ArrayLength, C> fmt::Debug for FixedSet<K, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, N: ArrayLength, C> IntoIterator for &'a FixedSet<K, N, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, N: ArrayLength, C: Compare<K>> IntoIterator for FixedSet<K, N, C> {
    type Item = K;
    type IntoIter = IntoKeys<K, (), N, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_keys()
    }
}
