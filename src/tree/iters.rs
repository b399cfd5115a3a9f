use core::fmt;
use core::iter::FusedIterator;

use generic_array::ArrayLength;

use crate::common::Compare;

use super::arena::Arena;
use super::cursor::RawIter;
use super::FixedRedBlackTree;

/// An iterator over the elements of a `FixedRedBlackTree`, in key order.
///
/// This struct is created by the [`iter`](super::FixedRedBlackTree::iter) method on
/// [`FixedRedBlackTree`](super::FixedRedBlackTree). See its documentation for more.
pub struct Iter<'a, K, V, N: ArrayLength> {
    arena: &'a Arena<K, V, N>,
    raw: RawIter,
    remaining: usize,
}

impl<'a, K, V, N: ArrayLength> Iter<'a, K, V, N> {
    pub(super) fn new(arena: &'a Arena<K, V, N>, raw: RawIter, remaining: usize) -> Self {
        Iter {
            arena,
            raw,
            remaining,
        }
    }
}

impl<'a, K, V, N: ArrayLength> Iterator for Iter<'a, K, V, N> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.raw.next(self.arena)?;
        self.remaining -= 1;
        let node = self.arena.node(idx);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, N: ArrayLength> DoubleEndedIterator for Iter<'_, K, V, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let idx = self.raw.next_back(self.arena)?;
        self.remaining -= 1;
        let node = self.arena.node(idx);
        Some((&node.key, &node.value))
    }
}

impl<K, V, N: ArrayLength> ExactSizeIterator for Iter<'_, K, V, N> {}

impl<K, V, N: ArrayLength> FusedIterator for Iter<'_, K, V, N> {}

impl<K, V, N: ArrayLength> Clone for Iter<'_, K, V, N> {
    fn clone(&self) -> Self {
        Iter {
            arena: self.arena,
            raw: self.raw,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, N: ArrayLength> fmt::Debug for Iter<'_, K, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a `FixedRedBlackTree`, in order.
///
/// This struct is created by the [`keys`](super::FixedRedBlackTree::keys) method on
/// [`FixedRedBlackTree`](super::FixedRedBlackTree). See its documentation for more.
pub struct Keys<'a, K, V, N: ArrayLength> {
    pub(super) inner: Iter<'a, K, V, N>,
}

impl<'a, K, V, N: ArrayLength> Iterator for Keys<'a, K, V, N> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, N: ArrayLength> DoubleEndedIterator for Keys<'_, K, V, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, N: ArrayLength> ExactSizeIterator for Keys<'_, K, V, N> {}

impl<K, V, N: ArrayLength> FusedIterator for Keys<'_, K, V, N> {}

/// An iterator over the values of a `FixedRedBlackTree`, in order by key.
///
/// This struct is created by the [`values`](super::FixedRedBlackTree::values) method on
/// [`FixedRedBlackTree`](super::FixedRedBlackTree). See its documentation for more.
pub struct Values<'a, K, V, N: ArrayLength> {
    pub(super) inner: Iter<'a, K, V, N>,
}

impl<'a, K, V, N: ArrayLength> Iterator for Values<'a, K, V, N> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, N: ArrayLength> DoubleEndedIterator for Values<'_, K, V, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, N: ArrayLength> ExactSizeIterator for Values<'_, K, V, N> {}

impl<K, V, N: ArrayLength> FusedIterator for Values<'_, K, V, N> {}

/// An iterator over a sub-range of the elements of a `FixedRedBlackTree`.
///
/// This struct is created by the [`range`](super::FixedRedBlackTree::range) and
/// [`equal_range`](super::FixedRedBlackTree::equal_range) methods on
/// [`FixedRedBlackTree`](super::FixedRedBlackTree). See their documentation for more.
pub struct Range<'a, K, V, N: ArrayLength> {
    arena: &'a Arena<K, V, N>,
    raw: RawIter,
}

impl<'a, K, V, N: ArrayLength> Range<'a, K, V, N> {
    pub(super) fn new(arena: &'a Arena<K, V, N>, raw: RawIter) -> Self {
        Range { arena, raw }
    }
}

impl<'a, K, V, N: ArrayLength> Iterator for Range<'a, K, V, N> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.raw.next(self.arena)?;
        let node = self.arena.node(idx);
        Some((&node.key, &node.value))
    }
}

impl<K, V, N: ArrayLength> DoubleEndedIterator for Range<'_, K, V, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let idx = self.raw.next_back(self.arena)?;
        let node = self.arena.node(idx);
        Some((&node.key, &node.value))
    }
}

impl<K, V, N: ArrayLength> FusedIterator for Range<'_, K, V, N> {}

impl<K, V, N: ArrayLength> Clone for Range<'_, K, V, N> {
    fn clone(&self) -> Self {
        Range {
            arena: self.arena,
            raw: self.raw,
        }
    }
}

/// An owning iterator over the elements of a `FixedRedBlackTree`, in key order.
///
/// This struct is created by the [`into_iter`](core::iter::IntoIterator::into_iter) method on
/// [`FixedRedBlackTree`](super::FixedRedBlackTree) (provided by the [`IntoIterator`] trait).
pub struct IntoIter<K, V, N: ArrayLength, C> {
    pub(super) tree: FixedRedBlackTree<K, V, N, C>,
}

impl<K, V, N: ArrayLength, C: Compare<K>> Iterator for IntoIter<K, V, N, C> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> DoubleEndedIterator for IntoIter<K, V, N, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> ExactSizeIterator for IntoIter<K, V, N, C> {}

impl<K, V, N: ArrayLength, C: Compare<K>> FusedIterator for IntoIter<K, V, N, C> {}

/// An owning iterator over the keys of a `FixedRedBlackTree`, in order.
///
/// This struct is created by the [`into_keys`](super::FixedRedBlackTree::into_keys) method on
/// [`FixedRedBlackTree`](super::FixedRedBlackTree).
pub struct IntoKeys<K, V, N: ArrayLength, C> {
    pub(super) inner: IntoIter<K, V, N, C>,
}

impl<K, V, N: ArrayLength, C: Compare<K>> Iterator for IntoKeys<K, V, N, C> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> DoubleEndedIterator for IntoKeys<K, V, N, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> ExactSizeIterator for IntoKeys<K, V, N, C> {}

/// An owning iterator over the values of a `FixedRedBlackTree`, in order by key.
///
/// This struct is created by the [`into_values`](super::FixedRedBlackTree::into_values) method
/// on [`FixedRedBlackTree`](super::FixedRedBlackTree).
pub struct IntoValues<K, V, N: ArrayLength, C> {
    pub(super) inner: IntoIter<K, V, N, C>,
}

impl<K, V, N: ArrayLength, C: Compare<K>> Iterator for IntoValues<K, V, N, C> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> DoubleEndedIterator for IntoValues<K, V, N, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> ExactSizeIterator for IntoValues<K, V, N, C> {}
