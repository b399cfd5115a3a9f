use core::fmt;
use core::ptr;

use generic_array::ArrayLength;

use crate::common::{Compare, SlotIndex, NIL};

use super::arena::Arena;
use super::FixedRedBlackTree;

/// A stable reference to an element of a [`FixedRedBlackTree`].
///
/// A handle is the arena index of the element's node. It does not borrow
/// the tree, so it can be kept across inserts and erases: it keeps referring
/// to the same element until that element itself is erased. Erasing an
/// element never moves any other element to a different slot.
///
/// Using a handle after its element was erased is a logic error; the tree
/// panics if the slot is free, and may return an unrelated element if the
/// slot was reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(pub(crate) SlotIndex);

impl Handle {
    /// The arena slot this handle refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// Navigation over the parent links. None of these need a stack.
impl<K, V, N: ArrayLength> Arena<K, V, N> {
    pub(crate) fn min_from(&self, mut idx: SlotIndex) -> SlotIndex {
        if idx == NIL {
            return NIL;
        }
        while self.left(idx) != NIL {
            idx = self.left(idx);
        }
        idx
    }

    pub(crate) fn max_from(&self, mut idx: SlotIndex) -> SlotIndex {
        if idx == NIL {
            return NIL;
        }
        while self.right(idx) != NIL {
            idx = self.right(idx);
        }
        idx
    }

    /// In-order successor of `idx`, or `NIL` past the last element.
    pub(crate) fn successor(&self, idx: SlotIndex) -> SlotIndex {
        let right = self.right(idx);
        if right != NIL {
            return self.min_from(right);
        }

        let mut child = idx;
        let mut parent = self.parent(child);
        while parent != NIL && self.left(parent) != child {
            child = parent;
            parent = self.parent(child);
        }
        parent
    }

    /// In-order predecessor of `idx`, or `NIL` before the first element.
    pub(crate) fn predecessor(&self, idx: SlotIndex) -> SlotIndex {
        let left = self.left(idx);
        if left != NIL {
            return self.max_from(left);
        }

        let mut child = idx;
        let mut parent = self.parent(child);
        while parent != NIL && self.right(parent) != child {
            child = parent;
            parent = self.parent(child);
        }
        parent
    }

    /// First node of a postorder walk of the subtree at `idx`.
    pub(crate) fn postorder_first(&self, mut idx: SlotIndex) -> SlotIndex {
        if idx == NIL {
            return NIL;
        }
        loop {
            let node = self.node(idx);
            if node.left != NIL {
                idx = node.left;
            } else if node.right != NIL {
                idx = node.right;
            } else {
                return idx;
            }
        }
    }

    /// Postorder successor of `idx` within the whole tree.
    pub(crate) fn postorder_next(&self, idx: SlotIndex) -> SlotIndex {
        let parent = self.parent(idx);
        if parent == NIL {
            return NIL;
        }
        let sibling = self.right(parent);
        if self.left(parent) == idx && sibling != NIL {
            self.postorder_first(sibling)
        } else {
            parent
        }
    }
}

/// Inclusive `[front, back]` span of in-order positions, walked from both
/// ends with the successor/predecessor rules.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawIter {
    front: SlotIndex,
    back: SlotIndex,
}

impl RawIter {
    pub(crate) const EMPTY: RawIter = RawIter {
        front: NIL,
        back: NIL,
    };

    pub(crate) fn full<K, V, N: ArrayLength>(arena: &Arena<K, V, N>, root: SlotIndex) -> Self {
        RawIter {
            front: arena.min_from(root),
            back: arena.max_from(root),
        }
    }

    /// Span from `start` up to, but excluding, `end` (`NIL` meaning past the
    /// last element). The caller guarantees `start` does not come after `end`.
    pub(crate) fn between<K, V, N: ArrayLength>(
        arena: &Arena<K, V, N>,
        root: SlotIndex,
        start: SlotIndex,
        end: SlotIndex,
    ) -> Self {
        if start == NIL || start == end {
            return RawIter::EMPTY;
        }
        let back = if end == NIL {
            arena.max_from(root)
        } else {
            arena.predecessor(end)
        };
        RawIter { front: start, back }
    }

    pub(crate) fn next<K, V, N: ArrayLength>(&mut self, arena: &Arena<K, V, N>) -> Option<SlotIndex> {
        let idx = self.front;
        if idx == NIL {
            return None;
        }
        if idx == self.back {
            *self = RawIter::EMPTY;
        } else {
            self.front = arena.successor(idx);
        }
        Some(idx)
    }

    pub(crate) fn next_back<K, V, N: ArrayLength>(
        &mut self,
        arena: &Arena<K, V, N>,
    ) -> Option<SlotIndex> {
        let idx = self.back;
        if idx == NIL {
            return None;
        }
        if idx == self.front {
            *self = RawIter::EMPTY;
        } else {
            self.back = arena.predecessor(idx);
        }
        Some(idx)
    }
}

/// A read-only position in a [`FixedRedBlackTree`], able to step in both
/// directions.
///
/// A cursor either points at an element or at the past-the-end position.
/// Stepping past the last element lands on the end position, and stepping
/// from the end position wraps around: [`move_next`](Cursor::move_next) goes
/// to the first element and [`move_prev`](Cursor::move_prev) to the last.
///
/// Two cursors are equal when they belong to the same tree and are at the
/// same position.
pub struct Cursor<'a, K, V, N: ArrayLength, C> {
    pub(crate) tree: &'a FixedRedBlackTree<K, V, N, C>,
    pub(crate) idx: SlotIndex,
}

impl<'a, K, V, N: ArrayLength, C> Cursor<'a, K, V, N, C> {
    /// Returns `true` at the past-the-end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.idx == NIL
    }

    /// Handle to the current element, `None` at the end position.
    pub fn handle(&self) -> Option<Handle> {
        (self.idx != NIL).then_some(Handle(self.idx))
    }

    /// The current key, `None` at the end position.
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    /// The current value, `None` at the end position.
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// The current key and value, `None` at the end position.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        if self.idx == NIL {
            return None;
        }
        let node = self.tree.arena.node(self.idx);
        Some((&node.key, &node.value))
    }

    /// Steps to the next element in key order.
    pub fn move_next(&mut self) {
        let arena = &self.tree.arena;
        self.idx = if self.idx == NIL {
            arena.min_from(self.tree.root)
        } else {
            arena.successor(self.idx)
        };
    }

    /// Steps to the previous element in key order.
    pub fn move_prev(&mut self) {
        let arena = &self.tree.arena;
        self.idx = if self.idx == NIL {
            arena.max_from(self.tree.root)
        } else {
            arena.predecessor(self.idx)
        };
    }

    /// Returns the position after this one, leaving `self` in place.
    pub fn next_cursor(&self) -> Self {
        let mut next = *self;
        next.move_next();
        next
    }

    /// Returns the position before this one, leaving `self` in place.
    pub fn prev_cursor(&self) -> Self {
        let mut prev = *self;
        prev.move_prev();
        prev
    }
}

impl<K, V, N: ArrayLength, C> Clone for Cursor<'_, K, V, N, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, N: ArrayLength, C> Copy for Cursor<'_, K, V, N, C> {}

impl<K, V, N: ArrayLength, C> PartialEq for Cursor<'_, K, V, N, C> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl<K, V, N: ArrayLength, C> Eq for Cursor<'_, K, V, N, C> {}

impl<K: fmt::Debug, V: fmt::Debug, N: ArrayLength, C> fmt::Debug for Cursor<'_, K, V, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

/// A position in a [`FixedRedBlackTree`] that can modify values and remove
/// the element it points at.
///
/// Stepping follows the same rules as [`Cursor`].
pub struct CursorMut<'a, K, V, N: ArrayLength, C> {
    pub(crate) tree: &'a mut FixedRedBlackTree<K, V, N, C>,
    pub(crate) idx: SlotIndex,
}

impl<'a, K, V, N: ArrayLength, C> CursorMut<'a, K, V, N, C> {
    /// Returns `true` at the past-the-end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.idx == NIL
    }

    /// Handle to the current element, `None` at the end position.
    pub fn handle(&self) -> Option<Handle> {
        (self.idx != NIL).then_some(Handle(self.idx))
    }

    /// The current key, `None` at the end position.
    pub fn key(&self) -> Option<&K> {
        (self.idx != NIL).then(|| self.tree.arena.key_at(self.idx))
    }

    /// The current value, `None` at the end position.
    pub fn value(&self) -> Option<&V> {
        (self.idx != NIL).then(|| &self.tree.arena.node(self.idx).value)
    }

    /// The current value mutably, `None` at the end position.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        if self.idx == NIL {
            return None;
        }
        Some(&mut self.tree.arena.node_mut(self.idx).value)
    }

    /// Steps to the next element in key order.
    pub fn move_next(&mut self) {
        let arena = &self.tree.arena;
        self.idx = if self.idx == NIL {
            arena.min_from(self.tree.root)
        } else {
            arena.successor(self.idx)
        };
    }

    /// Steps to the previous element in key order.
    pub fn move_prev(&mut self) {
        let arena = &self.tree.arena;
        self.idx = if self.idx == NIL {
            arena.max_from(self.tree.root)
        } else {
            arena.predecessor(self.idx)
        };
    }

    /// Read-only view of the current position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, N, C> {
        Cursor {
            tree: &*self.tree,
            idx: self.idx,
        }
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> CursorMut<'_, K, V, N, C> {
    /// Removes the current element and moves to its successor.
    ///
    /// Returns `None`, and does nothing, at the end position.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        if self.idx == NIL {
            return None;
        }
        let successor = self.tree.arena.successor(self.idx);
        let removed = self.tree.erase_slot(self.idx);
        self.idx = successor;
        Some(removed)
    }
}
