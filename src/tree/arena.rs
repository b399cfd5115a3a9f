use core::fmt;
use core::mem;

use generic_array::sequence::GenericSequence;
use generic_array::{ArrayLength, GenericArray};

use crate::common::{Color, SlotIndex, NIL};

use super::cursor::Handle;

/// A live tree node: the payload plus its links.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: SlotIndex,
    pub(crate) right: SlotIndex,
    pub(crate) parent: SlotIndex,
    pub(crate) color: Color,
}

/// One arena slot. The variant is the only record of whether the slot is
/// live; moving between variants drops or constructs the payload in place.
pub(crate) enum Slot<K, V> {
    Free { next: SlotIndex },
    Active(Node<K, V>),
}

/// The fixed block of `N` slots backing a tree, with its free list.
///
/// Slots are handed out from a singly-linked free list threaded through the
/// `Free` slots, so both [`allocate`](Arena::allocate) and
/// [`deallocate`](Arena::deallocate) are O(1) and never touch the heap.
///
/// The arena is only exposed publicly through the closures given to
/// [`FixedRedBlackTree::insert_with`](crate::FixedRedBlackTree::insert_with).
/// Those closures must only allocate the node they link in, or deallocate a
/// node they allocated themselves and never linked; releasing a node that
/// is part of the tree leaves the tree inconsistent.
pub struct Arena<K, V, N: ArrayLength> {
    slots: GenericArray<Slot<K, V>, N>,
    next_available: SlotIndex,
    len: usize,
}

impl<K, V, N: ArrayLength> Arena<K, V, N> {
    pub(crate) fn new() -> Self {
        assert!(
            N::to_usize() < NIL as usize,
            "capacity must be smaller than {NIL}"
        );
        Arena {
            slots: GenericArray::generate(free_link::<K, V, N>),
            next_available: first_free::<N>(),
            len: 0,
        }
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        N::to_usize()
    }

    /// Constructs a new unlinked red node holding `key` and `value`.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already live.
    pub fn allocate(&mut self, key: K, value: V) -> Handle {
        Handle(self.allocate_slot(key, value))
    }

    /// Destroys the node at `handle` and returns its payload.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to a live slot.
    pub fn deallocate(&mut self, handle: Handle) -> (K, V) {
        self.deallocate_slot(handle.0)
    }

    /// Returns the key stored at `handle`.
    pub fn key(&self, handle: Handle) -> &K {
        &self.node(handle.0).key
    }

    /// Returns the value stored at `handle`.
    pub fn value(&self, handle: Handle) -> &V {
        &self.node(handle.0).value
    }

    /// Returns the value stored at `handle` mutably.
    pub fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.node_mut(handle.0).value
    }

    pub(crate) fn allocate_slot(&mut self, key: K, value: V) -> SlotIndex {
        assert!(
            self.len < self.capacity(),
            "fixed red-black tree is full (capacity {})",
            self.capacity()
        );

        let idx = self.next_available;
        let slot = &mut self.slots[idx as usize];
        self.next_available = match slot {
            Slot::Free { next } => *next,
            Slot::Active(_) => unreachable!("free list head {idx} is a live slot"),
        };
        *slot = Slot::Active(Node {
            key,
            value,
            left: NIL,
            right: NIL,
            parent: NIL,
            color: Color::Red,
        });
        self.len += 1;

        idx
    }

    pub(crate) fn deallocate_slot(&mut self, idx: SlotIndex) -> (K, V) {
        assert!(self.is_active(idx), "slot {idx} is not a live node");

        let freed = mem::replace(
            &mut self.slots[idx as usize],
            Slot::Free {
                next: self.next_available,
            },
        );
        self.next_available = idx;
        self.len -= 1;

        match freed {
            Slot::Active(node) => (node.key, node.value),
            Slot::Free { .. } => unreachable!(),
        }
    }

    /// Drops every live payload and relinks all slots in index order.
    pub(crate) fn reset(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = free_link::<K, V, N>(i);
        }
        self.next_available = first_free::<N>();
        self.len = 0;
    }

    pub(crate) fn is_active(&self, idx: SlotIndex) -> bool {
        matches!(self.slots.get(idx as usize), Some(Slot::Active(_)))
    }

    #[inline]
    pub(crate) fn node(&self, idx: SlotIndex) -> &Node<K, V> {
        match &self.slots[idx as usize] {
            Slot::Active(node) => node,
            Slot::Free { .. } => panic!("slot {idx} is not a live node"),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: SlotIndex) -> &mut Node<K, V> {
        match &mut self.slots[idx as usize] {
            Slot::Active(node) => node,
            Slot::Free { .. } => panic!("slot {idx} is not a live node"),
        }
    }

    #[inline]
    pub(crate) fn key_at(&self, idx: SlotIndex) -> &K {
        &self.node(idx).key
    }

    #[inline]
    pub(crate) fn left(&self, idx: SlotIndex) -> SlotIndex {
        self.node(idx).left
    }

    #[inline]
    pub(crate) fn right(&self, idx: SlotIndex) -> SlotIndex {
        self.node(idx).right
    }

    #[inline]
    pub(crate) fn parent(&self, idx: SlotIndex) -> SlotIndex {
        self.node(idx).parent
    }

    #[inline]
    pub(crate) fn color(&self, idx: SlotIndex) -> Color {
        self.node(idx).color
    }

    /// `NIL` counts as black.
    #[inline]
    pub(crate) fn is_red(&self, idx: SlotIndex) -> bool {
        idx != NIL && self.node(idx).color == Color::Red
    }

    /// Links `child` (possibly `NIL`) as the left child of `idx`.
    #[inline]
    pub(crate) fn set_left(&mut self, idx: SlotIndex, child: SlotIndex) {
        self.node_mut(idx).left = child;
        if child != NIL {
            self.node_mut(child).parent = idx;
        }
    }

    /// Links `child` (possibly `NIL`) as the right child of `idx`.
    #[inline]
    pub(crate) fn set_right(&mut self, idx: SlotIndex, child: SlotIndex) {
        self.node_mut(idx).right = child;
        if child != NIL {
            self.node_mut(child).parent = idx;
        }
    }

    /// Number of live slots, counted by scanning the whole arena.
    pub(crate) fn count_active(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Active(_)))
            .count()
    }

    /// Length of the free list, or `None` if it does not terminate within
    /// `capacity` steps or runs into a live slot.
    pub(crate) fn free_list_len(&self) -> Option<usize> {
        let mut n = 0;
        let mut idx = self.next_available;
        while idx != NIL {
            if n >= self.capacity() {
                return None;
            }
            match self.slots.get(idx as usize)? {
                Slot::Free { next } => idx = *next,
                Slot::Active(_) => return None,
            }
            n += 1;
        }
        Some(n)
    }
}

impl<K, V, N: ArrayLength> fmt::Debug for Arena<K, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("next_available", &self.next_available)
            .finish()
    }
}

fn free_link<K, V, N: ArrayLength>(i: usize) -> Slot<K, V> {
    let next = if i + 1 < N::to_usize() {
        (i + 1) as SlotIndex
    } else {
        NIL
    };
    Slot::Free { next }
}

fn first_free<N: ArrayLength>() -> SlotIndex {
    if N::to_usize() == 0 {
        NIL
    } else {
        0
    }
}
