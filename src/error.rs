//! Error types returned by the tree wrappers and the structural checker.

use core::error::Error;
use core::fmt;

/// An insert into a full [`FixedMap`](crate::FixedMap) or
/// [`FixedSet`](crate::FixedSet) was refused.
///
/// The rejected item is handed back unchanged.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CapacityError<T> {
    capacity: usize,
    item: T,
}

impl<T> CapacityError<T> {
    pub(crate) fn new(capacity: usize, item: T) -> Self {
        CapacityError { capacity, item }
    }

    /// The capacity of the container that refused the item.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the rejected item.
    pub fn into_inner(self) -> T {
        self.item
    }
}

impl<T> fmt::Debug for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityError")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capacity of {} elements exceeded", self.capacity)
    }
}

impl<T> Error for CapacityError<T> {}

/// A structural property of a tree that does not hold.
///
/// Returned by [`FixedRedBlackTree::check_invariants`](crate::FixedRedBlackTree::check_invariants).
/// Slot numbers are arena indices, as in [`Handle::index`](crate::Handle::index).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantError {
    /// The root node is red.
    RedRoot,
    /// A node has a red right child.
    RedRightLink {
        /// The parent of the red right child.
        slot: usize,
    },
    /// A red node has a red left child.
    ConsecutiveReds {
        /// The upper of the two red nodes.
        slot: usize,
    },
    /// The two subtrees of a node hold different numbers of black nodes on
    /// their paths to the leaves.
    BlackHeightMismatch {
        /// The node whose subtrees disagree.
        slot: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A node's parent link does not point back at the node linking to it.
    BrokenParentLink {
        /// The node with the wrong parent link.
        slot: usize,
    },
    /// A link points at a free slot.
    DanglingLink {
        /// The free slot.
        slot: usize,
    },
    /// The in-order walk is not strictly increasing under the comparator.
    OutOfOrder {
        /// The first node not ordered after its predecessor.
        slot: usize,
    },
    /// The number of nodes reachable from the root, the recorded length and
    /// the number of live slots do not all agree.
    CountMismatch {
        /// Recorded element count.
        len: usize,
        /// Nodes reachable from the root.
        reachable: usize,
        /// Live slots in the arena.
        active: usize,
    },
    /// The free list does not cover exactly the free slots.
    FreeListCorrupted,
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(f, "root node is red"),
            Self::RedRightLink { slot } => write!(f, "slot {slot} has a red right child"),
            Self::ConsecutiveReds { slot } => {
                write!(f, "red slot {slot} has a red left child")
            }
            Self::BlackHeightMismatch { slot, left, right } => {
                write!(
                    f,
                    "black height mismatch at slot {slot}: left {left}, right {right}"
                )
            }
            Self::BrokenParentLink { slot } => {
                write!(f, "slot {slot} has a wrong parent link")
            }
            Self::DanglingLink { slot } => write!(f, "link to free slot {slot}"),
            Self::OutOfOrder { slot } => {
                write!(f, "key at slot {slot} is not ordered after its predecessor")
            }
            Self::CountMismatch {
                len,
                reachable,
                active,
            } => {
                write!(
                    f,
                    "element count mismatch: len {len}, reachable {reachable}, live slots {active}"
                )
            }
            Self::FreeListCorrupted => write!(f, "free list does not match the free slots"),
        }
    }
}

impl Error for InvariantError {}
