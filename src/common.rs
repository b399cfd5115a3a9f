//! Items shared by the tree engine and its wrappers: slot indices, link
//! colors and the ordering predicate.

/// Index of a slot in a tree's arena.
pub(crate) type SlotIndex = u32;

/// Sentinel index meaning "no link" / "no such slot".
pub(crate) const NIL: SlotIndex = SlotIndex::MAX;

/// Color of the link from a node's parent to the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    pub(crate) fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A strict weak ordering used to arrange keys in a tree.
///
/// Two keys `a` and `b` are considered equivalent when neither
/// `less(a, b)` nor `less(b, a)` holds; a tree never stores two equivalent
/// keys.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparator:
///
/// ```
/// use fixed_rbtree::FixedRedBlackTree;
/// use typenum::U8;
///
/// let mut tree = FixedRedBlackTree::<u32, (), U8, _>::with_comparator(|a: &u32, b: &u32| b < a);
/// tree.insert(1, ());
/// tree.insert(2, ());
/// assert_eq!(tree.first().map(|(k, _)| *k), Some(2));
/// ```
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `lhs` is ordered strictly before `rhs`.
    fn less(&self, lhs: &T, rhs: &T) -> bool;
}

/// Orders keys by their [`Ord`] implementation, smallest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }
}

/// Orders keys by their [`Ord`] implementation, largest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reversed;

impl<T: Ord + ?Sized> Compare<T> for Reversed {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        rhs < lhs
    }
}

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Compare<T> for F {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self(lhs, rhs)
    }
}
