//! Fixed-capacity ordered maps and sets backed by an arena-allocated
//! left-leaning red-black tree.
//!
//! Every container in this crate stores its nodes inline in a block of `N`
//! slots chosen at compile time, so it never touches a heap allocator and
//! works in `no_std` environments. Nodes refer to each other by slot index,
//! which also makes element [`Handle`]s stable: erasing one element never
//! moves another.
//!
//! - [`FixedRedBlackTree`] - the engine: a sorted unique-key map with
//!   cursors, handles and bound queries. Inserting into a full tree panics.
//! - [`FixedMap`] - a map wrapper that reports a full container as a
//!   [`CapacityError`] instead.
//! - [`FixedSet`] - the same for sets.
//!
//! # Quick Start
//!
//! ```
//! use fixed_rbtree::FixedMap;
//! use typenum::U8;
//!
//! let mut map = FixedMap::<u32, &str, U8>::new();
//! map.insert(1, "one")?;
//! map.insert(2, "two")?;
//! map.insert(3, "three")?;
//!
//! assert_eq!(map.get(&2), Some(&"two"));
//! assert_eq!(map.len(), 3);
//! # Ok::<(), fixed_rbtree::CapacityError<(u32, &str)>>(())
//! ```
//!
//! # Capacity
//!
//! Capacity is a `typenum` unsigned integer, so the whole container has a
//! size known at compile time:
//!
//! ```
//! use fixed_rbtree::FixedSet;
//! use typenum::U2;
//!
//! let mut set = FixedSet::<char, U2>::new();
//! assert_eq!(set.insert('a'), Ok(true));
//! assert_eq!(set.insert('b'), Ok(true));
//! assert_eq!(set.insert('a'), Ok(false));
//! assert_eq!(set.insert('c').unwrap_err().into_inner(), 'c');
//! ```
//!
//! # Features
//!
//! - `std`: enables [`FixedRedBlackTree::to_dot`].
//! - `tracing`: emits `tracing` events for bulk operations and refused
//!   inserts.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

pub(crate) use trace;

mod common;
mod error;
/// The map wrapper and its capacity-checked inserts.
pub mod map;
/// The set wrapper and its iterators.
pub mod set;
/// The red-black tree engine and its arena, cursors and iterators.
pub mod tree;

pub use common::{Compare, Natural, Reversed};
pub use error::{CapacityError, InvariantError};
pub use map::FixedMap;
pub use set::FixedSet;
pub use tree::{Arena, Cursor, CursorMut, FixedRedBlackTree, Handle};
