//! A map wrapper that turns a full tree into a recoverable error.
//!
//! This module provides [`FixedMap<K, V, N, C>`], a wrapper around
//! [`FixedRedBlackTree`] whose inserts return a [`CapacityError`] instead of
//! panicking when every slot is in use.

use core::borrow::Borrow;
use core::fmt;
use core::mem;
use core::ops::RangeBounds;

use generic_array::ArrayLength;

use crate::common::{Compare, Natural};
use crate::error::CapacityError;
use crate::tree::{FixedRedBlackTree, IntoIter, Iter, Keys, Range, Values};

/// An ordered map holding at most `N` entries, without heap allocation.
///
/// # Example
///
/// ```
/// use fixed_rbtree::FixedMap;
/// use typenum::U4;
///
/// let mut map = FixedMap::<&str, u32, U4>::new();
/// map.insert("b", 2).unwrap();
/// map.insert("a", 1).unwrap();
/// assert_eq!(map.insert("a", 10).unwrap(), Some(1));
///
/// assert_eq!(map.first_key_value(), Some((&"a", &10)));
/// assert_eq!(map.len(), 2);
/// ```
pub struct FixedMap<K, V, N: ArrayLength, C = Natural> {
    tree: FixedRedBlackTree<K, V, N, C>,
}

impl<K, V, N: ArrayLength> FixedMap<K, V, N> {
    /// Creates an empty map ordered by [`Ord`].
    #[inline]
    pub fn new() -> Self {
        Self {
            tree: FixedRedBlackTree::new(),
        }
    }
}

impl<K, V, N: ArrayLength, C: Default> Default for FixedMap<K, V, N, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, N: ArrayLength, C> FixedMap<K, V, N, C> {
    /// Creates an empty map ordered by `compare`.
    #[inline]
    pub fn with_comparator(compare: C) -> Self {
        Self {
            tree: FixedRedBlackTree::with_comparator(compare),
        }
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the maximum number of elements the map can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Returns `true` if inserting a new key would fail.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.tree.is_full()
    }

    /// Clears the map, removing all key-value pairs.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the first key-value pair in the map.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first()
    }

    /// Returns the last key-value pair in the map.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V, N> {
        self.tree.iter()
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V, N> {
        self.tree.keys()
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V, N> {
        self.tree.values()
    }

    /// The underlying tree, for cursors and handles.
    pub fn as_tree(&self) -> &FixedRedBlackTree<K, V, N, C> {
        &self.tree
    }

    /// Unwraps the underlying tree.
    pub fn into_tree(self) -> FixedRedBlackTree<K, V, N, C> {
        self.tree
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> FixedMap<K, V, N, C> {
    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.contains_key(key)
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get_key_value(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.get_mut(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated,
    /// and the old value is returned.
    ///
    /// # Errors
    ///
    /// Returns the pair back if the key is new and the map is full.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, CapacityError<(K, V)>> {
        if !self.tree.is_full() {
            return Ok(self.tree.insert_or_assign(key, value).1);
        }

        let capacity = self.capacity();
        match self.tree.get_mut(&key) {
            Some(existing) => Ok(Some(mem::replace(existing, value))),
            None => {
                crate::trace!(capacity, "refusing insert into full map");
                Err(CapacityError::new(capacity, (key, value)))
            }
        }
    }

    /// Returns the value for `key`, inserting the result of `make_value`
    /// first if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns the key back if it is absent and the map is full.
    pub fn get_or_insert_with<F>(&mut self, key: K, make_value: F) -> Result<&mut V, CapacityError<K>>
    where
        F: FnOnce() -> V,
    {
        if self.tree.is_full() && !self.tree.contains_key(&key) {
            let capacity = self.capacity();
            crate::trace!(capacity, "refusing insert into full map");
            return Err(CapacityError::new(capacity, key));
        }

        let (handle, _) = self.tree.try_emplace(key, make_value);
        Ok(self.tree.value_at_mut(handle))
    }

    /// Removes a key from the map, returning the value at the key if the
    /// key was previously in the map.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.remove(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.tree.remove(key)
    }

    /// Removes and returns the first element in the map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Removes and returns the last element in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Gets an iterator over the entries whose keys fall within `range`.
    pub fn range<Q: ?Sized, R>(&self, range: R) -> Range<'_, K, V, N>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        self.tree.range(range)
    }

    /// Retains only the elements specified by the predicate.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.tree.retain(keep);
    }
}

impl<K: Clone, V: Clone, N: ArrayLength, C: Compare<K> + Clone> Clone for FixedMap<K, V, N, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, N: ArrayLength, C> PartialEq for FixedMap<K, V, N, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, N: ArrayLength, C> Eq for FixedMap<K, V, N, C> {}

impl<K: fmt::Debug, V: fmt::Debug, N: ArrayLength, C> fmt::Debug for FixedMap<K, V, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K, V, N: ArrayLength, C> From<FixedRedBlackTree<K, V, N, C>> for FixedMap<K, V, N, C> {
    fn from(tree: FixedRedBlackTree<K, V, N, C>) -> Self {
        Self { tree }
    }
}

impl<'a, K, V, N: ArrayLength, C> IntoIterator for &'a FixedMap<K, V, N, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> IntoIterator for FixedMap<K, V, N, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, N, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::boxed::Box;
    use std::error::Error;
    use std::string::{String, ToString};
    use std::vec::Vec;

    use typenum::{U3, U8};

    use super::*;
    use crate::common::Reversed;

    #[test]
    fn test_insert_replaces_existing_value() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<u32, String, U8>::new();
        assert_eq!(map.insert(1, "a".to_string())?, None);
        assert_eq!(map.insert(1, "b".to_string())?, Some("a".to_string()));
        assert_eq!(map.get(&1).map(String::as_str), Some("b"));
        assert_eq!(map.len(), 1);
        Ok(())
    }

    #[test]
    fn test_full_map_refuses_new_keys_only() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<u32, u32, U3>::new();
        for k in 0..3 {
            map.insert(k, k)?;
        }
        assert!(map.is_full());

        let err = map.insert(7, 70).unwrap_err();
        assert_eq!(err.capacity(), 3);
        assert_eq!(err.into_inner(), (7, 70));

        // Existing keys can still be updated.
        assert_eq!(map.insert(1, 10)?, Some(1));
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.len(), 3);
        map.as_tree().check_invariants()?;
        Ok(())
    }

    #[test]
    fn test_get_or_insert_with() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<&str, u32, U3>::new();
        *map.get_or_insert_with("a", || 1)? += 1;
        *map.get_or_insert_with("a", || unreachable!())? += 1;
        assert_eq!(map.get("a"), Some(&3));

        map.insert("b", 0)?;
        map.insert("c", 0)?;
        assert_eq!(map.get_or_insert_with("d", || 0).unwrap_err().into_inner(), "d");
        assert_eq!(*map.get_or_insert_with("c", || 5)?, 0);
        Ok(())
    }

    #[test]
    fn test_remove_and_pop() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<u32, char, U8>::new();
        for (k, v) in [(3, 'c'), (1, 'a'), (2, 'b'), (4, 'd')] {
            map.insert(k, v)?;
        }

        assert_eq!(map.remove(&2), Some('b'));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.remove_entry(&3), Some((3, 'c')));
        assert_eq!(map.pop_first(), Some((1, 'a')));
        assert_eq!(map.pop_last(), Some((4, 'd')));
        assert!(map.is_empty());
        assert_eq!(map.pop_first(), None);
        Ok(())
    }

    #[test]
    fn test_borrowed_lookup() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<String, u32, U8>::new();
        map.insert("apple".to_string(), 1)?;
        map.insert("pear".to_string(), 2)?;

        assert!(map.contains_key("pear"));
        assert_eq!(map.get_key_value("apple"), Some((&"apple".to_string(), &1)));
        if let Some(v) = map.get_mut("pear") {
            *v = 20;
        }
        assert_eq!(map.get("pear"), Some(&20));
        Ok(())
    }

    #[test]
    fn test_range_and_retain() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<u32, u32, U8>::new();
        for k in 1..=8 {
            map.insert(k, k * 10)?;
        }

        itertools::assert_equal(map.range(3..6).map(|(k, _)| *k), [3, 4, 5]);
        itertools::assert_equal(map.range(..=2).map(|(_, v)| *v), [10, 20]);

        map.retain(|k, v| {
            *v += 1;
            k % 2 == 0
        });
        itertools::assert_equal(map.iter().map(|(k, v)| (*k, *v)), [(2, 21), (4, 41), (6, 61), (8, 81)]);
        Ok(())
    }

    #[test]
    fn test_reversed_order_and_into_iter() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<u32, (), U8, Reversed>::default();
        for k in [2, 9, 4] {
            map.insert(k, ())?;
        }

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [9, 4, 2]);
        assert_eq!(map.into_iter().map(|(k, _)| k).collect::<Vec<_>>(), [9, 4, 2]);
        Ok(())
    }

    #[test]
    fn test_clone_and_eq() -> Result<(), Box<dyn Error>> {
        let mut map = FixedMap::<u32, u32, U8>::new();
        for k in [5, 1, 3] {
            map.insert(k, k)?;
        }

        let mut copy = map.clone();
        assert_eq!(copy, map);
        copy.insert(3, 30)?;
        assert_ne!(copy, map);
        assert_eq!(std::format!("{map:?}"), "{1: 1, 3: 3, 5: 5}");
        Ok(())
    }
}
