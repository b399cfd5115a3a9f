use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Write as _;
use core::hash::{Hash, Hasher};
use core::mem;
use core::ops::{Bound, RangeBounds};

#[cfg(feature = "std")]
use std::string::String;

use generic_array::ArrayLength;

use crate::common::{Color, Compare, Natural, SlotIndex, NIL};

mod arena;
mod balance;
mod cursor;
mod iters;
mod validate;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use cursor::{Cursor, CursorMut, Handle};
pub use iters::{IntoIter, IntoKeys, IntoValues, Iter, Keys, Range, Values};

use balance::Placement;
use cursor::RawIter;

/// An ordered map engine with a fixed capacity of `N` elements.
///
/// Nodes live in an [`Arena`] of `N` slots stored inline in the tree, and
/// link to each other by slot index. Keeping every red link leaning left
/// (a left-leaning red-black tree) bounds the height to about
/// `2 * log2(len + 1)`, so lookups, inserts and erases are O(log n). The tree
/// never allocates: inserting into a full tree is a precondition violation
/// and panics.
///
/// Sets are trees with `V = ()`.
///
/// # Type Parameters
///
/// - `K`: key type, ordered by `C`
/// - `V`: value type
/// - `N`: capacity, as a `typenum` unsigned integer such as `U64`
/// - `C`: comparator, [`Natural`] ordering by default
///
/// # Examples
///
/// ```
/// use fixed_rbtree::FixedRedBlackTree;
/// use typenum::U15;
///
/// let mut tree = FixedRedBlackTree::<u32, &str, U15>::new();
/// for (k, v) in [(5, "five"), (3, "three"), (8, "eight")] {
///     tree.insert(k, v);
/// }
///
/// assert_eq!(tree.get(&3), Some(&"three"));
/// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [3, 5, 8]);
///
/// let successor = tree.erase(&3).unwrap();
/// assert_eq!(tree.cursor_at(successor).key(), Some(&5));
/// ```
pub struct FixedRedBlackTree<K, V, N: ArrayLength, C = Natural> {
    arena: Arena<K, V, N>,
    root: SlotIndex,
    compare: C,
}

impl<K, V, N: ArrayLength> FixedRedBlackTree<K, V, N> {
    /// Creates an empty tree ordered by [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, N: ArrayLength, C: Default> Default for FixedRedBlackTree<K, V, N, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, N: ArrayLength, C> FixedRedBlackTree<K, V, N, C> {
    /// Creates an empty tree ordered by `compare`.
    pub fn with_comparator(compare: C) -> Self {
        FixedRedBlackTree {
            arena: Arena::new(),
            root: NIL,
            compare,
        }
    }

    /// Returns the comparator ordering this tree.
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Returns the number of elements in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the maximum number of elements the tree can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns `true` if no further element can be inserted.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Removes every element, dropping keys and values.
    pub fn clear(&mut self) {
        crate::trace!(len = self.len(), "clearing fixed red-black tree");
        self.arena.reset();
        self.root = NIL;
    }

    /// Moves all elements into a new tree, leaving `self` empty.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        let empty = Self::with_comparator(self.compare.clone());
        mem::replace(self, empty)
    }

    /// Returns an iterator over the elements in key order.
    pub fn iter(&self) -> Iter<'_, K, V, N> {
        Iter::new(&self.arena, RawIter::full(&self.arena, self.root), self.len())
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> Keys<'_, K, V, N> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> Values<'_, K, V, N> {
        Values { inner: self.iter() }
    }

    /// Returns the element with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.begin().key_value()
    }

    /// Returns the element with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.end().prev_cursor().key_value()
    }

    /// Returns a cursor at the first element, or at the end if empty.
    pub fn begin(&self) -> Cursor<'_, K, V, N, C> {
        self.cursor_from(self.arena.min_from(self.root))
    }

    /// Returns a cursor at the past-the-end position.
    pub fn end(&self) -> Cursor<'_, K, V, N, C> {
        self.cursor_from(NIL)
    }

    /// Returns a cursor at the element referred to by `handle`.
    ///
    /// # Panics
    ///
    /// Panics if the element was erased.
    pub fn cursor_at(&self, handle: Handle) -> Cursor<'_, K, V, N, C> {
        self.assert_live(handle);
        self.cursor_from(handle.0)
    }

    /// Returns a mutable cursor at the first element, or at the end if empty.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, N, C> {
        let idx = self.arena.min_from(self.root);
        CursorMut { tree: self, idx }
    }

    /// Returns a mutable cursor at the element referred to by `handle`.
    ///
    /// # Panics
    ///
    /// Panics if the element was erased.
    pub fn cursor_at_mut(&mut self, handle: Handle) -> CursorMut<'_, K, V, N, C> {
        self.assert_live(handle);
        CursorMut {
            tree: self,
            idx: handle.0,
        }
    }

    /// Returns the key and value referred to by `handle`.
    ///
    /// # Panics
    ///
    /// Panics if the element was erased.
    pub fn get_at(&self, handle: Handle) -> (&K, &V) {
        let node = self.arena.node(handle.0);
        (&node.key, &node.value)
    }

    /// Returns the value referred to by `handle` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the element was erased.
    pub fn value_at_mut(&mut self, handle: Handle) -> &mut V {
        self.arena.value_mut(handle)
    }

    /// Writes the tree in Graphviz `dot` syntax, red links drawn in red.
    pub fn write_dot<W: fmt::Write>(&self, out: &mut W) -> fmt::Result
    where
        K: Debug,
    {
        writeln!(out, "digraph G {{")?;
        let mut raw = RawIter::full(&self.arena, self.root);
        while let Some(idx) = raw.next(&self.arena) {
            let node = self.arena.node(idx);
            write!(out, "  n{idx} [label=\"")?;
            write!(DotEscape(out), "{:?}", node.key)?;
            writeln!(out, "\"];")?;
            for child in [node.left, node.right] {
                if child != NIL {
                    let color = match self.arena.color(child) {
                        Color::Red => "red",
                        Color::Black => "black",
                    };
                    writeln!(out, "  n{idx} -> n{child} [color={color}];")?;
                }
            }
        }
        writeln!(out, "}}")
    }

    /// Renders the tree in Graphviz `dot` syntax.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a key's `Debug` implementation fails.
    #[cfg(feature = "std")]
    pub fn to_dot(&self) -> Result<String, fmt::Error>
    where
        K: Debug,
    {
        let mut dot = String::new();
        self.write_dot(&mut dot)?;
        Ok(dot)
    }

    fn cursor_from(&self, idx: SlotIndex) -> Cursor<'_, K, V, N, C> {
        Cursor { tree: self, idx }
    }

    fn assert_live(&self, handle: Handle) {
        assert!(
            self.arena.is_active(handle.0),
            "handle {} does not refer to a live element",
            handle.0
        );
    }

    /// `less` for any key form the comparator accepts.
    #[inline]
    fn less<Q: ?Sized>(&self, lhs: &Q, rhs: &Q) -> bool
    where
        C: Compare<Q>,
    {
        self.compare.less(lhs, rhs)
    }

    fn find_slot<Q: ?Sized>(&self, key: &Q) -> SlotIndex
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let mut h = self.root;
        while h != NIL {
            let here: &Q = self.arena.key_at(h).borrow();
            if self.less(key, here) {
                h = self.arena.left(h);
            } else if self.less(here, key) {
                h = self.arena.right(h);
            } else {
                return h;
            }
        }
        NIL
    }

    /// First slot whose key is not ordered before `key`.
    fn lower_bound_slot<Q: ?Sized>(&self, key: &Q) -> SlotIndex
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let mut h = self.root;
        let mut bound = NIL;
        while h != NIL {
            let here: &Q = self.arena.key_at(h).borrow();
            if self.less(here, key) {
                h = self.arena.right(h);
            } else {
                bound = h;
                h = self.arena.left(h);
            }
        }
        bound
    }

    /// First slot whose key is ordered after `key`.
    fn upper_bound_slot<Q: ?Sized>(&self, key: &Q) -> SlotIndex
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let mut h = self.root;
        let mut bound = NIL;
        while h != NIL {
            let here: &Q = self.arena.key_at(h).borrow();
            if self.less(key, here) {
                bound = h;
                h = self.arena.left(h);
            } else {
                h = self.arena.right(h);
            }
        }
        bound
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> FixedRedBlackTree<K, V, N, C> {
    /// Creates a tree ordered by `compare` from the elements of `iter`.
    ///
    /// Later duplicates of a key are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `iter` yields more than `N` distinct keys.
    pub fn from_iter_with<I>(compare: C, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Self::with_comparator(compare);
        tree.extend(iter);
        tree
    }

    /// Inserts through caller-supplied policies.
    ///
    /// The tree is searched for the key `key_of(&pending, arena)`:
    ///
    /// - if no element has an equivalent key, `allocate(arena, pending)`
    ///   must return an unlinked node, normally from
    ///   [`Arena::allocate`]; it is linked in and rebalanced.
    /// - otherwise `overwrite(arena, existing, pending)` runs and may update
    ///   the existing value, or discard `pending`.
    ///
    /// Returns the handle of the new or existing element and `true` if a node
    /// was linked in.
    pub fn insert_with<P, F, O, A>(
        &mut self,
        pending: P,
        key_of: F,
        overwrite: O,
        allocate: A,
    ) -> (Handle, bool)
    where
        F: for<'a> Fn(&'a P, &'a Arena<K, V, N>) -> &'a K,
        O: FnOnce(&mut Arena<K, V, N>, Handle, P),
        A: FnOnce(&mut Arena<K, V, N>, P) -> Handle,
    {
        let mut placement = Placement {
            index: NIL,
            inserted: false,
        };
        let root = self.insert_below(
            self.root,
            pending,
            &key_of,
            overwrite,
            allocate,
            &mut placement,
        );
        self.set_root(root);

        (Handle(placement.index), placement.inserted)
    }

    /// Inserts `key` with `value` unless an equivalent key is present, in
    /// which case the tree is left unchanged and `key` and `value` are
    /// dropped.
    ///
    /// Returns the handle of the new or existing element and whether the
    /// insert took place.
    ///
    /// # Panics
    ///
    /// Panics if the key is new and the tree is full.
    pub fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        self.insert_with(
            (key, value),
            pending_key::<K, V, N, V>,
            |_, _, _| {},
            |arena, (key, value)| arena.allocate(key, value),
        )
    }

    /// Inserts `key` with `value`, replacing the value of an equivalent key
    /// if present.
    ///
    /// Returns the handle of the element and the replaced value, if any. The
    /// stored key is never replaced.
    ///
    /// # Panics
    ///
    /// Panics if the key is new and the tree is full.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        let mut replaced = None;
        let (handle, _) = self.insert_with(
            (key, value),
            pending_key::<K, V, N, V>,
            |arena, existing, (_, value)| {
                replaced = Some(mem::replace(arena.value_mut(existing), value));
            },
            |arena, (key, value)| arena.allocate(key, value),
        );
        (handle, replaced)
    }

    /// Builds the node first, then links it unless an equivalent key is
    /// present, in which case the new node is dropped again.
    ///
    /// # Panics
    ///
    /// Panics if the tree is full, even when the key turns out to be
    /// present.
    pub fn emplace(&mut self, key: K, value: V) -> (Handle, bool) {
        let speculative = self.arena.allocate(key, value);
        self.insert_with(
            speculative,
            speculative_key::<K, V, N>,
            |arena, _, speculative| {
                arena.deallocate(speculative);
            },
            |_, speculative| speculative,
        )
    }

    /// Inserts `key` with the value produced by `make_value`, which only
    /// runs when no equivalent key is present.
    ///
    /// # Panics
    ///
    /// Panics if the key is new and the tree is full.
    pub fn try_emplace<F>(&mut self, key: K, make_value: F) -> (Handle, bool)
    where
        F: FnOnce() -> V,
    {
        self.insert_with(
            (key, make_value),
            pending_key::<K, V, N, F>,
            |_, _, _| {},
            |arena, (key, make_value)| arena.allocate(key, make_value()),
        )
    }

    /// Returns a cursor at the element with a key equivalent to `key`, or at
    /// the end if there is none.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, N, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.cursor_from(self.find_slot(key))
    }

    /// Returns `true` if the tree holds a key equivalent to `key`.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find_slot(key) != NIL
    }

    /// Returns the value for a key equivalent to `key`.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).value()
    }

    /// Returns the stored key and value for a key equivalent to `key`.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).key_value()
    }

    /// Returns the value for a key equivalent to `key` mutably.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        match self.find_slot(key) {
            NIL => None,
            idx => Some(&mut self.arena.node_mut(idx).value),
        }
    }

    /// Returns a cursor at the first element whose key is not ordered before
    /// `key`.
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, N, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.cursor_from(self.lower_bound_slot(key))
    }

    /// Returns a cursor at the first element whose key is ordered after
    /// `key`.
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, N, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.cursor_from(self.upper_bound_slot(key))
    }

    /// Returns the elements with a key equivalent to `key`: at most one.
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> Range<'_, K, V, N>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let start = self.lower_bound_slot(key);
        let end = self.upper_bound_slot(key);
        Range::new(
            &self.arena,
            RawIter::between(&self.arena, self.root, start, end),
        )
    }

    /// Returns the elements whose keys fall within `range`, in key order.
    ///
    /// A range whose start is ordered after its end is empty.
    pub fn range<Q: ?Sized, R>(&self, range: R) -> Range<'_, K, V, N>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        let start = match range.start_bound() {
            Bound::Included(key) => self.lower_bound_slot(key),
            Bound::Excluded(key) => self.upper_bound_slot(key),
            Bound::Unbounded => self.arena.min_from(self.root),
        };
        let end = match range.end_bound() {
            Bound::Included(key) => self.upper_bound_slot(key),
            Bound::Excluded(key) => self.lower_bound_slot(key),
            Bound::Unbounded => NIL,
        };

        let inverted = start != NIL
            && end != NIL
            && self.less::<K>(self.arena.key_at(end), self.arena.key_at(start));
        let raw = if inverted {
            RawIter::EMPTY
        } else {
            RawIter::between(&self.arena, self.root, start, end)
        };
        Range::new(&self.arena, raw)
    }

    /// Erases the element with a key equivalent to `key`.
    ///
    /// Returns the handle of the element that followed it, or `None` if it
    /// was the last element or no such key was present.
    pub fn erase<Q: ?Sized>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        match self.find_slot(key) {
            NIL => None,
            idx => self.erase_at(Handle(idx)),
        }
    }

    /// Erases the element referred to by `handle`.
    ///
    /// Returns the handle of the element that followed it, or `None` if it
    /// was the last element. Handles to every other element stay valid.
    ///
    /// # Panics
    ///
    /// Panics if the element was already erased.
    pub fn erase_at(&mut self, handle: Handle) -> Option<Handle> {
        self.assert_live(handle);
        let successor = self.arena.successor(handle.0);
        self.erase_slot(handle.0);
        (successor != NIL).then_some(Handle(successor))
    }

    /// Removes the element with a key equivalent to `key` and returns it.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        match self.find_slot(key) {
            NIL => None,
            idx => Some(self.erase_slot(idx)),
        }
    }

    /// Removes and returns the element with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        match self.arena.min_from(self.root) {
            NIL => None,
            idx => Some(self.erase_slot(idx)),
        }
    }

    /// Removes and returns the element with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        match self.arena.max_from(self.root) {
            NIL => None,
            idx => Some(self.erase_slot(idx)),
        }
    }

    /// Consumes the tree, yielding its keys in order.
    pub fn into_keys(self) -> IntoKeys<K, V, N, C> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Consumes the tree, yielding its values in key order.
    pub fn into_values(self) -> IntoValues<K, V, N, C> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Keeps only the elements for which `keep` returns `true`, visiting
    /// them in key order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut idx = self.arena.min_from(self.root);
        while idx != NIL {
            // Erasing never moves the successor to another slot.
            let next = self.arena.successor(idx);
            let node = self.arena.node_mut(idx);
            if !keep(&node.key, &mut node.value) {
                self.erase_slot(idx);
            }
            idx = next;
        }
    }
}

/// Key of a pending `(key, payload)` pair.
fn pending_key<'a, K, V, N: ArrayLength, T>(
    pending: &'a (K, T),
    _arena: &'a Arena<K, V, N>,
) -> &'a K {
    &pending.0
}

/// Key of a node that was allocated ahead of the search.
fn speculative_key<'a, K, V, N: ArrayLength>(
    pending: &'a Handle,
    arena: &'a Arena<K, V, N>,
) -> &'a K {
    arena.key(*pending)
}

/// Copies by re-inserting every element, visited in postorder, into a fresh
/// tree. The copy's shape may differ from the source's.
impl<K: Clone, V: Clone, N: ArrayLength, C: Compare<K> + Clone> Clone
    for FixedRedBlackTree<K, V, N, C>
{
    fn clone(&self) -> Self {
        crate::trace!(len = self.len(), "copying fixed red-black tree");

        let mut copy = Self::with_comparator(self.compare.clone());
        let mut idx = self.arena.postorder_first(self.root);
        while idx != NIL {
            let node = self.arena.node(idx);
            copy.insert(node.key.clone(), node.value.clone());
            idx = self.arena.postorder_next(idx);
        }
        copy
    }
}

impl<K, V, N, C, N2, C2> PartialEq<FixedRedBlackTree<K, V, N2, C2>> for FixedRedBlackTree<K, V, N, C>
where
    K: PartialEq,
    V: PartialEq,
    N: ArrayLength,
    N2: ArrayLength,
{
    fn eq(&self, other: &FixedRedBlackTree<K, V, N2, C2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, N: ArrayLength, C> Eq for FixedRedBlackTree<K, V, N, C> {}

impl<K, V, N, C, N2, C2> PartialOrd<FixedRedBlackTree<K, V, N2, C2>> for FixedRedBlackTree<K, V, N, C>
where
    K: PartialOrd,
    V: PartialOrd,
    N: ArrayLength,
    N2: ArrayLength,
{
    fn partial_cmp(&self, other: &FixedRedBlackTree<K, V, N2, C2>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, N: ArrayLength, C> Ord for FixedRedBlackTree<K, V, N, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash, V: Hash, N: ArrayLength, C> Hash for FixedRedBlackTree<K, V, N, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for element in self.iter() {
            element.hash(state);
        }
    }
}

impl<K: Debug, V: Debug, N: ArrayLength, C> Debug for FixedRedBlackTree<K, V, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> Extend<(K, V)> for FixedRedBlackTree<K, V, N, C> {
    /// # Panics
    ///
    /// Panics if the tree runs out of capacity.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, N: ArrayLength, C: Compare<K> + Default> FromIterator<(K, V)>
    for FixedRedBlackTree<K, V, N, C>
{
    /// # Panics
    ///
    /// Panics if `iter` yields more than `N` distinct keys.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_iter_with(C::default(), iter)
    }
}

impl<'a, K, V, N: ArrayLength, C> IntoIterator for &'a FixedRedBlackTree<K, V, N, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, N: ArrayLength, C: Compare<K>> IntoIterator for FixedRedBlackTree<K, V, N, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, N, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}

/// Escapes `"` and `\` for a quoted `dot` label.
struct DotEscape<'w, W: fmt::Write>(&'w mut W);

impl<W: fmt::Write> fmt::Write for DotEscape<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '"' || c == '\\' {
                self.0.write_char('\\')?;
            }
            self.0.write_char(c)?;
        }
        Ok(())
    }
}
