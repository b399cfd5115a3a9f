//! Left-leaning red-black balancing.
//!
//! The primitives rewire links inside the arena and return the new root of
//! the subtree they were applied to. They fix the parent links of every node
//! they move; linking the returned root into its own parent is left to the
//! caller, which does so through `set_left`/`set_right` or by making it the
//! tree root.

use generic_array::ArrayLength;

use crate::common::{Color, Compare, SlotIndex, NIL};

use super::arena::Arena;
use super::cursor::Handle;
use super::FixedRedBlackTree;

impl<K, V, N: ArrayLength> Arena<K, V, N> {
    //              h                          x
    //             / \                        / \
    //            a   (x)         =>        (h)  c
    //                / \                   / \
    //               b   c                 a   b
    //
    pub(crate) fn rotate_left(&mut self, h: SlotIndex) -> SlotIndex {
        let x = self.right(h);
        debug_assert!(self.is_red(x), "rotating a black link left");

        let parent = self.parent(h);
        let color = self.color(h);

        let x_left = self.left(x);
        self.set_right(h, x_left);
        self.set_left(x, h);

        let promoted = self.node_mut(x);
        promoted.parent = parent;
        promoted.color = color;
        self.node_mut(h).color = Color::Red;

        x
    }

    //              h                          x
    //             / \                        / \
    //           (x)  c           =>         a  (h)
    //           / \                            / \
    //          a   b                          b   c
    //
    pub(crate) fn rotate_right(&mut self, h: SlotIndex) -> SlotIndex {
        let x = self.left(h);
        debug_assert!(self.is_red(x), "rotating a black link right");

        let parent = self.parent(h);
        let color = self.color(h);

        let x_right = self.right(x);
        self.set_left(h, x_right);
        self.set_right(x, h);

        let promoted = self.node_mut(x);
        promoted.parent = parent;
        promoted.color = color;
        self.node_mut(h).color = Color::Red;

        x
    }

    /// Toggles the color of `h` and of both its children.
    pub(crate) fn flip_colors(&mut self, h: SlotIndex) {
        let (left, right) = {
            let node = self.node_mut(h);
            node.color = node.color.flipped();
            (node.left, node.right)
        };
        let left = self.node_mut(left);
        left.color = left.color.flipped();
        let right = self.node_mut(right);
        right.color = right.color.flipped();
    }

    /// Restores the left-leaning shape at `h` on the way back up a descent.
    /// The three steps run in this order and each sees the result of the
    /// previous one.
    pub(crate) fn fix_up(&mut self, mut h: SlotIndex) -> SlotIndex {
        if self.is_red(self.right(h)) {
            h = self.rotate_left(h);
        }

        let left = self.left(h);
        if self.is_red(left) && self.is_red(self.left(left)) {
            h = self.rotate_right(h);
        }

        if self.is_red(self.left(h)) && self.is_red(self.right(h)) {
            self.flip_colors(h);
        }

        h
    }

    /// Makes `h.left` or one of its children red before descending left.
    /// Requires `h` red with `h.left` and `h.left.left` black.
    pub(crate) fn move_red_left(&mut self, mut h: SlotIndex) -> SlotIndex {
        self.flip_colors(h);

        let right = self.right(h);
        if self.is_red(self.left(right)) {
            let right = self.rotate_right(right);
            self.set_right(h, right);
            h = self.rotate_left(h);
            self.flip_colors(h);
        }

        h
    }

    /// Makes `h.right` or one of its children red before descending right.
    /// Requires `h` red with `h.right` and `h.right.left` black.
    pub(crate) fn move_red_right(&mut self, mut h: SlotIndex) -> SlotIndex {
        self.flip_colors(h);

        if self.is_red(self.left(self.left(h))) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }

        h
    }

    /// Unlinks the minimum of the subtree rooted at `h`.
    ///
    /// Returns the new subtree root and the detached slot, which stays live.
    pub(crate) fn detach_min(&mut self, mut h: SlotIndex) -> (SlotIndex, SlotIndex) {
        if self.left(h) == NIL {
            // A node without a left child has no right child either.
            return (self.right(h), h);
        }

        let left = self.left(h);
        if !self.is_red(left) && !self.is_red(self.left(left)) {
            h = self.move_red_left(h);
        }

        let (rest, min) = self.detach_min(self.left(h));
        self.set_left(h, rest);

        (self.fix_up(h), min)
    }
}

/// Where an insert ended up.
pub(crate) struct Placement {
    pub(crate) index: SlotIndex,
    pub(crate) inserted: bool,
}

impl<K, V, N: ArrayLength, C: Compare<K>> FixedRedBlackTree<K, V, N, C> {
    /// Recursive insert below `h`; returns the new root of that subtree.
    pub(crate) fn insert_below<P, F, O, A>(
        &mut self,
        h: SlotIndex,
        pending: P,
        key_of: &F,
        overwrite: O,
        allocate: A,
        placement: &mut Placement,
    ) -> SlotIndex
    where
        F: for<'a> Fn(&'a P, &'a Arena<K, V, N>) -> &'a K,
        O: FnOnce(&mut Arena<K, V, N>, Handle, P),
        A: FnOnce(&mut Arena<K, V, N>, P) -> Handle,
    {
        if h == NIL {
            let Handle(idx) = allocate(&mut self.arena, pending);
            *placement = Placement {
                index: idx,
                inserted: true,
            };
            return idx;
        }

        let (go_left, go_right) = {
            let key = key_of(&pending, &self.arena);
            let here = self.arena.key_at(h);
            (self.compare.less(key, here), self.compare.less(here, key))
        };

        if go_left {
            let left = self.arena.left(h);
            let left = self.insert_below(left, pending, key_of, overwrite, allocate, placement);
            self.arena.set_left(h, left);
        } else if go_right {
            let right = self.arena.right(h);
            let right = self.insert_below(right, pending, key_of, overwrite, allocate, placement);
            self.arena.set_right(h, right);
        } else {
            overwrite(&mut self.arena, Handle(h), pending);
            *placement = Placement {
                index: h,
                inserted: false,
            };
        }

        self.arena.fix_up(h)
    }

    /// Recursive erase of the live slot `target` from the subtree at `h`,
    /// which must contain it. Returns the new root of that subtree.
    ///
    /// `target` stays live but unlinked; the caller deallocates it.
    pub(crate) fn erase_below(&mut self, mut h: SlotIndex, target: SlotIndex) -> SlotIndex {
        let go_left =
            h != target && self.compare.less(self.arena.key_at(target), self.arena.key_at(h));

        if go_left {
            let left = self.arena.left(h);
            if !self.arena.is_red(left) && !self.arena.is_red(self.arena.left(left)) {
                h = self.arena.move_red_left(h);
            }
            let left = self.erase_below(self.arena.left(h), target);
            self.arena.set_left(h, left);
        } else {
            if self.arena.is_red(self.arena.left(h)) {
                h = self.arena.rotate_right(h);
            }

            if h == target && self.arena.right(h) == NIL {
                // No right child means no left child either.
                return self.arena.left(h);
            }

            let right = self.arena.right(h);
            if !self.arena.is_red(right) && !self.arena.is_red(self.arena.left(right)) {
                h = self.arena.move_red_right(h);
            }

            if h == target {
                // The successor's slot takes over the target's position so
                // that only the target's slot is ever freed.
                let (rest, successor) = self.arena.detach_min(self.arena.right(h));
                let left = self.arena.left(h);
                let color = self.arena.color(h);

                self.arena.set_left(successor, left);
                self.arena.set_right(successor, rest);
                self.arena.node_mut(successor).color = color;

                h = successor;
            } else {
                let right = self.erase_below(self.arena.right(h), target);
                self.arena.set_right(h, right);
            }
        }

        self.arena.fix_up(h)
    }

    /// Unlinks and deallocates the live slot `target`.
    pub(crate) fn erase_slot(&mut self, target: SlotIndex) -> (K, V) {
        assert!(
            self.arena.is_active(target),
            "slot {target} is not a live node"
        );

        let root = self.root;
        if !self.arena.is_red(self.arena.left(root)) && !self.arena.is_red(self.arena.right(root)) {
            self.arena.node_mut(root).color = Color::Red;
        }

        let root = self.erase_below(root, target);
        self.set_root(root);

        self.arena.deallocate_slot(target)
    }
}

impl<K, V, N: ArrayLength, C> FixedRedBlackTree<K, V, N, C> {
    /// Installs `root` as the tree root: no parent, colored black.
    pub(crate) fn set_root(&mut self, root: SlotIndex) {
        self.root = root;
        if root != NIL {
            let node = self.arena.node_mut(root);
            node.parent = NIL;
            node.color = Color::Black;
        }
    }
}
