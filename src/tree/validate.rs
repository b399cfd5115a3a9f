use generic_array::ArrayLength;

use crate::common::{Compare, SlotIndex, NIL};
use crate::error::InvariantError;

use super::cursor::RawIter;
use super::FixedRedBlackTree;

impl<K, V, N: ArrayLength, C: Compare<K>> FixedRedBlackTree<K, V, N, C> {
    /// Walks the whole tree and its arena and reports the first structural
    /// violation found.
    ///
    /// On success, returns the black height: the number of black nodes on
    /// every path from the root down to a missing child.
    ///
    /// This is O(capacity) and meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantError`] encountered.
    pub fn check_invariants(&self) -> Result<usize, InvariantError> {
        if self.root != NIL {
            if !self.arena.is_active(self.root) {
                return Err(InvariantError::DanglingLink {
                    slot: self.root as usize,
                });
            }
            if self.arena.is_red(self.root) {
                return Err(InvariantError::RedRoot);
            }
            if self.arena.parent(self.root) != NIL {
                return Err(InvariantError::BrokenParentLink {
                    slot: self.root as usize,
                });
            }
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(self.root, &mut reachable)?;

        let len = self.len();
        let active = self.arena.count_active();
        if reachable != len || active != len {
            return Err(InvariantError::CountMismatch {
                len,
                reachable,
                active,
            });
        }

        let mut raw = RawIter::full(&self.arena, self.root);
        let mut prev = NIL;
        while let Some(idx) = raw.next(&self.arena) {
            if prev != NIL && !self.less::<K>(self.arena.key_at(prev), self.arena.key_at(idx)) {
                return Err(InvariantError::OutOfOrder { slot: idx as usize });
            }
            prev = idx;
        }

        if self.arena.free_list_len() != Some(self.capacity() - len) {
            return Err(InvariantError::FreeListCorrupted);
        }

        Ok(black_height)
    }

    fn check_subtree(&self, h: SlotIndex, reachable: &mut usize) -> Result<usize, InvariantError> {
        if h == NIL {
            return Ok(0);
        }
        if !self.arena.is_active(h) {
            return Err(InvariantError::DanglingLink { slot: h as usize });
        }

        *reachable += 1;
        if *reachable > self.capacity() {
            // Only a cycle can reach more nodes than there are slots.
            return Err(InvariantError::CountMismatch {
                len: self.len(),
                reachable: *reachable,
                active: self.arena.count_active(),
            });
        }

        let slot = h as usize;
        let (left, right) = (self.arena.left(h), self.arena.right(h));
        for child in [left, right] {
            if child == NIL {
                continue;
            }
            if !self.arena.is_active(child) {
                return Err(InvariantError::DanglingLink {
                    slot: child as usize,
                });
            }
            if self.arena.parent(child) != h {
                return Err(InvariantError::BrokenParentLink {
                    slot: child as usize,
                });
            }
        }

        if self.arena.is_red(right) {
            return Err(InvariantError::RedRightLink { slot });
        }
        if self.arena.is_red(h) && self.arena.is_red(left) {
            return Err(InvariantError::ConsecutiveReds { slot });
        }

        let left_height = self.check_subtree(left, reachable)?;
        let right_height = self.check_subtree(right, reachable)?;
        if left_height != right_height {
            return Err(InvariantError::BlackHeightMismatch {
                slot,
                left: left_height,
                right: right_height,
            });
        }

        Ok(left_height + usize::from(!self.arena.is_red(h)))
    }
}
