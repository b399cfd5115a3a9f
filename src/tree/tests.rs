use std::boxed::Box;
use std::collections::BTreeMap;
use std::error::Error;
use std::ops::Bound;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use itertools::assert_equal;
use typenum::{U1, U15, U16, U32, U4, U64, U8};

use super::*;
use crate::common::Reversed;
use crate::error::InvariantError;

fn keys_of<V, N: ArrayLength, C>(tree: &FixedRedBlackTree<u32, V, N, C>) -> Vec<u32> {
    tree.keys().copied().collect()
}

fn height<K, V, N: ArrayLength, C>(tree: &FixedRedBlackTree<K, V, N, C>, h: SlotIndex) -> usize {
    if h == NIL {
        return 0;
    }
    1 + height(tree, tree.arena.left(h)).max(height(tree, tree.arena.right(h)))
}

#[test]
fn test_constructor() -> Result<(), Box<dyn Error>> {
    let tree = FixedRedBlackTree::<u32, u32, U8>::new();

    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert_eq!(tree.capacity(), 8);
    assert!(!tree.is_full());
    assert_eq!(tree.root, NIL);

    assert!(tree.begin().is_end());
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
    assert_eq!(tree.iter().count(), 0);
    assert!(!tree.contains_key(&1));

    assert_eq!(tree.check_invariants()?, 0);
    Ok(())
}

#[test]
fn test_insert_out_of_order() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U15>::new();
    for k in [5, 3, 8, 1, 4, 7, 9] {
        let (_, inserted) = tree.insert(k, ());
        assert!(inserted);
    }

    assert_eq!(keys_of(&tree), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.arena.color(tree.root), Color::Black);
    assert_eq!(tree.arena.parent(tree.root), NIL);
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_insert_keeps_existing_value() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, &str, U8>::new();

    let (first, inserted) = tree.insert(7, "a");
    assert!(inserted);
    let (again, inserted) = tree.insert(7, "b");
    assert!(!inserted);

    assert_eq!(first, again);
    assert_eq!(tree.get(&7), Some(&"a"));
    assert_eq!(tree.len(), 1);
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_insert_or_assign_replaces_value() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, &str, U8>::new();

    let (handle, replaced) = tree.insert_or_assign(7, "a");
    assert_eq!(replaced, None);
    let (same, replaced) = tree.insert_or_assign(7, "b");
    assert_eq!(replaced, Some("a"));

    assert_eq!(handle, same);
    assert_eq!(tree.get_at(handle), (&7, &"b"));
    assert_eq!(tree.len(), 1);
    Ok(())
}

#[test]
fn test_emplace_duplicate_returns_existing() -> Result<(), Box<dyn Error>> {
    let tracked = Rc::new(());
    let mut tree = FixedRedBlackTree::<u32, Rc<()>, U4>::new();

    let (existing, inserted) = tree.emplace(2, Rc::clone(&tracked));
    assert!(inserted);
    tree.emplace(1, Rc::clone(&tracked));

    let (handle, inserted) = tree.emplace(2, Rc::clone(&tracked));
    assert!(!inserted);
    assert_eq!(handle, existing);
    assert_eq!(tree.len(), 2);

    // The speculative node was dropped again.
    assert_eq!(Rc::strong_count(&tracked), 3);
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_try_emplace_builds_value_only_when_absent() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, String, U8>::new();
    let mut calls = 0;

    tree.try_emplace(3, || {
        calls += 1;
        "three".to_string()
    });
    let (handle, inserted) = tree.try_emplace(3, || {
        calls += 1;
        "other".to_string()
    });

    assert!(!inserted);
    assert_eq!(calls, 1);
    assert_eq!(tree.get_at(handle).1, "three");
    Ok(())
}

#[test]
fn test_insert_with_custom_policies() -> Result<(), Box<dyn Error>> {
    // A counting multiset: duplicates bump the count instead of being dropped.
    let mut tree = FixedRedBlackTree::<char, u32, U8>::new();
    for c in "abracadabra".chars() {
        tree.insert_with(
            c,
            |c, _| c,
            |arena, existing, _| *arena.value_mut(existing) += 1,
            |arena, c| arena.allocate(c, 1),
        );
    }

    assert_equal(
        tree.iter().map(|(k, v)| (*k, *v)),
        [('a', 5), ('b', 2), ('c', 1), ('d', 1), ('r', 2)],
    );
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_erase_returns_successor() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U16>::new();
    for k in 1..=11 {
        tree.insert(k, k * k);
    }

    let next = tree.erase(&3).ok_or("no successor")?;
    assert_eq!(tree.get_at(next), (&4, &16));
    assert_eq!(tree.len(), 10);
    assert!(tree.find(&3).is_end());
    assert_eq!(keys_of(&tree), [1, 2, 4, 5, 6, 7, 8, 9, 10, 11]);
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_erase_missing_key_is_noop() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U8>::new();
    for k in [2, 4, 6] {
        tree.insert(k, ());
    }

    assert_eq!(tree.erase(&5), None);
    assert_eq!(tree.remove(&5), None);
    assert_eq!(keys_of(&tree), [2, 4, 6]);
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_erase_boundaries() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U16>::new();
    for k in 1..=9 {
        tree.insert(k, ());
    }

    assert_eq!(tree.erase(&9), None);
    tree.check_invariants()?;

    let next = tree.erase(&1).ok_or("no successor")?;
    assert_eq!(tree.get_at(next).0, &2);
    tree.check_invariants()?;

    assert_eq!(tree.first().map(|(k, _)| *k), Some(2));
    assert_eq!(tree.last().map(|(k, _)| *k), Some(8));
    Ok(())
}

#[test]
fn test_erase_only_element() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U1>::new();
    let (handle, _) = tree.insert(1, ());
    assert!(tree.is_full());

    assert_eq!(tree.erase_at(handle), None);
    assert!(tree.is_empty());
    assert_eq!(tree.root, NIL);
    assert!(tree.begin().is_end());
    assert_eq!(tree.check_invariants()?, 0);

    // The freed slot is available again.
    tree.insert(2, ());
    assert_eq!(keys_of(&tree), [2]);
    Ok(())
}

#[test]
fn test_erase_drops_exactly_one_payload() -> Result<(), Box<dyn Error>> {
    let tracked = Rc::new(());
    let mut tree = FixedRedBlackTree::<u32, Rc<()>, U8>::new();
    for k in 0..6 {
        tree.insert(k, Rc::clone(&tracked));
    }
    assert_eq!(Rc::strong_count(&tracked), 7);

    tree.erase(&2);
    assert_eq!(Rc::strong_count(&tracked), 6);

    let (key, value) = tree.remove(&4).ok_or("missing")?;
    assert_eq!(key, 4);
    drop(value);
    assert_eq!(Rc::strong_count(&tracked), 5);

    drop(tree);
    assert_eq!(Rc::strong_count(&tracked), 1);
    Ok(())
}

#[test]
fn test_bounds() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U16>::new();
    for k in 1..=11 {
        tree.insert(k, ());
    }

    assert_eq!(tree.lower_bound(&0).key(), Some(&1));
    assert!(tree.upper_bound(&11).is_end());
    assert_eq!(tree.upper_bound(&10).key(), Some(&11));
    assert_eq!(tree.lower_bound(&11).key(), Some(&11));
    assert_eq!(tree.upper_bound(&4).key(), Some(&5));
    assert!(tree.lower_bound(&12).is_end());
    assert!(tree.find(&12).is_end());
    assert_eq!(tree.find(&6).key(), Some(&6));
    Ok(())
}

#[test]
fn test_bounds_on_sparse_keys() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U8>::new();
    for k in [10, 20, 30, 40] {
        tree.insert(k, ());
    }

    assert_eq!(tree.lower_bound(&15).key(), Some(&20));
    assert_eq!(tree.upper_bound(&15).key(), Some(&20));
    assert_eq!(tree.lower_bound(&20).key(), Some(&20));
    assert_eq!(tree.upper_bound(&20).key(), Some(&30));
    Ok(())
}

#[test]
fn test_equal_range() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, char, U8>::new();
    for (k, v) in [(1, 'a'), (3, 'c'), (5, 'e')] {
        tree.insert(k, v);
    }

    assert_equal(tree.equal_range(&3), [(&3, &'c')]);
    assert_eq!(tree.equal_range(&4).count(), 0);
    assert_eq!(tree.equal_range(&9).count(), 0);
    Ok(())
}

#[test]
fn test_range_bounds() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U16>::new();
    for k in (2..=20).step_by(2) {
        tree.insert(k, ());
    }

    let keys = |r: Range<'_, u32, (), U16>| r.map(|(k, _)| *k).collect::<Vec<_>>();
    assert_eq!(keys(tree.range(5..=10)), [6, 8, 10]);
    assert_eq!(keys(tree.range(6..10)), [6, 8]);
    assert_eq!(keys(tree.range(..5)), [2, 4]);
    assert_eq!(keys(tree.range(17..)), [18, 20]);
    assert_eq!(keys(tree.range(..)), keys_of(&tree));
    assert_eq!(
        keys(tree.range((Bound::Excluded(4), Bound::Excluded(10)))),
        [6, 8]
    );
    assert_eq!(keys(tree.range(7..7)), []);
    assert_eq!(keys(tree.range(21..30)), []);
    assert_eq!(keys(tree.range((Bound::Included(12), Bound::Included(6)))), []);

    assert_equal(tree.range(4..=8).rev().map(|(k, _)| *k), [8, 6, 4]);
    Ok(())
}

#[test]
fn test_iteration_both_ways() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U16>::new();
    for k in [8, 3, 12, 1, 6, 10, 14] {
        tree.insert(k, k * 2);
    }

    let mut iter = tree.iter();
    assert_eq!(iter.len(), 7);
    assert_eq!(iter.next(), Some((&1, &2)));
    assert_eq!(iter.next_back(), Some((&14, &28)));
    assert_eq!(iter.len(), 5);
    assert_equal(iter.by_ref().map(|(k, _)| *k), [3, 6, 8, 10, 12]);
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    assert_equal(tree.keys().rev().copied(), [14, 12, 10, 8, 6, 3, 1]);
    assert_equal(tree.values().copied(), [2, 6, 12, 16, 20, 24, 28]);
    assert_equal(&tree, tree.iter());
    Ok(())
}

#[test]
fn test_cursor_navigation() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U8>::new();
    for k in [2, 1, 3] {
        tree.insert(k, ());
    }

    let mut cursor = tree.begin();
    assert_eq!(cursor.key(), Some(&1));
    cursor.move_next();
    cursor.move_next();
    assert_eq!(cursor.key(), Some(&3));
    cursor.move_next();
    assert!(cursor.is_end());
    assert_eq!(cursor, tree.end());

    // Stepping from the end position wraps around.
    assert_eq!(tree.end().prev_cursor().key(), Some(&3));
    assert_eq!(tree.end().next_cursor().key(), Some(&1));

    let mut cursor = tree.begin();
    cursor.move_prev();
    assert!(cursor.is_end());
    Ok(())
}

#[test]
fn test_handles_survive_other_erases() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U32>::new();
    let handles: Vec<(u32, Handle)> = (1..=20).map(|k| (k, tree.insert(k, k * 10).0)).collect();

    for k in (2..=20).step_by(2) {
        tree.erase(&k);
        tree.check_invariants()?;
    }

    for (k, handle) in handles.iter().filter(|(k, _)| k % 2 == 1) {
        assert_eq!(tree.get_at(*handle), (k, &(k * 10)));
        assert_eq!(tree.cursor_at(*handle).key(), Some(k));
    }
    Ok(())
}

#[test]
fn test_successor_handle_survives_erase() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U16>::new();
    let mut handles = Vec::new();
    for k in 1..=15 {
        handles.push(tree.insert(k, ()).0);
    }

    // The root of a full tree has two children; its successor is relinked
    // into its position.
    let root_key = *tree.arena.key_at(tree.root);
    let successor = handles[root_key as usize];
    let next = tree.erase(&root_key).ok_or("no successor")?;

    assert_eq!(next, successor);
    assert_eq!(tree.get_at(successor).0, &(root_key + 1));
    tree.check_invariants()?;
    Ok(())
}

#[test]
#[should_panic(expected = "does not refer to a live element")]
fn test_erased_handle_panics() {
    let mut tree = FixedRedBlackTree::<u32, (), U8>::new();
    let (handle, _) = tree.insert(1, ());
    tree.insert(2, ());
    tree.erase_at(handle);
    tree.cursor_at(handle);
}

#[test]
fn test_cursor_mut_edits_and_removes() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U8>::new();
    for k in 1..=6 {
        tree.insert(k, 0);
    }

    let mut cursor = tree.cursor_front_mut();
    while !cursor.is_end() {
        let key = *cursor.key().ok_or("no key")?;
        if key % 3 == 0 {
            assert_eq!(cursor.remove_current(), Some((key, 0)));
        } else {
            *cursor.value_mut().ok_or("no value")? = key * 100;
            cursor.move_next();
        }
    }
    assert_eq!(cursor.remove_current(), None);

    assert_equal(
        tree.iter().map(|(k, v)| (*k, *v)),
        [(1, 100), (2, 200), (4, 400), (5, 500)],
    );
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_cursor_at_mut() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U8>::new();
    tree.insert(1, 1);
    let (handle, _) = tree.insert(2, 2);
    tree.insert(3, 3);

    let mut cursor = tree.cursor_at_mut(handle);
    cursor.move_prev();
    assert_eq!(cursor.as_cursor().key_value(), Some((&1, &1)));
    cursor.move_prev();
    assert!(cursor.is_end());
    cursor.move_prev();
    assert_eq!(cursor.key(), Some(&3));

    *tree.value_at_mut(handle) = 20;
    assert_eq!(tree.get(&2), Some(&20));
    Ok(())
}

#[test]
fn test_retain() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U32>::new();
    for k in 0..30 {
        tree.insert(k, k);
    }

    let mut visited = Vec::new();
    tree.retain(|k, v| {
        visited.push(*k);
        *v *= 2;
        k % 4 == 1
    });

    assert_eq!(visited, (0..30).collect::<Vec<_>>());
    assert_equal(tree.iter().map(|(k, v)| (*k, *v)), (1..30).step_by(4).map(|k| (k, k * 2)));
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_pop_first_and_last() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U8>::new();
    for k in [4, 2, 6, 1] {
        tree.insert(k, ());
    }

    assert_eq!(tree.pop_first(), Some((1, ())));
    assert_eq!(tree.pop_last(), Some((6, ())));
    tree.check_invariants()?;
    assert_eq!(keys_of(&tree), [2, 4]);

    tree.pop_first();
    tree.pop_first();
    assert_eq!(tree.pop_last(), None);
    Ok(())
}

#[test]
fn test_clone_is_valid_and_independent() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, String, U16>::new();
    for k in [5, 2, 8, 1, 3, 7, 9, 4, 6] {
        tree.insert(k, k.to_string());
    }

    let mut copy = tree.clone();
    copy.check_invariants()?;
    assert_eq!(copy, tree);
    assert_eq!(copy.len(), 9);

    copy.erase(&5);
    copy.insert_or_assign(1, "one".to_string());
    assert_eq!(tree.get(&5).map(String::as_str), Some("5"));
    assert_eq!(tree.get(&1).map(String::as_str), Some("1"));
    assert_ne!(copy, tree);
    Ok(())
}

#[test]
fn test_clear_and_take() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U4>::new();
    for k in 0..4 {
        tree.insert(k, ());
    }

    let taken = tree.take();
    assert!(tree.is_empty());
    assert_eq!(keys_of(&taken), [0, 1, 2, 3]);

    let mut tree = taken;
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.check_invariants()?, 0);

    // Every slot is usable again.
    for k in 10..14 {
        tree.insert(k, ());
    }
    assert!(tree.is_full());
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_full_tree_accepts_existing_keys() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, u32, U4>::new();
    for k in 0..4 {
        tree.insert(k, k);
    }

    assert_eq!(tree.insert(2, 20).1, false);
    assert_eq!(tree.insert_or_assign(3, 30).1, Some(3));
    assert_eq!(tree.try_emplace(1, || unreachable!()).1, false);
    tree.check_invariants()?;
    Ok(())
}

#[test]
#[should_panic(expected = "full")]
fn test_insert_into_full_tree_panics() {
    let mut tree = FixedRedBlackTree::<u32, (), U4>::new();
    for k in 0..5 {
        tree.insert(k, ());
    }
}

#[test]
#[should_panic(expected = "full")]
fn test_emplace_into_full_tree_panics_even_for_duplicate() {
    let mut tree = FixedRedBlackTree::<u32, (), U4>::new();
    for k in 0..4 {
        tree.insert(k, ());
    }
    tree.emplace(0, ());
}

#[test]
fn test_reversed_comparator() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U8, Reversed>::default();
    for k in [3, 9, 1, 5] {
        tree.insert(k, ());
    }

    assert_eq!(keys_of(&tree), [9, 5, 3, 1]);
    assert_eq!(tree.lower_bound(&4).key(), Some(&3));
    assert_eq!(tree.erase(&5).map(|h| *tree.get_at(h).0), Some(3));
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_closure_comparator() -> Result<(), Box<dyn Error>> {
    let by_len = |a: &&str, b: &&str| a.len() < b.len();
    let mut tree = FixedRedBlackTree::<&str, u32, U8, _>::with_comparator(by_len);
    tree.insert("three", 3);
    tree.insert("one", 1);
    tree.insert("two", 2);

    // "two" is equivalent to "one" under this ordering.
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(&"six"), Some(&1));
    tree.check_invariants()?;
    Ok(())
}

#[test]
fn test_borrowed_key_lookup() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<String, u32, U8>::new();
    for (i, word) in ["delta", "alpha", "charlie", "bravo"].iter().enumerate() {
        tree.insert(word.to_string(), i as u32);
    }

    assert!(tree.contains_key("alpha"));
    assert_eq!(tree.get("charlie"), Some(&2));
    assert_eq!(tree.lower_bound("b").key().map(String::as_str), Some("bravo"));
    assert_equal(
        tree.range::<str, _>((Bound::Included("b"), Bound::Excluded("d")))
            .map(|(k, _)| k.as_str()),
        ["bravo", "charlie"],
    );
    *tree.get_mut("delta").ok_or("missing")? += 10;
    assert_eq!(tree.remove("delta"), Some(("delta".to_string(), 10)));
    Ok(())
}

#[test]
fn test_into_iter_both_ends() -> Result<(), Box<dyn Error>> {
    let tree: FixedRedBlackTree<u32, char, U8> =
        [(2, 'b'), (1, 'a'), (4, 'd'), (3, 'c')].into_iter().collect();

    let mut iter = tree.into_iter();
    assert_eq!(iter.len(), 4);
    assert_eq!(iter.next(), Some((1, 'a')));
    assert_eq!(iter.next_back(), Some((4, 'd')));
    assert_equal(iter, [(2, 'b'), (3, 'c')]);
    Ok(())
}

#[test]
fn test_into_keys_and_values() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, char, U8>::new();
    tree.extend([(2, 'b'), (1, 'a'), (3, 'c')]);

    assert_equal(tree.clone().into_keys(), [1, 2, 3]);
    assert_equal(tree.into_values().rev(), ['c', 'b', 'a']);
    Ok(())
}

#[test]
fn test_ordering_and_debug() -> Result<(), Box<dyn Error>> {
    let a: FixedRedBlackTree<u32, u32, U8> = [(1, 1), (2, 2)].into_iter().collect();
    let b: FixedRedBlackTree<u32, u32, U4> = [(1, 1), (3, 3)].into_iter().collect();

    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(std::format!("{a:?}"), "{1: 1, 2: 2}");
    Ok(())
}

#[test]
fn test_height_stays_logarithmic() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U64>::new();
    for k in 0..64 {
        tree.insert(k, ());
    }

    let black_height = tree.check_invariants()?;
    let levels = height(&tree, tree.root);
    // 2 * log2(65) rounds down to 12.
    assert!(levels <= 12, "height {levels}");
    assert!(black_height <= levels);

    for k in (0..64).rev().step_by(3) {
        tree.erase(&k);
    }
    tree.check_invariants()?;
    assert!(height(&tree, tree.root) <= 12);
    Ok(())
}

#[test]
fn test_shuffled_inserts_and_erases() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let mut keys: Vec<u32> = (0..64).collect();
        keys.shuffle(&mut rng);

        let mut tree = FixedRedBlackTree::<u32, u32, U64>::new();
        for &k in &keys {
            tree.insert(k, k + 1);
        }
        tree.check_invariants()?;
        assert!(tree.is_full());

        keys.shuffle(&mut rng);
        let (erased, kept) = keys.split_at(40);
        for k in erased {
            tree.erase(k);
            tree.check_invariants()?;
        }

        let mut kept = kept.to_vec();
        kept.sort_unstable();
        assert_equal(tree.iter().map(|(k, v)| (*k, *v)), kept.iter().map(|k| (*k, k + 1)));
    }
    Ok(())
}

#[test]
fn test_check_invariants_detects_corruption() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<u32, (), U8>::new();
    for k in 1..=3 {
        tree.insert(k, ());
    }
    tree.check_invariants()?;

    let root = tree.root;
    let right = tree.arena.right(root);

    tree.arena.node_mut(right).color = Color::Red;
    assert_eq!(
        tree.check_invariants(),
        Err(InvariantError::RedRightLink {
            slot: root as usize
        })
    );
    tree.arena.node_mut(right).color = Color::Black;

    tree.arena.node_mut(root).color = Color::Red;
    assert_eq!(tree.check_invariants(), Err(InvariantError::RedRoot));
    tree.arena.node_mut(root).color = Color::Black;

    tree.arena.node_mut(right).parent = right;
    assert_eq!(
        tree.check_invariants(),
        Err(InvariantError::BrokenParentLink {
            slot: right as usize
        })
    );
    tree.arena.node_mut(right).parent = root;

    tree.arena.node_mut(right).key = 0;
    assert_eq!(
        tree.check_invariants(),
        Err(InvariantError::OutOfOrder {
            slot: right as usize
        })
    );
    Ok(())
}

#[test]
fn test_write_dot_escapes_labels() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<&str, (), U4>::new();
    tree.insert("say \"hi\"", ());
    tree.insert("a\\b", ());

    let mut dot = String::new();
    tree.write_dot(&mut dot)?;
    assert!(dot.starts_with("digraph G {"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(dot.contains(r#"[label="\"say \\\"hi\\\"\""]"#));
    assert!(dot.contains(r#"[label="\"a\\\\b\""]"#));
    Ok(())
}

#[cfg(feature = "std")]
#[test]
fn test_to_dot() -> Result<(), Box<dyn Error>> {
    let mut tree = FixedRedBlackTree::<&str, (), U4>::new();
    tree.insert("b", ());
    tree.insert("a", ());

    let dot = tree.to_dot()?;
    assert!(dot.starts_with("digraph G {"));
    assert!(dot.contains(r#"[label="\"a\""]"#));
    assert!(dot.contains("[color=red]"));
    Ok(())
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, u16),
    Assign(u8, u16),
    Emplace(u8, u16),
    Erase(u8),
    PopFirst,
    PopLast,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..48u8, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        (0..48u8, any::<u16>()).prop_map(|(k, v)| Op::Assign(k, v)),
        (0..48u8, any::<u16>()).prop_map(|(k, v)| Op::Emplace(k, v)),
        (0..48u8).prop_map(Op::Erase),
        Just(Op::PopFirst),
        Just(Op::PopLast),
    ]
}

proptest! {
    #[test]
    fn test_matches_btreemap(ops in prop::collection::vec(op(), 1..200)) {
        let mut tree = FixedRedBlackTree::<u8, u16, U32>::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    if tree.is_full() && !model.contains_key(&k) {
                        continue;
                    }
                    let (handle, inserted) = tree.insert(k, v);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    let stored = *model.entry(k).or_insert(v);
                    prop_assert_eq!(tree.get_at(handle), (&k, &stored));
                }
                Op::Assign(k, v) => {
                    if tree.is_full() && !model.contains_key(&k) {
                        continue;
                    }
                    let (_, replaced) = tree.insert_or_assign(k, v);
                    prop_assert_eq!(replaced, model.insert(k, v));
                }
                Op::Emplace(k, v) => {
                    if tree.is_full() {
                        continue;
                    }
                    let (_, inserted) = tree.emplace(k, v);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                }
                Op::Erase(k) => {
                    let expected = model.range(k + 1..).next().map(|(k, _)| *k);
                    let existed = model.remove(&k).is_some();
                    let next = tree.erase(&k);
                    if existed {
                        prop_assert_eq!(next.map(|h| *tree.get_at(h).0), expected);
                    } else {
                        prop_assert_eq!(next, None);
                    }
                }
                Op::PopFirst => {
                    prop_assert_eq!(tree.pop_first(), model.pop_first());
                }
                Op::PopLast => {
                    prop_assert_eq!(tree.pop_last(), model.pop_last());
                }
            }

            let checked = tree.check_invariants();
            prop_assert!(checked.is_ok(), "{:?}", checked);
            prop_assert_eq!(tree.len(), model.len());
        }

        assert_equal(tree.iter(), model.iter());
    }
}

proptest! {
    #[test]
    fn test_bounds_match_btreemap(
        keys in prop::collection::vec(0..1000u32, 0..64),
        probe in 0..1000u32,
    ) {
        let mut tree = FixedRedBlackTree::<u32, (), U64>::new();
        let mut model = BTreeMap::new();
        for k in keys {
            tree.insert(k, ());
            model.insert(k, ());
        }

        prop_assert_eq!(tree.lower_bound(&probe).key(), model.range(probe..).next().map(|(k, _)| k));
        prop_assert_eq!(
            tree.upper_bound(&probe).key(),
            model.range((Bound::Excluded(probe), Bound::Unbounded)).next().map(|(k, _)| k)
        );
        prop_assert_eq!(tree.contains_key(&probe), model.contains_key(&probe));
        assert_equal(tree.range(probe / 2..probe).map(|(k, _)| k), model.range(probe / 2..probe).map(|(k, _)| k));
    }
}
