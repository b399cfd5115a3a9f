//! Demonstrates the fixed-capacity containers.
//!
//! The map and set wrappers report a full container as an error, while the
//! underlying tree hands out stable handles and cursors.

use fixed_rbtree::{FixedMap, FixedRedBlackTree, FixedSet};
use rand::seq::SliceRandom;
use typenum::{U16, U4, U8};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fixed Map Demo ===\n");
    fixed_map_demo()?;

    println!("\n=== Fixed Set Demo ===\n");
    fixed_set_demo()?;

    println!("\n=== Tree Handles Demo ===\n");
    tree_handles_demo()?;

    Ok(())
}

fn fixed_map_demo() -> Result<(), Box<dyn std::error::Error>> {
    let mut map = FixedMap::<u32, &str, U8>::new();

    map.insert(3, "three")?;
    map.insert(1, "one")?;
    map.insert(4, "four")?;
    map.insert(1, "ONE")?; // Updates existing key
    map.insert(5, "five")?;
    map.insert(9, "nine")?;
    map.insert(2, "two")?;

    println!("Inserted {} of {} items", map.len(), map.capacity());

    if let Some(value) = map.get(&1) {
        println!("Key 1: {}", value);
    }

    println!("\nAll entries:");
    for (k, v) in &map {
        println!("  {} -> {}", k, v);
    }

    map.insert(6, "six")?;
    match map.insert(7, "seven") {
        Ok(_) => println!("\nUnexpected room for 7"),
        Err(err) => println!("\nRefused 7: {}", err),
    }

    if let Some((k, v)) = map.pop_first() {
        println!("Removed first entry: {} -> {}", k, v);
    }

    println!("Final count: {} items", map.len());

    Ok(())
}

fn fixed_set_demo() -> Result<(), Box<dyn std::error::Error>> {
    let mut set = FixedSet::<char, U4>::new();

    for c in "mississippi".chars() {
        set.insert(c)?;
    }
    println!("Distinct letters: {:?}", set);

    if let Err(err) = set.insert('z') {
        println!("Refused: {}", err);
        println!("Got back {:?}", err.into_inner());
    }

    Ok(())
}

fn tree_handles_demo() -> Result<(), Box<dyn std::error::Error>> {
    let mut keys: Vec<u32> = (1..=16).collect();
    keys.shuffle(&mut rand::thread_rng());

    let mut tree = FixedRedBlackTree::<u32, u32, U16>::new();
    for &k in &keys {
        tree.insert(k, k * k);
    }
    println!("Black height after shuffled inserts: {}", tree.check_invariants()?);

    let (ten, _) = tree.insert(10, 0);
    for k in (1..=16).filter(|k| k % 3 == 0) {
        tree.erase(&k);
    }
    println!("Handle to 10 still reads {:?}", tree.get_at(ten));

    let range: Vec<_> = tree.range(4..=11).map(|(k, _)| *k).collect();
    println!("Keys in 4..=11: {:?}", range);

    let mut cursor = tree.lower_bound(&13);
    cursor.move_prev();
    println!("Key before 13: {:?}", cursor.key());

    Ok(())
}
