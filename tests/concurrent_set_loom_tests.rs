//! Loom model checks for ConcurrentSet.
//!
//! With the `loom` feature the set's lock runs on loom primitives, so every
//! interleaving of the small programs below is explored.
//!
//! # Running these tests
//!
//! ```bash
//! cargo test --test concurrent_set_loom_tests --features loom --release
//! ```

#![cfg(feature = "loom")]

use loom::sync::Arc;
use loom::thread;
use syncset::set::{BusyError, ConcurrentSet};

fn sorted(set: &ConcurrentSet<i32>) -> Vec<i32> {
    let mut elements = set.elements().to_vec();
    elements.sort_unstable();
    elements
}

/// Two concurrent writers never lose an update.
#[test]
fn loom_concurrent_adds_are_both_visible() {
    loom::model(|| {
        let set = Arc::new(ConcurrentSet::new());

        let other = {
            let set = Arc::clone(&set);
            thread::spawn(move || set.add(1))
        };
        set.add(2);
        other.join().unwrap();

        assert_eq!(sorted(&set), vec![1, 2]);
    });
}

/// A snapshot taken while a write is in flight is either entirely before or
/// entirely after it, and the next snapshot reflects the write.
#[test]
fn loom_snapshot_during_write_is_coherent() {
    loom::model(|| {
        let set = Arc::new(ConcurrentSet::new());
        set.add(0);

        let writer = {
            let set = Arc::clone(&set);
            thread::spawn(move || {
                set.add(1);
                assert!(set.delete(&0));
            })
        };

        let observed = sorted(&set);
        assert!(
            observed == vec![0] || observed == vec![0, 1] || observed == vec![1],
            "unexpected snapshot {observed:?}"
        );

        writer.join().unwrap();
        assert_eq!(sorted(&set), vec![1]);
    });
}

/// Two readers racing to rebuild a dirty cache both return the full members.
#[test]
fn loom_racing_rebuilds_agree() {
    loom::model(|| {
        let set = Arc::new(ConcurrentSet::new());
        set.add(7);
        set.add(8);

        let reader = {
            let set = Arc::clone(&set);
            thread::spawn(move || set.elements())
        };
        let mine = set.elements();
        let theirs = reader.join().unwrap();

        assert!(mine.ptr_eq(&theirs));
        let mut elements = mine.to_vec();
        elements.sort_unstable();
        assert_eq!(elements, vec![7, 8]);
    });
}

/// `try_add` either inserts or reports busy without touching the set.
#[test]
fn loom_try_add_is_all_or_nothing() {
    loom::model(|| {
        let set = Arc::new(ConcurrentSet::new());

        let reader = {
            let set = Arc::clone(&set);
            thread::spawn(move || set.contains(&1))
        };
        let result = set.try_add(1);
        let _ = reader.join().unwrap();

        match result {
            Ok(()) => assert!(set.contains(&1)),
            Err(BusyError) => assert!(set.is_empty()),
        }
    });
}
