//! Thread-safe set with snapshot reads.
//!
//! This module provides:
//!
//! - [`ConcurrentSet`]: a hash set behind a read/write lock, safe to share
//!   between threads
//! - [`Snapshot`]: an immutable, cheaply cloneable view of the members
//! - [`BusyError`]: the signal returned by the non-blocking operations
//!
//! # Snapshots Instead of Iteration
//!
//! `ConcurrentSet` does not hand out iterators over its live contents, since
//! those would have to hold the lock for as long as the caller iterates.
//! [`ConcurrentSet::elements`] returns a [`Snapshot`] instead. The snapshot is
//! cached between writes, so repeated reads of an unchanged set share one
//! allocation.
//!
//! ```rust
//! use syncset::set::ConcurrentSet;
//!
//! let set: ConcurrentSet<&str> = ["a", "b"].into_iter().collect();
//!
//! let snapshot = set.elements();
//! set.add("c");
//!
//! assert_eq!(snapshot.len(), 2);     // Taken before the write
//! assert_eq!(set.elements().len(), 3);
//! ```
//!
//! # Non-blocking Writes
//!
//! ```rust
//! use syncset::set::{BusyError, ConcurrentSet};
//!
//! let set = ConcurrentSet::new();
//! if let Err(BusyError) = set.try_add(1) {
//!     // Someone else holds the lock; skip the update.
//! }
//! ```
//!
//! # Hashers
//!
//! The hasher is a type parameter. With the `fxhash` or `ahash` features
//! enabled, [`FxConcurrentSet`] and [`AConcurrentSet`] name sets using those
//! hashers; build them with `Default::default()`.

mod concurrent_set;
mod error;
mod snapshot;

pub use concurrent_set::ConcurrentSet;
pub use error::BusyError;
pub use snapshot::Snapshot;

/// A [`ConcurrentSet`] hashing with `rustc-hash`'s `FxHasher`.
///
/// Fast for small integer-like keys. Not resistant to hash flooding.
#[cfg(feature = "fxhash")]
pub type FxConcurrentSet<K> = ConcurrentSet<K, rustc_hash::FxBuildHasher>;

/// A [`ConcurrentSet`] hashing with `ahash`.
#[cfg(feature = "ahash")]
pub type AConcurrentSet<K> = ConcurrentSet<K, ahash::RandomState>;
