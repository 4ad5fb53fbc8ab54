//! # syncset
//!
//! A thread-safe hash set with a lazily rebuilt snapshot of its elements.
//!
//! ## Overview
//!
//! [`ConcurrentSet`](set::ConcurrentSet) guards a `HashSet` with a single
//! read/write lock. Membership queries run in parallel; writes are
//! serialized. Reading all members returns a [`Snapshot`](set::Snapshot)
//! that is cached until the next write, so a read-heavy workload does not
//! allocate a fresh sequence on every call.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for sets and snapshots
//! - `fxhash`: the [`FxConcurrentSet`](set::FxConcurrentSet) alias
//! - `ahash`: the [`AConcurrentSet`](set::AConcurrentSet) alias
//! - `loom`: run the lock on `loom` primitives for model checking
//! - `full`: `serde`, `fxhash` and `ahash`
//!
//! ## Example
//!
//! ```rust
//! use syncset::prelude::*;
//!
//! let set = ConcurrentSet::new();
//! set.add(1);
//! set.add(2);
//! set.add(1);
//! assert_eq!(set.len(), 2);
//!
//! assert!(!set.delete(&3));
//! assert!(set.delete(&1));
//!
//! assert_eq!(set.elements().to_vec(), vec![2]);
//! assert_eq!(set.to_string(), "[2]");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use syncset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::set::*;
}

pub mod set;

mod sync;
