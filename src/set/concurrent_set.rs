//! Thread-safe hash set with a cached snapshot of its elements.
//!
//! This module provides [`ConcurrentSet`], a hash set guarded by a
//! read/write lock that can be shared between threads behind an `Arc`.
//!
//! # Overview
//!
//! - `add`, `delete` and `clear` take the lock exclusively and block until
//!   it is available.
//! - `try_add` and `try_delete` never block. They return [`BusyError`] when
//!   any reader or writer holds the lock.
//! - `contains`, `len`, `is_empty` and `Display` take the lock shared.
//! - `elements` returns a [`Snapshot`] of the members. The snapshot is cached
//!   and only rebuilt on the first read after a write.
//!
//! # Cache Invalidation
//!
//! The set keeps a dirty flag next to the cached snapshot. Every `add` sets
//! it, even when the value was already present. `delete` and `clear` set it
//! only when something was actually removed. `elements` returns the cached
//! snapshot while the flag is clear. When the flag is set, it upgrades to the
//! exclusive lock, checks the flag again, and rebuilds the snapshot exactly
//! once for all readers waiting on that invalidation.
//!
//! # Examples
//!
//! ```rust
//! use syncset::set::ConcurrentSet;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let set = Arc::new(ConcurrentSet::new());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|index| {
//!         let set = Arc::clone(&set);
//!         thread::spawn(move || {
//!             for value in 0..100 {
//!                 set.add(value * 4 + index);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(set.len(), 400);
//! assert_eq!(set.elements().len(), 400);
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, trace};

use super::{BusyError, Snapshot};
use crate::sync::RwLock;

// =============================================================================
// Guarded State
// =============================================================================

/// Everything behind the lock: the members, the cached snapshot, and the
/// flag recording whether the snapshot is stale.
///
/// When `dirty` is `false`, `cached` holds exactly the members of `elements`.
struct State<K, S> {
    elements: HashSet<K, S>,
    cached: Snapshot<K>,
    dirty: bool,
}

impl<K, S> State<K, S> {
    fn from_elements(elements: HashSet<K, S>) -> Self {
        // An empty set is described exactly by the empty snapshot.
        let dirty = !elements.is_empty();
        Self {
            elements,
            cached: Snapshot::empty(),
            dirty,
        }
    }

    fn clear(&mut self) {
        if !self.elements.is_empty() {
            self.elements.clear();
            self.dirty = true;
        }
    }
}

impl<K: Hash + Eq, S: BuildHasher> State<K, S> {
    fn insert(&mut self, value: K) {
        self.elements.insert(value);
        self.dirty = true;
    }

    fn remove<Q>(&mut self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.elements.remove(value);
        if removed {
            self.dirty = true;
        }
        removed
    }
}

impl<K: Clone, S> State<K, S> {
    fn rebuild(&mut self) {
        self.cached = self.elements.iter().cloned().collect();
        self.dirty = false;
        trace!(len = self.cached.len(), "rebuilt concurrent set snapshot");
    }
}

// =============================================================================
// ConcurrentSet Definition
// =============================================================================

/// A hash set that can be read and written from many threads at once.
///
/// All state sits behind a single read/write lock. Readers run in parallel
/// with each other and never observe a half-applied write. Writers are
/// serialized. There is no fairness guarantee between waiting writers and no
/// timeout on blocking operations.
///
/// # Type Parameters
///
/// * `K` - The element type. Lookups and writes need `K: Hash + Eq`;
///   snapshots additionally need `K: Clone`.
/// * `S` - The hasher builder, [`RandomState`] by default.
///
/// # Panics
///
/// No operation returns a recoverable error for a broken lock. The default
/// backend cannot be poisoned. With the `loom` feature, acquiring a lock that
/// was poisoned by a panicking holder panics.
///
/// # Examples
///
/// ```rust
/// use syncset::set::ConcurrentSet;
///
/// let set = ConcurrentSet::new();
/// set.add(1);
/// set.add(2);
/// set.add(1);
/// assert_eq!(set.len(), 2);
///
/// assert!(!set.delete(&3));
/// assert!(set.delete(&1));
///
/// assert_eq!(set.elements().as_slice(), &[2]);
/// assert_eq!(set.to_string(), "[2]");
/// ```
pub struct ConcurrentSet<K, S = RandomState> {
    state: RwLock<State<K, S>>,
}

impl<K> ConcurrentSet<K, RandomState> {
    /// Creates an empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set: ConcurrentSet<i32> = ConcurrentSet::new();
    /// assert!(set.is_empty());
    /// assert!(set.elements().is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from(HashSet::new())
    }

    /// Creates an empty set with room for at least `capacity` elements
    /// before the container reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(HashSet::with_capacity(capacity))
    }
}

impl<K, S> ConcurrentSet<K, S> {
    /// Creates an empty set that hashes with `hasher`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let set = ConcurrentSet::with_hasher(RandomState::new());
    /// set.add("key");
    /// assert!(set.contains("key"));
    /// ```
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::from(HashSet::with_hasher(hasher))
    }

    /// Creates an empty set with the given capacity and hasher.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from(HashSet::with_capacity_and_hasher(capacity, hasher))
    }

    /// Returns the number of elements.
    ///
    /// Takes the shared lock, so the count is consistent with the writes
    /// that completed before the call.
    pub fn len(&self) -> usize {
        self.state.read().elements.len()
    }

    /// Returns `true` if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.state.read().elements.is_empty()
    }

    /// Removes every element, blocking until the exclusive lock is available.
    ///
    /// The snapshot cache is invalidated only if the set was non-empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set: ConcurrentSet<i32> = (0..5).collect();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert!(set.elements().is_empty());
    /// ```
    pub fn clear(&self) {
        self.state.write().clear();
    }

    /// Consumes the set and returns the underlying `HashSet`.
    pub fn into_inner(self) -> HashSet<K, S> {
        self.state.into_inner().elements
    }
}

impl<K, S> ConcurrentSet<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts `value`, blocking until the exclusive lock is available.
    ///
    /// Adding a value that is already present leaves the membership
    /// unchanged but still invalidates the snapshot cache.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set = ConcurrentSet::new();
    /// set.add("a");
    /// set.add("a");
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&self, value: K) {
        self.state.write().insert(value);
    }

    /// Inserts `value` only if the exclusive lock can be taken without
    /// waiting.
    ///
    /// On success this behaves exactly like [`add`](Self::add). If any
    /// reader or writer currently holds the lock, the set is left untouched
    /// and `value` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BusyError`] if the lock is held by another reader or writer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set = ConcurrentSet::new();
    /// assert!(set.try_add(7).is_ok());
    /// assert!(set.contains(&7));
    /// ```
    pub fn try_add(&self, value: K) -> Result<(), BusyError> {
        let Some(mut state) = self.state.try_write() else {
            debug!(operation = "try_add", "concurrent set lock busy");
            return Err(BusyError);
        };
        state.insert(value);
        Ok(())
    }

    /// Removes `value`, blocking until the exclusive lock is available.
    ///
    /// Returns `true` if the value was a member and has been removed. The
    /// snapshot cache is only invalidated when a removal happened.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set = ConcurrentSet::new();
    /// set.add(String::from("a"));
    /// assert!(set.delete("a"));
    /// assert!(!set.delete("a"));
    /// ```
    pub fn delete<Q>(&self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.write().remove(value)
    }

    /// Removes `value` only if the exclusive lock can be taken without
    /// waiting.
    ///
    /// # Errors
    ///
    /// Returns [`BusyError`] if the lock is held by another reader or writer.
    /// Otherwise returns whether a removal happened, as [`delete`](Self::delete)
    /// does.
    pub fn try_delete<Q>(&self, value: &Q) -> Result<bool, BusyError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(mut state) = self.state.try_write() else {
            debug!(operation = "try_delete", "concurrent set lock busy");
            return Err(BusyError);
        };
        Ok(state.remove(value))
    }

    /// Returns `true` if `value` is a member at the time of the call.
    ///
    /// Takes the shared lock, so it runs alongside other readers and waits
    /// only for an in-flight write.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.read().elements.contains(value)
    }
}

impl<K: Clone, S> ConcurrentSet<K, S> {
    /// Returns a snapshot of the current members.
    ///
    /// While no write has happened since the last snapshot, this returns the
    /// cached snapshot under the shared lock without allocating. The first
    /// call after a write takes the exclusive lock and rebuilds the cache.
    /// Either way the result holds exactly the members present once all
    /// writes that finished before the call are applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set = ConcurrentSet::new();
    /// set.add(1);
    /// set.add(2);
    /// set.delete(&1);
    ///
    /// assert_eq!(set.elements().to_vec(), vec![2]);
    /// ```
    pub fn elements(&self) -> Snapshot<K> {
        {
            let state = self.state.read();
            if !state.dirty {
                return state.cached.clone();
            }
        }

        let mut state = self.state.write();
        // Another reader may have rebuilt while we waited for the write lock.
        if state.dirty {
            state.rebuild();
        }
        state.cached.clone()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, S: Default> Default for ConcurrentSet<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> From<HashSet<K, S>> for ConcurrentSet<K, S> {
    fn from(elements: HashSet<K, S>) -> Self {
        Self {
            state: RwLock::new(State::from_elements(elements)),
        }
    }
}

impl<K, S> FromIterator<K> for ConcurrentSet<K, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashSet<K, S>>())
    }
}

/// Inserts the whole batch under one exclusive lock.
impl<K, S> Extend<K> for ConcurrentSet<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let mut state = self.state.write();
        for value in iter {
            state.insert(value);
        }
    }
}

/// Copies the members under the shared lock. The clone shares the cached
/// snapshot and its dirty flag with the original at the time of the copy.
impl<K: Clone, S: Clone> Clone for ConcurrentSet<K, S> {
    fn clone(&self) -> Self {
        let state = self.state.read();
        Self {
            state: RwLock::new(State {
                elements: state.elements.clone(),
                cached: state.cached.clone(),
                dirty: state.dirty,
            }),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for ConcurrentSet<K, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        formatter.debug_set().entries(state.elements.iter()).finish()
    }
}

/// Renders the members in container order, which need not match the order
/// of the cached snapshot.
impl<K: fmt::Display, S> fmt::Display for ConcurrentSet<K, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        write!(formatter, "[")?;
        let mut first = true;
        for element in &state.elements {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, S> serde::Serialize for ConcurrentSet<K, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        let state = self.state.read();
        serializer.collect_seq(state.elements.iter())
    }
}

#[cfg(feature = "serde")]
struct ConcurrentSetVisitor<K, S> {
    marker: std::marker::PhantomData<(K, S)>,
}

#[cfg(feature = "serde")]
impl<K, S> ConcurrentSetVisitor<K, S> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, S> serde::de::Visitor<'de> for ConcurrentSetVisitor<K, S>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    type Value = ConcurrentSet<K, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or(0).min(4096);
        let mut elements = HashSet::with_capacity_and_hasher(capacity, S::default());
        while let Some(element) = seq.next_element()? {
            elements.insert(element);
        }
        Ok(ConcurrentSet::from(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, K, S> serde::Deserialize<'de> for ConcurrentSet<K, S>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(ConcurrentSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
