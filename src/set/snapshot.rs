//! Immutable, shareable views of a set's elements.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A materialized sequence of the elements a
/// [`ConcurrentSet`](super::ConcurrentSet) held at one point in time.
///
/// Snapshots are immutable and cheap to clone: cloning bumps a reference
/// count and never copies elements. Two snapshots handed out between the same
/// pair of mutations share one allocation, which [`Snapshot::ptr_eq`]
/// exposes.
///
/// The order of elements is unspecified. It is stable for a given snapshot
/// but may differ between snapshots taken across mutations.
///
/// # Examples
///
/// ```rust
/// use syncset::set::ConcurrentSet;
///
/// let set: ConcurrentSet<i32> = [3, 1, 2].into_iter().collect();
/// let snapshot = set.elements();
///
/// let mut sorted = snapshot.to_vec();
/// sorted.sort_unstable();
/// assert_eq!(sorted, vec![1, 2, 3]);
///
/// // The snapshot is detached from later writes.
/// set.add(4);
/// assert_eq!(snapshot.len(), 3);
/// ```
pub struct Snapshot<K> {
    elements: Arc<[K]>,
}

impl<K> Snapshot<K> {
    /// Creates an empty snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::Snapshot;
    ///
    /// let snapshot: Snapshot<i32> = Snapshot::empty();
    /// assert!(snapshot.is_empty());
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self {
            elements: Arc::from(Vec::new()),
        }
    }

    /// Returns the number of elements in the snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the snapshot holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.elements.iter()
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[K] {
        &self.elements
    }

    /// Returns `true` if both snapshots share the same allocation.
    ///
    /// A set that has not been written to between two calls to
    /// [`elements`](super::ConcurrentSet::elements) hands out snapshots that
    /// are `ptr_eq`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use syncset::set::ConcurrentSet;
    ///
    /// let set: ConcurrentSet<i32> = (0..10).collect();
    /// let first = set.elements();
    /// let second = set.elements();
    /// assert!(first.ptr_eq(&second));
    ///
    /// set.add(10);
    /// let third = set.elements();
    /// assert!(!first.ptr_eq(&third));
    /// ```
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements)
    }

    /// Returns `true` if the snapshot contains `value`.
    ///
    /// This is a linear scan. Use
    /// [`ConcurrentSet::contains`](super::ConcurrentSet::contains) for
    /// hashed lookups against the live set.
    pub fn contains(&self, value: &K) -> bool
    where
        K: PartialEq,
    {
        self.elements.contains(value)
    }

    /// Copies the elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.elements.to_vec()
    }
}

impl<K> Clone for Snapshot<K> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            elements: Arc::clone(&self.elements),
        }
    }
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> Deref for Snapshot<K> {
    type Target = [K];

    #[inline]
    fn deref(&self) -> &[K] {
        &self.elements
    }
}

impl<K> AsRef<[K]> for Snapshot<K> {
    #[inline]
    fn as_ref(&self) -> &[K] {
        &self.elements
    }
}

impl<K> From<Vec<K>> for Snapshot<K> {
    fn from(elements: Vec<K>) -> Self {
        Self {
            elements: Arc::from(elements),
        }
    }
}

impl<K> FromIterator<K> for Snapshot<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a, K> IntoIterator for &'a Snapshot<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Snapshots compare as sequences, so equal members in a different order are
/// not equal snapshots.
impl<K: PartialEq> PartialEq for Snapshot<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.elements == other.elements
    }
}

impl<K: Eq> Eq for Snapshot<K> {}

impl<K: fmt::Debug> fmt::Debug for Snapshot<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.elements.iter()).finish()
    }
}

impl<K: fmt::Display> fmt::Display for Snapshot<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self.elements.iter() {
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
impl<K: serde::Serialize> serde::Serialize for Snapshot<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.elements.iter())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_snapshot() {
        let snapshot: Snapshot<i32> = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert_eq!(snapshot.iter().next(), None);
    }

    #[rstest]
    fn test_clone_shares_allocation() {
        let snapshot = Snapshot::from(vec![1, 2, 3]);
        let clone = snapshot.clone();
        assert!(snapshot.ptr_eq(&clone));
        assert_eq!(clone.as_slice(), &[1, 2, 3]);
    }

    #[rstest]
    fn test_separately_built_snapshots_do_not_share() {
        let first = Snapshot::from(vec![1, 2, 3]);
        let second: Snapshot<i32> = (1..=3).collect();
        assert!(!first.ptr_eq(&second));
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_equality_is_order_sensitive() {
        let first = Snapshot::from(vec![1, 2]);
        let second = Snapshot::from(vec![2, 1]);
        assert_ne!(first, second);
    }

    #[rstest]
    fn test_deref_exposes_slice_methods() {
        let snapshot = Snapshot::from(vec![5, 6, 7]);
        assert_eq!(snapshot.first(), Some(&5));
        assert!(snapshot.contains(&6));
        assert!(!snapshot.contains(&8));
    }

    #[rstest]
    fn test_borrowed_iteration() {
        let snapshot = Snapshot::from(vec![1, 2, 3]);
        let mut total = 0;
        for value in &snapshot {
            total += value;
        }
        assert_eq!(total, 6);
    }

    #[rstest]
    #[case(vec![], "[]")]
    #[case(vec![2], "[2]")]
    #[case(vec![1, 2, 3], "[1, 2, 3]")]
    fn test_display(#[case] elements: Vec<i32>, #[case] expected: &str) {
        assert_eq!(Snapshot::from(elements).to_string(), expected);
    }

    #[rstest]
    fn test_debug() {
        let snapshot = Snapshot::from(vec!["a", "b"]);
        assert_eq!(format!("{snapshot:?}"), r#"["a", "b"]"#);
    }
}
