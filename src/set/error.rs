use std::fmt;

/// Error returned by the non-blocking operations of a
/// [`ConcurrentSet`](super::ConcurrentSet) when the lock is held elsewhere.
///
/// This is an expected, recoverable signal: the set was left unchanged and
/// the caller may retry later or take another path.
///
/// # Examples
///
/// ```rust
/// use syncset::set::{BusyError, ConcurrentSet};
///
/// let set = ConcurrentSet::new();
/// match set.try_add(1) {
///     Ok(()) => assert!(set.contains(&1)),
///     Err(BusyError) => unreachable!("nothing else holds the lock"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusyError;

impl fmt::Display for BusyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "ConcurrentSet: operation busy, lock is held")
    }
}

impl std::error::Error for BusyError {}
