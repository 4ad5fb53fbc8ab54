//! Read/write lock backend.
//!
//! By default this wraps [`parking_lot::RwLock`], which cannot be poisoned.
//! With the `loom` feature enabled the lock is [`loom::sync::RwLock`] so the
//! interleavings of [`ConcurrentSet`](crate::set::ConcurrentSet) can be
//! model checked. A poisoned loom lock is a fatal fault and panics.
//!
//! Both backends expose the same three acquisition modes: blocking shared,
//! blocking exclusive, and non-blocking exclusive.

#[cfg(not(feature = "loom"))]
mod backend {
    pub type ReadGuard<'a, T> = parking_lot::RwLockReadGuard<'a, T>;
    pub type WriteGuard<'a, T> = parking_lot::RwLockWriteGuard<'a, T>;

    pub struct RwLock<T>(parking_lot::RwLock<T>);

    impl<T> RwLock<T> {
        #[inline]
        pub fn new(value: T) -> Self {
            Self(parking_lot::RwLock::new(value))
        }

        #[inline]
        pub fn read(&self) -> ReadGuard<'_, T> {
            self.0.read()
        }

        #[inline]
        pub fn write(&self) -> WriteGuard<'_, T> {
            self.0.write()
        }

        /// Returns `None` while any reader or writer holds the lock.
        #[inline]
        pub fn try_write(&self) -> Option<WriteGuard<'_, T>> {
            self.0.try_write()
        }

        #[inline]
        pub fn into_inner(self) -> T {
            self.0.into_inner()
        }
    }
}

#[cfg(feature = "loom")]
mod backend {
    use std::sync::TryLockError;

    pub type ReadGuard<'a, T> = loom::sync::RwLockReadGuard<'a, T>;
    pub type WriteGuard<'a, T> = loom::sync::RwLockWriteGuard<'a, T>;

    pub struct RwLock<T>(loom::sync::RwLock<T>);

    #[cold]
    #[inline(never)]
    fn poisoned() -> ! {
        panic!("ConcurrentSet: lock poisoned by a thread that panicked while holding it");
    }

    impl<T> RwLock<T> {
        pub fn new(value: T) -> Self {
            Self(loom::sync::RwLock::new(value))
        }

        pub fn read(&self) -> ReadGuard<'_, T> {
            self.0.read().unwrap_or_else(|_| poisoned())
        }

        pub fn write(&self) -> WriteGuard<'_, T> {
            self.0.write().unwrap_or_else(|_| poisoned())
        }

        pub fn try_write(&self) -> Option<WriteGuard<'_, T>> {
            match self.0.try_write() {
                Ok(guard) => Some(guard),
                Err(TryLockError::WouldBlock) => None,
                Err(TryLockError::Poisoned(_)) => poisoned(),
            }
        }

        pub fn into_inner(self) -> T {
            self.0.into_inner().unwrap_or_else(|_| poisoned())
        }
    }
}

pub use backend::RwLock;
