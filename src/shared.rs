use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Passes a value by reference to a deferred call.
///
/// Every clone refers to the same cell, so a deferred callable reads the value as it is when the
/// callable runs and its writes are visible to the caller afterwards.
pub struct Shared<T> {
    cell: Arc<Mutex<T>>,
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared {
            cell: Arc::new(Mutex::new(value)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.lock())
    }

    pub fn set(&self, value: T) {
        *self.lock() = value;
    }

    /// Returns the value if this is the last handle to it.
    pub fn into_inner(self) -> Result<T, Shared<T>> {
        match Arc::try_unwrap(self.cell) {
            Ok(m) => Ok(m.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(cell) => Err(Shared { cell }),
        }
    }
}

impl<T: Clone> Shared<T> {
    pub fn get(&self) -> T {
        self.lock().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&*self.lock()).finish()
    }
}
