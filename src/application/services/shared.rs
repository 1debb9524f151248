//! Thread-safe handle for multi-threaded hosts.
//!
//! A toggle runs its downward and upward passes as separate steps, so
//! readers must never observe a selection mid-toggle. Every operation here
//! goes through one mutex and completes both passes before releasing it.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CheckState, Selection};

/// Cloneable, lock-protected selection.
#[derive(Debug, Clone)]
pub struct SharedSelection {
    inner: Arc<Mutex<Selection>>,
}

impl SharedSelection {
    pub fn new(selection: Selection) -> Self {
        Self {
            inner: Arc::new(Mutex::new(selection)),
        }
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, Selection>> {
        self.inner.lock().map_err(|_| ApplicationError::LockPoisoned)
    }

    pub fn toggle(&self, id: &str, checked: bool) -> ApplicationResult<()> {
        self.lock()?.toggle(id, checked)?;
        Ok(())
    }

    pub fn tristate(&self, id: &str) -> ApplicationResult<CheckState> {
        Ok(self.lock()?.tristate(id)?)
    }

    pub fn checked_leaf_ids(&self) -> ApplicationResult<Vec<String>> {
        let guard = self.lock()?;
        Ok(guard
            .checked_leaf_ids()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn reset(&self) -> ApplicationResult<()> {
        self.lock()?.reset();
        Ok(())
    }

    /// Run a read-only closure against a consistent view.
    pub fn read<R>(&self, f: impl FnOnce(&Selection) -> R) -> ApplicationResult<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Copy of the current selection.
    pub fn snapshot(&self) -> ApplicationResult<Selection> {
        Ok(self.lock()?.clone())
    }
}
