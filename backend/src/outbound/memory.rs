//! In-process contact store with spreadsheet semantics.
//!
//! Rows live in a vector and are addressed like sheet rows, so the store can
//! start with a label row and report 1-based row indices. Used by tests and
//! by local runs without any backing service.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ContactStore, ContactStoreError};
use crate::domain::{ContactDate, ContactRecord, NewContact, RowAddressing, RowSet, SheetLayout};

/// Vector-backed [`ContactStore`].
pub struct InMemoryContactStore {
    rows: Mutex<Vec<Vec<String>>>,
    clock: Arc<dyn Clock>,
    lookup_delay: Option<Duration>,
}

impl InMemoryContactStore {
    /// Empty store without a label row.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_rows(clock, Vec::new())
    }

    /// Store pre-filled with raw rows.
    #[must_use]
    pub fn with_rows(clock: Arc<dyn Clock>, rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            clock,
            lookup_delay: None,
        }
    }

    /// Sleep inside every phone lookup, widening the window between a
    /// caller's check and its append.
    #[must_use]
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    /// Number of stored rows, label row included.
    ///
    /// # Errors
    /// Fails when a writer panicked while holding the row lock.
    pub fn row_count(&self) -> Result<usize, ContactStoreError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Vec<String>>>, ContactStoreError> {
        self.rows
            .lock()
            .map_err(|_| ContactStoreError::unavailable("in-memory row lock poisoned"))
    }

    fn snapshot(&self) -> Result<RowSet, ContactStoreError> {
        Ok(RowSet::new(self.lock()?.clone(), RowAddressing::SheetRows))
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn read_all(&self) -> Result<RowSet, ContactStoreError> {
        self.snapshot()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ContactRecord>, ContactStoreError> {
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.snapshot()?.find_by_phone(phone))
    }

    async fn append(&self, contact: NewContact) -> Result<(), ContactStoreError> {
        let date = ContactDate::today(self.clock.as_ref());
        self.lock()?.push(contact.into_cells(&date));
        Ok(())
    }

    async fn ensure_layout(&self) -> Result<(), ContactStoreError> {
        let mut rows = self.lock()?;
        let first_row_blank = rows
            .first()
            .is_none_or(|row| row.iter().all(|cell| cell.trim().is_empty()));
        if first_row_blank {
            match rows.first_mut() {
                Some(row) => *row = SheetLayout::CURRENT.header_row(),
                None => rows.push(SheetLayout::CURRENT.header_row()),
            }
        }
        Ok(())
    }
}
