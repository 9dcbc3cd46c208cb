//! Port for the record store holding contact rows.
//!
//! Two adapters implement it: a spreadsheet-backed store and a relational
//! table. Callers never learn which one is bound.

use async_trait::async_trait;

use crate::domain::{ContactRecord, NewContact, RowSet};

use super::define_port_error;

define_port_error! {
    /// Failures raised by contact store adapters.
    pub enum ContactStoreError {
        /// The store could not be reached, is misconfigured, or answered
        /// with something unreadable.
        Unavailable { message: String } => "contact store unavailable: {message}",
        /// The store itself refused a second row for this phone.
        PhoneTaken { phone: String } => "phone {phone} is already registered",
    }
}

/// Append-only store of contact rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Every stored row in store order, possibly led by a label row.
    async fn read_all(&self) -> Result<RowSet, ContactStoreError>;

    /// First record whose normalized phone equals `phone`.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<ContactRecord>, ContactStoreError>;

    /// Append one row stamped with today's date. Never deduplicates.
    async fn append(&self, contact: NewContact) -> Result<(), ContactStoreError>;

    /// Prepare the store for use, such as writing a missing label row.
    ///
    /// Callers treat failures as warnings.
    async fn ensure_layout(&self) -> Result<(), ContactStoreError> {
        Ok(())
    }
}
