//! Contact registration use-cases.
//!
//! The service owns duplicate detection: it normalizes the phone, looks it up
//! in the bound store and only appends when no record exists. Check and
//! append run under a process-wide admission lock so two requests for the
//! same phone cannot both pass the check.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::ports::{ContactStore, ContactStoreError};
use crate::domain::{Actor, Attribution, ContactRecord, Error, NewContact, normalize_phone};

/// Contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Display name; required.
    pub name: String,
    /// Phone in any formatting; required.
    pub phone: String,
    /// Course of interest.
    pub course: Option<String>,
    /// Consultant credited when the caller is anonymous.
    pub consultant_hint: Option<String>,
}

/// Missing or unusable submission fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// Name absent or blank.
    #[error("name is required")]
    MissingName,
    /// Phone absent or blank.
    #[error("phone is required")]
    MissingPhone,
    /// Phone present but contains no digits.
    #[error("phone must contain digits")]
    PhoneWithoutDigits,
}

impl ContactValidationError {
    fn field(self) -> &'static str {
        match self {
            Self::MissingName => "name",
            Self::MissingPhone | Self::PhoneWithoutDigits => "phone",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::MissingPhone => "missing_phone",
            Self::PhoneWithoutDigits => "invalid_phone",
        }
    }
}

/// Failures of contact use-cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    /// The submission is incomplete.
    #[error(transparent)]
    Validation(#[from] ContactValidationError),
    /// A record with the same phone already exists.
    #[error("phone {} is already registered", .existing.phone)]
    Duplicate {
        /// The record holding the phone.
        existing: Box<ContactRecord>,
    },
    /// The store could not complete the operation.
    #[error("contact store unavailable: {message}")]
    StoreUnavailable {
        /// Detail from the store adapter.
        message: String,
    },
}

impl From<ContactError> for Error {
    fn from(value: ContactError) -> Self {
        match value {
            ContactError::Validation(err) => Self::invalid_request(err.to_string())
                .with_details(json!({ "field": err.field(), "code": err.code() })),
            ContactError::Duplicate { existing } => Self::conflict("phone already registered")
                .with_details(json!({ "existing": existing })),
            ContactError::StoreUnavailable { message } => {
                Self::service_unavailable("contact store unavailable")
                    .with_details(json!({ "reason": message }))
            }
        }
    }
}

/// Outcome of a duplicate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// A record already holds the phone.
    Duplicate(ContactRecord),
    /// The phone is free.
    NotDuplicate,
}

/// Contact registration service bound to one store.
pub struct ContactService {
    store: Arc<dyn ContactStore>,
    admission: Mutex<()>,
}

impl ContactService {
    /// Create a service over the selected store.
    #[must_use]
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self {
            store,
            admission: Mutex::new(()),
        }
    }

    /// Register a contact unless its phone is already present.
    ///
    /// # Errors
    /// - [`ContactError::Validation`] when name or phone is missing; nothing
    ///   is written.
    /// - [`ContactError::Duplicate`] with the existing record.
    /// - [`ContactError::StoreUnavailable`] when the store fails.
    pub async fn add_contact(
        &self,
        submission: ContactSubmission,
        actor: Option<&Actor>,
    ) -> Result<(), ContactError> {
        let ContactSubmission {
            name,
            phone,
            course,
            consultant_hint,
        } = submission;
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::MissingName.into());
        }
        let digits = required_digits(&phone)?;

        let _admitted = self.admission.lock().await;
        if let Some(existing) = self.lookup(&digits).await? {
            return Err(ContactError::Duplicate {
                existing: Box::new(existing),
            });
        }

        let attribution = Attribution::resolve(actor, consultant_hint.as_deref());
        let contact = NewContact {
            name: name.to_owned(),
            phone: digits.clone(),
            course: course.unwrap_or_default().trim().to_owned(),
            consultant: attribution.consultant,
            username: attribution.username,
            password: String::new(),
        };
        let username = contact.username.clone();
        match self.store.append(contact).await {
            Ok(()) => {
                info!(%username, "contact registered");
                Ok(())
            }
            Err(ContactStoreError::PhoneTaken { .. }) => Err(self.taken(&digits).await),
            Err(err) => Err(unavailable(err)),
        }
    }

    /// Report whether a phone is already registered.
    ///
    /// # Errors
    /// [`ContactError::Validation`] for phones without digits, otherwise
    /// [`ContactError::StoreUnavailable`].
    pub async fn check_duplicate(&self, phone: &str) -> Result<DuplicateCheck, ContactError> {
        let digits = required_digits(phone)?;
        Ok(match self.lookup(&digits).await? {
            Some(existing) => DuplicateCheck::Duplicate(existing),
            None => DuplicateCheck::NotDuplicate,
        })
    }

    /// Every record in store order, label row excluded.
    ///
    /// # Errors
    /// [`ContactError::StoreUnavailable`] when the store fails.
    pub async fn list_all(&self) -> Result<Vec<ContactRecord>, ContactError> {
        let rows = self.store.read_all().await.map_err(unavailable)?;
        Ok(rows.records())
    }

    /// Append a user-credential row: name, date, username and password with
    /// the contact columns left empty.
    ///
    /// # Errors
    /// [`ContactError::StoreUnavailable`] when the store fails.
    pub async fn register_credentials(
        &self,
        name: &str,
        username: &str,
        password: &str,
    ) -> Result<(), ContactError> {
        let row = NewContact {
            name: name.to_owned(),
            phone: String::new(),
            course: String::new(),
            consultant: String::new(),
            username: username.to_owned(),
            password: password.to_owned(),
        };
        self.store.append(row).await.map_err(unavailable)
    }

    async fn lookup(&self, digits: &str) -> Result<Option<ContactRecord>, ContactError> {
        self.store.find_by_phone(digits).await.map_err(unavailable)
    }

    /// The store rejected the append on its own uniqueness rule; report the
    /// record that won.
    async fn taken(&self, digits: &str) -> ContactError {
        match self.lookup(digits).await {
            Ok(Some(existing)) => ContactError::Duplicate {
                existing: Box::new(existing),
            },
            Ok(None) => ContactError::StoreUnavailable {
                message: format!("store rejected phone {digits} but holds no record for it"),
            },
            Err(err) => err,
        }
    }
}

fn required_digits(phone: &str) -> Result<String, ContactValidationError> {
    if phone.trim().is_empty() {
        return Err(ContactValidationError::MissingPhone);
    }
    let digits = normalize_phone(phone);
    if digits.is_empty() {
        return Err(ContactValidationError::PhoneWithoutDigits);
    }
    Ok(digits)
}

fn unavailable(error: ContactStoreError) -> ContactError {
    warn!(%error, "contact store call failed");
    let message = match error {
        ContactStoreError::Unavailable { message } => message,
        other @ ContactStoreError::PhoneTaken { .. } => other.to_string(),
    };
    ContactError::StoreUnavailable { message }
}

#[cfg(test)]
#[path = "contact_service_tests.rs"]
mod tests;
