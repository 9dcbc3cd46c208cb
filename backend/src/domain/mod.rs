//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: Define the contact registry's strongly typed entities and the
//! services that operate on them through the ports in [`ports`]. Types keep
//! their invariants and serialisation contracts documented in their Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ContactRecord / NewContact / RowSet: the seven-column contact row.
//! - ContactService: duplicate-checked contact registration.
//! - AccountService: password login and self-registration.
//! - Actor / Role / Attribution: caller identity and contact credit.

pub mod account_service;
pub mod actor;
pub mod auth;
pub mod contact;
pub mod contact_service;
pub mod error;
pub mod phone;
pub mod ports;
pub mod trace_id;

pub use self::account_service::{AccountService, Session};
pub use self::actor::{Actor, Attribution, PUBLIC_ATTRIBUTION, Role};
pub use self::auth::{
    LoginCredentials, LoginValidationError, MIN_USERNAME_LEN, Registration,
    RegistrationValidationError,
};
pub use self::contact::{
    CONTACT_COLUMNS, ContactDate, ContactRecord, NewContact, RowAddressing, RowSet, SheetLayout,
};
pub use self::contact_service::{
    ContactError, ContactService, ContactSubmission, ContactValidationError, DuplicateCheck,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::phone::normalize_phone;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
