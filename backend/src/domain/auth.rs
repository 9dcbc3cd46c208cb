//! Login and self-registration inputs.
//!
//! Handlers build these from raw request strings; the constructors reject
//! anything the account service must never see.

use zeroize::Zeroizing;

/// Minimum username length accepted at registration.
pub const MIN_USERNAME_LEN: usize = 3;

/// Invalid login payload values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Request field at fault.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim.
///
/// # Examples
/// ```
/// use contact_registry::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ana ", "ana123").expect("valid");
/// assert_eq!(creds.username(), "ana");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Errors
    /// Returns [`LoginValidationError`] when either part is blank.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the directory lookup.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as submitted.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Invalid registration payload values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Name, username or password was blank.
    #[error("name, username and password are required")]
    MissingField,
    /// Username too short or outside `[A-Za-z0-9._-]`.
    #[error("username must have at least 3 characters from letters, digits, '.', '_' or '-'")]
    InvalidUsername,
}

impl RegistrationValidationError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUsername => "invalid_username",
        }
    }
}

/// Validated self-registration request. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    display_name: String,
    username: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    ///
    /// # Errors
    /// Returns [`RegistrationValidationError`] for blank fields or a
    /// malformed username.
    pub fn try_from_parts(
        display_name: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let (display_name, username, password) =
            (display_name.trim(), username.trim(), password.trim());
        if display_name.is_empty() || username.is_empty() || password.is_empty() {
            return Err(RegistrationValidationError::MissingField);
        }
        if !is_valid_username(username) {
            return Err(RegistrationValidationError::InvalidUsername);
        }
        Ok(Self {
            display_name: display_name.to_owned(),
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Name shown as consultant attribution.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Requested login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Requested password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn is_valid_username(username: &str) -> bool {
    username.chars().count() >= MIN_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
