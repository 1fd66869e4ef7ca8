//! Authentication primitives: login credentials and password changes.
//!
//! Handlers build these from raw payload strings before calling a driving
//! port, keeping payload parsing outside the services.

use std::fmt;

use zeroize::Zeroizing;

use super::{Email, Password, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// E-mail was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    /// Name of the payload field that failed validation.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the login service.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. Its shape is not checked
///   so that a malformed address fails as bad credentials rather than
///   revealing the validation rules.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use foodgram::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Cook@Example.com ", "secret")
///     .expect("valid credentials");
/// assert_eq!(creds.email(), "cook@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw e-mail/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised e-mail suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated request to replace the caller's password.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    new: Password,
}

impl PasswordChange {
    /// Validate the new password; the current one only needs to be present.
    pub fn try_from_parts(
        current: &str,
        new: &str,
    ) -> Result<Self, (&'static str, PasswordChangeError)> {
        if current.is_empty() {
            return Err(("current_password", PasswordChangeError::MissingCurrent));
        }
        let new = Password::new(new)
            .map_err(|err| ("new_password", PasswordChangeError::WeakNew(err)))?;
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            new,
        })
    }

    /// The password the caller claims to have now.
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    /// The replacement password.
    pub fn new_password(&self) -> &Password {
        &self.new
    }
}

/// Reasons a password change payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordChangeError {
    #[error("current password must not be empty")]
    MissingCurrent,
    #[error("{0}")]
    WeakNew(UserValidationError),
}

/// Check that an e-mail string is usable as a lookup key without revealing
/// why it is not.
pub(crate) fn lookup_email(credentials: &LoginCredentials) -> Option<Email> {
    Email::new(credentials.email()).ok()
}
