//! User data model: account identity, registration input and profile views.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use super::UserId;

/// Maximum length of an e-mail address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 150;
/// Minimum length of a password.
pub const PASSWORD_MIN: usize = 8;

/// Username reserved for the "current user" route.
const RESERVED_USERNAME: &str = "me";

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    ReservedUsername,
    NameTooLong { max: usize },
    PasswordTooShort { min: usize },
    PasswordNumeric,
}

impl UserValidationError {
    /// Machine-readable code used in validation error details.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyUsername => "required",
            Self::EmailTooLong { .. } | Self::UsernameTooLong { .. } | Self::NameTooLong { .. } => {
                "too_long"
            }
            Self::InvalidEmail | Self::UsernameInvalidCharacters => "invalid_format",
            Self::ReservedUsername => "reserved",
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordNumeric => "entirely_numeric",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits and the characters _ . @ + -",
            ),
            Self::ReservedUsername => write!(f, "username \"me\" is reserved"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordNumeric => write!(f, "password must not be entirely numeric"),
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new(r"^[A-Za-z0-9_.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Normalised e-mail address used as the login identifier.
///
/// Addresses are trimmed and lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an e-mail address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Public handle of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate a username.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&value) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        if value.eq_ignore_ascii_case(RESERVED_USERNAME) {
            return Err(UserValidationError::ReservedUsername);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// First or last name. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A plaintext password that satisfies the strength rules.
///
/// The buffer is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password.
    pub fn new(value: &str) -> Result<Self, UserValidationError> {
        if value.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if value.chars().all(|c| c.is_ascii_digit()) {
            return Err(UserValidationError::PasswordNumeric);
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Borrow the plaintext for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored password hash in the adapter's own format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash produced by a password hasher or read from storage.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Registered account.
///
/// ## Invariants
/// - `email` and `username` are unique across users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    first_name: PersonName,
    last_name: PersonName,
    is_admin: bool,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, profile: UserProfileFields, is_admin: bool) -> Self {
        let UserProfileFields {
            email,
            username,
            first_name,
            last_name,
        } = profile;
        Self {
            id,
            email,
            username,
            first_name,
            last_name,
            is_admin,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login e-mail.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Public handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Given name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Whether the user may manage every recipe.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Validated identity fields shared by registration and stored users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileFields {
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
}

impl UserProfileFields {
    /// Validate raw profile inputs.
    ///
    /// Returns the name of the offending field alongside the error.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, (&'static str, UserValidationError)> {
        Ok(Self {
            email: Email::new(email).map_err(|err| ("email", err))?,
            username: Username::new(username).map_err(|err| ("username", err))?,
            first_name: PersonName::new(first_name).map_err(|err| ("first_name", err))?,
            last_name: PersonName::new(last_name).map_err(|err| ("last_name", err))?,
        })
    }
}

/// Sign-up request after validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub profile: UserProfileFields,
    pub password: Password,
}

/// A user to be inserted by a repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub profile: UserProfileFields,
    pub password_hash: PasswordHash,
}

/// A user as seen by another (possibly anonymous) user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    /// Whether the viewer follows this user. Always false for anonymous viewers.
    pub is_subscribed: bool,
}

#[cfg(test)]
mod tests;
