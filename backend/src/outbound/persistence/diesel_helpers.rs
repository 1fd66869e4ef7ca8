//! Shared helpers for the Diesel repository adapters.
//!
//! Every driven port error exposes `connection` and `query` constructors.
//! [`RepositoryError`] abstracts over them so pool and Diesel failures map the
//! same way in every adapter; constraint violations that carry domain meaning
//! are detected with [`violated_constraint`] before falling back here.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{
    IngredientRepositoryError, RecipeListRepositoryError, RecipeRepositoryError,
    SubscriptionRepositoryError, TagRepositoryError, UserPersistenceError,
};

use super::pool::PoolError;

/// Port errors with connection and query variants.
pub(crate) trait RepositoryError: Sized {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

macro_rules! impl_repository_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl RepositoryError for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )*
    };
}

impl_repository_error!(
    IngredientRepositoryError,
    RecipeListRepositoryError,
    RecipeRepositoryError,
    SubscriptionRepositoryError,
    TagRepositoryError,
    UserPersistenceError,
);

/// Map a pool failure to the port's connection error.
pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => E::connection(message),
    }
}

/// Map a Diesel failure to the port's connection or query error.
///
/// Driver messages are logged at debug level and replaced with generic text
/// so SQL details never reach clients.
pub(crate) fn map_diesel_error<E: RepositoryError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        DieselError::BrokenTransactionManager => {
            E::connection("database transaction state lost".to_owned())
        }
        _ => E::query("database error".to_owned()),
    }
}

/// Name of the constraint a database error violated, when it has `kind`.
pub(crate) fn violated_constraint(error: &DieselError, kind: ViolationKind) -> Option<&str> {
    match (error, kind) {
        (
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info),
            ViolationKind::Unique,
        )
        | (
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info),
            ViolationKind::ForeignKey,
        )
        | (
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info),
            ViolationKind::Check,
        ) => Some(info.constraint_name().unwrap_or_default()),
        _ => None,
    }
}

/// Constraint violation families with domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViolationKind {
    Unique,
    ForeignKey,
    Check,
}

/// Convert a non-negative database count.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// `OFFSET` for a page request.
pub(crate) fn page_offset(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}

#[cfg(test)]
struct StubInfo {
    constraint: Option<&'static str>,
}

#[cfg(test)]
impl diesel::result::DatabaseErrorInformation for StubInfo {
    fn message(&self) -> &str {
        "stub failure"
    }
    fn details(&self) -> Option<&str> {
        None
    }
    fn hint(&self) -> Option<&str> {
        None
    }
    fn table_name(&self) -> Option<&str> {
        None
    }
    fn column_name(&self) -> Option<&str> {
        None
    }
    fn constraint_name(&self) -> Option<&str> {
        self.constraint
    }
    fn statement_position(&self) -> Option<i32> {
        None
    }
}

/// A driver error of `kind` naming `constraint`.
#[cfg(test)]
pub(crate) fn stub_database_error(
    kind: DatabaseErrorKind,
    constraint: Option<&'static str>,
) -> DieselError {
    DieselError::DatabaseError(kind, Box::new(StubInfo { constraint }))
}
