//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is a `400` whose `details` name the offending
//! payload `field` and a machine-readable `code`, plus an `index` when the
//! field is a collection.

use pagination::{PageParams, PageParamsError, PageRequest};
use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, PasswordChangeError, RecipeValidationError, UserValidationError,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: FieldName,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "code": code,
        }))
    }

    fn with_index(self, code: &str, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "index": index,
            "code": code,
        }))
    }
}

pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    ValidationError::new(field, message).with_code(code)
}

pub(crate) fn user_validation_error(field: &'static str, err: &UserValidationError) -> Error {
    field_error(FieldName::new(field), err.code(), err.to_string())
}

pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    field_error(FieldName::new(err.field()), "required", err.to_string())
}

pub(crate) fn password_change_error(field: &'static str, err: &PasswordChangeError) -> Error {
    let code = match err {
        PasswordChangeError::MissingCurrent => "required",
        PasswordChangeError::WeakNew(inner) => inner.code(),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

pub(crate) fn recipe_validation_error(err: &RecipeValidationError) -> Error {
    let error = ValidationError::new(FieldName::new(err.field()), err.to_string());
    match err.index() {
        Some(index) => error.with_index(err.code(), index),
        None => error.with_code(err.code()),
    }
}

fn page_params_error(err: PageParamsError) -> Error {
    field_error(FieldName::new(err.field()), "out_of_range", err.to_string())
}

/// Validate raw `page`/`limit` query values.
pub(crate) fn page_request(params: PageParams) -> Result<PageRequest, Error> {
    PageRequest::try_from(params).map_err(page_params_error)
}

/// Parse a positive integer query parameter.
pub(crate) fn parse_positive(value: &str, field: FieldName) -> Result<u32, Error> {
    match value.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(field_error(
            field,
            "invalid_integer",
            format!("{} must be a positive integer", field.as_str()),
        )),
    }
}

/// Interpret a boolean query flag. Only `1` and `true` switch it on.
pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(value, "1" | "true")
}
