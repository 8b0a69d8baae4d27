//! Field validation for request payloads.
//!
//! Each function checks one field and returns either the normalized value or
//! a [`FieldError`] naming the field. Callers collect failures into
//! [`FieldErrors`] so a response can report every bad field at once.

use bson::oid::ObjectId;
use serde::Serialize;
use std::fmt;
use validator::ValidateEmail;

use crate::model::Role;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 2;
pub const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldErrorKind {
    Missing,
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidEmail,
    InvalidId,
    InvalidRole,
    /// The value is well-formed but points at something unusable
    InvalidReference { reason: String },
    /// A derived `validator` rule failed; carries the rule code
    Rule { code: String },
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Missing => write!(f, "is required"),
            FieldErrorKind::Empty => write!(f, "must not be empty"),
            FieldErrorKind::TooShort { min } => write!(f, "must be at least {} characters", min),
            FieldErrorKind::TooLong { max } => write!(f, "must be at most {} characters", max),
            FieldErrorKind::InvalidEmail => write!(f, "is not a valid email address"),
            FieldErrorKind::InvalidId => write!(f, "is not a valid id"),
            FieldErrorKind::InvalidRole => write!(f, "must be one of student, instructor, admin"),
            FieldErrorKind::InvalidReference { reason } => write!(f, "{}", reason),
            FieldErrorKind::Rule { code } => write!(f, "failed {} check", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        FieldError { field: field.into(), kind }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Accumulates field errors across a whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error (if any) and hands back the value on success.
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(e);
                None
            }
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `field: message` lines, used as the `details` of an error response.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        FieldErrors(vec![error])
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut collected = FieldErrors::new();
        for (field, failures) in fields {
            for failure in failures.iter() {
                let kind = match failure.code.as_ref() {
                    "email" => FieldErrorKind::InvalidEmail,
                    "required" => FieldErrorKind::Missing,
                    code => FieldErrorKind::Rule { code: code.to_string() },
                };
                collected.push(FieldError::new(field.to_string(), kind));
            }
        }
        collected
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Required free text, trimmed. Rejects absent, blank and over-long values.
pub fn required_text(field: &str, value: Option<&str>, max: usize) -> Result<String, FieldError> {
    let value = value.ok_or_else(|| FieldError::new(field, FieldErrorKind::Missing))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldErrorKind::Empty));
    }
    if trimmed.chars().count() > max {
        return Err(FieldError::new(field, FieldErrorKind::TooLong { max }));
    }
    Ok(trimmed.to_string())
}

/// Optional free text: blank strings collapse to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Email, returned trimmed and lower-cased.
pub fn email(field: &str, value: Option<&str>) -> Result<String, FieldError> {
    let normalized = required_text(field, value, MAX_EMAIL_LEN)?.to_lowercase();
    if !normalized.validate_email() {
        return Err(FieldError::new(field, FieldErrorKind::InvalidEmail));
    }
    Ok(normalized)
}

/// Plaintext password. Never trimmed: whitespace is part of the secret.
pub fn password(field: &str, value: Option<&str>) -> Result<String, FieldError> {
    let value = value.ok_or_else(|| FieldError::new(field, FieldErrorKind::Missing))?;
    let len = value.chars().count();
    if len == 0 {
        return Err(FieldError::new(field, FieldErrorKind::Empty));
    }
    if len < MIN_PASSWORD_LEN {
        return Err(FieldError::new(field, FieldErrorKind::TooShort { min: MIN_PASSWORD_LEN }));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(FieldError::new(field, FieldErrorKind::TooLong { max: MAX_PASSWORD_LEN }));
    }
    Ok(value.to_string())
}

/// Role, defaulting to `student` when absent.
pub fn role(field: &str, value: Option<&str>) -> Result<Role, FieldError> {
    match value {
        None => Ok(Role::default()),
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| FieldError::new(field, FieldErrorKind::InvalidRole)),
    }
}

/// Required 24-character hex object id.
pub fn object_id(field: &str, value: Option<&str>) -> Result<ObjectId, FieldError> {
    let raw = value.ok_or_else(|| FieldError::new(field, FieldErrorKind::Missing))?;
    ObjectId::parse_str(raw.trim()).map_err(|_| FieldError::new(field, FieldErrorKind::InvalidId))
}

/// Optional object id: absent or blank is `None`, malformed is an error.
pub fn optional_object_id(field: &str, value: Option<&str>) -> Result<Option<ObjectId>, FieldError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => ObjectId::parse_str(raw)
            .map(Some)
            .map_err(|_| FieldError::new(field, FieldErrorKind::InvalidId)),
    }
}
