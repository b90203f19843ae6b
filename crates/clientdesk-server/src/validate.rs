//! Request payload validation.
//!
//! Mirrors the field rules enforced at the API boundary: names are
//! required non-empty strings, `email` must look like an address, `age`
//! must fall in `0..=100`, and `linkedInUrl` must parse as an http(s)
//! URL. Creation requires every field; updates validate only the fields
//! the caller sent.
//!
//! Failures accumulate per field into [`FieldErrors`] so a single
//! response can report everything that is wrong with the payload.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use clientdesk_core::{ClientPatch, NewClient};

/// Oldest accepted age.
pub const AGE_MAX: i64 = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // One '@', no whitespace, a dot somewhere in the domain.
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Incoming client fields, all optional at the wire level.
///
/// Requiredness is a validation concern, not a deserialization one, so a
/// missing field produces a field error instead of a body rejection.
/// `age` is widened to `i64` to keep out-of-range values reportable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    #[serde(rename = "linkedInUrl")]
    pub linked_in_url: Option<String>,
}

/// Per-field validation messages, keyed by the wire-level field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message for a single field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(value)` when no error was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Validate a creation payload. Every field is required.
pub fn validate_create(payload: ClientPayload) -> Result<NewClient, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = require_name(&mut errors, "first_name", payload.first_name);
    let last_name = require_name(&mut errors, "last_name", payload.last_name);
    let email = match payload.email {
        Some(ref value) if !value.trim().is_empty() => {
            check_email(&mut errors, value);
            value.clone()
        }
        _ => {
            errors.push("email", "The email field is required.");
            String::new()
        }
    };
    let age = match payload.age {
        Some(value) => check_age(&mut errors, value).unwrap_or_default(),
        None => {
            errors.push("age", "The age field is required.");
            0
        }
    };
    let linkedin_url = match payload.linked_in_url {
        Some(ref value) if !value.trim().is_empty() => {
            check_url(&mut errors, value);
            value.clone()
        }
        _ => {
            errors.push("linkedInUrl", "The linkedInUrl field is required.");
            String::new()
        }
    };

    errors.into_result(NewClient {
        first_name,
        last_name,
        email,
        age,
        linkedin_url,
    })
}

/// Validate an update payload. Only the fields present are checked; a
/// field that is present must still satisfy its creation rule.
pub fn validate_update(payload: ClientPayload) -> Result<ClientPatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut patch = ClientPatch::default();

    if let Some(value) = payload.first_name {
        if value.trim().is_empty() {
            errors.push("first_name", "The first_name field is required.");
        } else {
            patch.first_name = Some(value);
        }
    }
    if let Some(value) = payload.last_name {
        if value.trim().is_empty() {
            errors.push("last_name", "The last_name field is required.");
        } else {
            patch.last_name = Some(value);
        }
    }
    if let Some(value) = payload.email {
        if value.trim().is_empty() {
            errors.push("email", "The email field is required.");
        } else {
            check_email(&mut errors, &value);
            if !errors.contains("email") {
                patch.email = Some(value);
            }
        }
    }
    if let Some(value) = payload.age {
        if let Some(age) = check_age(&mut errors, value) {
            patch.age = Some(age);
        }
    }
    if let Some(value) = payload.linked_in_url {
        if value.trim().is_empty() {
            errors.push("linkedInUrl", "The linkedInUrl field is required.");
        } else {
            check_url(&mut errors, &value);
            if !errors.contains("linkedInUrl") {
                patch.linkedin_url = Some(value);
            }
        }
    }

    errors.into_result(patch)
}

fn require_name(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            errors.push(field, format!("The {field} field is required."));
            String::new()
        }
    }
}

fn check_email(errors: &mut FieldErrors, value: &str) {
    if !EMAIL_RE.is_match(value) {
        errors.push("email", "The email must be a valid email address.");
    }
}

fn check_age(errors: &mut FieldErrors, value: i64) -> Option<i32> {
    if value < 0 {
        errors.push("age", "The age must be at least 0.");
        return None;
    }
    if value > AGE_MAX {
        errors.push("age", format!("The age may not be greater than {AGE_MAX}."));
        return None;
    }
    Some(value as i32)
}

fn check_url(errors: &mut FieldErrors, value: &str) {
    let valid = matches!(Url::parse(value), Ok(url) if matches!(url.scheme(), "http" | "https"));
    if !valid {
        errors.push("linkedInUrl", "The linkedInUrl must be a valid URL.");
    }
}
