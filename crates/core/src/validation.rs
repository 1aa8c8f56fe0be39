//! Field validation rules.
//!
//! Request DTOs declare their constraints with `#[derive(validator::Validate)]`;
//! the rules that a plain length/email check cannot express live here as
//! custom validator functions, e.g.
//!
//! ```ignore
//! #[validate(length(min = 1, max = 50), custom(function = "validate_code"))]
//! pub code: String,
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::entity::{EntityKind, VERSIONABLE_KINDS};
use crate::roles::VALID_ROLES;
use crate::sanitize::contains_sql_injection;
use crate::status::{
    ASSET_TYPES, NOTE_STATUSES, PROJECT_STATUSES, TASK_STATUSES, VERSION_STATUSES,
};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_CODE_LENGTH: usize = 50;
pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;
pub const MAX_SUBJECT_LENGTH: usize = 255;
pub const MAX_NOTE_CONTENT_LENGTH: usize = 10_000;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Codes are short ASCII identifiers such as `EP01`, `SQ010`, `SH010_v002`.
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,50}$").expect("valid regex"));

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

// ---------------------------------------------------------------------------
// Custom validators
// ---------------------------------------------------------------------------

/// Entity code: ASCII letters, digits, `_`, `-`, `.`; must start with a
/// letter or digit.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(error("blank", "Code must not be empty"));
    }
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(error(
            "length",
            format!("Code must be at most {MAX_CODE_LENGTH} characters"),
        ));
    }
    if !CODE_RE.is_match(code) {
        return Err(error(
            "code_format",
            "Code may only contain letters, digits, '_', '-' and '.', and must start with a letter or digit",
        ));
    }
    Ok(())
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// Rejects SQL injection payloads.
pub fn validate_no_sql_injection(value: &str) -> Result<(), ValidationError> {
    if contains_sql_injection(value) {
        Err(error("sql_injection", "Value contains disallowed SQL syntax"))
    } else {
        Ok(())
    }
}

/// Display names: not blank, no SQL injection payloads.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_not_blank(name)?;
    validate_no_sql_injection(name)
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(error(
            "username_format",
            "Username must be 3-50 characters of letters, digits, '_', '-' or '.'",
        ))
    }
}

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(error(
            code,
            format!("'{value}' is not one of: {}", allowed.join(", ")),
        ))
    }
}

pub fn validate_project_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, PROJECT_STATUSES, "status")
}

pub fn validate_task_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, TASK_STATUSES, "status")
}

pub fn validate_version_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VERSION_STATUSES, "status")
}

pub fn validate_note_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, NOTE_STATUSES, "status")
}

pub fn validate_asset_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, ASSET_TYPES, "asset_type")
}

/// Parent type of a version: any hierarchy level, never a version or playlist.
pub fn validate_versionable_type(value: &str) -> Result<(), ValidationError> {
    let allowed: Vec<&str> = VERSIONABLE_KINDS.iter().map(|k| k.as_str()).collect();
    one_of(value, &allowed, "entity_type")
}

/// Any entity a note can link to.
pub fn validate_linkable_type(value: &str) -> Result<(), ValidationError> {
    let allowed: Vec<&str> = EntityKind::ALL.iter().map(|k| k.as_str()).collect();
    one_of(value, &allowed, "link_type")
}

pub fn validate_role(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_ROLES, "role")
}

/// Check that a frame range is ordered when both ends are present.
pub fn validate_cut_range(cut_in: Option<i32>, cut_out: Option<i32>) -> Result<(), String> {
    match (cut_in, cut_out) {
        (Some(i), Some(o)) if o < i => Err(format!(
            "cut_out ({o}) must be greater than or equal to cut_in ({i})"
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Error reporting
// ---------------------------------------------------------------------------

/// Flatten validator output into `field -> [messages]`, sorted by field.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => default_message(&e.code, e),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// One-line summary such as `code: Code must not be empty; name: ...`.
pub fn summarize(errors: &ValidationErrors) -> String {
    field_messages(errors)
        .into_iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn default_message(code: &str, err: &ValidationError) -> String {
    match code {
        "length" => {
            let min = err.params.get("min").map(|v| v.to_string());
            let max = err.params.get("max").map(|v| v.to_string());
            match (min, max) {
                (Some(min), Some(max)) => format!("Length must be between {min} and {max}"),
                (Some(min), None) => format!("Length must be at least {min}"),
                (None, Some(max)) => format!("Length must be at most {max}"),
                (None, None) => "Invalid length".to_string(),
            }
        }
        "range" => {
            let min = err.params.get("min").map(|v| v.to_string());
            match min {
                Some(min) => format!("Value must be at least {min}"),
                None => "Value out of range".to_string(),
            }
        }
        "email" => "Invalid email address".to_string(),
        other => format!("Failed '{other}' check"),
    }
}
