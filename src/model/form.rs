//! Form fields and validation shared by the create/edit dialogs

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(String),
    #[error("{field}: '{value}' is not a valid number")]
    InvalidNumber { field: String, value: String },
    #[error("{field}: '{value}' is not yes/no")]
    InvalidBool { field: String, value: String },
    #[error("{field}: {reason}")]
    OutOfRange { field: String, reason: String },
    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

/// One editable text field in a form dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub value: String,
    pub required: bool,
}

impl FormField {
    pub fn new(key: &str, label: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: value.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Look up a field's trimmed value
pub fn field_value<'a>(fields: &'a [FormField], key: &str) -> &'a str {
    fields
        .iter()
        .find(|f| f.key == key)
        .map(|f| f.value.trim())
        .unwrap_or("")
}

/// Check every required field has a value
pub fn check_required(fields: &[FormField]) -> Result<(), FormError> {
    match fields.iter().find(|f| f.required && f.value.trim().is_empty()) {
        Some(field) => Err(FormError::Required(field.label.clone())),
        None => Ok(()),
    }
}

pub fn parse_bool(field: &str, value: &str) -> Result<bool, FormError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(FormError::InvalidBool {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_number<N: std::str::FromStr>(field: &str, value: &str) -> Result<N, FormError> {
    value.trim().parse().map_err(|_| FormError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Comma separated list, blanks dropped
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
