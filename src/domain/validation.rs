use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    Empty { field: &'static str },
    UnrecognizedPhone { cleaned_digits: String },
    InvalidSmsId { input: String },
    InvalidUrl { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::UnrecognizedPhone { cleaned_digits } => {
                write!(f, "unrecognized phone format (cleaned: {cleaned_digits:?})")
            }
            Self::InvalidSmsId { input } => write!(
                f,
                "invalid sms id: {input:?} (alphanumeric only, at most 50 characters)"
            ),
            Self::InvalidUrl { field, input } => write!(f, "invalid {field} URL: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
