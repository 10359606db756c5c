//! Delivery media catalog entries.
//!
//! # Invariants
//! - `id` is lowercase alphanumeric without `_`, so `{label}_{medium_id}`
//!   form keys split unambiguously on the last underscore.
//! - `display` is never blank.

use crate::model::ModelValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MEDIUM_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("valid medium id regex"));

/// One delivery channel (for example `email` or `site`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeMedium {
    /// Stable storage and form-key identifier.
    pub id: String,
    /// Column header shown by the presentation layer.
    pub display: String,
    /// Settings default to on when this value is `<=` the notice type's
    /// `default_level`.
    pub default_sensitivity: i32,
}

impl NoticeMedium {
    pub fn new(id: impl Into<String>, display: impl Into<String>, default_sensitivity: i32) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            default_sensitivity,
        }
    }

    /// Built-in email channel.
    pub fn email() -> Self {
        Self::new("email", "Email", 2)
    }

    /// Built-in on-site channel.
    pub fn site() -> Self {
        Self::new("site", "Site", 1)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if !MEDIUM_ID_RE.is_match(&self.id) {
            return Err(ModelValidationError::InvalidMediumId(self.id.clone()));
        }
        if self.display.trim().is_empty() {
            return Err(ModelValidationError::EmptyDisplay(self.id.clone()));
        }
        Ok(())
    }
}
