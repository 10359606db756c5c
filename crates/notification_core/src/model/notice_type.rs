//! Notice type reference data.
//!
//! Notice types are registered once (see `NoticeTypeRepository::upsert_notice_type`)
//! and read-only for the preference matrix and lifecycle paths.

use crate::model::medium::NoticeMedium;
use crate::model::ModelValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_]*$").expect("valid label regex"));

/// Storage row id of a notice type.
pub type NoticeTypeId = i64;

/// Named category of notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeType {
    pub id: NoticeTypeId,
    /// Unique machine label, e.g. `comment_posted`.
    pub label: String,
    pub display: String,
    pub description: String,
    /// Media whose sensitivity is at or below this level default to on.
    pub default_level: i32,
}

/// Registration payload for a notice type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNoticeType {
    pub label: String,
    pub display: String,
    pub description: String,
    pub default_level: i32,
}

impl NewNoticeType {
    pub fn new(
        label: impl Into<String>,
        display: impl Into<String>,
        description: impl Into<String>,
        default_level: i32,
    ) -> Self {
        Self {
            label: label.into(),
            display: display.into(),
            description: description.into(),
            default_level,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if !LABEL_RE.is_match(&self.label) {
            return Err(ModelValidationError::InvalidLabel(self.label.clone()));
        }
        if self.display.trim().is_empty() {
            return Err(ModelValidationError::EmptyDisplay(self.label.clone()));
        }
        Ok(())
    }
}

impl NoticeType {
    /// Initial `send` value for a setting that has never been stored.
    pub fn default_send(&self, medium: &NoticeMedium) -> bool {
        medium.default_sensitivity <= self.default_level
    }

    /// Form key addressing the (type, medium) cell of a settings table.
    pub fn form_key(&self, medium: &NoticeMedium) -> String {
        format!("{}_{}", self.label, medium.id)
    }
}
