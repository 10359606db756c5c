//! Notification domain model.
//!
//! # Responsibility
//! - Define the records shared by the preference matrix and notice lifecycle.
//! - Keep identity (`Actor`) and reference data (`NoticeType`, `NoticeMedium`)
//!   independent from storage details.
//!
//! # Invariants
//! - Exactly one `NoticeSetting` exists per (user, notice type, medium).
//! - A `Notice` belongs to exactly one recipient for its whole lifetime.

pub mod actor;
pub mod medium;
pub mod notice;
pub mod notice_type;
pub mod setting;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for domain records before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Notice type label is empty or contains unsupported characters.
    InvalidLabel(String),
    /// Medium id is empty or contains unsupported characters.
    InvalidMediumId(String),
    /// Display name must not be blank.
    EmptyDisplay(String),
    /// Notice message must not be blank.
    EmptyMessage,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLabel(label) => write!(f, "invalid notice type label `{label}`"),
            Self::InvalidMediumId(id) => write!(f, "invalid medium id `{id}`"),
            Self::EmptyDisplay(owner) => write!(f, "display name for `{owner}` cannot be empty"),
            Self::EmptyMessage => write!(f, "notice message cannot be empty"),
        }
    }
}

impl Error for ModelValidationError {}
