//! Notice record and its state transitions.
//!
//! # Invariants
//! - `recipient` never changes after creation.
//! - Transitions only move forward: unseen -> seen, active -> archived.
//! - Authorization is not checked here; services gate every mutation.
//! - Stored transitions go through `NoticeRepository`; `mark_seen` only
//!   mirrors the stored flag on an in-memory copy.

use crate::model::actor::UserId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a notice.
pub type NoticeId = Uuid;

/// Observable lifecycle state of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeState {
    ActiveUnseen,
    ActiveSeen,
    Archived,
}

/// One notification addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub recipient: UserId,
    /// Originating user, when the notice was caused by someone.
    pub sender: Option<UserId>,
    /// Label of the notice type.
    pub notice_type: String,
    pub message: String,
    /// Creation time in epoch milliseconds.
    pub added_at: i64,
    pub unseen: bool,
    pub archived: bool,
    /// Whether the notice is shown in the on-site inbox.
    pub on_site: bool,
}

impl Notice {
    /// Creates an unseen, active notice with a generated id.
    pub fn new(
        recipient: UserId,
        notice_type: impl Into<String>,
        message: impl Into<String>,
        added_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            sender: None,
            notice_type: notice_type.into(),
            message: message.into(),
            added_at,
            unseen: true,
            archived: false,
            on_site: true,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.message.trim().is_empty() {
            return Err(ModelValidationError::EmptyMessage);
        }
        Ok(())
    }

    pub fn state(&self) -> NoticeState {
        if self.archived {
            NoticeState::Archived
        } else if self.unseen {
            NoticeState::ActiveUnseen
        } else {
            NoticeState::ActiveSeen
        }
    }

    /// Marks the notice as seen. Returns `true` when the flag changed.
    pub fn mark_seen(&mut self) -> bool {
        let changed = self.unseen;
        self.unseen = false;
        changed
    }
}
