//! Preference matrix builder.
//!
//! # Responsibility
//! - Enumerate notice types x delivery media for one user.
//! - Lazily create missing settings and apply a submitted batch of toggles.
//! - Produce the renderable `SettingsTable`.
//!
//! # Invariants
//! - Rows follow notice type order, cells follow medium order.
//! - With a submission present, every cell is written before the table is
//!   returned; keys missing from the submission are stored as off.
//! - Each cell is persisted on its own; there is no batch transaction.

use crate::config::NotificationConfig;
use crate::model::actor::UserId;
use crate::model::medium::NoticeMedium;
use crate::model::notice_type::NoticeType;
use crate::repo::notice_type_repo::NoticeTypeRepository;
use crate::repo::setting_repo::SettingRepository;
use crate::repo::RepoResult;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// Form value that marks a checkbox as checked.
const CHECKED_FORM_VALUE: &str = "on";

/// Submitted batch of settings toggles, keyed by `{label}_{medium_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSubmission {
    enabled: BTreeSet<String>,
}

impl SettingsSubmission {
    /// Builds a submission from raw form fields; only `"on"` counts as checked.
    pub fn from_form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let enabled = fields
            .into_iter()
            .filter_map(|(key, value)| {
                (value.as_ref() == CHECKED_FORM_VALUE).then(|| key.into())
            })
            .collect();
        Self { enabled }
    }

    /// Builds a submission from explicit on/off flags.
    pub fn from_flags<I, K>(flags: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let enabled = flags
            .into_iter()
            .filter_map(|(key, on)| on.then(|| key.into()))
            .collect();
        Self { enabled }
    }

    pub fn is_enabled(&self, form_key: &str) -> bool {
        self.enabled.contains(form_key)
    }
}

/// One (form key, send) cell aligned to a column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsCell {
    pub form_key: String,
    pub send: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsRow {
    pub notice_type: NoticeType,
    pub cells: Vec<SettingsCell>,
}

/// Renderable settings matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsTable {
    /// Medium display names in column order.
    pub column_headers: Vec<String>,
    pub rows: Vec<SettingsRow>,
}

impl SettingsTable {
    /// Looks up a cell by its form key.
    pub fn cell(&self, form_key: &str) -> Option<&SettingsCell> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .find(|cell| cell.form_key == form_key)
    }
}

/// Builds the settings matrix for `user_id`, applying `submission` when present.
///
/// # Errors
/// - Propagates storage failures; cells written before the failure stay
///   written.
pub fn build_settings<S: SettingRepository>(
    settings: &S,
    user_id: UserId,
    notice_types: &[NoticeType],
    media: &[NoticeMedium],
    submission: Option<&SettingsSubmission>,
) -> RepoResult<SettingsTable> {
    let column_headers = media.iter().map(|medium| medium.display.clone()).collect();
    let mut rows = Vec::with_capacity(notice_types.len());
    let mut updated_cells = 0usize;

    for notice_type in notice_types {
        let mut cells = Vec::with_capacity(media.len());
        for medium in media {
            let form_key = notice_type.form_key(medium);
            let mut setting = settings.get_or_create_setting(user_id, notice_type, medium)?;
            if let Some(submission) = submission {
                setting.send = submission.is_enabled(&form_key);
                settings.save_setting(&setting)?;
                updated_cells += 1;
                debug!(
                    "event=setting_save module=service status=ok user_id={} form_key={} send={}",
                    user_id, form_key, setting.send
                );
            }
            cells.push(SettingsCell {
                form_key,
                send: setting.send,
            });
        }
        rows.push(SettingsRow {
            notice_type: notice_type.clone(),
            cells,
        });
    }

    info!(
        "event=settings_build module=service status=ok user_id={} rows={} columns={} updated_cells={}",
        user_id,
        rows.len(),
        media.len(),
        updated_cells
    );

    Ok(SettingsTable {
        column_headers,
        rows,
    })
}

/// Settings use-cases bound to the configured media catalog.
pub struct SettingsService<T: NoticeTypeRepository, S: SettingRepository> {
    notice_types: T,
    settings: S,
    config: NotificationConfig,
}

impl<T: NoticeTypeRepository, S: SettingRepository> SettingsService<T, S> {
    pub fn new(notice_types: T, settings: S, config: &NotificationConfig) -> Self {
        Self {
            notice_types,
            settings,
            config: config.clone(),
        }
    }

    /// Registered notice types in registration order.
    pub fn notice_types(&self) -> RepoResult<Vec<NoticeType>> {
        self.notice_types.list_notice_types()
    }

    /// Builds the full settings table for `user_id`.
    pub fn settings_table(
        &self,
        user_id: UserId,
        submission: Option<&SettingsSubmission>,
    ) -> RepoResult<SettingsTable> {
        let notice_types = self.notice_types.list_notice_types()?;
        build_settings(
            &self.settings,
            user_id,
            &notice_types,
            &self.config.media,
            submission,
        )
    }

    /// Returns whether `user_id` wants notices of `label` delivered via `medium_id`.
    ///
    /// Unknown labels or media are never delivered.
    pub fn should_send(&self, user_id: UserId, label: &str, medium_id: &str) -> RepoResult<bool> {
        let Some(medium) = self.config.medium(medium_id) else {
            return Ok(false);
        };
        let Some(notice_type) = self.notice_types.get_notice_type(label)? else {
            return Ok(false);
        };
        let setting = self
            .settings
            .get_or_create_setting(user_id, &notice_type, medium)?;
        Ok(setting.send)
    }
}

#[cfg(test)]
mod tests {
    use super::SettingsSubmission;

    #[test]
    fn form_submission_only_accepts_on_values() {
        let submission = SettingsSubmission::from_form([
            ("friend_invite_email", "on"),
            ("friend_invite_site", "off"),
            ("friend_accept_email", ""),
        ]);
        assert!(submission.is_enabled("friend_invite_email"));
        assert!(!submission.is_enabled("friend_invite_site"));
        assert!(!submission.is_enabled("friend_accept_email"));
        assert!(!submission.is_enabled("unknown_email"));
    }

    #[test]
    fn flag_submission_keeps_true_entries() {
        let submission = SettingsSubmission::from_flags([
            ("a_email".to_string(), true),
            ("a_site".to_string(), false),
        ]);
        assert!(submission.is_enabled("a_email"));
        assert!(!submission.is_enabled("a_site"));
    }
}
