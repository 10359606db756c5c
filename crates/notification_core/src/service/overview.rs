//! Notices page composition.
//!
//! Gathers the on-site inbox, the notice type catalog and the settings matrix
//! for one user in a single read model.

use crate::model::actor::Actor;
use crate::model::notice::Notice;
use crate::model::notice_type::NoticeType;
use crate::repo::notice_repo::{NoticeListQuery, NoticeRepository};
use crate::repo::notice_type_repo::NoticeTypeRepository;
use crate::repo::setting_repo::SettingRepository;
use crate::service::notice_service::{NoticeService, NoticeServiceError};
use crate::service::settings_service::{SettingsService, SettingsSubmission, SettingsTable};
use serde::Serialize;

/// Read model consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticesOverview {
    /// Active on-site notices, newest first.
    pub notices: Vec<Notice>,
    pub notice_types: Vec<NoticeType>,
    pub notice_settings: SettingsTable,
    pub unseen_count: u64,
}

/// Builds the overview for `actor`, applying `submission` to settings first.
pub fn notices_overview<R, T, S>(
    notices: &NoticeService<R>,
    settings: &SettingsService<T, S>,
    actor: Actor,
    submission: Option<&SettingsSubmission>,
) -> Result<NoticesOverview, NoticeServiceError>
where
    R: NoticeRepository,
    T: NoticeTypeRepository,
    S: SettingRepository,
{
    let notice_settings = settings.settings_table(actor.user_id, submission)?;
    let notice_types = settings.notice_types()?;
    let query = NoticeListQuery {
        on_site_only: true,
        ..NoticeListQuery::for_recipient(actor.user_id)
    };

    Ok(NoticesOverview {
        notices: notices.notices_for(&query)?,
        notice_types,
        notice_settings,
        unseen_count: notices.unseen_count(actor.user_id)?,
    })
}
