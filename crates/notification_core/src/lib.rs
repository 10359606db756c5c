//! Notification preference and delivery-state engine.
//!
//! Builds per-user delivery settings matrices and governs the seen/archived
//! lifecycle of notices. HTTP routing, authentication and rendering belong to
//! the calling web layer.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, LoggingConfig, NotificationConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::actor::{Actor, UserId};
pub use model::medium::NoticeMedium;
pub use model::notice::{Notice, NoticeId, NoticeState};
pub use model::notice_type::{NewNoticeType, NoticeType, NoticeTypeId};
pub use model::setting::NoticeSetting;
pub use model::ModelValidationError;
pub use repo::notice_repo::{NoticeListQuery, NoticeRepository, SqliteNoticeRepository};
pub use repo::notice_type_repo::{NoticeTypeRepository, SqliteNoticeTypeRepository};
pub use repo::setting_repo::{SettingRepository, SqliteSettingRepository};
pub use repo::{RepoError, RepoResult};
pub use service::notice_service::{Completion, NoticeService, NoticeServiceError};
pub use service::overview::{notices_overview, NoticesOverview};
pub use service::settings_service::{
    build_settings, SettingsCell, SettingsRow, SettingsService, SettingsSubmission, SettingsTable,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
