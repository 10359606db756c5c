//! Delivery preference persistence.
//!
//! # Invariants
//! - `UNIQUE(user_id, notice_type_id, medium)` keeps one row per triple.
//! - `get_or_create_setting` never overwrites an existing row.
//! - The default for a new row comes from `NoticeType::default_send`.

use crate::model::actor::UserId;
use crate::model::medium::NoticeMedium;
use crate::model::notice_type::{NoticeType, NoticeTypeId};
use crate::model::setting::NoticeSetting;
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult, TableShape,
};
use rusqlite::{params, Connection, OptionalExtension};

const SETTING_SHAPE: TableShape = (
    "notice_settings",
    &["user_id", "notice_type_id", "medium", "send"],
);

/// Repository interface for per-user delivery settings.
pub trait SettingRepository {
    /// Reads the setting, creating it with the storage default when absent.
    fn get_or_create_setting(
        &self,
        user_id: UserId,
        notice_type: &NoticeType,
        medium: &NoticeMedium,
    ) -> RepoResult<NoticeSetting>;
    fn get_setting(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium_id: &str,
    ) -> RepoResult<Option<NoticeSetting>>;
    /// Persists `send` for the setting's triple.
    fn save_setting(&self, setting: &NoticeSetting) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[SETTING_SHAPE])?;
        Ok(Self { conn })
    }
}

impl SettingRepository for SqliteSettingRepository<'_> {
    fn get_or_create_setting(
        &self,
        user_id: UserId,
        notice_type: &NoticeType,
        medium: &NoticeMedium,
    ) -> RepoResult<NoticeSetting> {
        self.conn.execute(
            "INSERT OR IGNORE INTO notice_settings (user_id, notice_type_id, medium, send)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user_id,
                notice_type.id,
                medium.id.as_str(),
                bool_to_int(notice_type.default_send(medium)),
            ],
        )?;

        self.get_setting(user_id, notice_type.id, &medium.id)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "setting for user {user_id} type {} medium {} missing after insert",
                    notice_type.label, medium.id
                ))
            })
    }

    fn get_setting(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium_id: &str,
    ) -> RepoResult<Option<NoticeSetting>> {
        let send = self
            .conn
            .query_row(
                "SELECT send
                 FROM notice_settings
                 WHERE user_id = ?1
                   AND notice_type_id = ?2
                   AND medium = ?3;",
                params![user_id, notice_type_id, medium_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        match send {
            Some(value) => Ok(Some(NoticeSetting {
                user_id,
                notice_type_id,
                medium_id: medium_id.to_string(),
                send: int_to_bool(value, "notice_settings.send")?,
            })),
            None => Ok(None),
        }
    }

    fn save_setting(&self, setting: &NoticeSetting) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO notice_settings (user_id, notice_type_id, medium, send)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, notice_type_id, medium) DO UPDATE SET
                send = excluded.send;",
            params![
                setting.user_id,
                setting.notice_type_id,
                setting.medium_id.as_str(),
                bool_to_int(setting.send),
            ],
        )?;
        Ok(())
    }
}
