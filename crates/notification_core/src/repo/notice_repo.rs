//! Notice persistence.
//!
//! # Responsibility
//! - Store notices and their unseen/archived flags.
//! - Serve per-recipient listings for inbox, bulk mark-seen and feed paths.
//!
//! # Invariants
//! - Each transition is one conditional `UPDATE` of its own flag; other
//!   flags and ownership columns are never rewritten.
//! - Listings are ordered by `added_at DESC, uuid ASC`.

use crate::model::actor::UserId;
use crate::model::notice::{Notice, NoticeId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult, TableShape,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const NOTICE_SHAPE: TableShape = (
    "notices",
    &[
        "uuid",
        "recipient_id",
        "sender_id",
        "notice_type_id",
        "message",
        "added_at",
        "unseen",
        "archived",
        "on_site",
    ],
);
const NOTICE_TYPE_SHAPE: TableShape = ("notice_types", &["id", "label"]);

const NOTICE_SELECT_SQL: &str = "SELECT
    n.uuid AS uuid,
    n.recipient_id AS recipient_id,
    n.sender_id AS sender_id,
    t.label AS notice_type,
    n.message AS message,
    n.added_at AS added_at,
    n.unseen AS unseen,
    n.archived AS archived,
    n.on_site AS on_site
FROM notices n
INNER JOIN notice_types t ON t.id = n.notice_type_id";

/// Filters for per-recipient notice listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeListQuery {
    pub recipient: UserId,
    /// Only notices that have not been seen yet.
    pub unseen_only: bool,
    /// Include archived notices; excluded by default.
    pub include_archived: bool,
    /// Only notices flagged for the on-site inbox.
    pub on_site_only: bool,
    pub limit: Option<u32>,
}

impl NoticeListQuery {
    /// Active notices of `recipient`, no further filtering.
    pub fn for_recipient(recipient: UserId) -> Self {
        Self {
            recipient,
            ..Self::default()
        }
    }
}

/// Repository interface for notices.
pub trait NoticeRepository {
    /// Inserts a notice; its `notice_type` label must be registered.
    fn create_notice(&self, notice: &Notice) -> RepoResult<NoticeId>;
    fn get_notice(&self, id: NoticeId) -> RepoResult<Option<Notice>>;
    fn list_notices(&self, query: &NoticeListQuery) -> RepoResult<Vec<Notice>>;
    /// Clears `unseen`. Returns `false` when already seen or missing.
    fn mark_notice_seen(&self, id: NoticeId) -> RepoResult<bool>;
    /// Sets `archived`. Returns `false` when already archived or missing.
    fn archive_notice(&self, id: NoticeId) -> RepoResult<bool>;
    fn delete_notice(&self, id: NoticeId) -> RepoResult<()>;
    /// Counts unseen notices of `recipient`, archived ones included.
    fn unseen_count(&self, recipient: UserId) -> RepoResult<u64>;
}

/// SQLite-backed notice repository.
pub struct SqliteNoticeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoticeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[NOTICE_TYPE_SHAPE, NOTICE_SHAPE])?;
        Ok(Self { conn })
    }
}

impl NoticeRepository for SqliteNoticeRepository<'_> {
    fn create_notice(&self, notice: &Notice) -> RepoResult<NoticeId> {
        notice.validate()?;

        let notice_type_id: i64 = self
            .conn
            .query_row(
                "SELECT id FROM notice_types WHERE label = ?1;",
                [notice.notice_type.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepoError::NoticeTypeNotFound(notice.notice_type.clone()))?;

        self.conn.execute(
            "INSERT INTO notices (
                uuid,
                recipient_id,
                sender_id,
                notice_type_id,
                message,
                added_at,
                unseen,
                archived,
                on_site
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                notice.id.to_string(),
                notice.recipient,
                notice.sender,
                notice_type_id,
                notice.message.as_str(),
                notice.added_at,
                bool_to_int(notice.unseen),
                bool_to_int(notice.archived),
                bool_to_int(notice.on_site),
            ],
        )?;

        Ok(notice.id)
    }

    fn get_notice(&self, id: NoticeId) -> RepoResult<Option<Notice>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTICE_SELECT_SQL} WHERE n.uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_notice_row(row)?));
        }
        Ok(None)
    }

    fn list_notices(&self, query: &NoticeListQuery) -> RepoResult<Vec<Notice>> {
        let mut sql = format!("{NOTICE_SELECT_SQL} WHERE n.recipient_id = ?");
        let mut bind_values = vec![Value::Integer(query.recipient)];

        if query.unseen_only {
            sql.push_str(" AND n.unseen = 1");
        }
        if !query.include_archived {
            sql.push_str(" AND n.archived = 0");
        }
        if query.on_site_only {
            sql.push_str(" AND n.on_site = 1");
        }

        sql.push_str(" ORDER BY n.added_at DESC, n.uuid ASC");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notices = Vec::new();
        while let Some(row) = rows.next()? {
            notices.push(parse_notice_row(row)?);
        }
        Ok(notices)
    }

    fn mark_notice_seen(&self, id: NoticeId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notices SET unseen = 0 WHERE uuid = ?1 AND unseen = 1;",
            [id.to_string()],
        )?;
        Ok(changed == 1)
    }

    fn archive_notice(&self, id: NoticeId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notices SET archived = 1 WHERE uuid = ?1 AND archived = 0;",
            [id.to_string()],
        )?;
        Ok(changed == 1)
    }

    fn delete_notice(&self, id: NoticeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notices WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn unseen_count(&self, recipient: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM notices
             WHERE recipient_id = ?1
               AND unseen = 1;",
            [recipient],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative unseen count `{count}`")))
    }
}

fn parse_notice_row(row: &Row<'_>) -> RepoResult<Notice> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notices.uuid"))
    })?;

    Ok(Notice {
        id,
        recipient: row.get("recipient_id")?,
        sender: row.get("sender_id")?,
        notice_type: row.get("notice_type")?,
        message: row.get("message")?,
        added_at: row.get("added_at")?,
        unseen: int_to_bool(row.get("unseen")?, "notices.unseen")?,
        archived: int_to_bool(row.get("archived")?, "notices.archived")?,
        on_site: int_to_bool(row.get("on_site")?, "notices.on_site")?,
    })
}
