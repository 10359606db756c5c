//! Notice type registry persistence.
//!
//! # Invariants
//! - `label` is unique; registering an existing label updates it in place.
//! - Listing order is registration order (`id ASC`).

use crate::model::notice_type::{NewNoticeType, NoticeType};
use crate::repo::{ensure_connection_ready, RepoResult, TableShape};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTICE_TYPE_SHAPE: TableShape = (
    "notice_types",
    &["id", "label", "display", "description", "default_level"],
);

const NOTICE_TYPE_SELECT_SQL: &str = "SELECT
    id,
    label,
    display,
    description,
    default_level
FROM notice_types";

/// Repository interface for notice type reference data.
pub trait NoticeTypeRepository {
    /// Creates the notice type, or updates display fields of an existing label.
    fn upsert_notice_type(&self, notice_type: &NewNoticeType) -> RepoResult<NoticeType>;
    fn get_notice_type(&self, label: &str) -> RepoResult<Option<NoticeType>>;
    fn list_notice_types(&self) -> RepoResult<Vec<NoticeType>>;
}

/// SQLite-backed notice type repository.
pub struct SqliteNoticeTypeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoticeTypeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[NOTICE_TYPE_SHAPE])?;
        Ok(Self { conn })
    }
}

impl NoticeTypeRepository for SqliteNoticeTypeRepository<'_> {
    fn upsert_notice_type(&self, notice_type: &NewNoticeType) -> RepoResult<NoticeType> {
        notice_type.validate()?;

        let stored = self.conn.query_row(
            "INSERT INTO notice_types (label, display, description, default_level)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (label) DO UPDATE SET
                display = excluded.display,
                description = excluded.description,
                default_level = excluded.default_level
             RETURNING id, label, display, description, default_level;",
            params![
                notice_type.label.as_str(),
                notice_type.display.as_str(),
                notice_type.description.as_str(),
                notice_type.default_level,
            ],
            parse_notice_type_row,
        )?;
        Ok(stored)
    }

    fn get_notice_type(&self, label: &str) -> RepoResult<Option<NoticeType>> {
        let found = self
            .conn
            .query_row(
                &format!("{NOTICE_TYPE_SELECT_SQL} WHERE label = ?1;"),
                [label],
                parse_notice_type_row,
            )
            .optional()?;
        Ok(found)
    }

    fn list_notice_types(&self) -> RepoResult<Vec<NoticeType>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTICE_TYPE_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_notice_type_row)?;
        let notice_types = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(notice_types)
    }
}

fn parse_notice_type_row(row: &Row<'_>) -> rusqlite::Result<NoticeType> {
    Ok(NoticeType {
        id: row.get("id")?,
        label: row.get("label")?,
        display: row.get("display")?,
        description: row.get("description")?,
        default_level: row.get("default_level")?,
    })
}
