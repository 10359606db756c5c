use notification_core::db::open_db;
use notification_core::{
    Actor, NewNoticeType, Notice, NoticeId, NoticeListQuery, NoticeRepository, NoticeService,
    NoticeTypeRepository, NotificationConfig, RepoResult, SqliteNoticeRepository,
    SqliteNoticeTypeRepository, UserId,
};
use rusqlite::Connection;
use std::cell::Cell;
use std::path::Path;

const BOB: i64 = 2;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Interleave {
    ArchiveAfterList,
    MarkSeenAfterGet,
}

/// Repository whose reads are followed, once, by a write from another connection.
struct InterleavedRepo<'conn> {
    inner: SqliteNoticeRepository<'conn>,
    other: SqliteNoticeRepository<'conn>,
    action: Interleave,
    fired: Cell<bool>,
}

impl InterleavedRepo<'_> {
    fn fire(&self, id: NoticeId, when: Interleave) {
        if self.fired.get() || self.action != when {
            return;
        }
        self.fired.set(true);
        match self.action {
            Interleave::ArchiveAfterList => assert!(self.other.archive_notice(id).unwrap()),
            Interleave::MarkSeenAfterGet => assert!(self.other.mark_notice_seen(id).unwrap()),
        }
    }
}

impl NoticeRepository for InterleavedRepo<'_> {
    fn create_notice(&self, notice: &Notice) -> RepoResult<NoticeId> {
        self.inner.create_notice(notice)
    }

    fn get_notice(&self, id: NoticeId) -> RepoResult<Option<Notice>> {
        let found = self.inner.get_notice(id)?;
        self.fire(id, Interleave::MarkSeenAfterGet);
        Ok(found)
    }

    fn list_notices(&self, query: &NoticeListQuery) -> RepoResult<Vec<Notice>> {
        let notices = self.inner.list_notices(query)?;
        if let Some(first) = notices.first() {
            self.fire(first.id, Interleave::ArchiveAfterList);
        }
        Ok(notices)
    }

    fn mark_notice_seen(&self, id: NoticeId) -> RepoResult<bool> {
        self.inner.mark_notice_seen(id)
    }

    fn archive_notice(&self, id: NoticeId) -> RepoResult<bool> {
        self.inner.archive_notice(id)
    }

    fn delete_notice(&self, id: NoticeId) -> RepoResult<()> {
        self.inner.delete_notice(id)
    }

    fn unseen_count(&self, recipient: UserId) -> RepoResult<u64> {
        self.inner.unseen_count(recipient)
    }
}

fn seed(path: &Path) -> NoticeId {
    let conn = open_db(path).unwrap();
    SqliteNoticeTypeRepository::try_new(&conn)
        .unwrap()
        .upsert_notice_type(&NewNoticeType::new("comment_posted", "Comment", "", 2))
        .unwrap();
    SqliteNoticeRepository::try_new(&conn)
        .unwrap()
        .create_notice(&Notice::new(BOB, "comment_posted", "new comment", 1_000))
        .unwrap()
}

fn reload(conn: &Connection, id: NoticeId) -> Notice {
    SqliteNoticeRepository::try_new(conn)
        .unwrap()
        .get_notice(id)
        .unwrap()
        .unwrap()
}

#[test]
fn mark_all_seen_keeps_archive_written_by_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notification.db");
    let id = seed(&path);
    let request_conn = open_db(&path).unwrap();
    let other_conn = open_db(&path).unwrap();
    let repo = InterleavedRepo {
        inner: SqliteNoticeRepository::try_new(&request_conn).unwrap(),
        other: SqliteNoticeRepository::try_new(&other_conn).unwrap(),
        action: Interleave::ArchiveAfterList,
        fired: Cell::new(false),
    };
    let service = NoticeService::new(repo, &NotificationConfig::default());

    let completion = service.mark_all_seen(Actor::user(BOB)).unwrap();

    assert_eq!(completion.affected, 1);
    let stored = reload(&request_conn, id);
    assert!(!stored.unseen);
    assert!(stored.archived);
}

#[test]
fn archive_keeps_mark_seen_written_by_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notification.db");
    let id = seed(&path);
    let request_conn = open_db(&path).unwrap();
    let other_conn = open_db(&path).unwrap();
    let repo = InterleavedRepo {
        inner: SqliteNoticeRepository::try_new(&request_conn).unwrap(),
        other: SqliteNoticeRepository::try_new(&other_conn).unwrap(),
        action: Interleave::MarkSeenAfterGet,
        fired: Cell::new(false),
    };
    let service = NoticeService::new(repo, &NotificationConfig::default());

    let completion = service.archive(Actor::user(BOB), id, None).unwrap();

    assert!(completion.applied());
    let stored = reload(&request_conn, id);
    assert!(stored.archived);
    assert!(!stored.unseen);
}

#[test]
fn transition_updates_report_whether_they_changed_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notification.db");
    let id = seed(&path);
    let conn = open_db(&path).unwrap();
    let repo = SqliteNoticeRepository::try_new(&conn).unwrap();

    assert!(repo.mark_notice_seen(id).unwrap());
    assert!(!repo.mark_notice_seen(id).unwrap());
    assert!(repo.archive_notice(id).unwrap());
    assert!(!repo.archive_notice(id).unwrap());
    assert!(!repo.archive_notice(NoticeId::new_v4()).unwrap());
}
