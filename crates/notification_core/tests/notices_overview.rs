use notification_core::db::open_db_in_memory;
use notification_core::{
    notices_overview, Actor, NewNoticeType, Notice, NoticeRepository, NoticeService,
    NoticeTypeRepository, NotificationConfig, SettingsService, SettingsSubmission,
    SqliteNoticeRepository, SqliteNoticeTypeRepository, SqliteSettingRepository,
};

const BOB: i64 = 2;

#[test]
fn overview_combines_inbox_catalog_and_settings() {
    let conn = open_db_in_memory().unwrap();
    let config = NotificationConfig::default();
    let types = SqliteNoticeTypeRepository::try_new(&conn).unwrap();
    types
        .upsert_notice_type(&NewNoticeType::new("friend_invite", "Invitation", "", 2))
        .unwrap();
    let repo = SqliteNoticeRepository::try_new(&conn).unwrap();
    let visible = Notice::new(BOB, "friend_invite", "join me", 2_000);
    let mut hidden = Notice::new(BOB, "friend_invite", "email copy", 1_000);
    hidden.on_site = false;
    repo.create_notice(&visible).unwrap();
    repo.create_notice(&hidden).unwrap();

    let notices = NoticeService::new(repo, &config);
    let settings = SettingsService::new(
        types,
        SqliteSettingRepository::try_new(&conn).unwrap(),
        &config,
    );
    let submission = SettingsSubmission::from_form([("friend_invite_site", "on")]);

    let overview =
        notices_overview(&notices, &settings, Actor::user(BOB), Some(&submission)).unwrap();

    assert_eq!(overview.notices.len(), 1);
    assert_eq!(overview.notices[0].id, visible.id);
    assert_eq!(overview.notice_types.len(), 1);
    assert_eq!(overview.notice_settings.column_headers, vec!["Email", "Site"]);
    assert!(!overview.notice_settings.cell("friend_invite_email").unwrap().send);
    assert!(overview.notice_settings.cell("friend_invite_site").unwrap().send);
    assert_eq!(overview.unseen_count, 2);
}
