use notification_core::db::open_db_in_memory;
use notification_core::{
    build_settings, NewNoticeType, NoticeMedium, NoticeType, NoticeTypeRepository,
    NotificationConfig, SettingRepository, SettingsService, SettingsSubmission,
    SqliteNoticeTypeRepository, SqliteSettingRepository,
};
use rusqlite::Connection;

const USER: i64 = 42;

fn register_types(conn: &Connection) -> Vec<NoticeType> {
    let repo = SqliteNoticeTypeRepository::try_new(conn).unwrap();
    repo.upsert_notice_type(&NewNoticeType::new("type_a", "Type A", "first", 2))
        .unwrap();
    repo.upsert_notice_type(&NewNoticeType::new("type_b", "Type B", "second", 1))
        .unwrap();
    repo.list_notice_types().unwrap()
}

fn media() -> Vec<NoticeMedium> {
    vec![NoticeMedium::email(), NoticeMedium::site()]
}

#[test]
fn fresh_user_gets_one_row_per_type_with_storage_defaults() {
    let conn = open_db_in_memory().unwrap();
    let notice_types = register_types(&conn);
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();

    let table = build_settings(&settings, USER, &notice_types, &media(), None).unwrap();

    assert_eq!(table.column_headers, vec!["Email", "Site"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].notice_type.label, "type_a");
    assert_eq!(table.rows[1].notice_type.label, "type_b");
    for row in &table.rows {
        assert_eq!(row.cells.len(), 2);
    }

    // email sensitivity 2, site sensitivity 1
    assert!(table.cell("type_a_email").unwrap().send);
    assert!(table.cell("type_a_site").unwrap().send);
    assert!(!table.cell("type_b_email").unwrap().send);
    assert!(table.cell("type_b_site").unwrap().send);
}

#[test]
fn submission_with_single_checkbox_turns_everything_else_off() {
    let conn = open_db_in_memory().unwrap();
    let notice_types = register_types(&conn);
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();
    let submission = SettingsSubmission::from_form([("type_a_email", "on")]);

    let table = build_settings(&settings, USER, &notice_types, &media(), Some(&submission)).unwrap();

    let enabled: Vec<&str> = table
        .rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .filter(|cell| cell.send)
        .map(|cell| cell.form_key.as_str())
        .collect();
    assert_eq!(enabled, vec!["type_a_email"]);
    let disabled = table
        .rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .filter(|cell| !cell.send)
        .count();
    assert_eq!(disabled, 3);
}

#[test]
fn submitted_values_are_persisted_before_returning() {
    let conn = open_db_in_memory().unwrap();
    let notice_types = register_types(&conn);
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();
    let submission = SettingsSubmission::from_flags([
        ("type_a_site", true),
        ("type_b_email", true),
        ("type_b_site", false),
    ]);

    build_settings(&settings, USER, &notice_types, &media(), Some(&submission)).unwrap();

    let expected = [
        (&notice_types[0], "email", false),
        (&notice_types[0], "site", true),
        (&notice_types[1], "email", true),
        (&notice_types[1], "site", false),
    ];
    for (notice_type, medium_id, send) in expected {
        let stored = settings
            .get_setting(USER, notice_type.id, medium_id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.send, send, "{}_{medium_id}", notice_type.label);
    }
}

#[test]
fn rebuilding_without_submission_keeps_stored_values() {
    let conn = open_db_in_memory().unwrap();
    let notice_types = register_types(&conn);
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();
    let submission = SettingsSubmission::from_flags([("type_b_email", true)]);

    build_settings(&settings, USER, &notice_types, &media(), Some(&submission)).unwrap();
    let table = build_settings(&settings, USER, &notice_types, &media(), None).unwrap();

    assert!(table.cell("type_b_email").unwrap().send);
    assert!(!table.cell("type_a_email").unwrap().send);
}

#[test]
fn settings_are_isolated_per_user() {
    let conn = open_db_in_memory().unwrap();
    let notice_types = register_types(&conn);
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();

    build_settings(
        &settings,
        USER,
        &notice_types,
        &media(),
        Some(&SettingsSubmission::default()),
    )
    .unwrap();
    let other = build_settings(&settings, USER + 1, &notice_types, &media(), None).unwrap();

    assert!(other.cell("type_a_email").unwrap().send);
}

#[test]
fn get_or_create_keeps_one_row_per_triple() {
    let conn = open_db_in_memory().unwrap();
    let notice_types = register_types(&conn);
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();
    let email = NoticeMedium::email();

    settings
        .get_or_create_setting(USER, &notice_types[0], &email)
        .unwrap();
    settings
        .get_or_create_setting(USER, &notice_types[0], &email)
        .unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM notice_settings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn empty_notice_type_list_yields_headers_only() {
    let conn = open_db_in_memory().unwrap();
    let settings = SqliteSettingRepository::try_new(&conn).unwrap();

    let table = build_settings(&settings, USER, &[], &media(), None).unwrap();

    assert_eq!(table.column_headers.len(), 2);
    assert!(table.rows.is_empty());
}

#[test]
fn service_uses_configured_media_and_answers_should_send() {
    let conn = open_db_in_memory().unwrap();
    register_types(&conn);
    let config = NotificationConfig::from_json_str(
        r#"{"media": [{"id": "sms", "display": "Text message", "default_sensitivity": 3}]}"#,
    )
    .unwrap();
    let service = SettingsService::new(
        SqliteNoticeTypeRepository::try_new(&conn).unwrap(),
        SqliteSettingRepository::try_new(&conn).unwrap(),
        &config,
    );

    let table = service.settings_table(USER, None).unwrap();
    assert_eq!(table.column_headers, vec!["Text message"]);
    assert!(!table.cell("type_a_sms").unwrap().send);

    let submission = SettingsSubmission::from_form([("type_a_sms", "on")]);
    service.settings_table(USER, Some(&submission)).unwrap();
    assert!(service.should_send(USER, "type_a", "sms").unwrap());
    assert!(!service.should_send(USER, "type_b", "sms").unwrap());
    assert!(!service.should_send(USER, "type_a", "email").unwrap());
    assert!(!service.should_send(USER, "missing", "sms").unwrap());
}

#[test]
fn upsert_notice_type_updates_existing_label() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoticeTypeRepository::try_new(&conn).unwrap();

    let first = repo
        .upsert_notice_type(&NewNoticeType::new("friend_invite", "Invite", "", 2))
        .unwrap();
    let second = repo
        .upsert_notice_type(&NewNoticeType::new("friend_invite", "Invitation", "sent", 3))
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.display, "Invitation");
    assert_eq!(second.default_level, 3);
    assert_eq!(repo.list_notice_types().unwrap().len(), 1);
    assert!(repo
        .upsert_notice_type(&NewNoticeType::new("Bad Label", "x", "", 2))
        .is_err());
}
