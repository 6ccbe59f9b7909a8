use rusqlite::Connection;
use std::env;
use std::fs;
use webpunch::config::{Config, migrate};
use webpunch::core::reconcile::PendingChanges;
use webpunch::db::initialize::init_db;
use webpunch::db::log::{load_log, ttlog};
use webpunch::db::migrate::PunchTable;
use webpunch::db::pending::{
    clear_local_state, load_pending, load_snapshot_cache, save_pending, save_snapshot_cache,
};
use webpunch::db::queries::insert_raw_punch;
use webpunch::models::punch::{PunchId, RawPunch};
use webpunch::store::{PunchStore, SqlitePunchStore};

mod common;
use common::{punch_in, punch_out, somewhere, utc};

#[test]
fn test_sqlite_store_save_update_delete() {
    let store = SqlitePunchStore::in_memory().unwrap();
    let mut p = punch_in("a", utc(2025, 6, 2, 9, 0));
    p.location = somewhere();

    assert!(store.save(&p).unwrap());
    p.is_flagged = true;
    assert!(store.update(&p).unwrap());
    assert!(!store.update(&punch_out("unknown", utc(2025, 6, 2, 17, 0))).unwrap());

    let rows = store.fetch_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].flagged, Some(1));
    assert_eq!(rows[0].latitude, Some(45.4642));

    assert!(store.delete(&PunchId::new("a")).unwrap());
    assert!(!store.delete(&PunchId::new("a")).unwrap());
    assert!(store.fetch_all().unwrap().is_empty());
}

#[test]
fn test_local_state_survives_reopen() {
    let mut path = env::temp_dir();
    path.push("webpunch_local_state.sqlite");
    fs::remove_file(&path).ok();

    {
        let mut conn = Connection::open(&path).unwrap();
        init_db(&conn).unwrap();

        let mut pending = PendingChanges::default();
        pending.insert(punch_in("local", utc(2025, 6, 2, 9, 0)));
        pending.mark_deleted(PunchId::new("gone"));
        save_pending(&mut conn, &pending).unwrap();
        save_snapshot_cache(&mut conn, &[punch_out("remote", utc(2025, 6, 1, 17, 0))]).unwrap();
    }

    let mut conn = Connection::open(&path).unwrap();
    // running the migrations again is harmless
    init_db(&conn).unwrap();

    let pending = load_pending(&conn).unwrap();
    assert_eq!(pending.inserted.len(), 1);
    assert_eq!(pending.inserted[0].id.as_str(), "local");
    assert!(pending.deleted.contains(&PunchId::new("gone")));
    assert_eq!(load_snapshot_cache(&conn).unwrap().len(), 1);

    clear_local_state(&mut conn).unwrap();
    assert!(load_pending(&conn).unwrap().is_empty());
    assert!(load_snapshot_cache(&conn).unwrap().is_empty());
}

#[test]
fn test_cached_rows_are_validated_on_load() {
    let conn = Connection::open_in_memory().unwrap();
    init_db(&conn).unwrap();

    insert_raw_punch(
        &conn,
        PunchTable::SnapshotCache,
        &RawPunch {
            id: Some("bad".into()),
            kind: Some("in".into()),
            at: Some("not a date".into()),
            ..RawPunch::default()
        },
    )
    .unwrap();

    assert!(load_snapshot_cache(&conn).unwrap().is_empty());
}

#[test]
fn test_internal_log_rows() {
    let conn = Connection::open_in_memory().unwrap();
    init_db(&conn).unwrap();

    ttlog(&conn, "in", "abc", "Punched In").unwrap();

    let rows = load_log(&conn).unwrap();
    assert!(rows.iter().any(|(_, _, op, _, _)| op == "migration_applied"));
    let last = rows.last().unwrap();
    assert_eq!(last.2, "in");
    assert_eq!(last.3, "abc");
    assert_eq!(last.4, "Punched In");
}

#[test]
fn test_config_check_fills_missing_keys() {
    let mut path = env::temp_dir();
    path.push("webpunch_partial.conf");
    fs::write(&path, "database: /tmp/somewhere.sqlite\nweek_start: Mon\n").unwrap();

    let missing = migrate::missing_keys(&path).unwrap();
    assert_eq!(missing, vec!["remote_store", "hours_alert"]);

    let added = migrate::check_and_fill(&path).unwrap();
    assert_eq!(added, vec!["remote_store", "hours_alert"]);
    assert!(migrate::check_and_fill(&path).unwrap().is_empty());

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.database, "/tmp/somewhere.sqlite");
    assert_eq!(cfg.hours_alert, "8h");
    assert_eq!(
        cfg.aggregate_options().unwrap().week_start,
        chrono::Weekday::Mon
    );
    fs::remove_file(&path).ok();
}

#[test]
fn test_config_rejects_bad_values() {
    let cfg = Config {
        hours_alert: "eight".into(),
        week_start: "Someday".into(),
        ..Config::default()
    };

    assert!(cfg.hours_alert().is_err());
    assert!(cfg.aggregate_options().is_err());
}
