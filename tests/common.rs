#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::env;
use std::fs;
use std::path::PathBuf;
use webpunch::models::location::GeoLocation;
use webpunch::models::punch::{PunchId, PunchRecord};
use webpunch::models::punch_kind::PunchKind;

/// Files used by one CLI test: local database, punch store and a private
/// HOME so the user's real configuration is never read.
pub struct TestEnv {
    pub db: String,
    pub store: String,
    pub home: String,
}

/// Create unique test paths inside the system temp dir and remove any
/// existing files.
pub fn setup_test_env(name: &str) -> TestEnv {
    let mut base: PathBuf = env::temp_dir();
    base.push(format!("webpunch_{}", name));
    fs::remove_dir_all(&base).ok();
    fs::create_dir_all(&base).expect("create test dir");

    TestEnv {
        db: base.join("local.sqlite").to_string_lossy().to_string(),
        store: base.join("store.sqlite").to_string_lossy().to_string(),
        home: base.to_string_lossy().to_string(),
    }
}

impl TestEnv {
    /// `webpunch --db … --store … --now …` with a pinned UTC clock.
    pub fn wp(&self, now: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("webpunch");
        cmd.env("HOME", &self.home)
            .env("TZ", "UTC")
            .args(["--db", &self.db, "--store", &self.store, "--now", now]);
        cmd
    }

    pub fn init(&self) {
        self.wp("2025-06-02 08:00")
            .args(["--test", "init"])
            .assert()
            .success();
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn fixed(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
}

pub fn punch(id: &str, kind: PunchKind, at: DateTime<Utc>) -> PunchRecord {
    PunchRecord::with_id(PunchId::new(id), kind, at, None)
}

pub fn punch_in(id: &str, at: DateTime<Utc>) -> PunchRecord {
    punch(id, PunchKind::In, at)
}

pub fn punch_out(id: &str, at: DateTime<Utc>) -> PunchRecord {
    punch(id, PunchKind::Out, at)
}

pub fn linked(mut a: PunchRecord, b: &PunchRecord) -> PunchRecord {
    a.paired_id = Some(b.id.clone());
    a
}

pub fn somewhere() -> Option<GeoLocation> {
    Some(GeoLocation::new(45.4642, 9.19).unwrap())
}
