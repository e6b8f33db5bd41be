//! SQL schema for the camp SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS camps (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    moniker     TEXT    NOT NULL UNIQUE,
    name        TEXT    NOT NULL,
    description TEXT,
    location    TEXT,
    length      INTEGER NOT NULL DEFAULT 0,
    event_date  TEXT             -- YYYY-MM-DD or NULL
);

-- Speakers go away with their camp.
CREATE TABLE IF NOT EXISTS speakers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    camp_id       INTEGER NOT NULL REFERENCES camps(id) ON DELETE CASCADE,
    name          TEXT    NOT NULL,
    company_name  TEXT,
    phone_number  TEXT,
    website_url   TEXT,
    twitter_name  TEXT,
    github_name   TEXT,
    bio           TEXT,
    head_shot_url TEXT
);

CREATE INDEX IF NOT EXISTS speakers_camp_idx ON speakers(camp_id);

PRAGMA user_version = 1;
";
