//! SQL schema for the InsightMaster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id           TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    email             TEXT NOT NULL UNIQUE,
    password_hash     TEXT NOT NULL,   -- argon2 PHC string
    role              TEXT NOT NULL DEFAULT 'user',
    status            TEXT NOT NULL DEFAULT 'active',
    profile_image_url TEXT,
    bio               TEXT,
    created_at        TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at        TEXT NOT NULL,
    last_login_at     TEXT
);

-- Articles embed their insight arrays as JSON, mirroring the document
-- shape of the domain model. No separate insights table exists.
CREATE TABLE IF NOT EXISTS articles (
    article_id   TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    title        TEXT NOT NULL,
    content      TEXT NOT NULL,
    url          TEXT,
    author       TEXT,
    source       TEXT,
    category     TEXT,
    published_at TEXT,
    image_url    TEXT,
    status       TEXT NOT NULL DEFAULT 'draft',
    tags         TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    reading_time INTEGER NOT NULL DEFAULT 1,
    insights     TEXT NOT NULL DEFAULT '[]',  -- JSON array of UserInsight
    ai_insights  TEXT,                        -- JSON array of InsightPoint
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    analyzed_at  TEXT
);

CREATE INDEX IF NOT EXISTS articles_user_idx    ON articles(user_id);
CREATE INDEX IF NOT EXISTS articles_status_idx  ON articles(status);
CREATE INDEX IF NOT EXISTS articles_updated_idx ON articles(updated_at);

PRAGMA user_version = 1;
";
