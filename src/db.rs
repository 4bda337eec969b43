use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS banks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS people (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    person_type TEXT NOT NULL CHECK (person_type IN ('Principal', 'Dependente', 'Externo')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    holder_id TEXT NOT NULL REFERENCES people(id),
    bank_id TEXT NOT NULL REFERENCES banks(id),
    card_suffix TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (bank_id, card_suffix)
);

CREATE TABLE IF NOT EXISTS classifications (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL,
    emoji TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS rules (
    id TEXT PRIMARY KEY,
    conditions TEXT,
    logic_operator TEXT NOT NULL DEFAULT 'AND' CHECK (logic_operator IN ('AND', 'OR')),
    includes TEXT,
    classification_id TEXT REFERENCES classifications(id),
    meaning TEXT,
    position INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS memory_rules (
    id TEXT PRIMARY KEY,
    includes TEXT NOT NULL,
    classification_id TEXT REFERENCES classifications(id),
    meaning TEXT,
    position INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS extracts (
    id TEXT PRIMARY KEY,
    bank_id TEXT NOT NULL REFERENCES banks(id) ON DELETE CASCADE,
    bank_name TEXT NOT NULL,
    document TEXT NOT NULL,
    summary TEXT,
    uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    extract_id TEXT NOT NULL REFERENCES extracts(id) ON DELETE CASCADE,
    seq INTEGER NOT NULL,
    direction TEXT NOT NULL CHECK (direction IN ('ENTRADA', 'SAIDA')),
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    account TEXT,
    amount REAL NOT NULL,
    card_suffix TEXT,
    format TEXT,
    is_international INTEGER,
    meaning TEXT,
    classification_id TEXT,
    applied_from TEXT CHECK (applied_from IN ('rule', 'memory')),
    rule_id TEXT,
    skipped INTEGER NOT NULL DEFAULT 0,
    skip_reason TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_extract ON transactions(extract_id);
CREATE INDEX IF NOT EXISTS idx_extracts_bank ON extracts(bank_id);

CREATE TABLE IF NOT EXISTS passwords (
    bank_name TEXT PRIMARY KEY COLLATE NOCASE,
    password TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    pub fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }
}
