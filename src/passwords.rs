use rusqlite::{params, Connection};
use tracing::warn;

use crate::error::Result;

/// Remember the statement password for a bank so later uploads can try
/// it automatically. Save failures are warned about, never fatal: the
/// ingestion already succeeded by the time this runs.
pub fn save_password(conn: &Connection, bank_name: &str, password: &str) {
    let result = conn.execute(
        "INSERT INTO passwords (bank_name, password, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT (bank_name) DO UPDATE SET password = excluded.password, updated_at = excluded.updated_at",
        params![bank_name.trim(), password, chrono::Utc::now().to_rfc3339()],
    );
    if let Err(e) = result {
        warn!(bank_name, error = %e, "could not save statement password");
    }
}

/// All stored passwords, for trying against a statement whose bank is
/// not yet known. Unreadable table reads as empty.
pub fn list_passwords(conn: &Connection) -> Vec<(String, String)> {
    let mut stmt = match conn.prepare("SELECT bank_name, password FROM passwords") {
        Ok(stmt) => stmt,
        Err(e) => {
            warn!(error = %e, "could not read statement passwords");
            return Vec::new();
        }
    };
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)));
    match rows {
        Ok(rows) => rows.filter_map(|r| r.ok()).collect(),
        Err(e) => {
            warn!(error = %e, "could not read statement passwords");
            Vec::new()
        }
    }
}

pub fn password_for_bank(conn: &Connection, bank_name: &str) -> Result<Option<String>> {
    use rusqlite::OptionalExtension;
    let password = conn
        .query_row(
            "SELECT password FROM passwords WHERE bank_name = ?1",
            [bank_name.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(password)
}
