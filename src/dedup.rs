use rusqlite::Connection;
use tracing::warn;

use crate::error::{ExtratoError, Result};
use crate::fingerprint::extract_fingerprint;
use crate::models::ExtractResult;
use crate::store;

/// Rebuild the wire-shaped extract for a stored batch. Annotations ride
/// along but never reach the fingerprint.
fn load_stored(conn: &Connection, extract_id: &str) -> Result<ExtractResult> {
    let header = store::get_extract(conn, extract_id)?;
    let transactions = store::list_transactions(conn, extract_id)?
        .iter()
        .map(|t| t.to_wire())
        .collect();
    Ok(ExtractResult {
        bank: header.bank_name,
        document: header.document,
        summary: header.summary,
        transactions,
    })
}

/// The deduplication gate. Fingerprints the candidate batch and compares
/// it against every batch already stored for the bank; a match rejects
/// ingestion with `DuplicateExtract`. Read-only; the caller persists.
///
/// If the historical scan itself cannot be read the gate fails open and
/// admits the batch: ingestion availability wins over strict duplicate
/// prevention. A single unreadable batch is warned about and skipped.
pub fn check_duplicate(conn: &Connection, bank_id: &str, extract: &ExtractResult) -> Result<()> {
    let candidate = extract_fingerprint(extract)?;

    let stored = match store::list_extracts(conn, Some(bank_id)) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(bank_id, error = %e, "duplicate scan failed; admitting extract");
            return Ok(());
        }
    };

    for header in &stored {
        let existing = match load_stored(conn, &header.id) {
            Ok(existing) => existing,
            Err(e) => {
                warn!(extract_id = %header.id, error = %e, "unreadable stored extract; skipping");
                continue;
            }
        };
        match extract_fingerprint(&existing) {
            Ok(fp) if fp == candidate => {
                warn!(extract_id = %header.id, "duplicate extract detected");
                return Err(ExtratoError::DuplicateExtract(extract.bank.clone()));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(extract_id = %header.id, error = %e, "could not fingerprint stored extract; skipping");
            }
        }
    }

    Ok(())
}
