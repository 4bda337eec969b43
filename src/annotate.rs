use rusqlite::{params, Connection};

use crate::classifier::Suggestion;
use crate::error::{ExtratoError, Result};
use crate::store;

/// Manually classify a transaction. Allowed from any state and
/// overwrites: a skipped transaction is un-skipped (skip and
/// classification never coexist) and any auto-applied provenance is
/// cleared because the choice is now the user's.
pub fn set_classification(conn: &Connection, txn_id: &str, classification_id: &str) -> Result<()> {
    store::get_transaction(conn, txn_id)?;
    store::get_classification(conn, classification_id)?;
    conn.execute(
        "UPDATE transactions SET classification_id = ?1, skipped = 0, skip_reason = NULL, \
         applied_from = NULL, rule_id = NULL WHERE id = ?2",
        params![classification_id, txn_id],
    )?;
    Ok(())
}

/// Set or clear the free-text meaning. An empty string removes the
/// annotation only; the classification state is untouched.
pub fn set_meaning(conn: &Connection, txn_id: &str, meaning: &str) -> Result<()> {
    store::get_transaction(conn, txn_id)?;
    let meaning = meaning.trim();
    if meaning.is_empty() {
        conn.execute("UPDATE transactions SET meaning = NULL WHERE id = ?1", [txn_id])?;
    } else {
        conn.execute(
            "UPDATE transactions SET meaning = ?1 WHERE id = ?2",
            params![meaning, txn_id],
        )?;
    }
    Ok(())
}

/// Skip a transaction. Requires a reason and clears classification,
/// meaning and provenance; a skipped transaction carries no annotation.
pub fn skip(conn: &Connection, txn_id: &str, reason: &str) -> Result<()> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ExtratoError::Other("Skip reason is required".to_string()));
    }
    store::get_transaction(conn, txn_id)?;
    conn.execute(
        "UPDATE transactions SET skipped = 1, skip_reason = ?1, classification_id = NULL, \
         meaning = NULL, applied_from = NULL, rule_id = NULL WHERE id = ?2",
        params![reason, txn_id],
    )?;
    Ok(())
}

/// Apply a matcher suggestion, recording where it came from.
pub fn apply_suggestion(conn: &Connection, txn_id: &str, suggestion: &Suggestion) -> Result<()> {
    conn.execute(
        "UPDATE transactions SET classification_id = ?1, meaning = ?2, \
         applied_from = ?3, rule_id = ?4 WHERE id = ?5",
        params![
            suggestion.classification_id,
            suggestion.meaning,
            suggestion.source.as_str(),
            suggestion.source_id,
            txn_id
        ],
    )?;
    Ok(())
}
