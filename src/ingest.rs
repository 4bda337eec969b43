use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::dedup;
use crate::error::Result;
use crate::models::{Bank, ExtractResult};
use crate::{annotate, store};

#[derive(Debug)]
pub struct IngestOutcome {
    pub extract_id: String,
    pub bank_id: String,
    pub bank_name: String,
    pub stored: usize,
    pub auto_classified: usize,
}

/// Look up a bank by the name the extraction service detected,
/// registering it on first sight. Matching is case-insensitive.
pub fn ensure_bank(conn: &Connection, name: &str) -> Result<Bank> {
    if let Some(bank) = store::find_bank_by_name(conn, name)? {
        return Ok(bank);
    }
    let bank = store::add_bank(conn, name)?;
    info!(bank = %bank.name, "auto-registered new bank");
    Ok(bank)
}

/// Admit one extraction result: register the bank if needed, run the
/// deduplication gate, persist the batch with stable per-transaction
/// ids, then auto-annotate whatever the classifier recognizes.
pub fn ingest_extract(
    conn: &Connection,
    extract: &ExtractResult,
    uploaded_at: DateTime<Utc>,
) -> Result<IngestOutcome> {
    let bank = ensure_bank(conn, &extract.bank)?;
    dedup::check_duplicate(conn, &bank.id, extract)?;

    let extract_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO extracts (id, bank_id, bank_name, document, summary, uploaded_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            extract_id,
            bank.id,
            extract.bank,
            extract.document,
            extract.summary,
            uploaded_at.to_rfc3339()
        ],
    )?;

    let mut ids = Vec::with_capacity(extract.transactions.len());
    for (seq, txn) in extract.transactions.iter().enumerate() {
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO transactions (id, extract_id, seq, direction, date, description, account, \
             amount, card_suffix, format, is_international, meaning, classification_id, \
             skipped, skip_reason) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                id,
                extract_id,
                seq as i64,
                txn.direction.as_str(),
                txn.date,
                txn.description.name(),
                txn.description.account(),
                txn.amount,
                txn.card_suffix,
                txn.format,
                txn.is_international,
                txn.meaning,
                txn.classification_id,
                txn.skipped,
                txn.skip_reason
            ],
        )?;
        ids.push(id);
    }

    let classifier = Classifier::load(conn)?;
    let mut auto_classified = 0usize;
    for (txn, id) in extract.transactions.iter().zip(&ids) {
        if txn.classification_id.is_some() || txn.skipped {
            continue;
        }
        if let Some(suggestion) = classifier.suggest(txn) {
            annotate::apply_suggestion(conn, id, &suggestion)?;
            auto_classified += 1;
        }
    }

    info!(
        extract_id = %extract_id,
        bank = %bank.name,
        stored = extract.transactions.len(),
        auto_classified,
        "extract ingested"
    );

    Ok(IngestOutcome {
        extract_id,
        bank_id: bank.id,
        bank_name: bank.name,
        stored: extract.transactions.len(),
        auto_classified,
    })
}

pub struct ClassifyOutcome {
    pub classified: usize,
    pub unmatched: usize,
}

/// Re-run the classifier over every stored transaction that is still
/// unclassified and not skipped.
pub fn classify_pending(conn: &Connection) -> Result<ClassifyOutcome> {
    let classifier = Classifier::load(conn)?;
    let mut classified = 0usize;
    let mut unmatched = 0usize;

    for extract in store::list_extracts(conn, None)? {
        for stored in store::list_transactions(conn, &extract.id)? {
            if stored.classification_id.is_some() || stored.skipped {
                continue;
            }
            match classifier.suggest(&stored.to_wire()) {
                Some(suggestion) => {
                    annotate::apply_suggestion(conn, &stored.id, &suggestion)?;
                    classified += 1;
                }
                None => unmatched += 1,
            }
        }
    }

    Ok(ClassifyOutcome { classified, unmatched })
}
