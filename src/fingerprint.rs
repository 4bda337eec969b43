use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{Descriptor, Direction, ExtractResult};

// Projection of one transaction for hashing. Annotation fields
// (classification, meaning, skip state, provenance) are absent so the
// fingerprint survives user edits; field order here is the canonical
// serialization order.
#[derive(Serialize)]
struct CanonicalTransaction<'a> {
    date: &'a str,
    direction: Direction,
    amount: f64,
    description: &'a Descriptor,
    card_suffix: Option<&'a str>,
}

#[derive(Serialize)]
struct CanonicalExtract<'a> {
    bank: &'a str,
    document: &'a str,
    transactions: Vec<CanonicalTransaction<'a>>,
}

/// Content hash of an extract batch: annotation-free projection, sorted
/// by (date string, amount), serialized together with the bank name and
/// document descriptor, SHA-256 over the result. Batches with the same
/// transaction content hash identically regardless of upload time,
/// transaction order, or later annotation edits.
pub fn extract_fingerprint(extract: &ExtractResult) -> Result<String> {
    let mut transactions: Vec<CanonicalTransaction> = extract
        .transactions
        .iter()
        .map(|t| CanonicalTransaction {
            date: &t.date,
            direction: t.direction,
            amount: t.amount,
            description: &t.description,
            card_suffix: t.card_suffix.as_deref(),
        })
        .collect();

    transactions.sort_by(|a, b| a.date.cmp(b.date).then(a.amount.total_cmp(&b.amount)));

    let canonical = serde_json::to_string(&CanonicalExtract {
        bank: &extract.bank,
        document: &extract.document,
        transactions,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;

    fn txn(date: &str, direction: Direction, amount: f64, description: &str) -> Transaction {
        Transaction {
            direction,
            date: date.to_string(),
            description: Descriptor::Simple(description.to_string()),
            amount,
            card_suffix: None,
            format: None,
            is_international: None,
            meaning: None,
            classification_id: None,
            skipped: false,
            skip_reason: None,
        }
    }

    fn sample_extract() -> ExtractResult {
        ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura-2024-03.pdf".to_string(),
            summary: None,
            transactions: vec![
                txn("05/03/24", Direction::Saida, 120.50, "MERCADO LIVRE"),
                txn("02/03/24", Direction::Saida, 34.90, "UBER TRIP"),
                txn("02/03/24", Direction::Entrada, 1500.00, "PIX RECEBIDO"),
            ],
        }
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let a = sample_extract();
        let mut b = sample_extract();
        b.transactions.reverse();
        assert_eq!(
            extract_fingerprint(&a).unwrap(),
            extract_fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_ignores_annotations() {
        let a = sample_extract();
        let mut b = sample_extract();
        b.transactions[0].classification_id = Some("groceries".to_string());
        b.transactions[1].meaning = Some("ride home".to_string());
        b.transactions[2].skipped = true;
        b.transactions[2].skip_reason = Some("internal transfer".to_string());
        assert_eq!(
            extract_fingerprint(&a).unwrap(),
            extract_fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = sample_extract();
        let mut b = sample_extract();
        b.transactions[0].amount = 120.51;
        assert_ne!(
            extract_fingerprint(&a).unwrap(),
            extract_fingerprint(&b).unwrap()
        );

        let mut c = sample_extract();
        c.bank = "Itau".to_string();
        assert_ne!(
            extract_fingerprint(&a).unwrap(),
            extract_fingerprint(&c).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_card_suffix() {
        let a = sample_extract();
        let mut b = sample_extract();
        b.transactions[0].card_suffix = Some("4321".to_string());
        assert_ne!(
            extract_fingerprint(&a).unwrap(),
            extract_fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn test_same_date_ties_broken_by_amount() {
        // Two same-date transactions swapped must still sort stably.
        let mut a = sample_extract();
        let mut b = sample_extract();
        a.transactions.swap(1, 2);
        b.transactions.swap(0, 1);
        assert_eq!(
            extract_fingerprint(&a).unwrap(),
            extract_fingerprint(&b).unwrap()
        );
    }
}
