use std::collections::BTreeMap;

use chrono::Datelike;
use rusqlite::Connection;

use crate::dates::StatementDate;
use crate::error::Result;
use crate::models::Direction;
use crate::store;

// ---------------------------------------------------------------------------
// Monthly view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub inflow: f64,
    pub outflow: f64,
    pub transactions: usize,
    pub skipped: usize,
}

/// Transactions bucketed by calendar month. The month comes from each
/// transaction's statement date, with the batch's upload year standing
/// in for an unknown year; rows with unparseable dates are skipped.
/// Skipped transactions are counted but kept out of the totals.
pub fn monthly_view(conn: &Connection, year: Option<i32>) -> Result<Vec<MonthBucket>> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

    for extract in store::list_extracts(conn, None)? {
        let upload_year = chrono::DateTime::parse_from_rfc3339(&extract.uploaded_at)
            .map(|d| d.year())
            .unwrap_or_else(|_| chrono::Utc::now().year());

        for txn in store::list_transactions(conn, &extract.id)? {
            let Ok(date) = StatementDate::parse(&txn.date) else {
                continue;
            };
            let txn_year = date.year_or(upload_year);
            if year.is_some_and(|y| y != txn_year) {
                continue;
            }

            let bucket = buckets.entry((txn_year, date.month)).or_insert(MonthBucket {
                year: txn_year,
                month: date.month,
                inflow: 0.0,
                outflow: 0.0,
                transactions: 0,
                skipped: 0,
            });
            bucket.transactions += 1;
            if txn.skipped {
                bucket.skipped += 1;
                continue;
            }
            match txn.direction {
                Direction::Entrada => bucket.inflow += txn.amount,
                Direction::Saida => bucket.outflow += txn.amount,
            }
        }
    }

    Ok(buckets.into_values().collect())
}

// ---------------------------------------------------------------------------
// Bank view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BankView {
    pub bank_id: String,
    pub bank_name: String,
    pub extracts: usize,
    pub transactions: usize,
    pub classified: usize,
    pub skipped: usize,
}

/// Per-bank tallies over the whole store.
pub fn bank_view(conn: &Connection) -> Result<Vec<BankView>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.name, COUNT(DISTINCT e.id), COUNT(t.id), \
                COALESCE(SUM(t.classification_id IS NOT NULL), 0), COALESCE(SUM(t.skipped), 0) \
         FROM banks b \
         LEFT JOIN extracts e ON e.bank_id = b.id \
         LEFT JOIN transactions t ON t.extract_id = e.id \
         GROUP BY b.id, b.name ORDER BY b.name",
    )?;
    let views = stmt
        .query_map([], |row| {
            Ok(BankView {
                bank_id: row.get(0)?,
                bank_name: row.get(1)?,
                extracts: row.get::<_, i64>(2)? as usize,
                transactions: row.get::<_, i64>(3)? as usize,
                classified: row.get::<_, i64>(4)? as usize,
                skipped: row.get::<_, i64>(5)? as usize,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_db;
    use crate::ingest::ingest_extract;
    use crate::models::{Descriptor, ExtractResult, Transaction};
    use chrono::TimeZone;

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

    #[test]
    fn test_monthly_view_buckets_by_statement_month() {
        let (_dir, conn) = test_db();
        let extract = ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura.pdf".to_string(),
            summary: None,
            transactions: vec![
                txn("05/03/24", Direction::Saida, 100.0, "MERCADO"),
                txn("20/03/24", Direction::Entrada, 1500.0, "SALARIO"),
                txn("02/04/24", Direction::Saida, 50.0, "FARMACIA"),
            ],
        };
        ingest_extract(&conn, &extract, chrono::Utc::now()).unwrap();

        let buckets = monthly_view(&conn, None).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].year, buckets[0].month), (2024, 3));
        assert_eq!(buckets[0].inflow, 1500.0);
        assert_eq!(buckets[0].outflow, 100.0);
        assert_eq!(buckets[0].transactions, 2);
        assert_eq!((buckets[1].year, buckets[1].month), (2024, 4));
    }

    #[test]
    fn test_monthly_view_unknown_year_uses_upload_year() {
        let (_dir, conn) = test_db();
        let extract = ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura.pdf".to_string(),
            summary: None,
            transactions: vec![txn("05/03/xx", Direction::Saida, 100.0, "MERCADO")],
        };
        let uploaded = chrono::Utc.with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap();
        ingest_extract(&conn, &extract, uploaded).unwrap();

        let buckets = monthly_view(&conn, None).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!((buckets[0].year, buckets[0].month), (2023, 3));
    }

    #[test]
    fn test_monthly_view_skips_unparseable_dates() {
        let (_dir, conn) = test_db();
        let extract = ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura.pdf".to_string(),
            summary: None,
            transactions: vec![
                txn("SALDO ANTERIOR", Direction::Saida, 10.0, "LIXO"),
                txn("05/03/24", Direction::Saida, 100.0, "MERCADO"),
            ],
        };
        ingest_extract(&conn, &extract, chrono::Utc::now()).unwrap();

        let buckets = monthly_view(&conn, None).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].transactions, 1);
    }

    #[test]
    fn test_monthly_view_year_filter() {
        let (_dir, conn) = test_db();
        let extract = ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura.pdf".to_string(),
            summary: None,
            transactions: vec![
                txn("05/03/23", Direction::Saida, 100.0, "MERCADO"),
                txn("05/03/24", Direction::Saida, 100.0, "MERCADO B"),
            ],
        };
        ingest_extract(&conn, &extract, chrono::Utc::now()).unwrap();

        let buckets = monthly_view(&conn, Some(2023)).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].year, 2023);
    }

    #[test]
    fn test_monthly_view_excludes_skipped_from_totals() {
        let (_dir, conn) = test_db();
        let extract = ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura.pdf".to_string(),
            summary: None,
            transactions: vec![
                txn("05/03/24", Direction::Saida, 100.0, "MERCADO"),
                txn("06/03/24", Direction::Saida, 40.0, "TRANSFERENCIA INTERNA"),
            ],
        };
        let outcome = ingest_extract(&conn, &extract, chrono::Utc::now()).unwrap();
        let txns = store::list_transactions(&conn, &outcome.extract_id).unwrap();
        crate::annotate::skip(&conn, &txns[1].id, "transferencia propria").unwrap();

        let buckets = monthly_view(&conn, None).unwrap();
        assert_eq!(buckets[0].outflow, 100.0);
        assert_eq!(buckets[0].skipped, 1);
        assert_eq!(buckets[0].transactions, 2);
    }

    #[test]
    fn test_bank_view_counts() {
        let (_dir, conn) = test_db();
        let nubank = ExtractResult {
            bank: "Nubank".to_string(),
            document: "fatura.pdf".to_string(),
            summary: None,
            transactions: vec![
                txn("05/03/24", Direction::Saida, 100.0, "MERCADO"),
                txn("06/03/24", Direction::Saida, 40.0, "UBER"),
            ],
        };
        let itau = ExtractResult {
            bank: "Itau".to_string(),
            document: "extrato.pdf".to_string(),
            summary: None,
            transactions: vec![txn("10/03/24", Direction::Entrada, 2000.0, "SALARIO")],
        };
        let outcome = ingest_extract(&conn, &nubank, chrono::Utc::now()).unwrap();
        ingest_extract(&conn, &itau, chrono::Utc::now()).unwrap();

        let txns = store::list_transactions(&conn, &outcome.extract_id).unwrap();
        let classification = store::add_classification(&conn, "Mercado", "\u{1F6D2}").unwrap();
        crate::annotate::set_classification(&conn, &txns[0].id, &classification.id).unwrap();
        crate::annotate::skip(&conn, &txns[1].id, "nao e minha").unwrap();

        let views = bank_view(&conn).unwrap();
        assert_eq!(views.len(), 2);
        let nubank_view = views.iter().find(|v| v.bank_name == "Nubank").unwrap();
        assert_eq!(nubank_view.extracts, 1);
        assert_eq!(nubank_view.transactions, 2);
        assert_eq!(nubank_view.classified, 1);
        assert_eq!(nubank_view.skipped, 1);
        let itau_view = views.iter().find(|v| v.bank_name == "Itau").unwrap();
        assert_eq!(itau_view.transactions, 1);
        assert_eq!(itau_view.classified, 0);
    }

    #[test]
    fn test_bank_view_includes_empty_banks() {
        let (_dir, conn) = test_db();
        store::add_bank(&conn, "Bradesco").unwrap();
        let views = bank_view(&conn).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].extracts, 0);
        assert_eq!(views[0].transactions, 0);
    }
}
