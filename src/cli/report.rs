use chrono::Datelike;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::dates::StatementDate;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::Direction;
use crate::reports::{bank_view, monthly_view};
use crate::settings::get_data_dir;
use crate::store;

pub fn monthly(year: Option<i32>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let buckets = monthly_view(&conn, year)?;

    let mut table = Table::new();
    table.set_header(vec!["Month", "Inflow", "Outflow", "Net", "Transactions", "Skipped"]);
    for bucket in &buckets {
        table.add_row(vec![
            Cell::new(format!("{}-{:02}", bucket.year, bucket.month)),
            Cell::new(money(bucket.inflow)),
            Cell::new(money(bucket.outflow)),
            Cell::new(money(bucket.inflow - bucket.outflow)),
            Cell::new(bucket.transactions),
            Cell::new(bucket.skipped),
        ]);
    }
    println!("Monthly summary\n{table}");
    Ok(())
}

pub fn banks() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let views = bank_view(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Bank", "Extracts", "Transactions", "Classified", "Skipped"]);
    for view in &views {
        table.add_row(vec![
            Cell::new(&view.bank_name),
            Cell::new(view.extracts),
            Cell::new(view.transactions),
            Cell::new(view.classified),
            Cell::new(view.skipped),
        ]);
    }
    println!("Banks\n{table}");
    Ok(())
}

pub fn extracts(bank: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let extracts = store::list_extracts(&conn, bank)?;

    for extract in &extracts {
        let upload_year = chrono::DateTime::parse_from_rfc3339(&extract.uploaded_at)
            .map(|d| d.year())
            .unwrap_or_else(|_| chrono::Utc::now().year());

        println!(
            "{} {} \u{2014} {} (uploaded {})",
            "Extract".bold(),
            extract.id,
            extract.bank_name,
            extract.uploaded_at
        );

        let mut table = Table::new();
        table.set_header(vec!["Transaction", "Date", "Amount", "Description", "Classification", "Meaning"]);
        for txn in store::list_transactions(&conn, &extract.id)? {
            // Raw date stays raw when unparseable; the view never fails
            // over one bad row.
            let date = StatementDate::parse(&txn.date)
                .map(|d| {
                    let mut resolved = d;
                    resolved.year = Some(d.year_or(upload_year));
                    resolved.display()
                })
                .unwrap_or_else(|_| txn.date.clone());

            let amount = match txn.direction {
                Direction::Entrada => money(txn.amount).green().to_string(),
                Direction::Saida => money(txn.amount).red().to_string(),
            };
            let classification = if txn.skipped {
                format!("skipped: {}", txn.skip_reason.as_deref().unwrap_or(""))
            } else {
                txn.classification_id.clone().unwrap_or_default()
            };
            table.add_row(vec![
                Cell::new(&txn.id),
                Cell::new(date),
                Cell::new(amount),
                Cell::new(txn.description.name()),
                Cell::new(classification),
                Cell::new(txn.meaning.as_deref().unwrap_or("")),
            ]);
        }
        println!("{table}\n");
    }

    if extracts.is_empty() {
        println!("No extracts stored.");
    }
    Ok(())
}
