use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::ingest::ingest_extract;
use crate::models::ExtractResult;
use crate::settings::get_data_dir;

pub fn run(file: &str) -> Result<()> {
    let path = PathBuf::from(file);
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;

    let content = std::fs::read_to_string(&path)?;
    let extract: ExtractResult = serde_json::from_str(&content)?;

    let outcome = ingest_extract(&conn, &extract, Utc::now())?;

    println!(
        "{} {} transactions stored for {} ({} auto-classified)",
        "Done:".green().bold(),
        outcome.stored,
        outcome.bank_name,
        outcome.auto_classified
    );
    println!("Extract ID: {}", outcome.extract_id);
    Ok(())
}
