use std::path::{Path, PathBuf};

use chrono::Utc;
use colored::Colorize;
use rusqlite::Connection;
use zeroize::Zeroizing;

use crate::db::get_connection;
use crate::error::{ExtratoError, Result};
use crate::extraction::{wait_for_result, ExtractionService, HttpExtractionService};
use crate::settings::{api_key, get_data_dir, load_settings};
use crate::{ingest, passwords, pdf, store};

/// Decrypt a protected statement, trying the given password first, then
/// every stored bank password, and finally prompting. Returns the
/// decrypted path and the password that worked so it can be remembered
/// under the detected bank.
fn unlock(
    conn: &Connection,
    path: &Path,
    password: Option<String>,
    out_dir: &Path,
) -> Result<(PathBuf, Zeroizing<String>)> {
    let mut candidates: Vec<Zeroizing<String>> = Vec::new();
    if let Some(password) = password {
        candidates.push(Zeroizing::new(password));
    }
    for (_bank, stored) in passwords::list_passwords(conn) {
        candidates.push(Zeroizing::new(stored));
    }

    for candidate in candidates {
        match pdf::decrypt(path, &candidate, out_dir) {
            Ok(out) => return Ok((out, candidate)),
            Err(ExtratoError::InvalidPassword) => continue,
            Err(e) => return Err(e),
        }
    }

    println!("This statement is password protected.");
    let typed = Zeroizing::new(rpassword::prompt_password("Statement password: ")?);
    let out = pdf::decrypt(path, &typed, out_dir)?;
    Ok((out, typed))
}

pub fn run(file: &str, password: Option<String>) -> Result<()> {
    let path = PathBuf::from(file);
    let settings = load_settings();
    let data_dir = get_data_dir();
    let conn = get_connection(&data_dir.join("extrato.db"))?;

    let mut document_path = path.clone();
    let mut used_password: Option<Zeroizing<String>> = None;
    if pdf::is_encrypted(&path)? {
        let (unlocked, working) = unlock(&conn, &path, password, &data_dir.join("decrypted"))?;
        document_path = unlocked;
        used_password = Some(working);
    }

    let document = std::fs::read(&document_path)?;
    let known_banks: Vec<String> = store::list_banks(&conn)?.into_iter().map(|b| b.name).collect();

    let service = HttpExtractionService::new(&settings.service_url, &api_key()?);
    println!("Submitting {}...", path.display());
    let job_id = service.submit(&document, &known_banks)?;
    println!("Waiting for extraction (job {job_id})...");
    let result = wait_for_result(&service, &job_id)?;

    let outcome = ingest::ingest_extract(&conn, &result, Utc::now())?;

    if let Some(working) = used_password {
        passwords::save_password(&conn, &outcome.bank_name, &working);
    }

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
