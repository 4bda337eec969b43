use crate::annotate;
use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;

pub fn classify(transaction: &str, classification: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    annotate::set_classification(&conn, transaction, classification)?;
    println!("Classified transaction {transaction}");
    Ok(())
}

pub fn meaning(transaction: &str, text: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    annotate::set_meaning(&conn, transaction, text)?;
    if text.trim().is_empty() {
        println!("Cleared meaning on transaction {transaction}");
    } else {
        println!("Set meaning on transaction {transaction}");
    }
    Ok(())
}

pub fn skip(transaction: &str, reason: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    annotate::skip(&conn, transaction, reason)?;
    println!("Skipped transaction {transaction}");
    Ok(())
}
