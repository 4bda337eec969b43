use crate::db::get_connection;
use crate::error::Result;
use crate::ingest::classify_pending;
use crate::settings::get_data_dir;

pub fn run() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let result = classify_pending(&conn)?;
    println!(
        "{} classified, {} still unmatched",
        result.classified, result.unmatched
    );
    Ok(())
}
