use crate::db::get_connection;
use crate::error::Result;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("extrato.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!("Service:    {}", settings.service_url);

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let banks: i64 = conn.query_row("SELECT count(*) FROM banks", [], |r| r.get(0))?;
        let extracts: i64 = conn.query_row("SELECT count(*) FROM extracts", [], |r| r.get(0))?;
        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let unclassified: i64 = conn.query_row(
            "SELECT count(*) FROM transactions WHERE classification_id IS NULL AND skipped = 0",
            [],
            |r| r.get(0),
        )?;
        let rules: i64 = conn.query_row("SELECT count(*) FROM rules", [], |r| r.get(0))?;
        let memory: i64 = conn.query_row("SELECT count(*) FROM memory_rules", [], |r| r.get(0))?;

        println!();
        println!("Banks:         {banks}");
        println!("Extracts:      {extracts}");
        println!("Transactions:  {transactions}");
        println!("Unclassified:  {unclassified}");
        println!("Rules:         {rules}");
        println!("Memory rules:  {memory}");
    } else {
        println!();
        println!("Database not found. Run `extrato init` to set up.");
    }

    Ok(())
}
