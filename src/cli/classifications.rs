use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store;

pub fn add(label: &str, emoji: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let classification = store::add_classification(&conn, label, emoji)?;
    println!(
        "Added classification: {} {} ({})",
        classification.emoji, classification.label, classification.id
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let classifications = store::list_classifications(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Label", "Emoji"]);
    for classification in classifications {
        table.add_row(vec![
            Cell::new(classification.id),
            Cell::new(classification.label),
            Cell::new(classification.emoji),
        ]);
    }
    println!("Classifications\n{table}");
    Ok(())
}
