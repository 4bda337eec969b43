use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store;

pub fn add(name: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let bank = store::add_bank(&conn, name)?;
    println!("Added bank: {} ({})", bank.name, bank.id);
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let banks = store::list_banks(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Created"]);
    for bank in banks {
        table.add_row(vec![
            Cell::new(bank.id),
            Cell::new(bank.name),
            Cell::new(bank.created_at),
        ]);
    }
    println!("Banks\n{table}");
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let bank = store::get_bank(&conn, id)?;
    store::delete_bank(&conn, id)?;
    println!("Deleted bank {} and all of its extracts", bank.name);
    Ok(())
}
