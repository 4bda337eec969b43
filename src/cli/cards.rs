use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store;

pub fn add(name: &str, holder: &str, bank: &str, suffix: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let card = store::add_card(&conn, name, holder, bank, suffix)?;
    println!("Added card: {} \u{2022}\u{2022}{} ({})", card.name, card.card_suffix, card.id);
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let cards = store::list_cards(&conn)?;
    let people = store::list_people(&conn)?;
    let banks = store::list_banks(&conn)?;

    let holder_name = |id: &str| {
        people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    let bank_name = |id: &str| {
        banks
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Holder", "Bank", "Suffix"]);
    for card in cards {
        table.add_row(vec![
            Cell::new(&card.id),
            Cell::new(&card.name),
            Cell::new(holder_name(&card.holder_id)),
            Cell::new(bank_name(&card.bank_id)),
            Cell::new(&card.card_suffix),
        ]);
    }
    println!("Cards\n{table}");
    Ok(())
}

pub fn update(
    id: &str,
    name: Option<&str>,
    holder: Option<&str>,
    suffix: Option<&str>,
) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let card = store::update_card(&conn, id, name, holder, suffix)?;
    println!("Updated card {}", card.name);
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    store::delete_card(&conn, id)?;
    println!("Deleted card {id}");
    Ok(())
}
