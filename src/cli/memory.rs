use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store;

pub fn add(includes: &str, classification: Option<&str>, meaning: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let rule = store::add_memory_rule(&conn, includes, classification, meaning)?;
    println!("Added memory rule {}: includes '{}'", rule.id, rule.includes);
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let rules = store::list_memory_rules(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Includes", "Classification", "Meaning"]);
    for rule in &rules {
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(&rule.includes),
            Cell::new(rule.classification_id.as_deref().unwrap_or("")),
            Cell::new(rule.meaning.as_deref().unwrap_or("")),
        ]);
    }
    println!("Memory rules (consulted after rules, first match wins)\n{table}");
    Ok(())
}

pub fn update(
    id: &str,
    includes: Option<&str>,
    classification: Option<&str>,
    meaning: Option<&str>,
) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let rule = store::update_memory_rule(&conn, id, includes, classification, meaning)?;
    println!("Updated memory rule {}", rule.id);
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    store::delete_memory_rule(&conn, id)?;
    println!("Deleted memory rule {id}");
    Ok(())
}
