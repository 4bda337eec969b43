use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{ExtratoError, Result};
use crate::models::PersonType;
use crate::settings::{get_data_dir, load_settings, save_settings};
use crate::store;

fn parse_type(raw: &str) -> Result<PersonType> {
    PersonType::parse(raw).ok_or_else(|| {
        ExtratoError::Other(format!(
            "Invalid person type '{raw}': expected Principal, Dependente or Externo"
        ))
    })
}

pub fn add(name: &str, person_type: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let person = store::add_person(&conn, name, parse_type(person_type)?)?;
    println!("Added {}: {} ({})", person.person_type.as_str(), person.name, person.id);
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let people = store::list_people(&conn)?;
    let primary = load_settings().primary_person_id;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Primary"]);
    for person in people {
        let is_primary = primary.as_deref() == Some(person.id.as_str());
        table.add_row(vec![
            Cell::new(person.id),
            Cell::new(person.name),
            Cell::new(person.person_type.as_str()),
            Cell::new(if is_primary { "*" } else { "" }),
        ]);
    }
    println!("People\n{table}");
    Ok(())
}

pub fn update(id: &str, name: Option<&str>, person_type: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let person_type = match person_type {
        Some(raw) => Some(parse_type(raw)?),
        None => None,
    };
    let person = store::update_person(&conn, id, name, person_type)?;
    println!("Updated {}: {}", person.name, person.person_type.as_str());
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    store::delete_person(&conn, id)?;

    // Deleting the primary person clears the pointer in settings.
    let mut settings = load_settings();
    if settings.primary_person_id.as_deref() == Some(id) {
        settings.primary_person_id = None;
        save_settings(&settings)?;
    }

    println!("Deleted person {id}");
    Ok(())
}

pub fn set_primary(id: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let person = store::get_person(&conn, id)?;

    let mut settings = load_settings();
    settings.primary_person_id = Some(person.id.clone());
    save_settings(&settings)?;

    println!("Primary person set to {}", person.name);
    Ok(())
}
