use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{ExtratoError, Result};
use crate::models::{Condition, ConditionKind, LogicOperator, Rule};
use crate::settings::get_data_dir;
use crate::store;

fn describe_conditions(rule: &Rule) -> String {
    if rule.conditions.is_empty() {
        return match &rule.includes {
            Some(includes) => format!("includes '{includes}' (legacy)"),
            None => "(no conditions)".to_string(),
        };
    }
    rule.conditions
        .iter()
        .map(|c| match c.kind {
            ConditionKind::Includes => format!("includes '{}'", c.value),
            ConditionKind::Day => format!("day = {}", c.value),
            ConditionKind::Value => format!("value \u{2248} {}", c.value),
        })
        .collect::<Vec<_>>()
        .join(match rule.logic {
            LogicOperator::And => " AND ",
            LogicOperator::Or => " OR ",
        })
}

pub fn add(
    includes: &[String],
    days: &[u32],
    values: &[f64],
    logic: &str,
    classification: Option<&str>,
    meaning: Option<&str>,
) -> Result<()> {
    let logic = LogicOperator::parse(logic)
        .ok_or_else(|| ExtratoError::Other(format!("Invalid logic operator '{logic}': expected and, or")))?;

    let mut conditions: Vec<Condition> = Vec::new();
    for value in includes {
        conditions.push(Condition { kind: ConditionKind::Includes, value: value.clone() });
    }
    for day in days {
        conditions.push(Condition { kind: ConditionKind::Day, value: day.to_string() });
    }
    for value in values {
        conditions.push(Condition { kind: ConditionKind::Value, value: format!("{value:.2}") });
    }
    if conditions.is_empty() {
        return Err(ExtratoError::Other(
            "A rule needs at least one condition (--includes, --day or --value)".to_string(),
        ));
    }
    if classification.is_none() && meaning.is_none() {
        return Err(ExtratoError::Other(
            "A rule needs --classification and/or --meaning to assign".to_string(),
        ));
    }

    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let rule = store::add_rule(&conn, &conditions, logic, classification, meaning)?;
    println!("Added rule {}: {}", rule.id, describe_conditions(&rule));
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let rules = store::list_rules(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Conditions", "Classification", "Meaning"]);
    for rule in &rules {
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(describe_conditions(rule)),
            Cell::new(rule.classification_id.as_deref().unwrap_or("")),
            Cell::new(rule.meaning.as_deref().unwrap_or("")),
        ]);
    }
    println!("Rules (first match wins)\n{table}");
    Ok(())
}

pub fn update(id: &str, classification: Option<&str>, meaning: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    let rule = store::update_rule(&conn, id, classification, meaning)?;
    println!("Updated rule {}", rule.id);
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("extrato.db"))?;
    store::delete_rule(&conn, id)?;
    println!("Deleted rule {id}");
    Ok(())
}
