use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{ExtratoError, Result};
use crate::models::{
    Bank, Card, Classification, Condition, LogicOperator, MemoryRule, Person, PersonType, Rule,
    SavedExtract, StoredTransaction, TRANSACTION_COLUMNS,
};

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Banks
// ---------------------------------------------------------------------------

pub fn add_bank(conn: &Connection, name: &str) -> Result<Bank> {
    if find_bank_by_name(conn, name)?.is_some() {
        return Err(ExtratoError::Other(format!("Bank already exists: {name}")));
    }
    let bank = Bank {
        id: new_id(),
        name: name.trim().to_string(),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO banks (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![bank.id, bank.name, bank.created_at],
    )?;
    Ok(bank)
}

pub fn find_bank_by_name(conn: &Connection, name: &str) -> Result<Option<Bank>> {
    let bank = conn
        .query_row(
            "SELECT id, name, created_at FROM banks WHERE name = ?1 COLLATE NOCASE",
            [name.trim()],
            |row| {
                Ok(Bank {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(bank)
}

pub fn get_bank(conn: &Connection, id: &str) -> Result<Bank> {
    conn.query_row(
        "SELECT id, name, created_at FROM banks WHERE id = ?1",
        [id],
        |row| {
            Ok(Bank {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| ExtratoError::UnknownBank(id.to_string()))
}

pub fn list_banks(conn: &Connection) -> Result<Vec<Bank>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM banks ORDER BY created_at")?;
    let banks = stmt
        .query_map([], |row| {
            Ok(Bank {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(banks)
}

/// Delete a bank. Its extract batches (and their transactions) go with
/// it via the cascade.
pub fn delete_bank(conn: &Connection, id: &str) -> Result<()> {
    let affected = conn.execute("DELETE FROM banks WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(ExtratoError::UnknownBank(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

fn principal_other_than(conn: &Connection, exclude_id: Option<&str>) -> Result<Option<Person>> {
    let person = conn
        .query_row(
            "SELECT id, name, person_type, created_at FROM people \
             WHERE person_type = 'Principal' AND id != COALESCE(?1, '')",
            [exclude_id],
            person_from_row,
        )
        .optional()?;
    Ok(person)
}

fn person_from_row(row: &rusqlite::Row) -> rusqlite::Result<Person> {
    let person_type: String = row.get(2)?;
    let person_type = PersonType::parse(&person_type).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(2, "person_type".to_string(), rusqlite::types::Type::Text)
    })?;
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        person_type,
        created_at: row.get(3)?,
    })
}

pub fn add_person(conn: &Connection, name: &str, person_type: PersonType) -> Result<Person> {
    if person_type == PersonType::Principal {
        if let Some(existing) = principal_other_than(conn, None)? {
            return Err(ExtratoError::PrincipalExists(existing.name));
        }
    }
    let person = Person {
        id: new_id(),
        name: name.trim().to_string(),
        person_type,
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO people (id, name, person_type, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![person.id, person.name, person.person_type.as_str(), person.created_at],
    )?;
    Ok(person)
}

pub fn get_person(conn: &Connection, id: &str) -> Result<Person> {
    conn.query_row(
        "SELECT id, name, person_type, created_at FROM people WHERE id = ?1",
        [id],
        person_from_row,
    )
    .optional()?
    .ok_or_else(|| ExtratoError::UnknownPerson(id.to_string()))
}

pub fn list_people(conn: &Connection) -> Result<Vec<Person>> {
    let mut stmt =
        conn.prepare("SELECT id, name, person_type, created_at FROM people ORDER BY created_at")?;
    let people = stmt
        .query_map([], person_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(people)
}

pub fn update_person(
    conn: &Connection,
    id: &str,
    name: Option<&str>,
    person_type: Option<PersonType>,
) -> Result<Person> {
    let mut person = get_person(conn, id)?;
    if let Some(name) = name {
        person.name = name.trim().to_string();
    }
    if let Some(person_type) = person_type {
        if person_type == PersonType::Principal {
            if let Some(existing) = principal_other_than(conn, Some(id))? {
                return Err(ExtratoError::PrincipalExists(existing.name));
            }
        }
        person.person_type = person_type;
    }
    conn.execute(
        "UPDATE people SET name = ?1, person_type = ?2 WHERE id = ?3",
        params![person.name, person.person_type.as_str(), person.id],
    )?;
    Ok(person)
}

/// Delete a person. Rejected while any card still names them as holder.
pub fn delete_person(conn: &Connection, id: &str) -> Result<()> {
    get_person(conn, id)?;
    let cards: i64 = conn.query_row(
        "SELECT count(*) FROM cards WHERE holder_id = ?1",
        [id],
        |r| r.get(0),
    )?;
    if cards > 0 {
        return Err(ExtratoError::PersonHasCards);
    }
    conn.execute("DELETE FROM people WHERE id = ?1", [id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

fn card_from_row(row: &rusqlite::Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        name: row.get(1)?,
        holder_id: row.get(2)?,
        bank_id: row.get(3)?,
        card_suffix: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const CARD_COLUMNS: &str = "id, name, holder_id, bank_id, card_suffix, created_at, updated_at";

fn card_suffix_taken(
    conn: &Connection,
    bank_id: &str,
    suffix: &str,
    exclude_id: Option<&str>,
) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM cards WHERE bank_id = ?1 AND card_suffix = ?2 AND id != COALESCE(?3, '')",
    )?;
    Ok(stmt.exists(params![bank_id, suffix, exclude_id])?)
}

pub fn add_card(
    conn: &Connection,
    name: &str,
    holder_id: &str,
    bank_id: &str,
    card_suffix: &str,
) -> Result<Card> {
    get_person(conn, holder_id)?;
    get_bank(conn, bank_id)?;
    if card_suffix_taken(conn, bank_id, card_suffix, None)? {
        return Err(ExtratoError::DuplicateCard);
    }
    let card = Card {
        id: new_id(),
        name: name.trim().to_string(),
        holder_id: holder_id.to_string(),
        bank_id: bank_id.to_string(),
        card_suffix: card_suffix.to_string(),
        created_at: now(),
        updated_at: now(),
    };
    conn.execute(
        "INSERT INTO cards (id, name, holder_id, bank_id, card_suffix, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            card.id,
            card.name,
            card.holder_id,
            card.bank_id,
            card.card_suffix,
            card.created_at,
            card.updated_at
        ],
    )?;
    Ok(card)
}

pub fn get_card(conn: &Connection, id: &str) -> Result<Card> {
    conn.query_row(
        &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
        [id],
        card_from_row,
    )
    .optional()?
    .ok_or_else(|| ExtratoError::UnknownCard(id.to_string()))
}

pub fn list_cards(conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY created_at"))?;
    let cards = stmt
        .query_map([], card_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(cards)
}

pub fn update_card(
    conn: &Connection,
    id: &str,
    name: Option<&str>,
    holder_id: Option<&str>,
    card_suffix: Option<&str>,
) -> Result<Card> {
    let mut card = get_card(conn, id)?;
    if let Some(name) = name {
        card.name = name.trim().to_string();
    }
    if let Some(holder_id) = holder_id {
        get_person(conn, holder_id)?;
        card.holder_id = holder_id.to_string();
    }
    if let Some(suffix) = card_suffix {
        if card_suffix_taken(conn, &card.bank_id, suffix, Some(id))? {
            return Err(ExtratoError::DuplicateCard);
        }
        card.card_suffix = suffix.to_string();
    }
    card.updated_at = now();
    conn.execute(
        "UPDATE cards SET name = ?1, holder_id = ?2, card_suffix = ?3, updated_at = ?4 WHERE id = ?5",
        params![card.name, card.holder_id, card.card_suffix, card.updated_at, card.id],
    )?;
    Ok(card)
}

pub fn delete_card(conn: &Connection, id: &str) -> Result<()> {
    let affected = conn.execute("DELETE FROM cards WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(ExtratoError::UnknownCard(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Classifications (append-only reference data)
// ---------------------------------------------------------------------------

pub fn add_classification(conn: &Connection, label: &str, emoji: &str) -> Result<Classification> {
    let classification = Classification {
        id: new_id(),
        label: label.trim().to_string(),
        emoji: emoji.trim().to_string(),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO classifications (id, label, emoji, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            classification.id,
            classification.label,
            classification.emoji,
            classification.created_at
        ],
    )?;
    Ok(classification)
}

pub fn get_classification(conn: &Connection, id: &str) -> Result<Classification> {
    conn.query_row(
        "SELECT id, label, emoji, created_at FROM classifications WHERE id = ?1",
        [id],
        |row| {
            Ok(Classification {
                id: row.get(0)?,
                label: row.get(1)?,
                emoji: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| ExtratoError::UnknownClassification(id.to_string()))
}

pub fn list_classifications(conn: &Connection) -> Result<Vec<Classification>> {
    let mut stmt = conn
        .prepare("SELECT id, label, emoji, created_at FROM classifications ORDER BY created_at")?;
    let classifications = stmt
        .query_map([], |row| {
            Ok(Classification {
                id: row.get(0)?,
                label: row.get(1)?,
                emoji: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(classifications)
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn rule_from_row(row: &rusqlite::Row) -> rusqlite::Result<Rule> {
    let conditions: Option<String> = row.get(1)?;
    let conditions: Vec<Condition> = match conditions {
        Some(json) => serde_json::from_str(&json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        None => Vec::new(),
    };
    let logic: String = row.get(2)?;
    let logic = LogicOperator::parse(&logic).unwrap_or(LogicOperator::And);
    Ok(Rule {
        id: row.get(0)?,
        conditions,
        logic,
        includes: row.get(3)?,
        classification_id: row.get(4)?,
        meaning: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const RULE_COLUMNS: &str =
    "id, conditions, logic_operator, includes, classification_id, meaning, created_at";

fn next_position(conn: &Connection, table: &str) -> Result<i64> {
    let max: Option<i64> =
        conn.query_row(&format!("SELECT max(position) FROM {table}"), [], |r| r.get(0))?;
    Ok(max.unwrap_or(0) + 1)
}

pub fn add_rule(
    conn: &Connection,
    conditions: &[Condition],
    logic: LogicOperator,
    classification_id: Option<&str>,
    meaning: Option<&str>,
) -> Result<Rule> {
    if let Some(classification_id) = classification_id {
        get_classification(conn, classification_id)?;
    }
    let rule = Rule {
        id: new_id(),
        conditions: conditions.to_vec(),
        logic,
        includes: None,
        classification_id: classification_id.map(str::to_string),
        meaning: meaning.map(str::to_string),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO rules (id, conditions, logic_operator, includes, classification_id, meaning, position, created_at) \
         VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7)",
        params![
            rule.id,
            serde_json::to_string(&rule.conditions)?,
            rule.logic.as_str(),
            rule.classification_id,
            rule.meaning,
            next_position(conn, "rules")?,
            rule.created_at
        ],
    )?;
    Ok(rule)
}

/// Rules in stored order, the order the matcher walks them in.
pub fn list_rules(conn: &Connection) -> Result<Vec<Rule>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {RULE_COLUMNS} FROM rules ORDER BY position"))?;
    let rules = stmt
        .query_map([], rule_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rules)
}

pub fn get_rule(conn: &Connection, id: &str) -> Result<Rule> {
    conn.query_row(
        &format!("SELECT {RULE_COLUMNS} FROM rules WHERE id = ?1"),
        [id],
        rule_from_row,
    )
    .optional()?
    .ok_or_else(|| ExtratoError::RuleNotFound(id.to_string()))
}

pub fn update_rule(
    conn: &Connection,
    id: &str,
    classification_id: Option<&str>,
    meaning: Option<&str>,
) -> Result<Rule> {
    let mut rule = get_rule(conn, id)?;
    if let Some(classification_id) = classification_id {
        get_classification(conn, classification_id)?;
        rule.classification_id = Some(classification_id.to_string());
    }
    if let Some(meaning) = meaning {
        rule.meaning = Some(meaning.to_string());
    }
    conn.execute(
        "UPDATE rules SET classification_id = ?1, meaning = ?2 WHERE id = ?3",
        params![rule.classification_id, rule.meaning, rule.id],
    )?;
    Ok(rule)
}

pub fn delete_rule(conn: &Connection, id: &str) -> Result<()> {
    let affected = conn.execute("DELETE FROM rules WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(ExtratoError::RuleNotFound(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Memory rules
// ---------------------------------------------------------------------------

fn memory_rule_from_row(row: &rusqlite::Row) -> rusqlite::Result<MemoryRule> {
    Ok(MemoryRule {
        id: row.get(0)?,
        includes: row.get(1)?,
        classification_id: row.get(2)?,
        meaning: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn add_memory_rule(
    conn: &Connection,
    includes: &str,
    classification_id: Option<&str>,
    meaning: Option<&str>,
) -> Result<MemoryRule> {
    if let Some(classification_id) = classification_id {
        get_classification(conn, classification_id)?;
    }
    let rule = MemoryRule {
        id: new_id(),
        includes: includes.trim().to_string(),
        classification_id: classification_id.map(str::to_string),
        meaning: meaning.map(str::to_string),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO memory_rules (id, includes, classification_id, meaning, position, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            rule.id,
            rule.includes,
            rule.classification_id,
            rule.meaning,
            next_position(conn, "memory_rules")?,
            rule.created_at
        ],
    )?;
    Ok(rule)
}

pub fn list_memory_rules(conn: &Connection) -> Result<Vec<MemoryRule>> {
    let mut stmt = conn.prepare(
        "SELECT id, includes, classification_id, meaning, created_at FROM memory_rules ORDER BY position",
    )?;
    let rules = stmt
        .query_map([], memory_rule_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rules)
}

pub fn update_memory_rule(
    conn: &Connection,
    id: &str,
    includes: Option<&str>,
    classification_id: Option<&str>,
    meaning: Option<&str>,
) -> Result<MemoryRule> {
    let mut rule = conn
        .query_row(
            "SELECT id, includes, classification_id, meaning, created_at FROM memory_rules WHERE id = ?1",
            [id],
            memory_rule_from_row,
        )
        .optional()?
        .ok_or_else(|| ExtratoError::MemoryRuleNotFound(id.to_string()))?;
    if let Some(includes) = includes {
        rule.includes = includes.trim().to_string();
    }
    if let Some(classification_id) = classification_id {
        get_classification(conn, classification_id)?;
        rule.classification_id = Some(classification_id.to_string());
    }
    if let Some(meaning) = meaning {
        rule.meaning = Some(meaning.to_string());
    }
    conn.execute(
        "UPDATE memory_rules SET includes = ?1, classification_id = ?2, meaning = ?3 WHERE id = ?4",
        params![rule.includes, rule.classification_id, rule.meaning, rule.id],
    )?;
    Ok(rule)
}

pub fn delete_memory_rule(conn: &Connection, id: &str) -> Result<()> {
    let affected = conn.execute("DELETE FROM memory_rules WHERE id = ?1", [id])?;
    if affected == 0 {
        return Err(ExtratoError::MemoryRuleNotFound(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Extracts and transactions
// ---------------------------------------------------------------------------

fn extract_from_row(row: &rusqlite::Row) -> rusqlite::Result<SavedExtract> {
    Ok(SavedExtract {
        id: row.get(0)?,
        bank_id: row.get(1)?,
        bank_name: row.get(2)?,
        document: row.get(3)?,
        summary: row.get(4)?,
        uploaded_at: row.get(5)?,
    })
}

const EXTRACT_COLUMNS: &str = "id, bank_id, bank_name, document, summary, uploaded_at";

pub fn list_extracts(conn: &Connection, bank_id: Option<&str>) -> Result<Vec<SavedExtract>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EXTRACT_COLUMNS} FROM extracts \
         WHERE bank_id = COALESCE(?1, bank_id) ORDER BY uploaded_at"
    ))?;
    let extracts = stmt
        .query_map([bank_id], extract_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(extracts)
}

pub fn get_extract(conn: &Connection, id: &str) -> Result<SavedExtract> {
    conn.query_row(
        &format!("SELECT {EXTRACT_COLUMNS} FROM extracts WHERE id = ?1"),
        [id],
        extract_from_row,
    )
    .optional()?
    .ok_or_else(|| ExtratoError::Other(format!("Extract not found: {id}")))
}

/// Transactions of one batch, in statement order.
pub fn list_transactions(conn: &Connection, extract_id: &str) -> Result<Vec<StoredTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE extract_id = ?1 ORDER BY seq"
    ))?;
    let transactions = stmt
        .query_map([extract_id], StoredTransaction::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(transactions)
}

pub fn get_transaction(conn: &Connection, id: &str) -> Result<StoredTransaction> {
    conn.query_row(
        &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
        [id],
        StoredTransaction::from_row,
    )
    .optional()?
    .ok_or_else(|| ExtratoError::TransactionNotFound(id.to_string()))
}
