use serde::{Deserialize, Serialize};

/// Direction of money movement, as reported by the extraction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Entrada,
    Saida,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "ENTRADA",
            Self::Saida => "SAIDA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ENTRADA" => Some(Self::Entrada),
            "SAIDA" => Some(Self::Saida),
            _ => None,
        }
    }
}

/// Transaction description. The extraction service emits either a plain
/// string or a `{name, account}` object for transfers; the variant is
/// resolved once at deserialization instead of branched on at call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Descriptor {
    Structured { name: String, account: String },
    Simple(String),
}

impl Descriptor {
    /// The text rules and memory rules match against.
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(text) => text,
            Self::Structured { name, .. } => name,
        }
    }

    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Simple(_) => None,
            Self::Structured { account, .. } => Some(account.as_str()),
        }
    }
}

/// Where an auto-applied annotation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Rule,
    Memory,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Memory => "memory",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rule" => Some(Self::Rule),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// One transaction as delivered by the extraction service. Annotation
/// fields are normally absent on the wire; they are carried here so an
/// offline ingest of a previously exported batch round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub direction: Direction,
    /// Raw statement date, `D/M/Y` with a 2-digit, 4-digit or `xx` year.
    pub date: String,
    pub description: Descriptor,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_international: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// A full extraction result for one uploaded statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    pub bank: String,
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct Bank {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonType {
    Principal,
    Dependente,
    Externo,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Principal => "Principal",
            Self::Dependente => "Dependente",
            Self::Externo => "Externo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Principal" => Some(Self::Principal),
            "Dependente" => Some(Self::Dependente),
            "Externo" => Some(Self::Externo),
            _ => None,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub person_type: PersonType,
    pub created_at: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub holder_id: String,
    pub bank_id: String,
    pub card_suffix: String,
    pub created_at: String,
    pub updated_at: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Classification {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Includes,
    Day,
    Value,
}

/// One boolean test inside a rule. `value` stays textual; `day` and
/// `value` conditions parse it at evaluation time and fail closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOperator {
    And,
    Or,
}

impl LogicOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

/// A user classification rule. `conditions` empty means a legacy rule
/// carrying a bare `includes` substring.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub conditions: Vec<Condition>,
    pub logic: LogicOperator,
    pub includes: Option<String>,
    pub classification_id: Option<String>,
    pub meaning: Option<String>,
    pub created_at: String,
}

/// The simpler single-substring matcher, consulted after rules.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MemoryRule {
    pub id: String,
    pub includes: String,
    pub classification_id: Option<String>,
    pub meaning: Option<String>,
    pub created_at: String,
}

/// Header row of a stored extract batch.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SavedExtract {
    pub id: String,
    pub bank_id: String,
    pub bank_name: String,
    pub document: String,
    pub summary: Option<String>,
    pub uploaded_at: String,
}

/// One stored transaction, addressed by its stable id.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct StoredTransaction {
    pub id: String,
    pub extract_id: String,
    pub seq: i64,
    pub direction: Direction,
    pub date: String,
    pub description: Descriptor,
    pub amount: f64,
    pub card_suffix: Option<String>,
    pub format: Option<String>,
    pub is_international: Option<bool>,
    pub meaning: Option<String>,
    pub classification_id: Option<String>,
    pub applied_from: Option<MatchSource>,
    pub rule_id: Option<String>,
    pub skipped: bool,
    pub skip_reason: Option<String>,
}

/// Column list matching `StoredTransaction::from_row`.
pub const TRANSACTION_COLUMNS: &str =
    "id, extract_id, seq, direction, date, description, account, \
     amount, card_suffix, format, is_international, meaning, classification_id, \
     applied_from, rule_id, skipped, skip_reason";

impl StoredTransaction {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let direction: String = row.get(3)?;
        let direction = Direction::parse(&direction).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(
                3,
                "direction".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;
        let name: String = row.get(5)?;
        let account: Option<String> = row.get(6)?;
        let description = match account {
            Some(account) => Descriptor::Structured { name, account },
            None => Descriptor::Simple(name),
        };
        let applied_from: Option<String> = row.get(13)?;
        Ok(Self {
            id: row.get(0)?,
            extract_id: row.get(1)?,
            seq: row.get(2)?,
            direction,
            date: row.get(4)?,
            description,
            amount: row.get(7)?,
            card_suffix: row.get(8)?,
            format: row.get(9)?,
            is_international: row.get(10)?,
            meaning: row.get(11)?,
            classification_id: row.get(12)?,
            applied_from: applied_from.as_deref().and_then(MatchSource::parse),
            rule_id: row.get(14)?,
            skipped: row.get(15)?,
            skip_reason: row.get(16)?,
        })
    }

    /// Project back to the wire shape, annotations included.
    pub fn to_wire(&self) -> Transaction {
        Transaction {
            direction: self.direction,
            date: self.date.clone(),
            description: self.description.clone(),
            amount: self.amount,
            card_suffix: self.card_suffix.clone(),
            format: self.format.clone(),
            is_international: self.is_international,
            meaning: self.meaning.clone(),
            classification_id: self.classification_id.clone(),
            skipped: self.skipped,
            skip_reason: self.skip_reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_deserializes_both_shapes() {
        let simple: Descriptor = serde_json::from_str("\"UBER EATS\"").unwrap();
        assert_eq!(simple.name(), "UBER EATS");
        assert_eq!(simple.account(), None);

        let structured: Descriptor =
            serde_json::from_str(r#"{"name": "PIX JOAO", "account": "1234-5"}"#).unwrap();
        assert_eq!(structured.name(), "PIX JOAO");
        assert_eq!(structured.account(), Some("1234-5"));
    }

    #[test]
    fn test_direction_wire_format() {
        let d: Direction = serde_json::from_str("\"ENTRADA\"").unwrap();
        assert_eq!(d, Direction::Entrada);
        assert_eq!(serde_json::to_string(&Direction::Saida).unwrap(), "\"SAIDA\"");
    }

    #[test]
    fn test_transaction_annotation_fields_default() {
        let json = r#"{
            "direction": "SAIDA",
            "date": "05/03/24",
            "description": "MERCADO LIVRE",
            "amount": 120.5
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.classification_id.is_none());
        assert!(!txn.skipped);
        assert!(txn.card_suffix.is_none());
    }

    #[test]
    fn test_condition_kind_wire_format() {
        let c: Condition = serde_json::from_str(r#"{"kind": "includes", "value": "UBER"}"#).unwrap();
        assert_eq!(c.kind, ConditionKind::Includes);
    }
}
