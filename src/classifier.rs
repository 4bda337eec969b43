use rusqlite::Connection;

use crate::error::Result;
use crate::models::{
    Condition, ConditionKind, LogicOperator, MatchSource, MemoryRule, Rule, Transaction,
};
use crate::store;

/// Tolerance for `value` conditions against float-parsed statement
/// amounts.
pub const AMOUNT_EPSILON: f64 = 0.01;

/// What a matcher proposes for a transaction, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub classification_id: Option<String>,
    pub meaning: Option<String>,
    pub source: MatchSource,
    pub source_id: String,
}

fn condition_matches(condition: &Condition, txn: &Transaction) -> bool {
    match condition.kind {
        ConditionKind::Includes => txn
            .description
            .name()
            .to_lowercase()
            .contains(&condition.value.to_lowercase()),
        ConditionKind::Day => {
            // Textual split of the raw date; a full parse is not needed
            // and unparseable values simply never match.
            let day = txn.date.split('/').next().and_then(|d| d.trim().parse::<u32>().ok());
            let wanted = condition.value.trim().parse::<u32>().ok();
            match (day, wanted) {
                (Some(day), Some(wanted)) => day == wanted,
                _ => false,
            }
        }
        ConditionKind::Value => condition
            .value
            .trim()
            .parse::<f64>()
            .map(|v| (txn.amount - v).abs() < AMOUNT_EPSILON)
            .unwrap_or(false),
    }
}

/// Whether a rule matches. Condition results combine under the rule's
/// logic operator; legacy rules (no conditions) fall back to their bare
/// `includes` substring.
pub fn rule_matches(rule: &Rule, txn: &Transaction) -> bool {
    if !rule.conditions.is_empty() {
        let mut results = rule.conditions.iter().map(|c| condition_matches(c, txn));
        return match rule.logic {
            LogicOperator::Or => results.any(|r| r),
            LogicOperator::And => results.all(|r| r),
        };
    }
    if let Some(includes) = &rule.includes {
        return txn
            .description
            .name()
            .to_lowercase()
            .contains(&includes.to_lowercase());
    }
    false
}

/// First matching rule in stored order. First match wins outright; a
/// later, more specific rule is never preferred.
pub fn find_matching_rule<'a>(rules: &'a [Rule], txn: &Transaction) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule_matches(rule, txn))
}

/// First memory rule whose substring occurs in the description,
/// case-insensitively, in stored order.
pub fn find_matching_memory<'a>(
    rules: &'a [MemoryRule],
    description: &str,
) -> Option<&'a MemoryRule> {
    let normalized = description.to_lowercase();
    rules
        .iter()
        .find(|rule| normalized.contains(&rule.includes.to_lowercase()))
}

/// The unified matching strategy: rules first (the richer mechanism),
/// memory rules as fallback. This ordering is a contract, not a
/// call-site accident.
pub struct Classifier {
    rules: Vec<Rule>,
    memory: Vec<MemoryRule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>, memory: Vec<MemoryRule>) -> Self {
        Self { rules, memory }
    }

    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self::new(store::list_rules(conn)?, store::list_memory_rules(conn)?))
    }

    pub fn suggest(&self, txn: &Transaction) -> Option<Suggestion> {
        if let Some(rule) = find_matching_rule(&self.rules, txn) {
            return Some(Suggestion {
                classification_id: rule.classification_id.clone(),
                meaning: rule.meaning.clone(),
                source: MatchSource::Rule,
                source_id: rule.id.clone(),
            });
        }
        find_matching_memory(&self.memory, txn.description.name()).map(|rule| Suggestion {
            classification_id: rule.classification_id.clone(),
            meaning: rule.meaning.clone(),
            source: MatchSource::Memory,
            source_id: rule.id.clone(),
        })
    }
}
