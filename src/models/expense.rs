// ============================================================================
// Structure : ExpenseRecord
// ============================================================================
// Représente une dépense enregistrée (nom, montant, catégorie, date)
//
// CONCEPTS RUST :
// 1. Newtype pattern : ExpenseId(u64) pour ne pas confondre id et montant
// 2. Champs privés + getters : un enregistrement est immuable une fois créé
// 3. #[serde(into, try_from)] : format JSON stable, validé au chargement
// ============================================================================

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Category;

/// Identifiant unique d'une dépense
///
/// Basé sur l'horodatage en millisecondes, rendu unique par le store
/// (voir `ExpenseStore::next_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    /// Plus grand id accepté (2^53 - 1, entier exact en JSON/JavaScript)
    pub const MAX: u64 = (1 << 53) - 1;

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Violation des invariants d'une dépense
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("expense name is empty")]
    EmptyName,

    #[error("expense amount must be a positive finite number, got {0}")]
    InvalidAmount(f64),

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("expense id {0} is out of range")]
    InvalidId(u64),
}

/// Une dépense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredExpense", try_from = "StoredExpense")]
pub struct ExpenseRecord {
    id: ExpenseId,
    name: String,
    amount: f64,
    category: Category,
    created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Crée une dépense en vérifiant ses invariants
    ///
    /// Le nom est trimé ; il doit rester non vide. Le montant doit être
    /// fini et strictement positif.
    pub fn new(
        id: ExpenseId,
        name: &str,
        amount: f64,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        if id.value() > ExpenseId::MAX {
            return Err(RecordError::InvalidId(id.value()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordError::EmptyName);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RecordError::InvalidAmount(amount));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            amount,
            category,
            created_at,
        })
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Montant formaté pour l'affichage (ex: "$12.50")
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount)
    }

    /// Date formatée pour l'affichage (ex: "Oct 19, 2026"), en heure locale
    pub fn display_date(&self) -> String {
        format_date(self.created_at)
    }
}

/// Formate un montant avec deux décimales
pub fn format_amount(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Formate une date au format court "Mon D, YYYY"
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

// ============================================================================
// Format persistant
// ============================================================================
// Forme JSON d'une dépense : {id, name, amount, category, date, timestamp}
// - date : texte d'affichage, écrit pour compatibilité, ignoré à la lecture
// - timestamp : millisecondes epoch, seule source de vérité pour la date
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredExpense {
    id: ExpenseId,
    name: String,
    amount: f64,
    category: Category,
    #[serde(default)]
    date: String,
    timestamp: i64,
}

impl From<ExpenseRecord> for StoredExpense {
    fn from(record: ExpenseRecord) -> Self {
        Self {
            date: format_date(record.created_at),
            timestamp: record.created_at.timestamp_millis(),
            id: record.id,
            name: record.name,
            amount: record.amount,
            category: record.category,
        }
    }
}

impl TryFrom<StoredExpense> for ExpenseRecord {
    type Error = RecordError;

    fn try_from(stored: StoredExpense) -> Result<Self, Self::Error> {
        let created_at = DateTime::from_timestamp_millis(stored.timestamp)
            .ok_or(RecordError::InvalidTimestamp(stored.timestamp))?;

        ExpenseRecord::new(
            stored.id,
            &stored.name,
            stored.amount,
            stored.category,
            created_at,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_new_trims_name() {
        let record = ExpenseRecord::new(
            ExpenseId::new(1),
            "  Coffee ",
            4.5,
            Category::Food,
            at(1_700_000_000_000),
        )
        .unwrap();

        assert_eq!(record.name(), "Coffee");
        assert_eq!(record.amount(), 4.5);
        assert_eq!(record.formatted_amount(), "$4.50");
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        let now = at(0);
        assert_eq!(
            ExpenseRecord::new(ExpenseId::new(1), "   ", 1.0, Category::Food, now),
            Err(RecordError::EmptyName)
        );
        assert!(matches!(
            ExpenseRecord::new(ExpenseId::new(1), "Tea", 0.0, Category::Food, now),
            Err(RecordError::InvalidAmount(_))
        ));
        assert!(ExpenseRecord::new(ExpenseId::new(1), "Tea", -3.0, Category::Food, now).is_err());
        assert!(ExpenseRecord::new(ExpenseId::new(1), "Tea", f64::NAN, Category::Food, now).is_err());
        assert!(
            ExpenseRecord::new(ExpenseId::new(1), "Tea", f64::INFINITY, Category::Food, now).is_err()
        );
    }

    #[test]
    fn test_json_shape() {
        let record = ExpenseRecord::new(
            ExpenseId::new(1_700_000_000_000),
            "Bus",
            2.0,
            Category::Transport,
            at(1_700_000_000_000),
        )
        .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 1_700_000_000_000u64);
        assert_eq!(value["name"], "Bus");
        assert_eq!(value["amount"], 2.0);
        assert_eq!(value["category"], "transport");
        assert_eq!(value["timestamp"], 1_700_000_000_000i64);
        assert!(value["date"].as_str().unwrap().contains("2023"));
    }

    #[test]
    fn test_deserialize_ignores_date_text() {
        let json = r#"{"id":5,"name":"Lunch","amount":12.5,"category":"food","date":"garbage","timestamp":1000}"#;
        let record: ExpenseRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id(), ExpenseId::new(5));
        assert_eq!(record.created_at(), at(1000));
        assert_eq!(record.category(), &Category::Food);
    }

    #[test]
    fn test_deserialize_without_date_field() {
        let json = r#"{"id":5,"name":"Lunch","amount":12.5,"category":"food","timestamp":1000}"#;
        assert!(serde_json::from_str::<ExpenseRecord>(json).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range_id() {
        let now = at(0);
        assert!(ExpenseRecord::new(ExpenseId::new(ExpenseId::MAX), "Tea", 1.0, Category::Food, now).is_ok());
        assert_eq!(
            ExpenseRecord::new(ExpenseId::new(u64::MAX), "Tea", 1.0, Category::Food, now),
            Err(RecordError::InvalidId(u64::MAX))
        );
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        let json = r#"{"id":5,"name":"  ","amount":12.5,"category":"food","timestamp":1000}"#;
        assert!(serde_json::from_str::<ExpenseRecord>(json).is_err());

        let json = r#"{"id":5,"name":"Lunch","amount":-1,"category":"food","timestamp":1000}"#;
        assert!(serde_json::from_str::<ExpenseRecord>(json).is_err());
    }
}
