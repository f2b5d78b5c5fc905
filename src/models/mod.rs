// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données de l'application
// ============================================================================

pub mod category; // Catégories de dépenses (tags, icônes, libellés)
pub mod expense;  // Dépense et identifiant

// Re-export des structures principales pour simplifier les imports
// On peut faire : use lazyspend::models::ExpenseRecord;
pub use category::Category;
pub use expense::{format_amount, format_date, ExpenseId, ExpenseRecord, RecordError};
