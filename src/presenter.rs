// ============================================================================
// Presenter : validation des saisies et état dérivé pour l'affichage
// ============================================================================
// Fait le lien entre les saisies brutes de l'utilisateur et l'ExpenseStore
//
// CONCEPTS RUST :
// 1. Result<T, E> avec des erreurs typées par champ (FormField)
// 2. Confirmation injectée : une closure FnOnce décide si l'action
//    destructive a lieu, le cœur ne connaît aucune boîte de dialogue
// 3. Projection en lecture seule : ViewState est recalculé à chaque rendu
// ============================================================================

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{format_amount, Category, ExpenseId, ExpenseRecord};
use crate::store::{ExpenseStore, StoreError};

/// Champ du formulaire concerné par une erreur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
}

/// Erreur de validation d'une saisie, toujours rattachée à un champ
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter an expense name")]
    EmptyName,

    #[error("Please enter a valid amount")]
    InvalidAmount { raw: String },
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::EmptyName => FormField::Name,
            ValidationError::InvalidAmount { .. } => FormField::Amount,
        }
    }
}

/// Erreur lors de l'ajout d'une dépense depuis le formulaire
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Champ fautif, si l'erreur vient de la validation
    pub fn field(&self) -> Option<FormField> {
        match self {
            SubmitError::Invalid(e) => Some(e.field()),
            SubmitError::Store(_) => None,
        }
    }
}

/// Résultat d'une demande de suppression
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(ExpenseRecord),
    /// L'utilisateur n'a pas confirmé : rien n'a changé
    Cancelled,
    /// Id inconnu : rien à faire
    NotFound,
}

/// Résultat d'une demande de remise à zéro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared(usize),
    Cancelled,
    AlreadyEmpty,
}

/// État prêt à afficher
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Dépenses, la plus récente en premier
    pub records: Vec<ExpenseRecord>,
    pub total: f64,
    pub count: usize,
    pub is_empty: bool,
}

impl ViewState {
    pub fn formatted_total(&self) -> String {
        format_amount(self.total)
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Trim le nom ; échoue avec `EmptyName` s'il ne reste rien
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Parse le montant ; échoue avec `InvalidAmount` s'il n'est pas un nombre
/// fini strictement positif
pub fn validate_amount(raw: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidAmount {
        raw: raw.to_string(),
    };

    let amount: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(invalid());
    }
    Ok(amount)
}

// ============================================================================
// Actions utilisateur
// ============================================================================

/// Valide le formulaire puis ajoute la dépense
///
/// Le nom est validé avant le montant ; la première erreur est retournée et
/// le store n'est pas appelé.
pub fn submit_expense(
    store: &mut ExpenseStore,
    raw_name: &str,
    raw_amount: &str,
    category: Category,
) -> Result<ExpenseRecord, SubmitError> {
    let name = validate_name(raw_name).map_err(|e| {
        debug!(error = %e, "Rejected expense name");
        e
    })?;
    let amount = validate_amount(raw_amount).map_err(|e| {
        debug!(error = %e, raw = %raw_amount, "Rejected expense amount");
        e
    })?;

    Ok(store.add(&name, amount, category)?)
}

/// Supprime une dépense après confirmation
///
/// `confirm` n'est appelé que si la dépense existe.
pub fn delete_expense(
    store: &mut ExpenseStore,
    id: ExpenseId,
    confirm: impl FnOnce(&ExpenseRecord) -> bool,
) -> Result<DeleteOutcome, StoreError> {
    let Some(record) = store.get(id).cloned() else {
        return Ok(DeleteOutcome::NotFound);
    };

    if !confirm(&record) {
        info!(%id, "Delete cancelled");
        return Ok(DeleteOutcome::Cancelled);
    }

    if store.remove(id)? {
        Ok(DeleteOutcome::Deleted(record))
    } else {
        Ok(DeleteOutcome::NotFound)
    }
}

/// Vide la collection après confirmation
///
/// Une collection vide ne déclenche ni confirmation ni écriture.
pub fn clear_expenses(
    store: &mut ExpenseStore,
    confirm: impl FnOnce(usize) -> bool,
) -> Result<ClearOutcome, StoreError> {
    if store.is_empty() {
        return Ok(ClearOutcome::AlreadyEmpty);
    }

    if !confirm(store.count()) {
        info!("Clear cancelled");
        return Ok(ClearOutcome::Cancelled);
    }

    Ok(ClearOutcome::Cleared(store.clear()?))
}

/// Projection de l'état du store pour l'affichage
pub fn derive_view_state(store: &ExpenseStore) -> ViewState {
    let records: Vec<ExpenseRecord> = store.list().into_iter().cloned().collect();
    let count = records.len();

    ViewState {
        records,
        total: store.total(),
        count,
        is_empty: count == 0,
    }
}

// ============================================================================
// Tests
// ============================================================================
