// ============================================================================
// Structure : ExpenseStore
// ============================================================================
// Source de vérité unique de la liste des dépenses
//
// CONCEPTS RUST :
// 1. Injection de dépendance : le stockage est passé au constructeur
//    (Box<dyn KeyValueStorage>), un MemoryStorage le remplace en test
// 2. Write-through : chaque mutation est sérialisée et écrite en entier
//    avant de rendre la main
// 3. Rollback local : si l'écriture échoue, la mutation en mémoire est
//    annulée, la mémoire ne diverge jamais du stockage
// ============================================================================

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Category, ExpenseId, ExpenseRecord, RecordError};
use crate::storage::KeyValueStorage;

/// Clé unique sous laquelle la collection est stockée
pub const DEFAULT_KEY: &str = "expenses";

/// Erreurs des mutations du store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Données refusées (nom vide, montant invalide)
    #[error("invalid expense: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("failed to serialize expenses: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Écriture impossible ; la collection en mémoire est restée inchangée
    #[error("failed to persist expenses: {0:#}")]
    Persist(anyhow::Error),
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Liste des dépenses synchronisée avec un stockage clé/valeur
pub struct ExpenseStore {
    storage: Box<dyn KeyValueStorage>,
    key: String,
    expenses: Vec<ExpenseRecord>,
    last_id: u64,
    clock: Clock,
}

impl ExpenseStore {
    /// Charge la collection depuis le stockage
    ///
    /// Ne peut pas échouer : une clé absente, illisible ou un JSON invalide
    /// donnent une collection vide. Les enregistrements individuellement
    /// invalides ou en double sont ignorés (avec un warning).
    pub fn load(storage: Box<dyn KeyValueStorage>, key: &str) -> Self {
        let expenses = match storage.load(key) {
            Some(raw) => parse_collection(&raw),
            None => {
                debug!(key, "No stored expenses, starting empty");
                Vec::new()
            }
        };

        let last_id = expenses.iter().map(|e| e.id().value()).max().unwrap_or(0);

        info!(
            key,
            storage = %storage.describe(),
            count = expenses.len(),
            "Expense store loaded"
        );

        Self {
            storage,
            key: key.to_string(),
            expenses,
            last_id,
            clock: Box::new(Utc::now),
        }
    }

    /// Remplace l'horloge (utile en test pour contrôler les dates)
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Ajoute une dépense et la persiste
    ///
    /// L'id et la date sont attribués ici. Les entrées invalides sont
    /// refusées même si l'appelant est censé les avoir validées.
    pub fn add(
        &mut self,
        name: &str,
        amount: f64,
        category: Category,
    ) -> Result<ExpenseRecord, StoreError> {
        // Précision milliseconde : identique à ce qui sera relu du stockage
        let created_at = (self.clock)().trunc_subsecs(3);
        let id = self.next_id(created_at);
        let record = ExpenseRecord::new(id, name, amount, category, created_at)?;

        self.expenses.push(record.clone());
        if let Err(e) = self.persist() {
            self.expenses.pop();
            return Err(e);
        }
        self.last_id = id.value();

        info!(
            id = %record.id(),
            name = %record.name(),
            amount = record.amount(),
            category = %record.category().tag(),
            "Expense added"
        );
        Ok(record)
    }

    /// Supprime la dépense `id`
    ///
    /// Retourne `false` (sans écrire) si l'id est inconnu.
    pub fn remove(&mut self, id: ExpenseId) -> Result<bool, StoreError> {
        let Some(index) = self.expenses.iter().position(|e| e.id() == id) else {
            debug!(%id, "Remove requested for unknown expense, nothing to do");
            return Ok(false);
        };

        let removed = self.expenses.remove(index);
        if let Err(e) = self.persist() {
            self.expenses.insert(index, removed);
            return Err(e);
        }

        info!(%id, name = %removed.name(), "Expense removed");
        Ok(true)
    }

    /// Vide la collection
    ///
    /// Retourne le nombre de dépenses supprimées ; une collection déjà vide
    /// ne provoque aucune écriture.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        if self.expenses.is_empty() {
            debug!("Clear requested on empty collection, nothing to do");
            return Ok(0);
        }

        let previous = std::mem::take(&mut self.expenses);
        if let Err(e) = self.persist() {
            self.expenses = previous;
            return Err(e);
        }

        info!(count = previous.len(), "All expenses cleared");
        Ok(previous.len())
    }

    /// Dépenses triées de la plus récente à la plus ancienne
    ///
    /// À date égale, l'id le plus grand (le plus récent) passe en premier.
    /// L'ordre stocké n'est pas modifié.
    pub fn list(&self) -> Vec<&ExpenseRecord> {
        let mut sorted: Vec<&ExpenseRecord> = self.expenses.iter().collect();
        sorted.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        sorted
    }

    pub fn get(&self, id: ExpenseId) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|e| e.id() == id)
    }

    /// Somme des montants (0 pour une collection vide)
    pub fn total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    pub fn count(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Description du stockage sous-jacent (pour l'affichage)
    pub fn storage_description(&self) -> String {
        self.storage.describe()
    }

    /// Génère un id unique : horodatage en ms, ou dernier id + 1 si
    /// plusieurs ajouts tombent dans la même milliseconde
    ///
    /// Un id au-delà de `ExpenseId::MAX` est refusé par `ExpenseRecord::new`.
    fn next_id(&self, created_at: DateTime<Utc>) -> ExpenseId {
        let millis = u64::try_from(created_at.timestamp_millis()).unwrap_or(0);
        ExpenseId::new(millis.max(self.last_id.saturating_add(1)))
    }

    /// Sérialise et écrit toute la collection
    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.expenses)?;
        self.storage.store(&self.key, &raw).map_err(|e| {
            warn!(key = %self.key, error = %e, "Failed to persist expenses");
            StoreError::Persist(e)
        })
    }
}

/// Décode la collection stockée, enregistrement par enregistrement
fn parse_collection(raw: &str) -> Vec<ExpenseRecord> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "Stored expenses are malformed, starting empty");
            return Vec::new();
        }
    };

    let mut expenses: Vec<ExpenseRecord> = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<ExpenseRecord>(value) {
            Ok(record) if expenses.iter().any(|e| e.id() == record.id()) => {
                warn!(index, id = %record.id(), "Duplicate expense id in storage, skipping");
            }
            Ok(record) => expenses.push(record),
            Err(e) => {
                warn!(index, error = %e, "Invalid stored expense, skipping");
            }
        }
    }
    expenses
}

// ============================================================================
// Tests unitaires
// ============================================================================
