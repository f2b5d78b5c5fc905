// ============================================================================
// Structure : MemoryStorage
// ============================================================================
// Stockage clé/valeur en mémoire
//
// CONCEPT RUST : Rc<RefCell<T>>
// - Rc : plusieurs handles partagent la même map (un seul thread)
// - RefCell : mutabilité vérifiée à l'exécution
// - Un test garde un clone pour inspecter ce que le store a écrit
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{bail, Result};

use super::KeyValueStorage;

/// Stockage en mémoire, clonable (les clones partagent les données)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée un stockage pré-rempli avec une valeur
    pub fn with_entry(key: &str, raw: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        storage
    }

    /// Variante qui refuse toute écriture (simule un disque plein)
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Valeur actuellement stockée pour `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn store(&mut self, key: &str, raw: &str) -> Result<()> {
        if self.read_only {
            bail!("storage is read-only");
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();

        writer.store("expenses", "[]").unwrap();
        assert_eq!(storage.load("expenses").as_deref(), Some("[]"));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut storage = MemoryStorage::with_entry("expenses", "[]").read_only();
        assert!(storage.store("expenses", "[1]").is_err());
        assert_eq!(storage.get("expenses").as_deref(), Some("[]"));
    }
}
