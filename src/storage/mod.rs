// ============================================================================
// Module : storage
// ============================================================================
// Stockage clé/valeur persistant utilisé par l'ExpenseStore
//
// CONCEPT RUST : Traits comme frontière
// - Le store ne connaît que le trait KeyValueStorage
// - JsonFileStorage : un fichier JSON par clé sur disque
// - MemoryStorage : map en mémoire (tests, mode dégradé sans disque)
// ============================================================================

pub mod file;   // Stockage fichier (un fichier par clé)
pub mod memory; // Stockage en mémoire

use anyhow::Result;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Stockage clé/valeur synchrone
pub trait KeyValueStorage {
    /// Lit la valeur brute associée à `key`
    ///
    /// Une clé absente ou illisible renvoie `None` : l'appelant la traite
    /// comme "pas de données".
    fn load(&self, key: &str) -> Option<String>;

    /// Écrit la valeur brute associée à `key`, entièrement, avant de rendre la main
    fn store(&mut self, key: &str, raw: &str) -> Result<()>;

    /// Décrit le stockage pour les logs et l'affichage (ex: chemin du fichier)
    fn describe(&self) -> String;
}
