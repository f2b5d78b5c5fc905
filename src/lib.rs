// ============================================================================
// LazySpend - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod app;       // État de l'application TUI
pub mod config;    // Emplacements des données et des logs
pub mod models;    // Structures de données
pub mod presenter; // Validation et état dérivé pour l'affichage
pub mod storage;   // Stockage clé/valeur (fichier, mémoire)
pub mod store;     // ExpenseStore : source de vérité des dépenses
pub mod ui;        // Interface utilisateur
