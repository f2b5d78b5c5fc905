// ============================================================================
// Configuration
// ============================================================================
// Emplacements résolus une seule fois au démarrage :
// - Données : $LAZYSPEND_DATA_DIR, sinon ~/.local/share/lazyspend (Linux),
//   ~/Library/Application Support/lazyspend (macOS), %LOCALAPPDATA% (Windows)
// - Logs : $LAZYSPEND_LOG_DIR, sinon <données>/logs
// ============================================================================

use std::path::PathBuf;

use crate::store::DEFAULT_KEY;

/// Variable d'environnement pour le répertoire de données
pub const DATA_DIR_ENV: &str = "LAZYSPEND_DATA_DIR";

/// Variable d'environnement pour le répertoire de logs
pub const LOG_DIR_ENV: &str = "LAZYSPEND_LOG_DIR";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Clé de stockage de la collection
    pub storage_key: String,
}

impl Config {
    /// Lit la configuration depuis l'environnement du process
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var_os(name).map(PathBuf::from))
    }

    /// Résout la configuration avec une source de variables donnée
    ///
    /// CONCEPT RUST : Closure en paramètre
    /// - Permet de tester sans toucher aux vraies variables d'environnement
    pub fn resolve(var: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let data_dir = var(DATA_DIR_ENV)
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| dirs::data_local_dir().map(|d| d.join("lazyspend")))
            .unwrap_or_else(|| PathBuf::from(".lazyspend"));

        let log_dir = var(LOG_DIR_ENV)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| data_dir.join("logs"));

        Self {
            data_dir,
            log_dir,
            storage_key: DEFAULT_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        let config = Config::resolve(|name| match name {
            DATA_DIR_ENV => Some(PathBuf::from("/tmp/spend")),
            LOG_DIR_ENV => Some(PathBuf::from("/var/log/spend")),
            _ => None,
        });

        assert_eq!(config.data_dir, PathBuf::from("/tmp/spend"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/spend"));
        assert_eq!(config.storage_key, "expenses");
    }

    #[test]
    fn test_log_dir_defaults_under_data_dir() {
        let config = Config::resolve(|name| {
            (name == DATA_DIR_ENV).then(|| PathBuf::from("/tmp/spend"))
        });
        assert_eq!(config.log_dir, PathBuf::from("/tmp/spend/logs"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let config = Config::resolve(|_| Some(PathBuf::new()));
        assert_ne!(config.data_dir, PathBuf::new());
        assert_eq!(config.log_dir, config.data_dir.join("logs"));
    }
}
