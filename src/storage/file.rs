// ============================================================================
// Structure : JsonFileStorage
// ============================================================================
// Stockage clé/valeur sur disque : chaque clé est un fichier <clé>.json
// dans un répertoire de données.
//
// CONCEPT : Écriture atomique
// - On écrit d'abord dans un fichier temporaire du même répertoire,
//   puis on le renomme sur <clé>.json
// - Un crash pendant l'écriture laisse l'ancien fichier intact
// - En cas d'échec, NamedTempFile supprime le temporaire à son Drop
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::KeyValueStorage;

/// Stockage clé/valeur dans un répertoire
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Ouvre (et crée si besoin) le répertoire de stockage
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Chemin du fichier associé à une clé
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored data yet");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read stored data");
                None
            }
        }
    }

    fn store(&mut self, key: &str, raw: &str) -> Result<()> {
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(raw.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("Failed to flush {}", tmp.path().display()))?;

        // PersistError rend le fichier temporaire : on le lâche pour qu'il soit supprimé
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!(path = %path.display(), bytes = raw.len(), "Stored data");
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
