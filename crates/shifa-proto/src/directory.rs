//! Static directory: curated medicines and the pharmacy list.
//!
//! Loaded from a TOML file with `[[medicine]]` and `[[pharmacy]]` tables.
//! A copy is bundled in the binary and used when no file exists.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::protocol::{Medicine, Pharmacy};

const BUNDLED_DIRECTORY: &str = include_str!("../data/directory.toml");

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read directory {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid directory: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate pharmacy id {0:?}")]
    DuplicatePharmacy(String),
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    medicine: Vec<Medicine>,
    #[serde(default)]
    pharmacy: Vec<Pharmacy>,
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub medicines: Vec<Medicine>,
    pub pharmacies: Vec<Pharmacy>,
}

pub fn parse_directory_str(content: &str) -> Result<Directory, DirectoryError> {
    let file: DirectoryFile = toml::from_str(content)?;
    let mut seen = HashSet::new();
    for p in &file.pharmacy {
        if !seen.insert(p.id.as_str()) {
            return Err(DirectoryError::DuplicatePharmacy(p.id.clone()));
        }
    }
    Ok(Directory {
        medicines: file.medicine,
        pharmacies: file.pharmacy,
    })
}

impl Directory {
    /// The copy compiled into the binary.
    pub fn bundled() -> Result<Self, DirectoryError> {
        parse_directory_str(BUNDLED_DIRECTORY)
    }

    /// Read `path`, or fall back to the bundled copy when it does not exist.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        if !path.exists() {
            info!("[directory] {} not found, using bundled copy", path.display());
            return Self::bundled();
        }
        let content = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = parse_directory_str(&content)?;
        if dir.pharmacies.is_empty() {
            warn!("[directory] {} lists no pharmacies", path.display());
        }
        Ok(dir)
    }

    /// Curated entry whose name equals `name`, ignoring case and padding.
    pub fn medicine_named(&self, name: &str) -> Option<&Medicine> {
        let wanted = name.trim().to_lowercase();
        self.medicines
            .iter()
            .find(|m| m.name.trim().to_lowercase() == wanted)
    }

    pub fn on_duty(&self) -> Vec<Pharmacy> {
        self.pharmacies
            .iter()
            .filter(|p| p.is_on_duty())
            .cloned()
            .collect()
    }
}
