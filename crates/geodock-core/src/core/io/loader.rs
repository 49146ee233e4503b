use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::partner::{PartnerError, PartnerStructure};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StructureLoadError {
    #[error("Failed to read structure file '{path}': {source}", path = path.display())]
    File {
        path: PathBuf,
        #[source]
        source: PdbError,
    },
    #[error("Invalid partner structure '{path}': {source}", path = path.display())]
    Partner {
        path: PathBuf,
        #[source]
        source: PartnerError,
    },
    #[error("Invalid {partner}: {source}")]
    Invalid {
        partner: &'static str,
        #[source]
        source: PartnerError,
    },
}

/// Resolves a partner reference into its sequence and backbone coordinates.
pub trait StructureLoader: Send {
    fn load(&self, path: &Path) -> Result<PartnerStructure, StructureLoadError>;
}

/// Loads partners from PDB files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdbLoader {
    /// Restrict extraction to one chain; `None` takes every protein chain.
    pub chain: Option<char>,
}

impl PdbLoader {
    pub fn new(chain: Option<char>) -> Self {
        Self { chain }
    }
}

impl StructureLoader for PdbLoader {
    fn load(&self, path: &Path) -> Result<PartnerStructure, StructureLoadError> {
        let (structure, _) =
            PdbFile::read_from_path(path).map_err(|source| StructureLoadError::File {
                path: path.to_path_buf(),
                source,
            })?;
        let partner = PartnerStructure::from_structure(&structure, self.chain).map_err(|source| {
            StructureLoadError::Partner {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(
            path = %path.display(),
            residues = partner.len(),
            "Loaded partner structure."
        );
        Ok(partner)
    }
}
