use super::bridge::WorkerError;
use super::embedding::EmbeddingBundle;
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::backbone::{BACKBONE_ATOMS, BackboneCoords};
use crate::core::models::chain::Chain;
use crate::core::models::residue::{Residue, three_letter_code};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Docking inference failed: {0}")]
    Inference(String),
    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
    #[error("Predicted complex has {actual} residues, expected {expected}")]
    ResidueCount { expected: usize, actual: usize },
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Everything the docking model consumes for one prediction.
#[derive(Debug, Clone, Copy)]
pub struct DockingInput<'a> {
    pub sequence1: &'a str,
    pub sequence2: &'a str,
    pub embeddings: &'a EmbeddingBundle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictedChain {
    pub chain_id: char,
    pub sequence: String,
    pub coords: BackboneCoords,
}

/// The docked complex: partner 1 as chain `A`, partner 2 as chain `B`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedComplex {
    pub partner1: PredictedChain,
    pub partner2: PredictedChain,
}

impl PredictedComplex {
    pub fn new(
        sequence1: &str,
        coords1: BackboneCoords,
        sequence2: &str,
        coords2: BackboneCoords,
    ) -> Self {
        Self {
            partner1: PredictedChain {
                chain_id: 'A',
                sequence: sequence1.to_string(),
                coords: coords1,
            },
            partner2: PredictedChain {
                chain_id: 'B',
                sequence: sequence2.to_string(),
                coords: coords2,
            },
        }
    }

    /// Splits the concatenated `[L1 + L2]` backbone of a predicted complex.
    pub fn from_joint_coords(
        sequence1: &str,
        sequence2: &str,
        coords: BackboneCoords,
    ) -> Result<Self, PredictorError> {
        let (len1, len2) = (sequence1.chars().count(), sequence2.chars().count());
        if coords.len() != len1 + len2 {
            return Err(PredictorError::ResidueCount {
                expected: len1 + len2,
                actual: coords.len(),
            });
        }
        let (first, second) = coords.residues().split_at(len1);
        Ok(Self::new(
            sequence1,
            BackboneCoords::new(first.to_vec()),
            sequence2,
            BackboneCoords::new(second.to_vec()),
        ))
    }

    pub fn residue_count(&self) -> usize {
        self.partner1.coords.len() + self.partner2.coords.len()
    }

    /// Builds a backbone-only structure with one chain per partner.
    pub fn to_structure(&self) -> Structure {
        let mut structure = Structure::new();
        let mut serial = 1;
        for predicted in [&self.partner1, &self.partner2] {
            let mut chain = Chain::new(predicted.chain_id);
            for (i, (code, backbone)) in predicted
                .sequence
                .chars()
                .zip(predicted.coords.residues())
                .enumerate()
            {
                let mut residue = Residue::new(i as isize + 1, None, three_letter_code(code));
                for (name, pos) in BACKBONE_ATOMS.iter().zip(backbone) {
                    let position = Point3::new(pos.x as f64, pos.y as f64, pos.z as f64);
                    residue.add_atom(Atom::new(serial, name, position));
                    serial += 1;
                }
                chain.add_residue(residue);
            }
            structure.add_chain(chain);
            // Reserved for the chain's TER record.
            serial += 1;
        }
        structure
    }

    /// Writes the complex as PDB, replacing `path` only once the file is complete.
    pub fn write_pdb(&self, path: &Path) -> Result<(), PdbError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            PdbFile::write_structure_to(&self.to_structure(), &mut writer)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| PdbError::Io(e.error))?;
        Ok(())
    }
}

/// Resolves a user-supplied output name to the file that will be written.
pub fn output_file_path(out_name: &Path) -> PathBuf {
    if out_name.extension().is_some() {
        out_name.to_path_buf()
    } else {
        out_name.with_extension("pdb")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub complex: PredictedComplex,
    /// Peak accelerator memory during the call, when the backend can measure it.
    pub peak_memory_bytes: Option<u64>,
}

/// A pretrained docking model in inference mode.
pub trait DockingPredictor: Send {
    fn predict(&self, input: &DockingInput<'_>) -> Result<Prediction, PredictorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ladder(len: usize, offset: f32) -> BackboneCoords {
        BackboneCoords::new(
            (0..len)
                .map(|i| {
                    let x = offset + i as f32 * 3.8;
                    [
                        Point3::new(x, 0.0, 0.0),
                        Point3::new(x + 1.0, 0.5, 0.0),
                        Point3::new(x + 2.0, 0.0, 0.5),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn from_joint_coords_splits_by_sequence_lengths() {
        let complex = PredictedComplex::from_joint_coords("MK", "GAV", ladder(5, 0.0)).unwrap();
        assert_eq!(complex.partner1.coords.len(), 2);
        assert_eq!(complex.partner2.coords.len(), 3);
        assert_eq!(complex.partner2.coords.residues()[0][0].x, 2.0 * 3.8);
        assert_eq!(complex.partner1.chain_id, 'A');
        assert_eq!(complex.partner2.chain_id, 'B');
    }

    #[test]
    fn from_joint_coords_rejects_wrong_residue_count() {
        let result = PredictedComplex::from_joint_coords("MK", "GAV", ladder(4, 0.0));
        assert!(matches!(
            result,
            Err(PredictorError::ResidueCount {
                expected: 5,
                actual: 4
            })
        ));
    }

    #[test]
    fn to_structure_emits_backbone_atoms_per_residue() {
        let complex = PredictedComplex::new("MK", ladder(2, 0.0), "G", ladder(1, 50.0));
        let structure = complex.to_structure();
        assert_eq!(structure.chains().len(), 2);
        assert_eq!(structure.residue_count(), 3);
        assert_eq!(structure.atom_count(), 9);
        let chain_a = structure.chain('A').unwrap();
        assert_eq!(chain_a.residues()[1].name, "LYS");
        assert!(chain_a.residues()[1].atom("CA").is_some());
    }

    #[test]
    fn write_pdb_creates_parent_dirs_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("complex.pdb");
        let complex = PredictedComplex::new("MK", ladder(2, 0.0), "G", ladder(1, 50.0));

        complex.write_pdb(&path).unwrap();

        let (reread, _) = PdbFile::read_from_path(&path).unwrap();
        assert_eq!(reread.residue_count(), 3);
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn written_serials_are_unique_across_chains() {
        let complex = PredictedComplex::new("MK", ladder(2, 0.0), "GA", ladder(2, 50.0));
        let mut buffer = Vec::new();
        PdbFile::write_structure_to(&complex.to_structure(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let serials: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with("ATOM") || l.starts_with("TER"))
            .map(|l| l[6..11].trim().parse().unwrap())
            .collect();
        assert_eq!(serials.len(), 12 + 2);
        let mut unique = serials.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), serials.len());
        assert_eq!(serials, (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn output_file_path_appends_missing_extension() {
        assert_eq!(output_file_path(Path::new("test")), PathBuf::from("test.pdb"));
        assert_eq!(
            output_file_path(Path::new("out/complex.pdb")),
            PathBuf::from("out/complex.pdb")
        );
        assert_eq!(
            output_file_path(Path::new("run.v2")),
            PathBuf::from("run.v2")
        );
    }
}
