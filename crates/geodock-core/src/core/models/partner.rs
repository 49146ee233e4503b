use super::backbone::{BACKBONE_ATOMS, BackboneCoords, ResidueBackbone};
use super::chain::Chain;
use super::residue::Residue;
use super::structure::Structure;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartnerError {
    #[error("Chain '{0}' not found in structure")]
    ChainNotFound(char),
    #[error("Structure contains no amino-acid residues")]
    NoResidues,
    #[error("Sequence has {sequence_len} residues but coordinates cover {coords_len}")]
    LengthMismatch {
        sequence_len: usize,
        coords_len: usize,
    },
}

/// One docking partner as seen by the models: its sequence and a parallel array of
/// backbone coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerStructure {
    pub sequence: String,
    pub coords: BackboneCoords,
}

impl PartnerStructure {
    pub fn new(sequence: impl Into<String>, coords: BackboneCoords) -> Self {
        Self {
            sequence: sequence.into(),
            coords,
        }
    }

    /// Extracts the sequence and `N`/`CA`/`C` coordinates of every amino-acid residue.
    ///
    /// With `chain = None` all protein chains are concatenated in file order. Residues
    /// without any backbone atom are skipped; missing backbone atoms of the rest become
    /// NaN. Amino acids outside the code table appear as `X`.
    pub fn from_structure(
        structure: &Structure,
        chain: Option<char>,
    ) -> Result<Self, PartnerError> {
        let chains: Vec<&Chain> = match chain {
            Some(id) => vec![structure.chain(id).ok_or(PartnerError::ChainNotFound(id))?],
            None => structure.chains().iter().filter(|c| c.is_protein()).collect(),
        };

        let residues: Vec<&Residue> = chains
            .iter()
            .flat_map(|c| c.residues().iter())
            .filter(|r| r.is_amino_acid() && r.has_backbone())
            .collect();
        if residues.is_empty() {
            return Err(PartnerError::NoResidues);
        }

        let sequence: String = residues.iter().map(|r| r.one_letter_code()).collect();
        let coords = residues.iter().map(|r| residue_backbone(r)).collect();

        Ok(Self {
            sequence,
            coords: BackboneCoords::new(coords),
        })
    }

    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Checks the sequence/coordinate parallelism and that the partner is non-empty.
    pub fn validate(&self) -> Result<(), PartnerError> {
        if self.is_empty() {
            return Err(PartnerError::NoResidues);
        }
        let sequence_len = self.len();
        if sequence_len != self.coords.len() {
            return Err(PartnerError::LengthMismatch {
                sequence_len,
                coords_len: self.coords.len(),
            });
        }
        Ok(())
    }

    /// Returns a copy whose coordinates contain no NaN.
    pub fn sanitized(&self) -> Self {
        Self {
            sequence: self.sequence.clone(),
            coords: self.coords.sanitized(),
        }
    }
}

fn residue_backbone(residue: &Residue) -> ResidueBackbone {
    BACKBONE_ATOMS.map(|name| {
        residue
            .atom(name)
            .map(|a| a.position.cast::<f32>())
            .unwrap_or_else(|| Point3::new(f32::NAN, f32::NAN, f32::NAN))
    })
}
