use super::residue::Residue;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,                     // Chain identifier (e.g., 'A', 'B')
    pub(crate) residues: Vec<Residue>, // Residues in file order
}

impl Chain {
    pub fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn add_residue(&mut self, residue: Residue) {
        self.residues.push(residue);
    }

    /// True if any residue of the chain is a recognized amino acid.
    pub fn is_protein(&self) -> bool {
        self.residues.iter().any(Residue::is_amino_acid)
    }
}
