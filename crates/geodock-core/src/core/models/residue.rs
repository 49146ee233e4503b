use super::atom::Atom;
use super::backbone::BACKBONE_ATOMS;
use phf::{Map, phf_map};

/// One-letter code used for residues without a standard mapping.
pub const UNKNOWN_RESIDUE_CODE: char = 'X';

#[rustfmt::skip]
static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    // --- Standard amino acids ---
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',

    // --- Non-standard but genetically encoded ---
    "SEC" => 'U', "PYL" => 'O',

    // --- Protonation-state and force-field variants ---
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "CYM" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',

    // --- Common modified residues ---
    "MSE" => 'M',
};

#[rustfmt::skip]
static ONE_TO_THREE: Map<char, &'static str> = phf_map! {
    'A' => "ALA", 'R' => "ARG", 'N' => "ASN", 'D' => "ASP", 'C' => "CYS",
    'Q' => "GLN", 'E' => "GLU", 'G' => "GLY", 'H' => "HIS", 'I' => "ILE",
    'L' => "LEU", 'K' => "LYS", 'M' => "MET", 'F' => "PHE", 'P' => "PRO",
    'S' => "SER", 'T' => "THR", 'W' => "TRP", 'Y' => "TYR", 'V' => "VAL",
    'U' => "SEC", 'O' => "PYL",
};

/// Returns the canonical three-letter name for a one-letter code, `UNK` if unknown.
pub fn three_letter_code(code: char) -> &'static str {
    ONE_TO_THREE
        .get(&code.to_ascii_uppercase())
        .copied()
        .unwrap_or("UNK")
}

/// Returns the one-letter code for a three-letter residue name, if it is a known amino acid.
pub fn one_letter_code(residue_name: &str) -> Option<char> {
    THREE_TO_ONE.get(residue_name.trim()).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: isize,                     // Residue sequence number from source file
    pub insertion_code: Option<char>,  // PDB insertion code, if any
    pub name: String,                  // Three-letter residue name (e.g., "ALA")
    pub is_hetero: bool,               // Read from HETATM records
    pub(crate) atoms: Vec<Atom>,       // Atoms in file order
}

impl Residue {
    pub fn new(id: isize, insertion_code: Option<char>, name: &str) -> Self {
        Self {
            id,
            insertion_code,
            name: name.to_string(),
            is_hetero: false,
            atoms: Vec::new(),
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Adds an atom unless one with the same name is already present.
    ///
    /// Returns `false` when the atom was ignored. Alternate locations after the
    /// first are dropped this way.
    pub fn add_atom(&mut self, atom: Atom) -> bool {
        if self.atom(&atom.name).is_some() {
            return false;
        }
        self.atoms.push(atom);
        true
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn one_letter_code(&self) -> char {
        one_letter_code(&self.name).unwrap_or(UNKNOWN_RESIDUE_CODE)
    }

    /// True if at least one of `N`, `CA`, `C` is present.
    pub fn has_backbone(&self) -> bool {
        BACKBONE_ATOMS.iter().any(|name| self.atom(name).is_some())
    }

    /// Known amino-acid names count regardless of their atoms; modified or
    /// unlisted residues count when they carry `CA` plus `N` or `C`.
    pub fn is_amino_acid(&self) -> bool {
        if one_letter_code(&self.name).is_some() {
            return true;
        }
        self.atom("CA").is_some() && (self.atom("N").is_some() || self.atom("C").is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn three_letter_code_inverts_standard_codes() {
        assert_eq!(three_letter_code('G'), "GLY");
        assert_eq!(three_letter_code('w'), "TRP");
        assert_eq!(three_letter_code('X'), "UNK");
        assert_eq!(one_letter_code(three_letter_code('K')), Some('K'));
    }

    #[test]
    fn one_letter_code_maps_standard_and_variant_names() {
        assert_eq!(one_letter_code("ALA"), Some('A'));
        assert_eq!(one_letter_code("TRP"), Some('W'));
        assert_eq!(one_letter_code("HSE"), Some('H'));
        assert_eq!(one_letter_code("MSE"), Some('M'));
        assert_eq!(one_letter_code(" GLY "), Some('G'));
    }

    #[test]
    fn one_letter_code_returns_none_for_non_amino_acids() {
        assert_eq!(one_letter_code("HOH"), None);
        assert_eq!(one_letter_code("ZN"), None);
    }

    #[test]
    fn modified_residue_with_backbone_is_an_unknown_amino_acid() {
        let mut sep = Residue::new(2, None, "SEP");
        sep.add_atom(Atom::new(1, "N", Point3::new(0.0, 0.0, 0.0)));
        sep.add_atom(Atom::new(2, "CA", Point3::new(1.0, 0.0, 0.0)));
        sep.add_atom(Atom::new(3, "C", Point3::new(2.0, 0.0, 0.0)));
        sep.add_atom(Atom::new(4, "P", Point3::new(3.0, 0.0, 0.0)));
        assert!(sep.is_amino_acid());
        assert!(sep.has_backbone());
        assert_eq!(sep.one_letter_code(), UNKNOWN_RESIDUE_CODE);
    }

    #[test]
    fn calcium_ion_is_not_an_amino_acid() {
        let mut ion = Residue::new(301, None, "CA");
        ion.add_atom(Atom::new(1, "CA", Point3::new(0.0, 0.0, 0.0)));
        assert!(!ion.is_amino_acid());
    }

    #[test]
    fn residue_reports_unknown_code_for_ligands() {
        let residue = Residue::new(1, None, "NAG");
        assert!(!residue.is_amino_acid());
        assert_eq!(residue.one_letter_code(), UNKNOWN_RESIDUE_CODE);
    }

    #[test]
    fn add_atom_keeps_first_copy_of_a_name() {
        let mut residue = Residue::new(5, None, "SER");
        assert!(residue.add_atom(Atom::new(1, "CA", Point3::new(1.0, 0.0, 0.0))));
        assert!(!residue.add_atom(Atom::new(2, "CA", Point3::new(9.0, 0.0, 0.0))));
        assert_eq!(residue.atoms().len(), 1);
        assert_eq!(residue.atom("CA").unwrap().position.x, 1.0);
    }

    #[test]
    fn atom_lookup_returns_none_for_missing_name() {
        let mut residue = Residue::new(2, Some('A'), "LEU");
        residue.add_atom(Atom::new(1, "N", Point3::origin()));
        assert!(residue.atom("CB").is_none());
    }
}
