use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;

/// A complete molecular structure: an ordered list of chains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn add_chain(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residues.len()).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter())
            .map(|r| r.atoms.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.residue_count() == 0
    }
}

/// Incrementally assembles a [`Structure`] from a stream of atom records.
///
/// A new residue is opened whenever the chain, residue number, or insertion code
/// changes between consecutive records.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    structure: Structure,
    current_chain: Option<Chain>,
    current_residue: Option<Residue>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_chain(&mut self, id: char) {
        self.flush_chain();
        self.current_chain = Some(Chain::new(id));
    }

    pub fn start_residue(
        &mut self,
        id: isize,
        insertion_code: Option<char>,
        name: &str,
        is_hetero: bool,
    ) {
        self.flush_residue();
        let mut residue = Residue::new(id, insertion_code, name);
        residue.is_hetero = is_hetero;
        self.current_residue = Some(residue);
    }

    pub fn current_chain_id(&self) -> Option<char> {
        self.current_chain.as_ref().map(|c| c.id)
    }

    pub fn current_residue_key(&self) -> Option<(isize, Option<char>)> {
        self.current_residue
            .as_ref()
            .map(|r| (r.id, r.insertion_code))
    }

    /// Adds an atom to the open residue. Returns `false` if there is no open residue
    /// or the residue already holds an atom of that name.
    pub fn add_atom(&mut self, atom: Atom) -> bool {
        match self.current_residue.as_mut() {
            Some(residue) => residue.add_atom(atom),
            None => false,
        }
    }

    pub fn build(mut self) -> Structure {
        self.flush_chain();
        self.structure
    }

    fn flush_residue(&mut self) {
        if let Some(residue) = self.current_residue.take() {
            if let Some(chain) = self.current_chain.as_mut() {
                chain.add_residue(residue);
            }
        }
    }

    fn flush_chain(&mut self) {
        self.flush_residue();
        if let Some(chain) = self.current_chain.take() {
            if !chain.residues.is_empty() {
                self.structure.add_chain(chain);
            }
        }
    }
}
