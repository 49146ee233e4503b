use nalgebra::Point3;

/// Represents a single atom record of a structure.
///
/// Only the fields the docking pipeline reads or writes are kept: identity,
/// element, position, and the two per-atom scalars carried by PDB records.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The element symbol, empty when the source file omits it.
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy of this position.
    pub occupancy: f64,
    /// Temperature factor.
    pub b_factor: f64,
}

impl Atom {
    pub fn new(serial: usize, name: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: guess_element(name),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
        }
    }
}

/// Protein atom names start with their element letter once leading digits are dropped.
fn guess_element(name: &str) -> String {
    name.trim_start_matches(|c: char| c.is_ascii_digit())
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}
