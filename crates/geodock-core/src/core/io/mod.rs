//! Provides input/output functionality for partner structure files.
//!
//! [`traits::StructureFile`] is the read/write interface implemented by each
//! supported format, [`pdb`] implements it for PDB, and [`loader`] turns a partner
//! reference into the (sequence, coordinates) pair the runner needs.

pub mod loader;
pub mod pdb;
pub mod traits;
