//! # Core Module
//!
//! Structure models and file I/O for docking partners.
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, chains, whole structures,
//!   and the per-partner view (sequence + backbone coordinates) consumed by the engine.
//! - **File I/O** ([`io`]) - Reading and writing PDB files, and the `StructureLoader`
//!   seam used by the runner to resolve partner references.

pub mod io;
pub mod models;
