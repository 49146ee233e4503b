//! # Core Models Module
//!
//! Data structures describing docking partners.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom record with its coordinates
//! - [`residue`] - Residues, and the static amino-acid code tables
//! - [`chain`] - An ordered run of residues sharing a chain identifier
//! - [`structure`] - A complete structure as read from or written to a file
//! - [`backbone`] - Per-residue `N`, `CA`, `C` coordinates and their sanitization
//! - [`partner`] - The (sequence, backbone) view of one docking partner
//!
//! ## Usage
//!
//! ```ignore
//! use geodock::core::io::{pdb::PdbFile, traits::StructureFile};
//! use geodock::core::models::partner::PartnerStructure;
//!
//! let (structure, _) = PdbFile::read_from_path("receptor.pdb")?;
//! let partner = PartnerStructure::from_structure(&structure, None)?;
//! let coords = partner.coords.sanitized();
//! ```

pub mod atom;
pub mod backbone;
pub mod chain;
pub mod partner;
pub mod residue;
pub mod structure;
