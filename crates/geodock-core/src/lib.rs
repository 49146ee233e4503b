//! # GeoDock Core Library
//!
//! Orchestration layer for pretrained protein-protein docking. Given two partner
//! structures, the library extracts their sequences and backbone coordinates, embeds
//! them with a pretrained protein language model, and hands the embeddings to a
//! pretrained geometric docking model that predicts the bound complex.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless structure models (`Structure`,
//!   `PartnerStructure`, `BackboneCoords`) and PDB input/output.
//!
//! - **[`engine`]: The Model Layer.** Device selection, configuration, the error
//!   taxonomy, the sequence alphabet, and the capability traits (`SequenceEncoder`,
//!   `DockingPredictor`, `ModelBackend`) behind which the pretrained networks live.
//!   The networks themselves are external collaborators; the bundled
//!   [`engine::bridge`] backend drives them as long-lived worker processes.
//!
//! - **[`workflows`]: The Public API.** [`workflows::runner::DockingRunner`] owns the
//!   loaded model handles and exposes the `embed` and `dock` operations.

pub mod core;
pub mod engine;
pub mod workflows;
