//! # Workflows Module
//!
//! High-level entry points that drive a complete docking run.
//!
//! ## Overview
//!
//! [`runner::DockingRunner`] owns the compute device and both pretrained model
//! handles. It resolves partner files, sanitizes their coordinates, embeds both
//! partners in one encoder pass, and asks the docking model for the bound complex,
//! optionally persisting it as PDB.
//!
//! Construction either fully succeeds or returns an error, so a runner in hand is
//! always ready; `embed` and `dock` may be called any number of times.

pub mod runner;
