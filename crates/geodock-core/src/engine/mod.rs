//! # Engine Module
//!
//! Everything between a loaded partner structure and a predicted complex: the
//! compute device, the model handles, and the data that flows between them.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Runner settings and their builder
//! - **Devices** ([`device`]) - Explicit CPU / accelerator selection
//! - **Error Handling** ([`error`]) - The runner's error taxonomy
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for front-ends
//! - **Tokenization** ([`alphabet`]) - The encoder vocabulary and batch converter
//! - **Model Interfaces** ([`encoder`], [`predictor`], [`backend`]) - Capability traits
//!   for the pretrained networks and the factory that loads them
//! - **Embeddings** ([`embedding`]) - Per-partner representations paired with coordinates
//! - **Checkpoints** ([`checkpoint`]) - Validation of the docking-model checkpoint path
//! - **Worker Bridge** ([`bridge`]) - A backend hosting each model in a long-lived
//!   external process

pub mod alphabet;
pub mod backend;
pub mod bridge;
pub mod checkpoint;
pub mod config;
pub mod device;
pub mod embedding;
pub mod encoder;
pub mod error;
pub mod predictor;
pub mod progress;
