//! # Multilingual Sentiment
//!
//! Data preparation, training and inference for an English/French/Arabic sentiment
//! classifier built on Burn.
#![forbid(unsafe_code)]

/// Text normalization, tokenization and padding
pub mod text;

/// Raw sources and the merged dataset
pub mod datasets;

/// Pipelines
pub mod pipelines;

/// Utilities
pub mod utils;

/// CLI helpers shared by the binaries
pub mod cli;

/// Error macros
#[macro_use]
extern crate anyhow;
