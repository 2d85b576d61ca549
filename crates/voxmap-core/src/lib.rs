//! Shared types for the voxmap crates.
//!
//! This crate provides:
//!
//! - [`VoxmapError`]: the error type used across all voxmap crates
//! - [`VoxmapConfig`]: configuration loaded from `.voxmap.toml`
//! - [`ArtifactKind`], [`MatchCandidate`], [`TranscriptMatch`]: the match
//!   result model
//! - [`OutputFormat`]: output format selection for the CLI

pub mod config;
pub mod error;
pub mod types;

pub use config::{IndexConfig, MatchConfig, VoxmapConfig};
pub use error::VoxmapError;
pub use types::{ArtifactKind, MatchCandidate, OutputFormat, TranscriptMatch};

/// Convenience alias used across the voxmap crates.
pub type Result<T> = std::result::Result<T, VoxmapError>;
