//! Transcript-to-artifact matching.
//!
//! Resolves spoken-style transcripts against a
//! [`voxmap_index::ArtifactIndex`]: a greedy phrase pass over component and
//! file names, then a scored per-word pass over files, components, and
//! functions. [`Session`] wraps an index and its tree watcher behind an
//! initialize/find/dispose lifecycle for long-running use.

pub mod matcher;
pub mod score;
pub mod session;

pub use matcher::{find_in_transcript, find_in_transcript_with, MatchOptions};
pub use score::score;
pub use session::Session;
