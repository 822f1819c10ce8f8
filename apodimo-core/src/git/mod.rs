//! Git operations for Apodimo
//!
//! This module provides history-preserving repository mirroring between the
//! source and destination remotes.

mod mirror;

pub use mirror::{GitMirror, MirrorRemote, MirrorStats, RepoMirror};
