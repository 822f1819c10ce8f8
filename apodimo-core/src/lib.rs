//! Apodimo Core - Azure DevOps to GitHub migration engine
//!
//! This crate holds the vendor-neutral pieces of a migration: the entity
//! model, the source and destination capability traits, the work item field
//! mapper, the git mirror step and the phase orchestrator.

pub mod config;
pub mod destination;
pub mod error;
pub mod git;
pub mod mapping;
pub mod migrate;
pub mod model;
pub mod secrets;
pub mod source;

pub use config::{Config, HttpConfig, MigrationConfig};
pub use destination::DestinationClient;
pub use error::{Error, Result};
pub use git::{GitMirror, MirrorRemote, MirrorStats, RepoMirror};
pub use migrate::{MigrationReport, MigrationTarget, Migrator, Outcome, Phase, PhaseReport};
pub use secrets::Secrets;
pub use source::SourceClient;
