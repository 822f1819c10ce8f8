//! Apodimo GitHub - migration destination backed by the GitHub REST API
//!
//! This crate writes migrated entities to GitHub:
//! - Organization repositories
//! - Classic projects (organization and repository scoped) and their columns
//! - Milestones and issues
//! - Repository collaborators

mod client;
mod collaborators;
mod destination;
mod error;
mod issues;
mod pagination;
mod projects;
mod repos;

pub use client::{GitHubClient, GitHubClientBuilder, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use pagination::PER_PAGE;
