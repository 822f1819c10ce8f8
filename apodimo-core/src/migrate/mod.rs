//! Migration orchestration
//!
//! One procedure per entity kind, each following the same shape:
//! 1. List parent entities from the source
//! 2. Fan out per parent (bounded, awaited to completion)
//! 3. Check-then-create each child in the destination by exact name
//! 4. Recurse into grandchildren (columns, work items)
//!
//! Every procedure returns a [`PhaseReport`]; failures are attributed to
//! the entity they happened on and never abort sibling work.

mod boards;
mod fanout;
mod iterations;
mod members;
mod report;
mod repositories;
mod wiki;
mod work_items;

#[cfg(test)]
mod testing;

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::info;

use crate::destination::DestinationClient;
use crate::git::{MirrorRemote, RepoMirror};
use crate::source::SourceClient;
use crate::{Error, Result};

pub use boards::{project_name, ProjectScope};
pub use iterations::milestone_for_iteration;
pub use members::unique_members;
pub use report::{Disposition, Failure, MigrationReport, Outcome, PhaseReport};

/// Username paired with an Azure DevOps PAT in git URLs; any value works
const SOURCE_GIT_USER: &str = "pat";

/// Username paired with a GitHub token in git URLs
const DESTINATION_GIT_USER: &str = "x-access-token";

/// Entity kinds that can be migrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Repositories,
    Boards,
    Iterations,
    WorkItems,
    TeamMembers,
    Wiki,
}

impl Phase {
    /// Every phase in dependency order (milestones before the issues using them)
    pub const ALL: [Phase; 6] = [
        Phase::Repositories,
        Phase::Boards,
        Phase::Iterations,
        Phase::WorkItems,
        Phase::TeamMembers,
        Phase::Wiki,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Repositories => "repositories",
            Phase::Boards => "boards",
            Phase::Iterations => "iterations",
            Phase::WorkItems => "work-items",
            Phase::TeamMembers => "team-members",
            Phase::Wiki => "wiki",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where to read from, where to write to, and how
#[derive(Clone)]
pub struct MigrationTarget {
    /// Source Azure DevOps project name
    pub source_project: String,
    /// Destination GitHub organization
    pub organization: String,
    /// Destination repository inside the organization
    pub repository: String,
    /// Maximum in-flight entity tasks per level and API requests overall
    pub concurrency: usize,
    /// Report what would be written without writing
    pub dry_run: bool,
    /// Azure DevOps PAT used for mirror clones
    pub source_token: Option<String>,
    /// GitHub token used for mirror pushes
    pub destination_token: Option<String>,
}

impl std::fmt::Debug for MigrationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationTarget")
            .field("source_project", &self.source_project)
            .field("organization", &self.organization)
            .field("repository", &self.repository)
            .field("concurrency", &self.concurrency)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// Drives every migration phase against injected clients
pub struct Migrator<'a> {
    source: &'a dyn SourceClient,
    destination: &'a dyn DestinationClient,
    mirror: &'a dyn RepoMirror,
    target: MigrationTarget,
    limiter: Semaphore,
}

impl<'a> Migrator<'a> {
    pub fn new(
        source: &'a dyn SourceClient,
        destination: &'a dyn DestinationClient,
        mirror: &'a dyn RepoMirror,
        target: MigrationTarget,
    ) -> Self {
        let permits = target.concurrency.max(1);
        Self {
            source,
            destination,
            mirror,
            target,
            limiter: Semaphore::new(permits),
        }
    }

    /// Run the given phases one after another
    pub async fn run(&self, phases: &[Phase]) -> MigrationReport {
        let mut report = MigrationReport::default();

        for &phase in phases {
            info!(phase = %phase, dry_run = self.target.dry_run, "Starting phase");
            let phase_report = self.run_phase(phase).await;
            info!(
                phase = %phase,
                created = phase_report.outcome.created.len(),
                skipped = phase_report.outcome.skipped.len(),
                failed = phase_report.outcome.failures.len(),
                "Phase finished"
            );
            report.phases.push(phase_report);
        }

        report
    }

    /// Run a single phase
    pub async fn run_phase(&self, phase: Phase) -> PhaseReport {
        match phase {
            Phase::Repositories => self.migrate_repositories().await,
            Phase::Boards => self.migrate_boards().await,
            Phase::Iterations => self.migrate_iterations().await,
            Phase::WorkItems => self.migrate_work_items().await,
            Phase::TeamMembers => self.migrate_team_members().await,
            Phase::Wiki => self.migrate_wiki().await,
        }
    }

    /// Await an outbound call while holding a request permit
    async fn call<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| Error::Other("request limiter closed".to_string()))?;
        request.await
    }

    fn concurrency(&self) -> usize {
        self.target.concurrency.max(1)
    }

    fn org(&self) -> &str {
        &self.target.organization
    }

    fn repo(&self) -> &str {
        &self.target.repository
    }

    fn project(&self) -> &str {
        &self.target.source_project
    }

    fn source_remote(&self, url: &str) -> MirrorRemote {
        let remote = MirrorRemote::new(url);
        match &self.target.source_token {
            Some(token) => remote.with_credentials(SOURCE_GIT_USER, token.clone()),
            None => remote,
        }
    }

    fn destination_remote(&self, url: &str) -> MirrorRemote {
        let remote = MirrorRemote::new(url);
        match &self.target.destination_token {
            Some(token) => remote.with_credentials(DESTINATION_GIT_USER, token.clone()),
            None => remote,
        }
    }
}
