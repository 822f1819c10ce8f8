//! Repository migration: create missing repositories and mirror their history

use tracing::{debug, info, warn};

use super::fanout::gather;
use super::{Disposition, Migrator, Outcome, Phase, PhaseReport};
use crate::model::Repository;
use crate::Result;

impl Migrator<'_> {
    /// Copy every source repository that has no same-named destination repository
    ///
    /// Existing destination repositories are left untouched; their history
    /// is not refreshed. A repository created in this run whose mirror push
    /// fails is deleted again.
    pub async fn migrate_repositories(&self) -> PhaseReport {
        let report = PhaseReport::new(Phase::Repositories);

        info!(project = %self.project(), "Migrating repositories");
        let repos = match self.call(self.source.repositories(self.project())).await {
            Ok(repos) => repos,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::Repositories,
                    format!("repositories of {}", self.project()),
                    &e,
                )
            }
        };

        info!(
            count = repos.len(),
            names = ?repos.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "Found source repositories"
        );

        let outcome = gather(repos, self.concurrency(), |repo| async move {
            let result = self.migrate_repository(&repo).await;
            Outcome::of(repo.name, result)
        })
        .await;

        report.with_outcome(outcome)
    }

    async fn migrate_repository(&self, repo: &Repository) -> Result<Disposition> {
        debug!(repo = %repo.name, org = %self.org(), "Checking destination repository");
        let existing = self
            .call(self.destination.find_org_repository(self.org(), &repo.name))
            .await?;

        if existing.is_some() {
            info!(repo = %repo.name, "Repository already exists in GitHub, skipping");
            return Ok(Disposition::Skipped);
        }

        if self.target.dry_run {
            info!(repo = %repo.name, "[DRY RUN] Would create and mirror repository");
            return Ok(Disposition::Planned);
        }

        info!(repo = %repo.name, "Creating GitHub repository");
        let created = self
            .call(self.destination.create_org_repository(self.org(), &repo.name))
            .await?;

        let source = self.source_remote(&repo.remote_url);
        let destination = self.destination_remote(&created.clone_url);
        let stats = match self.call(self.mirror.mirror(&source, &destination)).await {
            Ok(stats) => stats,
            Err(e) => {
                // An empty repository would be skipped by name on every rerun
                warn!(repo = %repo.name, error = %e, "Mirror failed, removing repository");
                if let Err(delete_err) = self
                    .call(self.destination.delete_repository(self.org(), &repo.name))
                    .await
                {
                    warn!(repo = %repo.name, error = %delete_err, "Failed to remove repository");
                }
                return Err(e);
            }
        };

        info!(
            repo = %repo.name,
            branches = stats.branches,
            tags = stats.tags,
            "Repository mirrored"
        );
        Ok(Disposition::Created)
    }
}
