//! Iteration migration: team iterations become repository milestones

use std::collections::HashSet;

use tracing::{debug, info};

use super::fanout::{fan_out, gather};
use super::{Disposition, Migrator, Outcome, Phase, PhaseReport};
use crate::mapping;
use crate::model::{Iteration, MilestoneState, NewMilestone};
use crate::Result;

/// Milestone payload for an iteration
pub fn milestone_for_iteration(iteration: &Iteration) -> NewMilestone {
    NewMilestone {
        title: iteration.name.clone(),
        state: MilestoneState::Open,
        description: String::new(),
        due_on: iteration.finish_date.as_ref().map(mapping::due_on),
    }
}

impl Migrator<'_> {
    /// Create one open milestone per distinct iteration name across all teams
    pub async fn migrate_iterations(&self) -> PhaseReport {
        info!(project = %self.project(), "Migrating iterations");

        let teams = match self.call(self.source.teams(self.project())).await {
            Ok(teams) => teams,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::Iterations,
                    format!("teams of {}", self.project()),
                    &e,
                )
            }
        };

        let per_team = fan_out(teams, self.concurrency(), |team| async move {
            let iterations = self.call(self.source.team_iterations(&team)).await;
            (team, iterations)
        })
        .await;

        let mut outcome = Outcome::default();
        let mut seen = HashSet::new();
        let mut iterations = Vec::new();
        for (team, result) in per_team {
            match result {
                Ok(list) => {
                    debug!(team = %team.name, count = list.len(), "Found iterations");
                    for iteration in list {
                        // Teams commonly share the project's sprints
                        if seen.insert(iteration.name.clone()) {
                            iterations.push(iteration);
                        }
                    }
                }
                Err(e) => outcome.fail(format!("iterations of team {}", team.name), &e),
            }
        }

        let existing = match self
            .call(self.destination.milestones(self.org(), self.repo()))
            .await
        {
            Ok(milestones) => milestones
                .into_iter()
                .map(|m| m.title)
                .collect::<HashSet<_>>(),
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::Iterations,
                    format!("milestones of {}/{}", self.org(), self.repo()),
                    &e,
                )
                .with_outcome(outcome)
            }
        };

        let existing = &existing;
        let created = gather(iterations, self.concurrency(), |iteration| async move {
            let result = self.migrate_iteration(&iteration, existing).await;
            Outcome::of(iteration.name, result)
        })
        .await;
        outcome.merge(created);

        PhaseReport::new(Phase::Iterations).with_outcome(outcome)
    }

    async fn migrate_iteration(
        &self,
        iteration: &Iteration,
        existing: &HashSet<String>,
    ) -> Result<Disposition> {
        if existing.contains(&iteration.name) {
            info!(milestone = %iteration.name, "Milestone already exists in GitHub, skipping");
            return Ok(Disposition::Skipped);
        }

        let milestone = milestone_for_iteration(iteration);
        if self.target.dry_run {
            info!(
                milestone = %milestone.title,
                due_on = milestone.due_on.as_deref().unwrap_or("-"),
                "[DRY RUN] Would create milestone"
            );
            return Ok(Disposition::Planned);
        }

        info!(milestone = %milestone.title, "Creating GitHub milestone");
        let created = self
            .call(
                self.destination
                    .create_milestone(self.org(), self.repo(), &milestone),
            )
            .await?;
        debug!(milestone = %created.title, number = created.number, "Milestone created");

        Ok(Disposition::Created)
    }
}
