//! Work item migration: backlog work items become issues

use std::collections::HashMap;

use tracing::{debug, info};

use super::fanout::{fan_out, gather};
use super::{Disposition, Migrator, Outcome, Phase, PhaseReport};
use crate::mapping::map_work_item;
use crate::model::{BacklogLevel, Iteration, Team, WorkItem};
use crate::Result;

/// Destination milestone numbers keyed by title
type MilestoneIndex = HashMap<String, u64>;

impl Migrator<'_> {
    /// Create one issue per work item found on any team backlog level
    ///
    /// Issues are not deduplicated against the destination; running this
    /// phase twice creates every issue twice.
    pub async fn migrate_work_items(&self) -> PhaseReport {
        info!(project = %self.project(), "Migrating work items");
        let mut outcome = Outcome::default();

        let milestones: MilestoneIndex = match self
            .call(self.destination.milestones(self.org(), self.repo()))
            .await
        {
            Ok(list) => list.into_iter().map(|m| (m.title, m.number)).collect(),
            Err(e) => {
                // Issues are still created, just without milestones
                outcome.fail(format!("milestones of {}/{}", self.org(), self.repo()), &e);
                MilestoneIndex::new()
            }
        };

        let teams = match self.call(self.source.teams(self.project())).await {
            Ok(teams) => teams,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::WorkItems,
                    format!("teams of {}", self.project()),
                    &e,
                )
                .with_outcome(outcome)
            }
        };

        let milestones = &milestones;
        let teams_outcome = gather(teams, self.concurrency(), |team| async move {
            self.migrate_team_work_items(&team, milestones).await
        })
        .await;
        outcome.merge(teams_outcome);

        PhaseReport::new(Phase::WorkItems).with_outcome(outcome)
    }

    async fn migrate_team_work_items(&self, team: &Team, milestones: &MilestoneIndex) -> Outcome {
        let (iterations, levels) = futures::join!(
            self.call(self.source.team_iterations(team)),
            self.call(self.source.backlogs(team)),
        );

        let mut outcome = Outcome::default();
        let (iterations, levels) = match (iterations, levels) {
            (Ok(iterations), Ok(levels)) => (iterations, levels),
            (Err(e), _) => {
                outcome.fail(format!("iterations of team {}", team.name), &e);
                return outcome;
            }
            (_, Err(e)) => {
                outcome.fail(format!("backlogs of team {}", team.name), &e);
                return outcome;
            }
        };
        debug!(
            team = %team.name,
            iterations = iterations.len(),
            levels = levels.len(),
            "Loaded team backlog configuration"
        );

        let iterations = &iterations;
        let levels_outcome = gather(levels, self.concurrency(), |level| async move {
            self.migrate_backlog_level(team, &level, iterations, milestones)
                .await
        })
        .await;
        outcome.merge(levels_outcome);

        outcome
    }

    async fn migrate_backlog_level(
        &self,
        team: &Team,
        level: &BacklogLevel,
        iterations: &[Iteration],
        milestones: &MilestoneIndex,
    ) -> Outcome {
        let entity = || format!("backlog {} of team {}", level.name, team.name);

        let refs = match self
            .call(self.source.backlog_work_items(team, &level.id))
            .await
        {
            Ok(refs) => refs,
            Err(e) => return failed(entity(), &e),
        };

        if refs.is_empty() {
            debug!(team = %team.name, backlog = %level.name, "Backlog level is empty");
            return Outcome::default();
        }

        let ids: Vec<i64> = refs.iter().map(|r| r.id).collect();
        let items = match self.call(self.source.work_items(&ids)).await {
            Ok(items) => items,
            Err(e) => return failed(entity(), &e),
        };
        info!(
            team = %team.name,
            backlog = %level.name,
            count = items.len(),
            "Found work items"
        );

        gather(items, self.concurrency(), |item| async move {
            let result = self.migrate_work_item(&item, iterations, milestones).await;
            Outcome::of(format!("#{} {}", item.id, item.title), result)
        })
        .await
    }

    async fn migrate_work_item(
        &self,
        item: &WorkItem,
        iterations: &[Iteration],
        milestones: &MilestoneIndex,
    ) -> Result<Disposition> {
        let issue = map_work_item(item, iterations);
        let milestone = issue.milestone.as_deref().and_then(|title| {
            let number = milestones.get(title).copied();
            if number.is_none() {
                debug!(work_item = item.id, milestone = %title, "No destination milestone with this title");
            }
            number
        });

        if self.target.dry_run {
            info!(
                work_item = item.id,
                title = %issue.title,
                labels = ?issue.labels,
                milestone = ?issue.milestone,
                "[DRY RUN] Would create issue"
            );
            return Ok(Disposition::Planned);
        }

        let number = self
            .call(
                self.destination
                    .create_issue(self.org(), self.repo(), &issue, milestone),
            )
            .await?;
        info!(work_item = item.id, issue = number, title = %issue.title, "Issue created");

        Ok(Disposition::Created)
    }
}

fn failed(entity: String, error: &crate::Error) -> Outcome {
    let mut outcome = Outcome::default();
    outcome.fail(entity, error);
    outcome
}
