//! Team member migration: members become repository collaborators

use std::collections::HashSet;

use tracing::{debug, info};

use super::fanout::{fan_out, gather};
use super::{Disposition, Migrator, Outcome, Phase, PhaseReport};
use crate::model::{Permission, Team, TeamMember};
use crate::Result;

/// Permission granted to every migrated member
const COLLABORATOR_PERMISSION: Permission = Permission::Push;

/// Merge per-team member lists in team order, keeping the first occurrence
/// of every unique name
pub fn unique_members(per_team: impl IntoIterator<Item = Vec<TeamMember>>) -> Vec<TeamMember> {
    let mut seen = HashSet::new();
    per_team
        .into_iter()
        .flatten()
        .filter(|member| seen.insert(member.identity.unique_name.clone()))
        .collect()
}

impl Migrator<'_> {
    /// Add every distinct team member as a collaborator of the destination repository
    ///
    /// Usernames are taken verbatim from the Azure DevOps unique name.
    pub async fn migrate_team_members(&self) -> PhaseReport {
        info!(project = %self.project(), "Migrating team members");

        let teams = match self.call(self.source.teams(self.project())).await {
            Ok(teams) => teams,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::TeamMembers,
                    format!("teams of {}", self.project()),
                    &e,
                )
            }
        };

        let per_team = fan_out(teams, self.concurrency(), |team: Team| async move {
            let members = self.call(self.source.team_members(&team)).await;
            (team, members)
        })
        .await;

        let mut outcome = Outcome::default();
        let mut lists = Vec::with_capacity(per_team.len());
        for (team, result) in per_team {
            match result {
                Ok(members) => {
                    debug!(team = %team.name, count = members.len(), "Found team members");
                    lists.push(members);
                }
                Err(e) => outcome.fail(format!("members of team {}", team.name), &e),
            }
        }

        let members = unique_members(lists);
        info!(count = members.len(), "Unique team members");

        let added = gather(members, self.concurrency(), |member| async move {
            let username = member.identity.unique_name;
            let result = self.add_member(&username).await;
            Outcome::of(username, result)
        })
        .await;
        outcome.merge(added);

        PhaseReport::new(Phase::TeamMembers).with_outcome(outcome)
    }

    async fn add_member(&self, username: &str) -> Result<Disposition> {
        if self.target.dry_run {
            info!(
                user = %username,
                permission = %COLLABORATOR_PERMISSION,
                "[DRY RUN] Would add collaborator"
            );
            return Ok(Disposition::Planned);
        }

        info!(user = %username, permission = %COLLABORATOR_PERMISSION, "Adding collaborator");
        self.call(self.destination.add_collaborator(
            self.org(),
            self.repo(),
            username,
            COLLABORATOR_PERMISSION,
        ))
        .await?;

        Ok(Disposition::Created)
    }
}
