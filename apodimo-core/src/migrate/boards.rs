//! Board migration: boards become classic projects, board columns become project columns

use tracing::{debug, info, warn};

use super::fanout::{fan_out, gather};
use super::{Disposition, Migrator, Outcome, Phase, PhaseReport};
use crate::model::{Board, BoardDetail, DestProject, Team};
use crate::Result;

/// Where the destination project of a board lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    /// One organization project per board (multi-repository source projects)
    Organization,
    /// One project per team in the destination repository
    Repository,
}

impl ProjectScope {
    /// Scope implied by the number of repositories in the source project
    pub fn for_repository_count(count: usize) -> Self {
        if count > 1 {
            ProjectScope::Organization
        } else {
            ProjectScope::Repository
        }
    }
}

/// Destination project name for a team's board
pub fn project_name(scope: ProjectScope, team: &str, board: &str) -> String {
    match scope {
        ProjectScope::Organization => format!("{} {}", team, board),
        ProjectScope::Repository => team.to_string(),
    }
}

impl Migrator<'_> {
    /// Recreate every team board as a destination project with matching columns
    ///
    /// A board whose project already exists is skipped entirely, columns
    /// included. Cards are not migrated.
    pub async fn migrate_boards(&self) -> PhaseReport {
        info!(project = %self.project(), "Migrating boards");

        let (repos, teams) = futures::join!(
            self.call(self.source.repositories(self.project())),
            self.call(self.source.teams(self.project())),
        );
        let repos = match repos {
            Ok(repos) => repos,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::Boards,
                    format!("repositories of {}", self.project()),
                    &e,
                )
            }
        };
        let teams = match teams {
            Ok(teams) => teams,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::Boards,
                    format!("teams of {}", self.project()),
                    &e,
                )
            }
        };

        let scope = ProjectScope::for_repository_count(repos.len());
        info!(
            repositories = repos.len(),
            teams = teams.len(),
            ?scope,
            "Resolved board destination scope"
        );

        let outcome = gather(teams, self.concurrency(), |team| async move {
            self.migrate_team_boards(&team, scope).await
        })
        .await;

        PhaseReport::new(Phase::Boards).with_outcome(outcome)
    }

    async fn migrate_team_boards(&self, team: &Team, scope: ProjectScope) -> Outcome {
        let mut outcome = Outcome::default();

        let boards = match self.call(self.source.boards(team)).await {
            Ok(boards) => boards,
            Err(e) => {
                outcome.fail(format!("boards of team {}", team.name), &e);
                return outcome;
            }
        };
        info!(team = %team.name, count = boards.len(), "Found boards");

        let details = fan_out(boards, self.concurrency(), |board: Board| async move {
            let detail = self.call(self.source.board(team, &board.id)).await;
            (board, detail)
        })
        .await;

        // Sequential so boards mapping to the same project name see each other
        for (board, detail) in details {
            match detail {
                Ok(detail) => {
                    let name = project_name(scope, &team.name, &detail.name);
                    let result = self.migrate_board(&name, &detail, scope).await;
                    outcome.record(name, result);
                }
                Err(e) => outcome.fail(format!("board {} of team {}", board.name, team.name), &e),
            }
        }

        outcome
    }

    async fn migrate_board(
        &self,
        name: &str,
        detail: &BoardDetail,
        scope: ProjectScope,
    ) -> Result<Disposition> {
        debug!(project = %name, ?scope, "Checking destination project");
        let existing = match scope {
            ProjectScope::Organization => {
                self.call(self.destination.find_org_project(self.org(), name))
                    .await?
            }
            ProjectScope::Repository => {
                self.call(self.destination.find_repo_project(self.org(), self.repo(), name))
                    .await?
            }
        };

        if existing.is_some() {
            info!(project = %name, "Project already exists in GitHub, skipping");
            return Ok(Disposition::Skipped);
        }

        if self.target.dry_run {
            info!(
                project = %name,
                columns = detail.columns.len(),
                "[DRY RUN] Would create project"
            );
            return Ok(Disposition::Planned);
        }

        info!(project = %name, "Creating GitHub project");
        let project = match scope {
            ProjectScope::Organization => {
                self.call(self.destination.create_org_project(self.org(), name))
                    .await?
            }
            ProjectScope::Repository => {
                self.call(self.destination.create_repo_project(self.org(), self.repo(), name))
                    .await?
            }
        };

        if let Err(e) = self.sync_columns(&project, detail).await {
            // A half-built project would be skipped forever by name
            warn!(project = %name, error = %e, "Column sync failed, removing project");
            if let Err(delete_err) = self.call(self.destination.delete_project(project.id)).await {
                warn!(project = %name, error = %delete_err, "Failed to remove project");
            }
            return Err(e);
        }

        Ok(Disposition::Created)
    }

    /// Create the board's missing columns in board order
    async fn sync_columns(&self, project: &DestProject, detail: &BoardDetail) -> Result<usize> {
        let existing = self
            .call(self.destination.project_columns(project.id))
            .await?;
        debug!(
            project = %project.name,
            columns = ?existing.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "Existing project columns"
        );

        let mut created = 0;
        for column in &detail.columns {
            if existing.iter().any(|c| c.name == column.name) {
                debug!(project = %project.name, column = %column.name, "Column exists, skipping");
                continue;
            }

            debug!(project = %project.name, column = %column.name, "Creating column");
            self.call(self.destination.create_project_column(project.id, &column.name))
                .await?;
            created += 1;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{
        board, repository, target, team, FakeDestination, FakeMirror, FakeSource,
    };
    use super::*;

    fn single_repo_source() -> FakeSource {
        let core = team("Core");
        FakeSource {
            repositories: vec![repository("app")],
            boards: [(
                core.id.clone(),
                vec![board("b1", "Stories", &["New", "Active", "Closed"])],
            )]
            .into_iter()
            .collect(),
            teams: vec![core],
            ..Default::default()
        }
    }

    #[test]
    fn test_project_name_by_scope() {
        assert_eq!(
            project_name(ProjectScope::for_repository_count(2), "Core", "Stories"),
            "Core Stories"
        );
        assert_eq!(
            project_name(ProjectScope::for_repository_count(1), "Core", "Stories"),
            "Core"
        );
        assert_eq!(ProjectScope::for_repository_count(0), ProjectScope::Repository);
    }

    #[tokio::test]
    async fn test_single_repository_maps_to_repo_project() {
        let source = single_repo_source();
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        let report = migrator.migrate_boards().await;

        assert_eq!(report.outcome.created, vec!["Core"]);
        let state = destination.state.lock().unwrap();
        assert!(state.org_projects.is_empty());
        assert_eq!(state.repo_projects.len(), 1);
        let columns: Vec<_> = state.columns[&state.repo_projects[0].id]
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(columns, vec!["New", "Active", "Closed"]);
    }

    #[tokio::test]
    async fn test_multiple_repositories_map_to_org_projects() {
        let mut source = single_repo_source();
        source.repositories.push(repository("docs"));
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        let report = migrator.migrate_boards().await;

        assert_eq!(report.outcome.created, vec!["Core Stories"]);
        let state = destination.state.lock().unwrap();
        assert_eq!(state.org_projects[0].name, "Core Stories");
        assert!(state.repo_projects.is_empty());
    }

    #[tokio::test]
    async fn test_existing_project_is_skipped_with_columns() {
        let mut source = single_repo_source();
        source.repositories.push(repository("docs"));
        let destination = FakeDestination::default();
        destination.seed_org_project("Core Stories");
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        let report = migrator.migrate_boards().await;

        assert_eq!(report.outcome.skipped, vec!["Core Stories"]);
        let state = destination.state.lock().unwrap();
        assert_eq!(state.org_projects.len(), 1);
        assert!(state.columns.is_empty());
    }

    #[tokio::test]
    async fn test_second_run_creates_no_duplicate_project() {
        let source = single_repo_source();
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        migrator.migrate_boards().await;
        let second = migrator.migrate_boards().await;

        assert_eq!(second.outcome.skipped, vec!["Core"]);
        assert_eq!(destination.state.lock().unwrap().repo_projects.len(), 1);
    }

    #[tokio::test]
    async fn test_boards_sharing_team_project_name() {
        let core = team("Core");
        let source = FakeSource {
            repositories: vec![repository("app")],
            boards: [(
                core.id.clone(),
                vec![
                    board("b1", "Stories", &["New"]),
                    board("b2", "Features", &["New"]),
                ],
            )]
            .into_iter()
            .collect(),
            teams: vec![core],
            ..Default::default()
        };
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        let report = migrator.migrate_boards().await;

        assert_eq!(report.outcome.created, vec!["Core"]);
        assert_eq!(report.outcome.skipped, vec!["Core"]);
        assert_eq!(destination.state.lock().unwrap().repo_projects.len(), 1);
    }

    #[tokio::test]
    async fn test_column_failure_removes_new_project() {
        let source = single_repo_source();
        let destination = FakeDestination {
            failing: ["create_project_column:Active".to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        let report = migrator.migrate_boards().await;

        assert_eq!(report.outcome.failures.len(), 1);
        assert_eq!(report.outcome.failures[0].entity, "Core");
        let state = destination.state.lock().unwrap();
        assert!(state.repo_projects.is_empty());
        assert_eq!(state.deleted_projects.len(), 1);
    }

    #[tokio::test]
    async fn test_team_failure_is_isolated() {
        let mut source = single_repo_source();
        let ops = team("Ops");
        source
            .boards
            .insert(ops.id.clone(), vec![board("b9", "Ops Board", &["Todo"])]);
        source.teams.push(ops);
        source.failing.insert("boards:Core".to_string());
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&source, &destination, &mirror, target());

        let report = migrator.migrate_boards().await;

        assert_eq!(report.outcome.created, vec!["Ops"]);
        assert_eq!(report.outcome.failures[0].entity, "boards of team Core");
    }
}
