//! In-memory source, destination and mirror doubles for orchestrator tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::MigrationTarget;
use crate::destination::DestinationClient;
use crate::git::{MirrorRemote, MirrorStats, RepoMirror};
use crate::model::*;
use crate::source::SourceClient;
use crate::{Error, Result};

pub fn target() -> MigrationTarget {
    MigrationTarget {
        source_project: "Public".to_string(),
        organization: "contoso".to_string(),
        repository: "public".to_string(),
        concurrency: 4,
        dry_run: false,
        source_token: None,
        destination_token: None,
    }
}

pub fn team(name: &str) -> Team {
    Team {
        id: format!("{}-id", name.to_lowercase()),
        name: name.to_string(),
        project_id: "public-id".to_string(),
        project_name: "Public".to_string(),
    }
}

pub fn repository(name: &str) -> Repository {
    Repository {
        id: format!("{}-id", name),
        name: name.to_string(),
        remote_url: format!("https://dev.azure.com/contoso/Public/_git/{}", name),
    }
}

pub fn member(unique_name: &str) -> TeamMember {
    TeamMember {
        identity: Identity {
            id: format!("{}-id", unique_name),
            display_name: unique_name.to_string(),
            unique_name: unique_name.to_string(),
        },
    }
}

pub fn board(id: &str, name: &str, columns: &[&str]) -> BoardDetail {
    BoardDetail {
        id: id.to_string(),
        name: name.to_string(),
        columns: columns
            .iter()
            .map(|c| BoardColumn {
                id: format!("{}-col", c),
                name: c.to_string(),
            })
            .collect(),
    }
}

fn fail(op: &str) -> Error {
    Error::Other(format!("{} failed", op))
}

/// Counts overlapping calls and remembers the highest overlap seen
#[derive(Default)]
pub struct RequestGauge {
    pub delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl RequestGauge {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn observe(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Source double keyed by team id
#[derive(Default)]
pub struct FakeSource {
    pub repositories: Vec<Repository>,
    pub teams: Vec<Team>,
    pub iterations: HashMap<String, Vec<Iteration>>,
    pub backlogs: HashMap<String, Vec<BacklogLevel>>,
    pub backlog_items: HashMap<(String, String), Vec<WorkItemRef>>,
    pub work_items: HashMap<i64, WorkItem>,
    pub boards: HashMap<String, Vec<BoardDetail>>,
    pub wikis: Vec<Wiki>,
    pub wiki_trees: HashMap<String, WikiPage>,
    pub page_texts: HashMap<String, String>,
    pub members: HashMap<String, Vec<TeamMember>>,
    /// Operation names (or `op:key`) that return an error
    pub failing: HashSet<String>,
    pub work_item_requests: Mutex<Vec<Vec<i64>>>,
    pub gauge: RequestGauge,
}

impl FakeSource {
    fn check(&self, op: &str, key: &str) -> Result<()> {
        if self.failing.contains(op) || self.failing.contains(&format!("{}:{}", op, key)) {
            return Err(fail(op));
        }
        Ok(())
    }
}

#[async_trait]
impl SourceClient for FakeSource {
    async fn repositories(&self, project: &str) -> Result<Vec<Repository>> {
        self.gauge.observe().await;
        self.check("repositories", project)?;
        Ok(self.repositories.clone())
    }

    async fn teams(&self, project: &str) -> Result<Vec<Team>> {
        self.gauge.observe().await;
        self.check("teams", project)?;
        Ok(self.teams.clone())
    }

    async fn team_iterations(&self, team: &Team) -> Result<Vec<Iteration>> {
        self.gauge.observe().await;
        self.check("team_iterations", &team.name)?;
        Ok(self.iterations.get(&team.id).cloned().unwrap_or_default())
    }

    async fn backlogs(&self, team: &Team) -> Result<Vec<BacklogLevel>> {
        self.gauge.observe().await;
        self.check("backlogs", &team.name)?;
        Ok(self.backlogs.get(&team.id).cloned().unwrap_or_default())
    }

    async fn backlog_work_items(&self, team: &Team, backlog_id: &str) -> Result<Vec<WorkItemRef>> {
        self.gauge.observe().await;
        self.check("backlog_work_items", backlog_id)?;
        Ok(self
            .backlog_items
            .get(&(team.id.clone(), backlog_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn work_items(&self, ids: &[i64]) -> Result<Vec<WorkItem>> {
        self.gauge.observe().await;
        self.check("work_items", "")?;
        self.work_item_requests.lock().unwrap().push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.work_items.get(id).cloned())
            .collect())
    }

    async fn boards(&self, team: &Team) -> Result<Vec<Board>> {
        self.gauge.observe().await;
        self.check("boards", &team.name)?;
        Ok(self
            .boards
            .get(&team.id)
            .map(|boards| {
                boards
                    .iter()
                    .map(|b| Board {
                        id: b.id.clone(),
                        name: b.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn board(&self, team: &Team, board_id: &str) -> Result<BoardDetail> {
        self.gauge.observe().await;
        self.check("board", board_id)?;
        self.boards
            .get(&team.id)
            .and_then(|boards| boards.iter().find(|b| b.id == board_id).cloned())
            .ok_or_else(|| fail("board"))
    }

    async fn wikis(&self, project: &str) -> Result<Vec<Wiki>> {
        self.gauge.observe().await;
        self.check("wikis", project)?;
        Ok(self.wikis.clone())
    }

    async fn wiki_pages(&self, _project: &str, wiki_id: &str) -> Result<WikiPage> {
        self.gauge.observe().await;
        self.check("wiki_pages", wiki_id)?;
        Ok(self.wiki_trees.get(wiki_id).cloned().unwrap_or_default())
    }

    async fn wiki_page_text(
        &self,
        _project: &str,
        _wiki_id: &str,
        path: &str,
    ) -> Result<WikiPageText> {
        self.gauge.observe().await;
        self.check("wiki_page_text", path)?;
        Ok(WikiPageText {
            path: path.to_string(),
            content: self.page_texts.get(path).cloned().unwrap_or_default(),
        })
    }

    async fn team_members(&self, team: &Team) -> Result<Vec<TeamMember>> {
        self.gauge.observe().await;
        self.check("team_members", &team.name)?;
        Ok(self.members.get(&team.id).cloned().unwrap_or_default())
    }
}

/// Everything written to the destination double
#[derive(Default)]
pub struct DestinationState {
    pub repositories: Vec<DestRepository>,
    pub org_projects: Vec<DestProject>,
    pub repo_projects: Vec<DestProject>,
    pub columns: HashMap<u64, Vec<DestColumn>>,
    pub milestones: Vec<(DestMilestone, NewMilestone)>,
    pub issues: Vec<(IssuePayload, Option<u64>)>,
    pub collaborators: Vec<(String, Permission)>,
    pub deleted_projects: Vec<u64>,
    pub deleted_repositories: Vec<String>,
    next_id: u64,
}

impl DestinationState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct FakeDestination {
    pub state: Mutex<DestinationState>,
    /// Operation names (or `op:key`) that return an error
    pub failing: HashSet<String>,
}

impl FakeDestination {
    fn check(&self, op: &str, key: &str) -> Result<()> {
        if self.failing.contains(op) || self.failing.contains(&format!("{}:{}", op, key)) {
            return Err(fail(op));
        }
        Ok(())
    }

    pub fn seed_repository(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.repositories.push(DestRepository {
            id,
            name: name.to_string(),
            clone_url: format!("https://github.com/contoso/{}.git", name),
        });
    }

    pub fn seed_org_project(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.org_projects.push(DestProject {
            id,
            name: name.to_string(),
        });
    }

    pub fn seed_milestone(&self, title: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let number = state.next_id();
        state.milestones.push((
            DestMilestone {
                number,
                title: title.to_string(),
            },
            NewMilestone {
                title: title.to_string(),
                state: MilestoneState::Open,
                description: String::new(),
                due_on: None,
            },
        ));
        number
    }
}

#[async_trait]
impl DestinationClient for FakeDestination {
    async fn find_org_repository(&self, _org: &str, name: &str) -> Result<Option<DestRepository>> {
        self.check("find_org_repository", name)?;
        let state = self.state.lock().unwrap();
        Ok(state.repositories.iter().find(|r| r.name == name).cloned())
    }

    async fn create_org_repository(&self, _org: &str, name: &str) -> Result<DestRepository> {
        self.check("create_org_repository", name)?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let repo = DestRepository {
            id,
            name: name.to_string(),
            clone_url: format!("https://github.com/contoso/{}.git", name),
        };
        state.repositories.push(repo.clone());
        Ok(repo)
    }

    async fn delete_repository(&self, _owner: &str, name: &str) -> Result<()> {
        self.check("delete_repository", name)?;
        let mut state = self.state.lock().unwrap();
        state.repositories.retain(|r| r.name != name);
        state.deleted_repositories.push(name.to_string());
        Ok(())
    }

    async fn find_org_project(&self, _org: &str, name: &str) -> Result<Option<DestProject>> {
        self.check("find_org_project", name)?;
        let state = self.state.lock().unwrap();
        Ok(state.org_projects.iter().find(|p| p.name == name).cloned())
    }

    async fn create_org_project(&self, _org: &str, name: &str) -> Result<DestProject> {
        self.check("create_org_project", name)?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let project = DestProject {
            id,
            name: name.to_string(),
        };
        state.org_projects.push(project.clone());
        Ok(project)
    }

    async fn find_repo_project(
        &self,
        _owner: &str,
        _repo: &str,
        name: &str,
    ) -> Result<Option<DestProject>> {
        self.check("find_repo_project", name)?;
        let state = self.state.lock().unwrap();
        Ok(state.repo_projects.iter().find(|p| p.name == name).cloned())
    }

    async fn create_repo_project(
        &self,
        _owner: &str,
        _repo: &str,
        name: &str,
    ) -> Result<DestProject> {
        self.check("create_repo_project", name)?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let project = DestProject {
            id,
            name: name.to_string(),
        };
        state.repo_projects.push(project.clone());
        Ok(project)
    }

    async fn delete_project(&self, project_id: u64) -> Result<()> {
        self.check("delete_project", "")?;
        let mut state = self.state.lock().unwrap();
        state.org_projects.retain(|p| p.id != project_id);
        state.repo_projects.retain(|p| p.id != project_id);
        state.columns.remove(&project_id);
        state.deleted_projects.push(project_id);
        Ok(())
    }

    async fn project_columns(&self, project_id: u64) -> Result<Vec<DestColumn>> {
        self.check("project_columns", "")?;
        let state = self.state.lock().unwrap();
        Ok(state.columns.get(&project_id).cloned().unwrap_or_default())
    }

    async fn create_project_column(&self, project_id: u64, name: &str) -> Result<DestColumn> {
        self.check("create_project_column", name)?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let column = DestColumn {
            id,
            name: name.to_string(),
        };
        state
            .columns
            .entry(project_id)
            .or_default()
            .push(column.clone());
        Ok(column)
    }

    async fn milestones(&self, _owner: &str, _repo: &str) -> Result<Vec<DestMilestone>> {
        self.check("milestones", "")?;
        let state = self.state.lock().unwrap();
        Ok(state.milestones.iter().map(|(m, _)| m.clone()).collect())
    }

    async fn create_milestone(
        &self,
        _owner: &str,
        _repo: &str,
        milestone: &NewMilestone,
    ) -> Result<DestMilestone> {
        self.check("create_milestone", &milestone.title)?;
        let mut state = self.state.lock().unwrap();
        let number = state.next_id();
        let created = DestMilestone {
            number,
            title: milestone.title.clone(),
        };
        state.milestones.push((created.clone(), milestone.clone()));
        Ok(created)
    }

    async fn create_issue(
        &self,
        _owner: &str,
        _repo: &str,
        issue: &IssuePayload,
        milestone: Option<u64>,
    ) -> Result<u64> {
        self.check("create_issue", &issue.title)?;
        let mut state = self.state.lock().unwrap();
        let number = state.next_id();
        state.issues.push((issue.clone(), milestone));
        Ok(number)
    }

    async fn add_collaborator(
        &self,
        _owner: &str,
        _repo: &str,
        username: &str,
        permission: Permission,
    ) -> Result<()> {
        self.check("add_collaborator", username)?;
        let mut state = self.state.lock().unwrap();
        state.collaborators.push((username.to_string(), permission));
        Ok(())
    }
}

/// Mirror double recording (source, destination) URL pairs
#[derive(Default)]
pub struct FakeMirror {
    pub calls: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl FakeMirror {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl RepoMirror for FakeMirror {
    async fn mirror(
        &self,
        source: &MirrorRemote,
        destination: &MirrorRemote,
    ) -> Result<MirrorStats> {
        self.calls
            .lock()
            .unwrap()
            .push((source.url().to_string(), destination.url().to_string()));
        if self.fail {
            return Err(Error::Git("push rejected".to_string()));
        }
        Ok(MirrorStats {
            branches: 1,
            tags: 0,
        })
    }
}
