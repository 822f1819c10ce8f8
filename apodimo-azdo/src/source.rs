//! `SourceClient` implementation over the Azure DevOps REST API

use apodimo_core::model::{
    BacklogLevel, Board, BoardDetail, Iteration, Repository, Team, TeamMember, Wiki, WikiPage,
    WikiPageText, WorkItem, WorkItemRef,
};
use apodimo_core::SourceClient;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{
    BacklogWorkItems, ListResponse, WireBacklogLevel, WireBoard, WireBoardDetail, WireIteration,
    WireRepository, WireTeam, WireTeamMember, WireWiki, WireWikiPage, WireWorkItem,
};
use crate::{AzureDevOpsClient, Result};

/// Maximum ids accepted by the work items batch endpoint
pub const WORK_ITEM_BATCH_SIZE: usize = 200;

/// Page size of `$top`/`$skip` listings (teams, team members)
const PAGE_SIZE: usize = 100;

impl AzureDevOpsClient {
    /// Git repositories of a project
    pub async fn list_repositories(&self, project: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&[project, "_apis", "git", "repositories"])?;
        let list: ListResponse<WireRepository> = self.get(url).await?;
        Ok(list.value.into_iter().map(Repository::from).collect())
    }

    /// Every team of a project
    pub async fn list_teams(&self, project: &str) -> Result<Vec<Team>> {
        let teams: Vec<Team> = self
            .list_paged::<WireTeam, _>(&["_apis", "projects", project, "teams"])
            .await?;
        debug!(project = %project, count = teams.len(), "Listed teams");
        Ok(teams)
    }

    /// Iterations a team is subscribed to
    pub async fn list_team_iterations(&self, team: &Team) -> Result<Vec<Iteration>> {
        let url = self.team_endpoint(team, &["teamsettings", "iterations"])?;
        let list: ListResponse<WireIteration> = self.get(url).await?;
        Ok(list.value.into_iter().map(Iteration::from).collect())
    }

    /// Backlog levels of a team
    pub async fn list_backlogs(&self, team: &Team) -> Result<Vec<BacklogLevel>> {
        let url = self.team_endpoint(team, &["backlogs"])?;
        let list: ListResponse<WireBacklogLevel> = self.get(url).await?;
        Ok(list.value.into_iter().map(BacklogLevel::from).collect())
    }

    /// Work item references on a backlog level
    pub async fn list_backlog_work_items(
        &self,
        team: &Team,
        backlog_id: &str,
    ) -> Result<Vec<WorkItemRef>> {
        let url = self.team_endpoint(team, &["backlogs", backlog_id, "workItems"])?;
        let items: BacklogWorkItems = self.get(url).await?;
        Ok(items.work_items.into_iter().map(WorkItemRef::from).collect())
    }

    /// Hydrate work items in batches of [`WORK_ITEM_BATCH_SIZE`]
    ///
    /// Deleted or inaccessible ids are omitted from the result.
    pub async fn get_work_items(&self, ids: &[i64]) -> Result<Vec<WorkItem>> {
        let mut items = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(WORK_ITEM_BATCH_SIZE) {
            let ids = chunk
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let mut url = self.endpoint(&["_apis", "wit", "workitems"])?;
            url.query_pairs_mut()
                .append_pair("ids", &ids)
                .append_pair("errorPolicy", "omit");

            debug!(count = chunk.len(), "Fetching work item batch");
            let batch: ListResponse<Option<WireWorkItem>> = self.get(url).await?;
            items.extend(batch.value.into_iter().flatten().map(WorkItem::from));
        }

        Ok(items)
    }

    /// Boards of a team
    pub async fn list_boards(&self, team: &Team) -> Result<Vec<Board>> {
        let url = self.team_endpoint(team, &["boards"])?;
        let list: ListResponse<WireBoard> = self.get(url).await?;
        Ok(list.value.into_iter().map(Board::from).collect())
    }

    /// A board with its columns
    pub async fn get_board(&self, team: &Team, board_id: &str) -> Result<BoardDetail> {
        let url = self.team_endpoint(team, &["boards", board_id])?;
        let board: WireBoardDetail = self.get(url).await?;
        Ok(board.into())
    }

    /// Wikis of a project
    pub async fn list_wikis(&self, project: &str) -> Result<Vec<Wiki>> {
        let url = self.endpoint(&[project, "_apis", "wiki", "wikis"])?;
        let list: ListResponse<WireWiki> = self.get(url).await?;
        Ok(list.value.into_iter().map(Wiki::from).collect())
    }

    /// Full page tree of a wiki, rooted at `/`
    pub async fn get_wiki_pages(&self, project: &str, wiki_id: &str) -> Result<WikiPage> {
        let mut url = self.endpoint(&[project, "_apis", "wiki", "wikis", wiki_id, "pages"])?;
        url.query_pairs_mut()
            .append_pair("path", "/")
            .append_pair("recursionLevel", "full");
        let root: WireWikiPage = self.get(url).await?;
        Ok(root.into())
    }

    /// Markdown content of one wiki page
    pub async fn get_wiki_page_text(
        &self,
        project: &str,
        wiki_id: &str,
        path: &str,
    ) -> Result<WikiPageText> {
        let mut url = self.endpoint(&[project, "_apis", "wiki", "wikis", wiki_id, "pages"])?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("includeContent", "true");
        let page: WireWikiPage = self.get(url).await?;
        Ok(page.into())
    }

    /// Members of a team
    pub async fn list_team_members(&self, team: &Team) -> Result<Vec<TeamMember>> {
        let members: Vec<TeamMember> = self
            .list_paged::<WireTeamMember, _>(&[
                "_apis",
                "projects",
                &team.project_id,
                "teams",
                &team.id,
                "members",
            ])
            .await?;
        debug!(team = %team.name, count = members.len(), "Listed team members");
        Ok(members)
    }

    /// Follow `$top`/`$skip` paging until a short page
    async fn list_paged<W, T>(&self, segments: &[&str]) -> Result<Vec<T>>
    where
        W: DeserializeOwned,
        T: From<W>,
    {
        let mut items = Vec::new();

        loop {
            let mut url = self.endpoint(segments)?;
            url.query_pairs_mut()
                .append_pair("$top", &PAGE_SIZE.to_string())
                .append_pair("$skip", &items.len().to_string());

            let page: ListResponse<W> = self.get(url).await?;
            let count = page.value.len();
            items.extend(page.value.into_iter().map(T::from));

            if count < PAGE_SIZE {
                break;
            }
        }

        Ok(items)
    }

    /// `<organization>/<project id>/<team id>/_apis/work/<segments...>`
    fn team_endpoint(&self, team: &Team, segments: &[&str]) -> Result<url::Url> {
        let mut path = vec![team.project_id.as_str(), team.id.as_str(), "_apis", "work"];
        path.extend_from_slice(segments);
        self.endpoint(&path)
    }
}

#[async_trait]
impl SourceClient for AzureDevOpsClient {
    async fn repositories(&self, project: &str) -> apodimo_core::Result<Vec<Repository>> {
        Ok(self.list_repositories(project).await?)
    }

    async fn teams(&self, project: &str) -> apodimo_core::Result<Vec<Team>> {
        Ok(self.list_teams(project).await?)
    }

    async fn team_iterations(&self, team: &Team) -> apodimo_core::Result<Vec<Iteration>> {
        Ok(self.list_team_iterations(team).await?)
    }

    async fn backlogs(&self, team: &Team) -> apodimo_core::Result<Vec<BacklogLevel>> {
        Ok(self.list_backlogs(team).await?)
    }

    async fn backlog_work_items(
        &self,
        team: &Team,
        backlog_id: &str,
    ) -> apodimo_core::Result<Vec<WorkItemRef>> {
        Ok(self.list_backlog_work_items(team, backlog_id).await?)
    }

    async fn work_items(&self, ids: &[i64]) -> apodimo_core::Result<Vec<WorkItem>> {
        Ok(self.get_work_items(ids).await?)
    }

    async fn boards(&self, team: &Team) -> apodimo_core::Result<Vec<Board>> {
        Ok(self.list_boards(team).await?)
    }

    async fn board(&self, team: &Team, board_id: &str) -> apodimo_core::Result<BoardDetail> {
        Ok(self.get_board(team, board_id).await?)
    }

    async fn wikis(&self, project: &str) -> apodimo_core::Result<Vec<Wiki>> {
        Ok(self.list_wikis(project).await?)
    }

    async fn wiki_pages(&self, project: &str, wiki_id: &str) -> apodimo_core::Result<WikiPage> {
        Ok(self.get_wiki_pages(project, wiki_id).await?)
    }

    async fn wiki_page_text(
        &self,
        project: &str,
        wiki_id: &str,
        path: &str,
    ) -> apodimo_core::Result<WikiPageText> {
        Ok(self.get_wiki_page_text(project, wiki_id, path).await?)
    }

    async fn team_members(&self, team: &Team) -> apodimo_core::Result<Vec<TeamMember>> {
        Ok(self.list_team_members(team).await?)
    }
}
