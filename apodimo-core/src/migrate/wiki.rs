//! Wiki preview: reads top-level wiki pages without writing anything

use tracing::{debug, info};

use super::fanout::gather;
use super::{Disposition, Migrator, Outcome, Phase, PhaseReport};
use crate::model::Wiki;
use crate::Result;

impl Migrator<'_> {
    /// Fetch and log the text of every top-level page of every project wiki
    ///
    /// Only the direct subpages of each wiki root are visited.
    pub async fn migrate_wiki(&self) -> PhaseReport {
        info!(project = %self.project(), "Reading wikis");

        let wikis = match self.call(self.source.wikis(self.project())).await {
            Ok(wikis) => wikis,
            Err(e) => {
                return PhaseReport::aborted(
                    Phase::Wiki,
                    format!("wikis of {}", self.project()),
                    &e,
                )
            }
        };
        info!(count = wikis.len(), "Found wikis");

        let outcome = gather(wikis, self.concurrency(), |wiki| async move {
            self.preview_wiki(&wiki).await
        })
        .await;

        PhaseReport::new(Phase::Wiki).with_outcome(outcome)
    }

    async fn preview_wiki(&self, wiki: &Wiki) -> Outcome {
        let root = match self
            .call(self.source.wiki_pages(self.project(), &wiki.id))
            .await
        {
            Ok(root) => root,
            Err(e) => {
                let mut outcome = Outcome::default();
                outcome.fail(format!("pages of wiki {}", wiki.name), &e);
                return outcome;
            }
        };
        debug!(wiki = %wiki.name, pages = root.sub_pages.len(), "Loaded wiki page tree");

        gather(root.sub_pages, self.concurrency(), |page| async move {
            let result = self.preview_page(wiki, &page.path).await;
            Outcome::of(format!("{}{}", wiki.name, page.path), result)
        })
        .await
    }

    async fn preview_page(&self, wiki: &Wiki, path: &str) -> Result<Disposition> {
        let page = self
            .call(self.source.wiki_page_text(self.project(), &wiki.id, path))
            .await?;
        info!(wiki = %wiki.name, page = %page.path, "Wiki page content:\n{}", page.content);
        Ok(Disposition::Previewed)
    }
}
