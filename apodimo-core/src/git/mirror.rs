//! Mirror clone/push of a repository through a temporary directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::Repository;
use tokio::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// A git remote plus the credentials needed to reach it
#[derive(Clone)]
pub struct MirrorRemote {
    url: String,
    credentials: Option<(String, String)>,
}

impl MirrorRemote {
    /// A remote reachable without credentials (or via a credential helper)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }

    /// Attach basic-auth credentials used for HTTP(S) remotes
    pub fn with_credentials(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), token.into()));
        self
    }

    /// The remote URL without credentials
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL handed to git, with credentials embedded for HTTP(S) remotes
    ///
    /// Non-HTTP remotes (ssh, local paths) are returned unchanged.
    pub fn authenticated_url(&self) -> Result<String> {
        let Some((username, token)) = &self.credentials else {
            return Ok(self.url.clone());
        };

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Ok(self.url.clone());
        }

        let mut url = url::Url::parse(&self.url)
            .map_err(|e| Error::Config(format!("Invalid remote URL {}: {}", self.url, e)))?;
        url.set_username(username)
            .and_then(|_| url.set_password(Some(token)))
            .map_err(|_| Error::Config(format!("Cannot embed credentials in {}", self.url)))?;

        Ok(url.to_string())
    }

    /// Strip this remote's token from text produced by git
    fn redact(&self, text: &str) -> String {
        match &self.credentials {
            Some((_, token)) if !token.is_empty() => text.replace(token.as_str(), "***"),
            _ => text.to_string(),
        }
    }
}

impl std::fmt::Debug for MirrorRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorRemote")
            .field("url", &self.url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

/// Refs carried over by a mirror
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub branches: usize,
    pub tags: usize,
}

/// Copies the full history of one remote into another
#[async_trait]
pub trait RepoMirror: Send + Sync {
    /// Mirror every ref of `source` onto `destination`
    async fn mirror(&self, source: &MirrorRemote, destination: &MirrorRemote)
        -> Result<MirrorStats>;
}

/// [`RepoMirror`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitMirror {
    git_path: String,
    temp_root: Option<PathBuf>,
}

impl Default for GitMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl GitMirror {
    /// Mirror through the system temp directory using `git` from PATH
    pub fn new() -> Self {
        Self {
            git_path: "git".to_string(),
            temp_root: None,
        }
    }

    /// Place temporary clones under `dir` instead of the system temp directory
    pub fn with_temp_root(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_root = dir;
        self
    }

    /// Run a git subcommand, returning stderr on failure
    async fn git(&self, args: &[&str], cwd: Option<&Path>) -> std::result::Result<(), String> {
        let mut cmd = Command::new(&self.git_path);
        cmd.args(args).env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| format!("Failed to run {}: {}", self.git_path, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

#[async_trait]
impl RepoMirror for GitMirror {
    async fn mirror(
        &self,
        source: &MirrorRemote,
        destination: &MirrorRemote,
    ) -> Result<MirrorStats> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("apodimo-");
            b
        };
        let temp_dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let clone_path = temp_dir.path().join("mirror.git");
        let clone_arg = clone_path.to_string_lossy().to_string();

        debug!(source = %source.url(), path = %clone_path.display(), "Mirror cloning");
        let source_url = source.authenticated_url()?;
        self.git(&["clone", "--mirror", &source_url, &clone_arg], None)
            .await
            .map_err(|stderr| classify_failure("clone", source.url(), &source.redact(&stderr)))?;

        let stats = count_refs(&clone_path)?;

        debug!(destination = %destination.url(), ?stats, "Mirror pushing");
        let destination_url = destination.authenticated_url()?;
        self.git(&["push", "--mirror", &destination_url], Some(&clone_path))
            .await
            .map_err(|stderr| {
                classify_failure("push", destination.url(), &destination.redact(&stderr))
            })?;

        temp_dir.close()?;
        Ok(stats)
    }
}

/// Count branches and tags of a (bare) repository
fn count_refs(path: &Path) -> Result<MirrorStats> {
    let repo = Repository::open_bare(path)?;
    let mut stats = MirrorStats::default();

    for reference in repo.references()? {
        let reference = reference?;
        match reference.name() {
            Some(name) if name.starts_with("refs/heads/") => stats.branches += 1,
            Some(name) if name.starts_with("refs/tags/") => stats.tags += 1,
            _ => {}
        }
    }

    Ok(stats)
}

/// Turn git's stderr into an actionable error
fn classify_failure(action: &str, url: &str, stderr: &str) -> Error {
    if stderr.contains("Authentication failed") || stderr.contains("Permission denied") {
        return Error::Git(format!(
            "Authentication failed for {}. Check the token has access to the repository.",
            url
        ));
    }

    if stderr.contains("Could not resolve host") || stderr.contains("unable to access") {
        return Error::Git(format!("Network error during git {} of {}: {}", action, url, stderr));
    }

    if stderr.contains("not found") || stderr.contains("does not exist") {
        return Error::Git(format!("Repository not found: {}", url));
    }

    Error::Git(format!("git {} failed for {}: {}", action, url, stderr))
}
