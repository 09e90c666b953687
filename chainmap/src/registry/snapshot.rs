//! Keeps a local mirror of the chain registry and reports whether it moved since the last run.
//!
//! The upstream revision (a commit sha) is treated as an opaque token. It is fetched once per
//! run and compared with the token persisted by the previous run. Only a difference, or an
//! explicit force, triggers a sync of the mirror.
use crate::error::SnapshotError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_URL: &str = "https://github.com";
const USER_AGENT: &str = concat!("chainmap/", env!("CARGO_PKG_VERSION"));

/// Parses `url` as a directory, so that joining keeps every segment of its path.
fn base_url(url: &str) -> Result<Url, SnapshotError> {
    let mut url = Url::parse(url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Source of the latest upstream revision token.
#[async_trait]
pub trait RevisionSource: Send + Sync {
    async fn latest_revision(&self) -> Result<String, SnapshotError>;
}

/// Brings a local directory in line with upstream.
#[async_trait]
pub trait Mirror: Send + Sync {
    async fn sync(&self, destination: &Path) -> Result<(), SnapshotError>;
}

/// Reads the head commit of a branch from the GitHub commits API.
#[derive(Clone, Debug)]
pub struct GithubRevisionSource {
    client: reqwest::Client,
    url: Url,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

impl GithubRevisionSource {
    pub fn new(api_url: &str, owner: &str, repo: &str, branch: &str) -> Result<Self, SnapshotError> {
        let url = base_url(api_url)?.join(&format!("repos/{}/{}/commits/{}", owner, repo, branch))?;
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(GithubRevisionSource { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RevisionSource for GithubRevisionSource {
    async fn latest_revision(&self) -> Result<String, SnapshotError> {
        debug!("fetching latest revision from {}", self.url);
        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(SnapshotError::Response(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let commit: CommitResponse = response.json().await?;
        if commit.sha.is_empty() {
            return Err(SnapshotError::Response("empty commit sha".to_string()));
        }

        Ok(commit.sha)
    }
}

/// Clones the repository when the destination is missing, pulls otherwise.
#[derive(Clone, Debug)]
pub struct GitMirror {
    repo_url: Url,
}

impl GitMirror {
    pub fn new(git_url: &str, owner: &str, repo: &str) -> Result<Self, SnapshotError> {
        let repo_url = base_url(git_url)?.join(&format!("{}/{}.git", owner, repo))?;

        Ok(GitMirror { repo_url })
    }

    pub fn repo_url(&self) -> &Url {
        &self.repo_url
    }
}

#[async_trait]
impl Mirror for GitMirror {
    async fn sync(&self, destination: &Path) -> Result<(), SnapshotError> {
        let mut command = Command::new("git");
        let description = if destination.exists() {
            command.arg("-C").arg(destination).arg("pull");
            "pull"
        } else {
            command
                .arg("clone")
                .arg(self.repo_url.as_str())
                .arg(destination);
            "clone"
        };

        info!("running git {} for {}", description, destination.display());
        let output = command.output().await.map_err(|e| SnapshotError::Git {
            command: description.to_string(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(SnapshotError::Git {
                command: description.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct SavedRevision {
    last_commit_id: Option<String>,
}

/// Persists the last processed revision as `{"last_commit_id": "<sha>"}`.
#[derive(Clone, Debug)]
pub struct RevisionStore {
    path: PathBuf,
}

impl RevisionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RevisionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved revision, or `None` if nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<String>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SnapshotError::RevisionFile {
                path: self.path.clone(),
                source,
            })?;
        let saved: SavedRevision = serde_json::from_str(&data)?;

        Ok(saved.last_commit_id)
    }

    pub async fn save(&self, revision: &str) -> Result<(), SnapshotError> {
        let saved = SavedRevision {
            last_commit_id: Some(revision.to_string()),
        };
        let data = serde_json::to_string(&saved)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SnapshotError::RevisionFile {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&self.path, data)
            .await
            .map_err(|source| SnapshotError::RevisionFile {
                path: self.path.clone(),
                source,
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// The mirror was synced to `revision`.
    Changed { revision: String },
    /// The mirror already reflects `revision`; nothing was touched.
    Unchanged { revision: String },
}

impl SnapshotStatus {
    pub fn is_changed(&self) -> bool {
        matches!(self, SnapshotStatus::Changed { .. })
    }

    pub fn revision(&self) -> &str {
        match self {
            SnapshotStatus::Changed { revision } | SnapshotStatus::Unchanged { revision } => {
                revision
            }
        }
    }
}

/// Ties a revision source, a mirror and a revision store together.
pub struct SnapshotProvider {
    source: Box<dyn RevisionSource>,
    mirror: Box<dyn Mirror>,
    store: RevisionStore,
    destination: PathBuf,
}

impl SnapshotProvider {
    pub fn new(
        source: Box<dyn RevisionSource>,
        mirror: Box<dyn Mirror>,
        store: RevisionStore,
        destination: impl Into<PathBuf>,
    ) -> Self {
        SnapshotProvider {
            source,
            mirror,
            store,
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Syncs the mirror if upstream moved since the saved revision, or unconditionally when
    /// `force` is set. Nothing is saved; call [`SnapshotProvider::commit`] once the synced
    /// content has been processed.
    pub async fn check(&self, force: bool) -> Result<SnapshotStatus, SnapshotError> {
        let latest = self.source.latest_revision().await?;
        let saved = self.store.load().await?;

        if !force && saved.as_deref() == Some(latest.as_str()) {
            info!("Repository has not been updated since the last check.");
            return Ok(SnapshotStatus::Unchanged { revision: latest });
        }

        self.mirror.sync(&self.destination).await?;
        info!("Repository has been synced to {}", latest);

        Ok(SnapshotStatus::Changed { revision: latest })
    }

    /// Records `revision` as processed.
    pub async fn commit(&self, revision: &str) -> Result<(), SnapshotError> {
        self.store.save(revision).await?;
        debug!("saved revision {} to {}", revision, self.store.path().display());

        Ok(())
    }

    /// Syncs like [`SnapshotProvider::check`] and records the new revision right away.
    pub async fn refresh(&self, force: bool) -> Result<SnapshotStatus, SnapshotError> {
        let status = self.check(force).await?;
        if status.is_changed() {
            self.commit(status.revision()).await?;
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    #[assay]
    fn builds_github_urls() {
        let source =
            GithubRevisionSource::new(DEFAULT_GITHUB_API_URL, "cosmos", "chain-registry", "master")
                .unwrap();
        assert_eq!(
            source.url().as_str(),
            "https://api.github.com/repos/cosmos/chain-registry/commits/master"
        );

        let mirror = GitMirror::new(DEFAULT_GITHUB_URL, "cosmos", "chain-registry").unwrap();
        assert_eq!(
            mirror.repo_url().as_str(),
            "https://github.com/cosmos/chain-registry.git"
        );
    }

    #[assay]
    fn keeps_path_prefix_of_base_urls() {
        let source = GithubRevisionSource::new(
            "https://ghe.example.com/api/v3",
            "cosmos",
            "chain-registry",
            "master",
        )
        .unwrap();
        assert_eq!(
            source.url().as_str(),
            "https://ghe.example.com/api/v3/repos/cosmos/chain-registry/commits/master"
        );

        let mirror = GitMirror::new("https://ghe.example.com/mirror/", "cosmos", "chain-registry")
            .unwrap();
        assert_eq!(
            mirror.repo_url().as_str(),
            "https://ghe.example.com/mirror/cosmos/chain-registry.git"
        );
    }

    #[assay]
    fn rejects_invalid_api_url() {
        let result = GithubRevisionSource::new("not a url", "cosmos", "chain-registry", "master");
        assert!(matches!(result, Err(SnapshotError::Url(_))));
    }

    #[assay]
    async fn revision_store_round_trip() {
        let store = RevisionStore::new("revision_store_test/state/commit_id.json");
        assert_eq!(store.load().await.unwrap(), None);

        store.save("abc123").await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some("abc123".to_string()));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"last_commit_id":"abc123"}"#);
    }

    #[assay]
    fn status_accessors() {
        let changed = SnapshotStatus::Changed {
            revision: "a".to_string(),
        };
        let unchanged = SnapshotStatus::Unchanged {
            revision: "b".to_string(),
        };

        assert!(changed.is_changed());
        assert!(!unchanged.is_changed());
        assert_eq!(unchanged.revision(), "b");
    }
}
