//! GitHub REST client.
//!
//! Thin reqwest wrapper implementing [`RemoteObjectApi`] against the GitHub
//! v3 API. Every call carries the bearer credential; non-2xx responses are
//! mapped to [`SyncError::RemoteApi`] with the remote-supplied message when
//! the error body carries one.

use crate::error::SyncError;
use crate::remote::{RemoteObjectApi, Repository, TreeEntry};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct AccountResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct ShaResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Authenticated GitHub API client for one account.
pub struct GitHubClient {
    http: reqwest::Client,
    base: String,
    owner: String,
}

impl GitHubClient {
    /// Build a client and resolve the account login that owns the target
    /// repositories. A 401 here is the earliest auth-expiry signal.
    pub async fn connect(token: &str, api_base: Option<&str>) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| SyncError::Validation("invalid characters in API token".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(concat!("studio/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;
        let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string();

        let account: AccountResponse = Self::parse(
            Self::check(http.get(format!("{}/user", base)).send().await?).await?,
        )
        .await?;
        debug!(owner = %account.login, "connected to remote API");

        Ok(GitHubClient {
            http,
            base,
            owner: account.login,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn repo_url(&self, repo: &str, tail: &str) -> String {
        format!("{}/repos/{}/{}{}", self.base, self.owner, repo, tail)
    }

    /// Map a non-2xx response to `RemoteApi`, extracting the JSON `message`
    /// field when the body has one.
    async fn check(resp: Response) -> Result<Response, SyncError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("remote API returned {}", status));
        Err(SyncError::RemoteApi {
            status: Some(status.as_u16()),
            message,
        })
    }

    async fn parse<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T, SyncError> {
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl RemoteObjectApi for GitHubClient {
    async fn fetch_repository(&self, name: &str) -> Result<Option<Repository>, SyncError> {
        let resp = self.http.get(self.repo_url(name, "")).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let repo: Repository = Self::parse(Self::check(resp).await?).await?;
        Ok(Some(repo))
    }

    async fn create_repository(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Repository, SyncError> {
        let resp = self
            .http
            .post(format!("{}/user/repos", self.base))
            .json(&json!({
                "name": name,
                "description": description,
                "auto_init": true,
            }))
            .send()
            .await?;
        Self::parse(Self::check(resp).await?).await
    }

    async fn branch_head(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<String>, SyncError> {
        let resp = self
            .http
            .get(self.repo_url(&repo.name, &format!("/git/ref/heads/{}", branch)))
            .send()
            .await?;
        // An empty repository answers 404 or 409 here; neither is an error.
        if resp.status() == StatusCode::NOT_FOUND || resp.status() == StatusCode::CONFLICT {
            return Ok(None);
        }
        let parsed: RefResponse = Self::parse(Self::check(resp).await?).await?;
        Ok(Some(parsed.object.sha))
    }

    async fn put_file(
        &self,
        repo: &Repository,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<(), SyncError> {
        let resp = self
            .http
            .put(self.repo_url(&repo.name, &format!("/contents/{}", path)))
            .json(&json!({
                "message": message,
                "content": BASE64.encode(content),
            }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn create_blob(&self, repo: &Repository, content: &str) -> Result<String, SyncError> {
        let resp = self
            .http
            .post(self.repo_url(&repo.name, "/git/blobs"))
            .json(&json!({
                "content": content,
                "encoding": "utf-8",
            }))
            .send()
            .await?;
        let parsed: ShaResponse = Self::parse(Self::check(resp).await?).await?;
        Ok(parsed.sha)
    }

    async fn create_tree(
        &self,
        repo: &Repository,
        entries: &[TreeEntry],
    ) -> Result<String, SyncError> {
        let resp = self
            .http
            .post(self.repo_url(&repo.name, "/git/trees"))
            .json(&json!({ "tree": entries }))
            .send()
            .await?;
        let parsed: ShaResponse = Self::parse(Self::check(resp).await?).await?;
        Ok(parsed.sha)
    }

    async fn create_commit(
        &self,
        repo: &Repository,
        message: &str,
        tree_sha: &str,
        parent: Option<&str>,
    ) -> Result<String, SyncError> {
        let parents: Vec<&str> = parent.into_iter().collect();
        let resp = self
            .http
            .post(self.repo_url(&repo.name, "/git/commits"))
            .json(&json!({
                "message": message,
                "tree": tree_sha,
                "parents": parents,
            }))
            .send()
            .await?;
        let parsed: ShaResponse = Self::parse(Self::check(resp).await?).await?;
        Ok(parsed.sha)
    }

    async fn update_branch_ref(
        &self,
        repo: &Repository,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), SyncError> {
        let resp = self
            .http
            .patch(self.repo_url(&repo.name, &format!("/git/refs/heads/{}", branch)))
            .json(&json!({ "sha": sha, "force": force }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}
