use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use tracing::{debug, instrument, warn};

use super::{FetchError, ProfileRecord, RepositorySummary};

const USER_AGENT: &str = concat!("gitfight/", env!("CARGO_PKG_VERSION"));
const REPOS_PER_PAGE: &str = "100";

/// Source of fighter data. The production implementation talks to the GitHub
/// REST API; tests substitute canned profiles.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, FetchError>;
    async fn fetch_repositories(&self, username: &str)
        -> Result<Vec<RepositorySummary>, FetchError>;
}

#[derive(Clone, Debug)]
pub struct GithubClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Upstream(format!("invalid GitHub API url: {e}")))?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Upstream("GitHub API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Maps a non-success status of the profile endpoint onto the fetch taxonomy.
pub(crate) fn classify_profile_status(status: StatusCode, username: &str) -> Result<(), FetchError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(username.to_string())),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
        s => Err(FetchError::Upstream(format!("profile request failed with {s}"))),
    }
}

pub(crate) fn classify_repositories_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Upstream(format!(
            "Failed to fetch repos ({status})"
        )))
    }
}

#[async_trait]
impl ProfileSource for GithubClient {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, FetchError> {
        let url = self.endpoint(&["users", username])?;
        let response = self.get(url).send().await?;

        if let Err(err) = classify_profile_status(response.status(), username) {
            warn!(username, status = %response.status(), "Profile fetch rejected");
            return Err(err);
        }

        let profile: ProfileRecord = response.json().await?;
        debug!(username, followers = profile.followers, "Profile fetched");
        Ok(profile)
    }

    #[instrument(skip(self))]
    async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepositorySummary>, FetchError> {
        let mut url = self.endpoint(&["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", REPOS_PER_PAGE)
            .append_pair("sort", "stars");
        let response = self.get(url).send().await?;

        if let Err(err) = classify_repositories_status(response.status()) {
            warn!(username, status = %response.status(), "Repository fetch rejected");
            return Err(err);
        }

        let repos: Vec<RepositorySummary> = response.json().await?;
        debug!(username, repo_count = repos.len(), "Repositories fetched");
        Ok(repos)
    }
}
