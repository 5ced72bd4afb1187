use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument, warn};

use super::{
    BattleSubmission, GlobalCounts, LeaderboardEntry, LeaderboardEnvelope, LeaderboardError,
    StatsEnvelope,
};

const USER_AGENT: &str = concat!("gitfight/", env!("CARGO_PKG_VERSION"));

/// Remote persistence of battle results and global rankings.
#[async_trait]
pub trait LeaderboardClient: Send + Sync {
    async fn record_battle(&self, submission: &BattleSubmission) -> Result<(), LeaderboardError>;
    async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
    async fn global_counts(&self) -> Result<GlobalCounts, LeaderboardError>;
}

/// Client of the first-party leaderboard service.
#[derive(Clone, Debug)]
pub struct HttpLeaderboardClient {
    http: Client,
    base_url: Url,
}

impl HttpLeaderboardClient {
    pub fn new(base_url: &str) -> Result<Self, LeaderboardError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LeaderboardError::InvalidInput(format!("invalid leaderboard url: {e}")))?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segment: &str) -> Result<Url, LeaderboardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LeaderboardError::InvalidInput("leaderboard url cannot be a base".to_string())
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn check(
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response, LeaderboardError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(%status, action, "Leaderboard request rejected");
        Err(LeaderboardError::Upstream(format!(
            "{action} failed with {status}: {body}"
        )))
    }
}

#[async_trait]
impl LeaderboardClient for HttpLeaderboardClient {
    #[instrument(skip(self, submission), fields(player1 = %submission.player1, player2 = %submission.player2))]
    async fn record_battle(&self, submission: &BattleSubmission) -> Result<(), LeaderboardError> {
        submission.validate()?;
        let url = self.endpoint("battle")?;
        let response = self.http.post(url).json(submission).send().await?;
        Self::check(response, "battle write").await?;
        debug!("Battle recorded on leaderboard");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut url = self.endpoint("leaderboard")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let response = self.http.get(url).send().await?;
        let envelope: LeaderboardEnvelope = Self::check(response, "leaderboard read")
            .await?
            .json()
            .await?;
        debug!(entries = envelope.leaderboard.len(), "Leaderboard fetched");
        Ok(envelope.leaderboard)
    }

    #[instrument(skip(self))]
    async fn global_counts(&self) -> Result<GlobalCounts, LeaderboardError> {
        let url = self.endpoint("stats")?;
        let response = self.http.get(url).send().await?;
        let envelope: StatsEnvelope = Self::check(response, "stats read").await?.json().await?;
        Ok(envelope.stats)
    }
}
