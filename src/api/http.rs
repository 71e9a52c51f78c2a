//! `reqwest`-backed [`GameApi`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    CreatedMatch, CurrentLegView, ErrorBody, GameApi, MatchSummary, MatchesResponse,
    NewMatchRequest, NextPlayerResponse, Player, PlayersResponse, ThrowRequest, ThrowResponse,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::state::{LegId, MatchId, PlayerId};

/// HTTP client for the game server's JSON API.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGameApi {
    /// Build a client using the configured base URL and request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");
        self.client.request(method, url)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            let err = status_error(status, &body);
            tracing::debug!(status = status.as_u16(), error = %err, "api request rejected");
            Err(err)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.execute(self.request(Method::GET, path)).await?;
        decode(&body)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Option<&B>,
    ) -> Result<T> {
        let mut builder = self.request(Method::POST, path);
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        let body = self.execute(builder).await?;
        decode(&body)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(format!("request timed out: {err}"))
    } else {
        Error::Transport(err.to_string())
    }
}

/// Map a non-2xx response onto an error, preferring the body's `error` field.
fn status_error(status: StatusCode, body: &[u8]) -> Error {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            format!(
                "API request failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        });

    if status == StatusCode::NOT_FOUND {
        Error::NotFound(message)
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::MalformedResponse(e.to_string()))
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn probe(&self) -> Result<()> {
        // Any HTTP answer proves the server is reachable.
        self.request(Method::HEAD, "/api/players")
            .send()
            .await
            .map(|_| ())
            .map_err(transport_error)
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let response: PlayersResponse = self.get_json("/api/players").await?;
        Ok(response.players)
    }

    async fn active_matches(&self) -> Result<Vec<MatchSummary>> {
        let response: MatchesResponse = self.get_json("/api/matches?status=active").await?;
        Ok(response.matches)
    }

    async fn current_leg(&self, match_id: MatchId) -> Result<CurrentLegView> {
        self.get_json(&format!("/api/matches/{match_id}/legs/current"))
            .await
    }

    async fn create_match(&self, request: &NewMatchRequest) -> Result<CreatedMatch> {
        self.post_json("/api/matches", Some(request)).await
    }

    async fn submit_throw(
        &self,
        match_id: MatchId,
        leg_id: LegId,
        request: &ThrowRequest,
    ) -> Result<ThrowResponse> {
        self.post_json(
            &format!("/api/matches/{match_id}/legs/{leg_id}/throw"),
            Some(request),
        )
        .await
    }

    async fn undo_last_throw(&self, match_id: MatchId, leg_id: LegId) -> Result<()> {
        let path = format!("/api/matches/{match_id}/legs/{leg_id}/undo");
        self.execute(self.request(Method::POST, &path)).await?;
        Ok(())
    }

    async fn next_player(&self, match_id: MatchId, leg_id: LegId) -> Result<NextPlayerResponse> {
        self.post_json::<(), _>(
            &format!("/api/matches/{match_id}/legs/{leg_id}/next-player"),
            None,
        )
        .await
    }

    async fn player_stats(&self, player_id: PlayerId) -> Result<serde_json::Value> {
        self.get_json(&format!("/api/stats/player/{player_id}"))
            .await
    }
}
