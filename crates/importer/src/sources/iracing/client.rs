use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use storage::models::{RosterMember, Session, SubsessionResults};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::auth::{Credentials, hash_password};
use super::models::{LeagueResponse, SeasonSessionsResponse, SubsessionResponse};
use crate::error::{ImporterError, Result};

pub const DEFAULT_BASE_URL: &str = "https://members-ng.iracing.com";

const USER_AGENT: &str = "League Standings Tool";
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the racing service data API. Signs in lazily on the first
/// request and keeps the session cookies for the lifetime of the client.
pub struct IRacingClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Option<Credentials>,
    signed_in: OnceCell<()>,
}

impl IRacingClient {
    pub fn new(base_url: impl Into<String>, credentials: Option<Credentials>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            credentials,
            signed_in: OnceCell::new(),
        })
    }

    pub async fn season_sessions(&self, league_id: i64, season_id: i64) -> Result<Vec<Session>> {
        let endpoint =
            format!("/data/league/season_sessions?league_id={league_id}&season_id={season_id}");
        let response: SeasonSessionsResponse = self.fetch(&endpoint).await?;
        Ok(response.sessions.into_iter().map(Session::from).collect())
    }

    pub async fn subsession_results(&self, subsession_id: i64) -> Result<SubsessionResults> {
        let endpoint = format!("/data/results/get?subsession_id={subsession_id}");
        let response: SubsessionResponse = self.fetch(&endpoint).await?;
        Ok(SubsessionResults::from(response))
    }

    pub async fn league_roster(&self, league_id: i64) -> Result<Vec<RosterMember>> {
        let endpoint = format!("/data/league/get?league_id={league_id}&include_roster=1");
        let response: LeagueResponse = self.fetch(&endpoint).await?;
        Ok(response.roster.into_iter().map(RosterMember::from).collect())
    }

    /// GETs a data endpoint. Most endpoints answer with a `link` to the real
    /// payload, which is followed once.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.sign_in().await?;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Making request to: {}", url);
        let response = self.client.get(&url).timeout(FETCH_TIMEOUT).send().await?;
        let body: Value = ensure_success(endpoint, response)?.json().await?;

        if let Some(link) = body.get("link").and_then(Value::as_str) {
            debug!("Following data link for {}", endpoint);
            let linked = self.client.get(link).timeout(FETCH_TIMEOUT).send().await?;
            return Ok(ensure_success(endpoint, linked)?.json::<T>().await?);
        }

        Ok(serde_json::from_value(body)?)
    }

    async fn sign_in(&self) -> Result<()> {
        let Some(credentials) = &self.credentials else {
            return Ok(());
        };

        self.signed_in
            .get_or_try_init(|| async {
                info!("Authenticating as {}", credentials.email);
                let body = serde_json::json!({
                    "email": credentials.email,
                    "password": hash_password(&credentials.email, &credentials.password),
                });
                let response = self
                    .client
                    .post(format!("{}/auth", self.base_url))
                    .timeout(AUTH_TIMEOUT)
                    .json(&body)
                    .send()
                    .await?;

                match response.status() {
                    status if status.is_success() => Ok::<(), ImporterError>(()),
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                        ImporterError::AuthenticationError("invalid credentials".to_string()),
                    ),
                    status => Err(ImporterError::AuthenticationError(format!(
                        "unexpected status {status}"
                    ))),
                }
            })
            .await?;

        Ok(())
    }
}

fn ensure_success(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ImporterError::UpstreamError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}
