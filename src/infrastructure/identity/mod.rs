//! Identity providers - Profile lookups for signed-in users

pub mod github;
pub mod graph;

pub use github::GitHubProfileFetcher;
pub use graph::GraphProfileFetcher;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::application::errors::BotError;
use crate::domain::entities::IdentityProvider;

pub const DEFAULT_USER_AGENT: &str = "intent-bot/0.1";

/// HTTP client shared by the fetchers
pub fn http_client(timeout: Duration) -> Result<Client, BotError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BotError::Config(format!("HTTP client: {}", e)))
}

/// Map a non-success response to an error
async fn check_status(provider: IdentityProvider, response: Response) -> Result<Response, BotError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BotError::Auth(format!(
            "{} rejected the access token (status: {})",
            provider, status
        ))),
        _ => Err(BotError::Network(format!(
            "{} profile request failed (status: {}, body: {})",
            provider, status, body
        ))),
    }
}
