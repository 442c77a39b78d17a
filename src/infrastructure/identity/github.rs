//! GitHub profile fetcher

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::check_status;
use crate::application::errors::BotError;
use crate::domain::entities::{IdentityProvider, Profile};
use crate::domain::traits::ProfileFetcher;

/// GitHub REST API endpoint
pub const API_BASE: &str = "https://api.github.com";

/// Resolves the signed-in GitHub user's name
pub struct GitHubProfileFetcher {
    client: Client,
    api_base: String,
    user_agent: String,
}

/// Subset of `GET /user`
#[derive(Deserialize, Debug)]
struct GitHubUser {
    login: String,
    name: Option<String>,
}

impl GitHubProfileFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_base: API_BASE.to_string(),
            user_agent: super::DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn user_url(&self) -> String {
        format!("{}/user", self.api_base)
    }
}

#[async_trait]
impl ProfileFetcher for GitHubProfileFetcher {
    fn provider(&self) -> IdentityProvider {
        IdentityProvider::GitHub
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, BotError> {
        let response = self.client
            .get(self.user_url())
            .header("Authorization", format!("token {}", access_token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let response = check_status(IdentityProvider::GitHub, response).await?;

        let user: GitHubUser = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        let name = user
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(user.login);
        Ok(Profile::new(name))
    }
}
