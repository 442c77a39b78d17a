//! Microsoft Graph profile fetcher

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::check_status;
use crate::application::errors::BotError;
use crate::domain::entities::{IdentityProvider, Profile};
use crate::domain::traits::ProfileFetcher;

/// Microsoft Graph endpoint
pub const API_BASE: &str = "https://graph.microsoft.com";

/// Resolves the signed-in Azure AD user's display name
pub struct GraphProfileFetcher {
    client: Client,
    api_base: String,
}

/// Subset of `GET /v1.0/me`
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GraphUser {
    display_name: Option<String>,
    user_principal_name: Option<String>,
}

impl GraphProfileFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_base: API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn me_url(&self) -> String {
        format!("{}/v1.0/me", self.api_base)
    }
}

#[async_trait]
impl ProfileFetcher for GraphProfileFetcher {
    fn provider(&self) -> IdentityProvider {
        IdentityProvider::Microsoft
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, BotError> {
        let response = self.client
            .get(self.me_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let response = check_status(IdentityProvider::Microsoft, response).await?;

        let user: GraphUser = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        user.display_name
            .or(user.user_principal_name)
            .map(Profile::new)
            .ok_or_else(|| BotError::Parse("Graph profile has no displayName".to_string()))
    }
}
