use async_trait::async_trait;
use crate::domain::entities::{IdentityProvider, Profile};
use crate::application::errors::BotError;

/// Resolves a user's profile from an OAuth access token
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Provider this fetcher talks to
    fn provider(&self) -> IdentityProvider;

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, BotError>;
}
