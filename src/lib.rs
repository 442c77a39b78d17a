//! intent-bot - A conversational bot that greets, answers by intent and
//! keeps a signed-in running total

pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use application::errors::BotError;
use application::messaging::ActivityRouter;
use application::services::{Greeter, HistoryService, IntentDispatcher};
use application::state::BotState;
use domain::traits::StateStore;
use infrastructure::config::{Config, StorageBackend};
use infrastructure::database::SqliteStore;
use infrastructure::identity::{http_client, GitHubProfileFetcher, GraphProfileFetcher};
use infrastructure::storage::MemoryStore;

/// Open the state store the config asks for
pub fn build_store(config: &Config) -> Result<Arc<dyn StateStore>, BotError> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Sqlite => {
            let path = config
                .storage
                .path
                .as_ref()
                .ok_or_else(|| BotError::Config("storage.path is required for sqlite".to_string()))?;
            tracing::info!("Opening SQLite state store at {}", path.display());
            Ok(Arc::new(SqliteStore::new(path)?))
        }
    }
}

/// Wire the greeter and, unless disabled, the intent dispatcher
pub fn build_router(config: &Config, store: Arc<dyn StateStore>) -> Result<ActivityRouter, BotError> {
    let router = ActivityRouter::new().with_handler(Greeter::new(&config.bot.welcome_text));
    if !config.bot.intents {
        return Ok(router);
    }

    let client = http_client(config.http_timeout())?;
    let github = GitHubProfileFetcher::new(client.clone())
        .with_api_base(&config.identity.github_api_base)
        .with_user_agent(&config.identity.user_agent);
    let graph = GraphProfileFetcher::new(client).with_api_base(&config.identity.graph_api_base);

    let dispatcher = IntentDispatcher::new(
        BotState::user(store.clone()),
        BotState::auth_user(store.clone()),
        Arc::new(HistoryService::new(store)),
    )
    .with_profile_fetcher(Arc::new(github))
    .with_profile_fetcher(Arc::new(graph))
    .with_sign_in_url(&config.bot.sign_in_url);

    Ok(router.with_handler(dispatcher))
}
