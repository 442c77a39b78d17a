//! Conversation history - Binds signed-in identities and replays what they said

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::errors::{BotError, StorageError};
use crate::application::messaging::{replies, TurnContext};
use crate::application::state::BotState;
use crate::domain::entities::{ActivityType, HistoryRecord, Profile};
use crate::domain::traits::StateStore;

/// User-state property holding the bound identity
pub const USER_ID_PROPERTY: &str = "UserId";

/// Records kept per identity
pub const MAX_HISTORY_RECORDS: usize = 50;

/// Collaborator that owns identity binding and history replay
#[async_trait]
pub trait HistoryHelper: Send + Sync {
    /// Bind the signed-in identity to the user and send its stored history
    async fn set_user_id_and_send_history(
        &self,
        turn: &mut TurnContext,
        profile: &Profile,
        user_state: &BotState,
        provider_label: &str,
    ) -> Result<(), BotError>;

    /// Resend the user's history, seeding an empty one from `initial_history`
    async fn send_user_history(
        &self,
        turn: &mut TurnContext,
        user_state: &BotState,
        initial_history: &[HistoryRecord],
    ) -> Result<(), BotError>;

    /// Append this turn's exchange to the bound identity's history
    async fn record_turn(&self, _turn: &mut TurnContext, _user_state: &BotState) -> Result<(), BotError> {
        Ok(())
    }
}

/// History kept in a `StateStore` under `history/<identity>`
pub struct HistoryService {
    store: Arc<dyn StateStore>,
    max_records: usize,
}

impl HistoryService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            max_records: MAX_HISTORY_RECORDS,
        }
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    fn key(identity: &str) -> String {
        format!("history/{}", identity)
    }

    pub async fn load_history(&self, identity: &str) -> Result<Vec<HistoryRecord>, BotError> {
        match self.store.get(&Self::key(identity)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).map_err(StorageError::from)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_history(&self, identity: &str, history: &[HistoryRecord]) -> Result<(), BotError> {
        let start = history.len().saturating_sub(self.max_records);
        let raw = serde_json::to_string(&history[start..]).map_err(StorageError::from)?;
        self.store.set(&Self::key(identity), &raw).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryHelper for HistoryService {
    async fn set_user_id_and_send_history(
        &self,
        turn: &mut TurnContext,
        profile: &Profile,
        user_state: &BotState,
        provider_label: &str,
    ) -> Result<(), BotError> {
        let identity = format!("{}:{}", provider_label, profile.name);
        user_state
            .create_property::<String>(USER_ID_PROPERTY)
            .set(turn, identity.clone())
            .await?;
        info!("Bound {} to {}", turn.activity().from, identity);

        turn.send(replies::signed_in(&profile.name, provider_label));

        let history = self.load_history(&identity).await?;
        turn.send(replies::user_history(&history));
        Ok(())
    }

    async fn send_user_history(
        &self,
        turn: &mut TurnContext,
        user_state: &BotState,
        initial_history: &[HistoryRecord],
    ) -> Result<(), BotError> {
        let identity = user_state
            .create_property::<String>(USER_ID_PROPERTY)
            .get_optional(turn)
            .await?;

        let Some(identity) = identity else {
            debug!("No identity bound, echoing initial history");
            turn.send(replies::user_history(initial_history));
            return Ok(());
        };

        let mut history = self.load_history(&identity).await?;
        if history.is_empty() && !initial_history.is_empty() {
            history = initial_history.to_vec();
            self.save_history(&identity, &history).await?;
            debug!("Seeded history for {} with {} records", identity, history.len());
        }

        turn.send(replies::user_history(&history));
        Ok(())
    }

    async fn record_turn(&self, turn: &mut TurnContext, user_state: &BotState) -> Result<(), BotError> {
        let activity = turn.activity();
        if activity.kind != ActivityType::Message || activity.access_token().is_none() {
            return Ok(());
        }

        let identity = user_state
            .create_property::<String>(USER_ID_PROPERTY)
            .get_optional(turn)
            .await?;
        let Some(identity) = identity else {
            return Ok(());
        };

        let mut records = Vec::new();
        let text = turn.activity().text();
        if !text.is_empty() {
            records.push(HistoryRecord::user(text));
        }
        records.extend(
            turn.outbound()
                .iter()
                .filter(|reply| reply.kind == ActivityType::Message)
                .filter_map(|reply| reply.display_text())
                .map(HistoryRecord::bot),
        );
        if records.is_empty() {
            return Ok(());
        }

        let mut history = self.load_history(&identity).await?;
        history.extend(records);
        self.save_history(&identity, &history).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Activity, ChannelAccount, HistoryRole};
    use crate::infrastructure::storage::MemoryStore;

    fn sender() -> ChannelAccount {
        ChannelAccount::new("user-1")
    }

    fn event_turn(name: &str) -> TurnContext {
        TurnContext::new(Activity::event(name).with_channel("test").with_from(sender()))
    }

    fn message_turn(text: &str) -> TurnContext {
        TurnContext::new(
            Activity::message(text)
                .with_channel("test")
                .with_from(sender())
                .with_token("github", "token"),
        )
    }

    #[tokio::test]
    async fn sign_in_binds_identity_and_sends_history_event() {
        let store = Arc::new(MemoryStore::new());
        let user_state = BotState::user(store.clone());
        let history = HistoryService::new(store);

        let mut turn = event_turn(replies::SIGN_IN_EVENT);
        history
            .set_user_id_and_send_history(&mut turn, &Profile::new("octocat"), &user_state, "GitHub")
            .await
            .unwrap();

        let bound = user_state
            .create_property::<String>(USER_ID_PROPERTY)
            .get_optional(&mut turn)
            .await
            .unwrap();
        assert_eq!(bound.as_deref(), Some("GitHub:octocat"));
        assert_eq!(turn.outbound()[0].text.as_deref(), Some("Signed in as octocat (GitHub)."));
        assert!(turn.outbound()[1].is_event(replies::USER_HISTORY_EVENT));
    }

    #[tokio::test]
    async fn unbound_user_gets_initial_history_back() {
        let store = Arc::new(MemoryStore::new());
        let user_state = BotState::user(store.clone());
        let history = HistoryService::new(store);

        let mut turn = event_turn(replies::GET_USER_HISTORY_EVENT);
        let initial = vec![HistoryRecord::user("hello")];
        history.send_user_history(&mut turn, &user_state, &initial).await.unwrap();

        let value = turn.outbound()[0].value.clone().unwrap();
        assert_eq!(value[0]["text"], "hello");
    }

    #[tokio::test]
    async fn bound_user_history_is_seeded_once() {
        let store = Arc::new(MemoryStore::new());
        let user_state = BotState::user(store.clone());
        let history = HistoryService::new(store);

        let mut turn = event_turn(replies::GET_USER_HISTORY_EVENT);
        user_state
            .create_property::<String>(USER_ID_PROPERTY)
            .set(&mut turn, "GitHub:octocat".to_string())
            .await
            .unwrap();

        history
            .send_user_history(&mut turn, &user_state, &[HistoryRecord::user("first")])
            .await
            .unwrap();
        history
            .send_user_history(&mut turn, &user_state, &[HistoryRecord::user("second")])
            .await
            .unwrap();

        let stored = history.load_history("GitHub:octocat").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "first");
    }

    #[tokio::test]
    async fn record_turn_appends_user_text_and_replies() {
        let store = Arc::new(MemoryStore::new());
        let user_state = BotState::user(store.clone());
        let history = HistoryService::new(store).with_max_records(3);

        for text in ["one", "two"] {
            let mut turn = message_turn(text);
            user_state
                .create_property::<String>(USER_ID_PROPERTY)
                .set(&mut turn, "GitHub:octocat".to_string())
                .await
                .unwrap();
            turn.send(replies::unknown());
            history.record_turn(&mut turn, &user_state).await.unwrap();
        }

        let stored = history.load_history("GitHub:octocat").await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].role, HistoryRole::Bot);
        assert_eq!(stored[1].text, "two");
        assert_eq!(stored[2].text, "Sorry, I don't know what you mean.");
    }

    #[tokio::test]
    async fn record_turn_skips_signed_out_users() {
        let store = Arc::new(MemoryStore::new());
        let user_state = BotState::user(store.clone());
        let history = HistoryService::new(store.clone());

        let mut turn = TurnContext::new(Activity::message("hi").with_channel("test").with_from(sender()));
        history.record_turn(&mut turn, &user_state).await.unwrap();

        assert!(store.get("test/users/user-1").await.unwrap().is_none());
    }
}
