//! Intent dispatcher - Answers messages by intent and handles sign-in events

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info, warn};

use super::history::HistoryHelper;
use crate::application::errors::BotError;
use crate::application::messaging::{replies, ActivityHandler, IntentClassifier, TurnContext};
use crate::application::state::{BotState, StateProperty};
use crate::domain::entities::{ActivityType, IdentityProvider, Intent, OutboundActivity};
use crate::domain::traits::ProfileFetcher;

/// Auth-user property accumulating numbers the user sends
pub const RUNNING_TOTAL_PROPERTY: &str = "RunningTotal";

/// Where sign-in cards point when nothing else is configured
pub const DEFAULT_SIGN_IN_URL: &str = "about:blank";

/// Classifies messages and dispatches them to canned answers
pub struct IntentDispatcher {
    classifier: IntentClassifier,
    user_state: BotState,
    auth_user_state: BotState,
    running_total: StateProperty<f64>,
    profile_fetchers: HashMap<IdentityProvider, Arc<dyn ProfileFetcher>>,
    history: Arc<dyn HistoryHelper>,
    sign_in_url: String,
}

impl IntentDispatcher {
    pub fn new(user_state: BotState, auth_user_state: BotState, history: Arc<dyn HistoryHelper>) -> Self {
        let running_total = auth_user_state.create_property(RUNNING_TOTAL_PROPERTY);
        Self {
            classifier: IntentClassifier::default(),
            user_state,
            auth_user_state,
            running_total,
            profile_fetchers: HashMap::new(),
            history,
            sign_in_url: DEFAULT_SIGN_IN_URL.to_string(),
        }
    }

    /// Register the fetcher used for its provider's sign-ins
    pub fn with_profile_fetcher(mut self, fetcher: Arc<dyn ProfileFetcher>) -> Self {
        self.profile_fetchers.insert(fetcher.provider(), fetcher);
        self
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_sign_in_url(mut self, url: impl Into<String>) -> Self {
        self.sign_in_url = url.into();
        self
    }

    async fn on_message(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        let text = turn.activity().text().to_string();
        let signed_in = turn.activity().access_token().is_some();

        let intent = self.classifier.classify(&text).map(|m| m.intent);
        debug!("Message {:?} classified as {:?}", text, intent);

        match intent {
            Some(Intent::Greeting) => turn.send(replies::greeting()),
            Some(Intent::Farewell) => turn.send(replies::sign_out_request()),
            Some(Intent::Time) => turn.send(replies::time_of_day(Local::now().time())),
            Some(Intent::Order) if signed_in => turn.send(replies::order_status()),
            Some(Intent::Order) => {
                turn.send(replies::sign_in_card(replies::ORDER_SIGN_IN_TEXT, &self.sign_in_url))
            }
            None => match parse_number(&text) {
                Some(_) if !signed_in => turn.send(replies::sign_in_card(
                    replies::RUNNING_TOTAL_SIGN_IN_TEXT,
                    &self.sign_in_url,
                )),
                Some(value) => {
                    let total = self.running_total.get(turn, 0.0).await? + value;
                    self.running_total.set(turn, total).await?;
                    turn.send(replies::running_total(total));
                }
                None => turn.send(replies::unknown()),
            },
        }
        Ok(())
    }

    async fn on_event(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        let name = turn.activity().name.clone().unwrap_or_default();

        match name.as_str() {
            replies::SIGN_IN_EVENT => self.on_sign_in(turn).await,
            replies::SIGN_OUT_EVENT => {
                turn.send(replies::signed_out());
                Ok(())
            }
            replies::GET_USER_HISTORY_EVENT => {
                let initial = turn
                    .activity()
                    .channel_data
                    .initial_history
                    .clone()
                    .unwrap_or_default();
                self.history
                    .send_user_history(turn, &self.user_state, &initial)
                    .await
            }
            other => {
                debug!("Ignoring event {:?}", other);
                Ok(())
            }
        }
    }

    async fn on_sign_in(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        let channel_data = turn.activity().channel_data.clone();

        turn.send(OutboundActivity::typing());

        let Some(provider) = channel_data.provider() else {
            warn!("Sign-in with unsupported provider {:?}", channel_data.oauth_provider);
            return Ok(());
        };
        let Some(fetcher) = self.profile_fetchers.get(&provider) else {
            warn!("No profile fetcher registered for {}", provider);
            return Ok(());
        };
        let token = channel_data
            .access_token()
            .ok_or_else(|| BotError::Auth(format!("{} sign-in without access token", provider)))?;

        let profile = fetcher.fetch_profile(token).await?;
        info!("{} sign-in for {}", provider, profile.name);

        self.history
            .set_user_id_and_send_history(turn, &profile, &self.user_state, provider.label())
            .await
    }
}

#[async_trait]
impl ActivityHandler for IntentDispatcher {
    fn name(&self) -> &str {
        "intent-dispatcher"
    }

    fn handles(&self, kind: ActivityType) -> bool {
        matches!(kind, ActivityType::Message | ActivityType::Event)
    }

    async fn handle(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        match turn.activity().kind {
            ActivityType::Message => self.on_message(turn).await,
            ActivityType::Event => self.on_event(turn).await,
            _ => Ok(()),
        }
    }

    async fn on_turn_end(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        self.history.record_turn(turn, &self.user_state).await?;

        self.user_state.save_changes(turn, false).await?;
        self.auth_user_state.save_changes(turn, false).await?;
        Ok(())
    }
}

/// Parse message text as a finite number
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number(" -2.5 "), Some(-2.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn rejects_blank_and_non_finite_input() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("five"), None);
    }
}
