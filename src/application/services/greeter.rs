use async_trait::async_trait;
use tracing::info;

use crate::application::errors::BotError;
use crate::application::messaging::{ActivityHandler, TurnContext};
use crate::domain::entities::{ActivityType, OutboundActivity};

/// Welcome text of the conversation-history bot
pub const DEFAULT_WELCOME_TEXT: &str = "Hi";
/// Welcome text of the QnA greeter
pub const QNA_WELCOME_TEXT: &str = "Welcome to QnA Bot";

/// Welcomes every participant that joins, except the bot itself
#[derive(Debug, Clone)]
pub struct Greeter {
    welcome_text: String,
}

impl Greeter {
    pub fn new(welcome_text: impl Into<String>) -> Self {
        Self {
            welcome_text: welcome_text.into(),
        }
    }

    pub fn welcome_text(&self) -> &str {
        &self.welcome_text
    }
}

impl Default for Greeter {
    fn default() -> Self {
        Self::new(DEFAULT_WELCOME_TEXT)
    }
}

#[async_trait]
impl ActivityHandler for Greeter {
    fn name(&self) -> &str {
        "greeter"
    }

    fn handles(&self, kind: ActivityType) -> bool {
        kind == ActivityType::ConversationUpdate
    }

    async fn handle(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        let activity = turn.activity();
        let joined: Vec<String> = activity
            .members_added
            .iter()
            .filter(|member| member.id != activity.recipient.id)
            .map(|member| member.id.clone())
            .collect();

        for member in joined {
            info!("Welcoming {}", member);
            turn.send(OutboundActivity::text(&self.welcome_text));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Activity, ChannelAccount};

    async fn welcomes_for(members: &[&str]) -> Vec<OutboundActivity> {
        let activity = Activity::members_added(members.iter().map(|id| ChannelAccount::new(*id)).collect())
            .with_recipient(ChannelAccount::new("bot"));
        let mut turn = TurnContext::new(activity);
        Greeter::default().handle(&mut turn).await.unwrap();
        turn.into_outbound()
    }

    #[tokio::test]
    async fn welcomes_each_member_except_the_bot() {
        let replies = welcomes_for(&["alice", "bot", "bob"]).await;
        assert_eq!(replies.len(), 2);
        assert!(replies.iter().all(|r| r.text.as_deref() == Some("Hi")));
    }

    #[tokio::test]
    async fn nobody_joined_nothing_sent() {
        assert!(welcomes_for(&[]).await.is_empty());
        assert!(welcomes_for(&["bot"]).await.is_empty());
    }

    #[tokio::test]
    async fn qna_variant_uses_its_own_text() {
        let activity = Activity::members_added(vec![ChannelAccount::new("alice")])
            .with_recipient(ChannelAccount::new("bot"));
        let mut turn = TurnContext::new(activity);
        Greeter::new(QNA_WELCOME_TEXT).handle(&mut turn).await.unwrap();
        assert_eq!(turn.outbound()[0].text.as_deref(), Some("Welcome to QnA Bot"));
    }

    #[test]
    fn only_handles_conversation_updates() {
        let greeter = Greeter::default();
        assert!(greeter.handles(ActivityType::ConversationUpdate));
        assert!(!greeter.handles(ActivityType::Message));
        assert!(!greeter.handles(ActivityType::Event));
    }
}
