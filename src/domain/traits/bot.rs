use async_trait::async_trait;
use crate::domain::entities::{ChannelAccount, OutboundActivity};
use crate::application::errors::BotError;

/// Bot trait - abstraction for the transport that delivers activities
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the transport
    async fn start(&self) -> Result<(), BotError>;

    /// Send one activity to a conversation, returning the transport's id for it
    async fn send_activity(&self, conversation_id: &str, activity: &OutboundActivity) -> Result<String, BotError>;

    /// Send activities in order, stopping at the first failure
    async fn send_activities(&self, conversation_id: &str, activities: &[OutboundActivity]) -> Result<Vec<String>, BotError> {
        let mut ids = Vec::with_capacity(activities.len());
        for activity in activities {
            ids.push(self.send_activity(conversation_id, activity).await?);
        }
        Ok(ids)
    }

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}

impl BotInfo {
    /// Account used as `recipient` on inbound activities
    pub fn account(&self) -> ChannelAccount {
        ChannelAccount::new(&self.id).with_name(&self.name)
    }
}
