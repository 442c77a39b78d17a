use serde::{Deserialize, Serialize};

use super::{ChannelAccount, HistoryRecord, IdentityProvider};

/// Type of an inbound or outbound activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    #[default]
    Message,
    Event,
    ConversationUpdate,
    Typing,
    #[serde(other)]
    Unknown,
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Message => "message",
            ActivityType::Event => "event",
            ActivityType::ConversationUpdate => "conversationUpdate",
            ActivityType::Typing => "typing",
            ActivityType::Unknown => "unknown",
        }
    }
}

/// Conversation reference carried by every activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAccount {
    #[serde(default)]
    pub id: String,
}

/// Out-of-band payload attached to an activity by the channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_history: Option<Vec<HistoryRecord>>,
}

impl ChannelData {
    /// Access token, with an empty string treated as absent
    pub fn access_token(&self) -> Option<&str> {
        self.oauth_access_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    /// Provider named by the channel, if it is one we know
    pub fn provider(&self) -> Option<IdentityProvider> {
        self.oauth_provider
            .as_deref()
            .and_then(IdentityProvider::from_channel_name)
    }
}

/// Inbound conversational event delivered by a transport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub kind: ActivityType,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub conversation: ConversationAccount,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default)]
    pub recipient: ChannelAccount,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub channel_data: ChannelData,
}

impl Activity {
    pub fn new(kind: ActivityType) -> Self {
        Self {
            kind,
            id: Some(uuid::Uuid::new_v4().to_string()),
            ..Default::default()
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        let mut activity = Self::new(ActivityType::Message);
        activity.text = Some(text.into());
        activity
    }

    pub fn event(name: impl Into<String>) -> Self {
        let mut activity = Self::new(ActivityType::Event);
        activity.name = Some(name.into());
        activity
    }

    pub fn members_added(members: Vec<ChannelAccount>) -> Self {
        let mut activity = Self::new(ActivityType::ConversationUpdate);
        activity.members_added = members;
        activity
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation.id = conversation_id.into();
        self
    }

    pub fn with_from(mut self, from: ChannelAccount) -> Self {
        self.from = from;
        self
    }

    pub fn with_recipient(mut self, recipient: ChannelAccount) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn with_token(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.channel_data.oauth_provider = Some(provider.into());
        self.channel_data.oauth_access_token = Some(token.into());
        self
    }

    pub fn with_initial_history(mut self, history: Vec<HistoryRecord>) -> Self {
        self.channel_data.initial_history = Some(history);
        self
    }

    /// Message text, empty when the activity carries none
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.channel_data.access_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sign_in_event_from_channel_json() {
        let json = r#"{
            "type": "event",
            "name": "oauth/signin",
            "channelId": "webchat",
            "conversation": { "id": "conv-1" },
            "from": { "id": "user-1" },
            "recipient": { "id": "bot" },
            "channelData": { "oauthAccessToken": "abc", "oauthProvider": "github" }
        }"#;

        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityType::Event);
        assert_eq!(activity.name.as_deref(), Some("oauth/signin"));
        assert_eq!(activity.access_token(), Some("abc"));
        assert_eq!(activity.channel_data.provider(), Some(IdentityProvider::GitHub));
    }

    #[test]
    fn unknown_activity_types_are_tolerated() {
        let activity: Activity = serde_json::from_str(r#"{ "type": "installationUpdate" }"#).unwrap();
        assert_eq!(activity.kind, ActivityType::Unknown);
    }

    #[test]
    fn empty_token_counts_as_signed_out() {
        let activity = Activity::message("5").with_token("github", "");
        assert_eq!(activity.access_token(), None);
    }

    #[test]
    fn members_added_round_trips_through_camel_case() {
        let json = r#"{ "type": "conversationUpdate", "membersAdded": [{ "id": "u1" }, { "id": "bot" }] }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityType::ConversationUpdate);
        assert_eq!(activity.members_added.len(), 2);
    }
}
