use serde::{Deserialize, Serialize};

use super::ActivityType;

/// Content type of the sign-in card attachment
pub const SIGN_IN_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.signin";

/// Button attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub value: String,
}

impl CardAction {
    /// Quick reply that posts its value back as a user message
    pub fn im_back(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: "imBack".to_string(),
            title: text.clone(),
            value: text,
        }
    }

    pub fn sign_in(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: "signin".to_string(),
            title: title.into(),
            value: url.into(),
        }
    }
}

/// Quick replies offered below a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedActions {
    pub actions: Vec<CardAction>,
    #[serde(default)]
    pub to: Vec<String>,
}

/// Body of a sign-in card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInCard {
    pub text: String,
    pub buttons: Vec<CardAction>,
}

/// Rich attachment on an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: SignInCard,
}

/// Activity queued by a handler for the transport to send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundActivity {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<SuggestedActions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl OutboundActivity {
    fn new(kind: ActivityType) -> Self {
        Self {
            kind,
            text: None,
            suggested_actions: None,
            attachments: Vec::new(),
            name: None,
            value: None,
        }
    }

    /// Message with no content yet
    pub fn message() -> Self {
        Self::new(ActivityType::Message)
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut activity = Self::new(ActivityType::Message);
        activity.text = Some(text.into());
        activity
    }

    pub fn event(name: impl Into<String>) -> Self {
        let mut activity = Self::new(ActivityType::Event);
        activity.name = Some(name.into());
        activity
    }

    pub fn typing() -> Self {
        Self::new(ActivityType::Typing)
    }

    pub fn with_suggested_actions(mut self, actions: SuggestedActions) -> Self {
        self.suggested_actions = Some(actions);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Text of the message, or of its sign-in card when it has no plain text
    pub fn display_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .or_else(|| self.attachments.first().map(|a| a.content.text.as_str()))
    }

    pub fn is_event(&self, name: &str) -> bool {
        self.kind == ActivityType::Event && self.name.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_reply_serializes_in_channel_shape() {
        let reply = OutboundActivity::text("Hi").with_suggested_actions(SuggestedActions {
            actions: vec![CardAction::im_back("Bye")],
            to: vec![],
        });

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["text"], "Hi");
        assert_eq!(json["suggestedActions"]["actions"][0]["type"], "imBack");
        assert!(json.get("attachments").is_none());
    }

    #[test]
    fn event_reply_has_no_text() {
        let reply = OutboundActivity::event("oauth/signout");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "event", "name": "oauth/signout" }));
        assert!(reply.is_event("oauth/signout"));
    }
}
