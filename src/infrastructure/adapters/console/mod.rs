//! Console adapter for development/testing

use async_trait::async_trait;
use crate::application::errors::BotError;
use crate::application::messaging::replies::{GET_USER_HISTORY_EVENT, SIGN_IN_EVENT, SIGN_OUT_EVENT};
use crate::domain::entities::{Activity, ActivityType, ChannelAccount, IdentityProvider, OutboundActivity};
use crate::domain::traits::{Bot, BotInfo};
use crate::infrastructure::config::ConsoleConfig;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console-bot".to_string(),
                name: name.into(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new("intent-bot")
    }
}

/// Lines printed for one outbound activity
pub fn render(activity: &OutboundActivity) -> Vec<String> {
    let mut lines = Vec::new();
    match activity.kind {
        ActivityType::Typing => lines.push("[BOT] ...".to_string()),
        ActivityType::Event => {
            let name = activity.name.as_deref().unwrap_or("event");
            match &activity.value {
                Some(value) => lines.push(format!("[EVENT] {} {}", name, value)),
                None => lines.push(format!("[EVENT] {}", name)),
            }
        }
        _ => {
            if let Some(text) = &activity.text {
                lines.push(format!("[BOT] {}", text));
            }
            for attachment in &activity.attachments {
                lines.push(format!("[CARD] {}", attachment.content.text));
                for button in &attachment.content.buttons {
                    lines.push(format!("  [{}] {}", button.title, button.value));
                }
            }
            if let Some(suggested) = &activity.suggested_actions {
                let titles: Vec<&str> = suggested.actions.iter().map(|a| a.title.as_str()).collect();
                lines.push(format!("  [Buttons] {}", titles.join(" | ")));
            }
        }
    }
    lines
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_activity(&self, _conversation_id: &str, activity: &OutboundActivity) -> Result<String, BotError> {
        for line in render(activity) {
            println!("{}", line);
        }
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// One line typed at the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    SignIn { provider: String, token: String },
    SignOut,
    History,
    Quit,
    Text(String),
    Empty,
}

/// Parse a console line
pub fn parse_input(line: &str) -> Result<ConsoleInput, BotError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleInput::Empty);
    }
    if !line.starts_with('/') {
        return Ok(ConsoleInput::Text(line.to_string()));
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match command {
        "/signin" => {
            let provider = parts.next();
            let token = parts.next();
            match (provider, token) {
                (Some(provider), Some(token)) => {
                    if IdentityProvider::from_channel_name(provider).is_none() {
                        return Err(BotError::Parse(format!("Unknown provider: {}", provider)));
                    }
                    Ok(ConsoleInput::SignIn {
                        provider: provider.to_lowercase(),
                        token: token.to_string(),
                    })
                }
                _ => Err(BotError::Parse("Usage: /signin <github|microsoft> <token>".to_string())),
            }
        }
        "/signout" => Ok(ConsoleInput::SignOut),
        "/history" => Ok(ConsoleInput::History),
        "/quit" | "/exit" => Ok(ConsoleInput::Quit),
        // Unknown commands go to the bot as plain text
        _ => Ok(ConsoleInput::Text(line.to_string())),
    }
}

/// Conversation state the console keeps on behalf of the web channel
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    user: ChannelAccount,
    bot: ChannelAccount,
    channel_id: String,
    conversation_id: String,
    provider: Option<String>,
    token: Option<String>,
}

impl ConsoleSession {
    pub fn new(config: &ConsoleConfig, bot: ChannelAccount) -> Self {
        Self {
            user: ChannelAccount::new(&config.user_id),
            bot,
            channel_id: config.channel_id.clone(),
            conversation_id: uuid::Uuid::new_v4().to_string(),
            provider: None,
            token: None,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_in(&mut self, provider: impl Into<String>, token: impl Into<String>) {
        self.provider = Some(provider.into());
        self.token = Some(token.into());
    }

    pub fn sign_out(&mut self) {
        self.provider = None;
        self.token = None;
    }

    fn address(&self, activity: Activity) -> Activity {
        let activity = activity
            .with_channel(&self.channel_id)
            .with_conversation(&self.conversation_id)
            .with_from(self.user.clone())
            .with_recipient(self.bot.clone());
        match (&self.provider, &self.token) {
            (Some(provider), Some(token)) => activity.with_token(provider, token),
            _ => activity,
        }
    }

    /// The user and the bot joining the conversation
    pub fn join(&self) -> Activity {
        self.address(Activity::members_added(vec![self.user.clone(), self.bot.clone()]))
    }

    pub fn message(&self, text: &str) -> Activity {
        self.address(Activity::message(text))
    }

    pub fn event(&self, name: &str) -> Activity {
        self.address(Activity::event(name))
    }

    /// Turn a console line into the activity to process, updating the session
    pub fn activity_for(&mut self, input: ConsoleInput) -> Option<Activity> {
        match input {
            ConsoleInput::SignIn { provider, token } => {
                self.sign_in(provider, token);
                Some(self.event(SIGN_IN_EVENT))
            }
            ConsoleInput::SignOut => {
                let activity = self.event(SIGN_OUT_EVENT);
                self.sign_out();
                Some(activity)
            }
            ConsoleInput::History => Some(self.event(GET_USER_HISTORY_EVENT)),
            ConsoleInput::Text(text) => Some(self.message(&text)),
            ConsoleInput::Quit | ConsoleInput::Empty => None,
        }
    }

    /// React to what the bot sent, returning the follow-up activity if any
    ///
    /// An `oauth/signout` request from the bot clears the token and is
    /// answered with the channel's own `oauth/signout` event.
    pub fn observe(&mut self, outbound: &[OutboundActivity]) -> Option<Activity> {
        if outbound.iter().any(|a| a.is_event(SIGN_OUT_EVENT)) {
            let activity = self.event(SIGN_OUT_EVENT);
            self.sign_out();
            return Some(activity);
        }
        None
    }
}
