//! Canned replies - Pure builders for every outbound message the bots send

use chrono::NaiveTime;

use super::catalog::SUGGESTED_ACTIONS;
use crate::domain::entities::{
    Attachment, CardAction, HistoryRecord, OutboundActivity, SignInCard, SIGN_IN_CARD_CONTENT_TYPE,
};

/// Event the channel sends once the user finished signing in
pub const SIGN_IN_EVENT: &str = "oauth/signin";
/// Event exchanged in both directions when the user signs out
pub const SIGN_OUT_EVENT: &str = "oauth/signout";
/// Event the channel sends to ask for the user's history
pub const GET_USER_HISTORY_EVENT: &str = "GetUserHistory";
/// Event carrying history records back to the channel
pub const USER_HISTORY_EVENT: &str = "UserHistory";

pub const ORDER_SIGN_IN_TEXT: &str = "Please sign in to check your orders.";
pub const RUNNING_TOTAL_SIGN_IN_TEXT: &str = "Please sign in to keep a running total.";

pub fn greeting() -> OutboundActivity {
    OutboundActivity::text("Hello there. What can I help you with?")
        .with_suggested_actions(SUGGESTED_ACTIONS.clone())
}

pub fn time_of_day(now: NaiveTime) -> OutboundActivity {
    OutboundActivity::text(format!(
        "The time is now {}. What can I do to help?",
        now.format("%I:%M %p")
    ))
    .with_suggested_actions(SUGGESTED_ACTIONS.clone())
}

pub fn order_status() -> OutboundActivity {
    OutboundActivity::text("There is a package arriving later today.")
        .with_suggested_actions(SUGGESTED_ACTIONS.clone())
}

pub fn unknown() -> OutboundActivity {
    OutboundActivity::text("Sorry, I don't know what you mean.")
        .with_suggested_actions(SUGGESTED_ACTIONS.clone())
}

/// Sign-in card with the given prompt
pub fn sign_in_card(text: impl Into<String>, sign_in_url: impl Into<String>) -> OutboundActivity {
    OutboundActivity::message().with_attachment(Attachment {
        content_type: SIGN_IN_CARD_CONTENT_TYPE.to_string(),
        content: SignInCard {
            text: text.into(),
            buttons: vec![CardAction::sign_in("Sign in", sign_in_url)],
        },
    })
}

pub fn running_total(total: f64) -> OutboundActivity {
    OutboundActivity::text(format!("Running total:{}", total))
}

/// Asks the channel to sign the user out
pub fn sign_out_request() -> OutboundActivity {
    OutboundActivity::event(SIGN_OUT_EVENT)
}

pub fn signed_out() -> OutboundActivity {
    OutboundActivity::text("See you later!")
}

pub fn signed_in(name: &str, provider_label: &str) -> OutboundActivity {
    OutboundActivity::text(format!("Signed in as {} ({}).", name, provider_label))
}

/// History event; records are omitted when there are none
pub fn user_history(records: &[HistoryRecord]) -> OutboundActivity {
    let event = OutboundActivity::event(USER_HISTORY_EVENT);
    if records.is_empty() {
        return event;
    }
    match serde_json::to_value(records) {
        Ok(value) => event.with_value(value),
        Err(_) => event,
    }
}
