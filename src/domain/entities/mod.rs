//! Domain entities - Core business objects with no external dependencies

pub mod account;
pub mod activity;
pub mod history;
pub mod intent;
pub mod profile;
pub mod reply;

pub use account::ChannelAccount;
pub use activity::{Activity, ActivityType, ChannelData, ConversationAccount};
pub use history::{HistoryRecord, HistoryRole};
pub use intent::{CatalogEntry, Intent, MatchResult};
pub use profile::{IdentityProvider, Profile};
pub use reply::{
    Attachment, CardAction, OutboundActivity, SignInCard, SuggestedActions, SIGN_IN_CARD_CONTENT_TYPE,
};
