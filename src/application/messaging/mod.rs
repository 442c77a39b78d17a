//! Message handling - Turn routing, intent classification and canned replies

pub mod catalog;
pub mod classifier;
pub mod context;
pub mod handler;
pub mod replies;
pub mod router;

pub use classifier::{IntentClassifier, MATCH_THRESHOLD};
pub use context::TurnContext;
pub use handler::ActivityHandler;
pub use router::ActivityRouter;
