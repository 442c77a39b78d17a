//! Application services - The bots and the collaborators they drive

pub mod greeter;
pub mod history;
pub mod intent_dispatcher;

pub use greeter::Greeter;
pub use history::{HistoryHelper, HistoryService};
pub use intent_dispatcher::IntentDispatcher;
