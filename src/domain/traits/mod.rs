//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod profile;
pub mod store;

pub use bot::{Bot, BotInfo};
pub use profile::ProfileFetcher;
pub use store::StateStore;
