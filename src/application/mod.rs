//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: The greeter, the intent dispatcher and the history helper
//! - State: Per-turn state transactions over a `StateStore`
//! - Errors: Domain-specific errors
//! - Messaging: Turn routing, classification, canned replies

pub mod errors;
pub mod messaging;
pub mod services;
pub mod state;
