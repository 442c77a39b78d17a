//! Domain layer - Core conversational model
//!
//! This layer contains:
//! - Entities: Activities, replies, intents, history records, profiles
//! - Traits: Abstractions for infrastructure (Bot, StateStore, ProfileFetcher)

pub mod entities;
pub mod traits;
