//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: In-memory state store
//! - Database: SQLite state store
//! - Identity: Profile lookups against GitHub and Microsoft Graph
//! - Adapters: Transports (console)

pub mod adapters;
pub mod config;
pub mod database;
pub mod identity;
pub mod storage;
