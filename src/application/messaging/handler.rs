//! Activity handler - Capability interface implemented by each bot

use async_trait::async_trait;

use super::TurnContext;
use crate::application::errors::BotError;
use crate::domain::entities::ActivityType;

/// A bot behaviour that reacts to some activity types
#[async_trait]
pub trait ActivityHandler: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Whether this handler wants activities of the given type
    fn handles(&self, kind: ActivityType) -> bool;

    /// Handle the turn's activity, queuing replies on the context
    async fn handle(&self, turn: &mut TurnContext) -> Result<(), BotError>;

    /// Runs once at the end of every turn, after all handlers
    async fn on_turn_end(&self, _turn: &mut TurnContext) -> Result<(), BotError> {
        Ok(())
    }
}
