//! Activity router - Runs handlers for each inbound activity

use std::sync::Arc;

use tracing::{debug, info};

use super::{ActivityHandler, TurnContext};
use crate::application::errors::BotError;
use crate::domain::entities::{Activity, OutboundActivity};

/// Routes activities to handlers, then runs every end-of-turn hook
#[derive(Clone, Default)]
pub struct ActivityRouter {
    handlers: Vec<Arc<dyn ActivityHandler>>,
}

impl ActivityRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler; handlers run in registration order
    pub fn with_handler<H: ActivityHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn add_handler(mut self, handler: Arc<dyn ActivityHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Process an activity and return the activities to send back
    pub async fn process(&self, activity: Activity) -> Result<Vec<OutboundActivity>, BotError> {
        Ok(self.process_turn(activity).await?.into_outbound())
    }

    /// Process an activity and return the finished turn
    ///
    /// A handler error aborts the turn before the end-of-turn hooks run.
    pub async fn process_turn(&self, activity: Activity) -> Result<TurnContext, BotError> {
        let kind = activity.kind;
        info!(
            activity_type = kind.as_str(),
            from = %activity.from,
            conversation = %activity.conversation.id,
            "turn started"
        );

        let mut turn = TurnContext::new(activity);

        for handler in &self.handlers {
            if !handler.handles(kind) {
                continue;
            }
            debug!(handler = handler.name(), "handler processing");
            handler.handle(&mut turn).await?;
        }

        for handler in &self.handlers {
            handler.on_turn_end(&mut turn).await?;
        }

        info!(
            activity_type = kind.as_str(),
            replies = turn.outbound().len(),
            "turn finished"
        );
        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ActivityType;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        ends: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ActivityHandler for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn handles(&self, kind: ActivityType) -> bool {
            kind == ActivityType::Message
        }

        async fn handle(&self, turn: &mut TurnContext) -> Result<(), BotError> {
            let text = format!("Echo: {}", turn.activity().text());
            turn.send(OutboundActivity::text(text));
            Ok(())
        }

        async fn on_turn_end(&self, _turn: &mut TurnContext) -> Result<(), BotError> {
            self.ends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl ActivityHandler for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn handles(&self, _kind: ActivityType) -> bool {
            true
        }

        async fn handle(&self, _turn: &mut TurnContext) -> Result<(), BotError> {
            Err(BotError::Network("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn only_matching_handlers_run_but_every_end_hook_does() {
        let ends = Arc::new(AtomicUsize::new(0));
        let router = ActivityRouter::new().with_handler(Echo { ends: ends.clone() });

        let replies = router.process(Activity::message("hi")).await.unwrap();
        assert_eq!(replies[0].text.as_deref(), Some("Echo: hi"));

        let replies = router.process(Activity::event("ping")).await.unwrap();
        assert!(replies.is_empty());

        assert_eq!(ends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn handler_errors_abort_the_turn() {
        let ends = Arc::new(AtomicUsize::new(0));
        let router = ActivityRouter::new()
            .with_handler(Failing)
            .with_handler(Echo { ends: ends.clone() });

        let err = router.process(Activity::message("hi")).await.unwrap_err();
        assert!(matches!(err, BotError::Network(_)));
        assert_eq!(ends.load(Ordering::SeqCst), 0);
    }
}
