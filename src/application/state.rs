//! Conversation state - Scoped property bags persisted through a `StateStore`
//!
//! Each scope is loaded at most once per turn into the `TurnContext`,
//! mutated through typed `StateProperty` accessors and written back by
//! `BotState::save_changes` at the end of the turn.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::application::errors::{BotError, StorageError};
use crate::application::messaging::TurnContext;
use crate::domain::entities::Activity;
use crate::domain::traits::StateStore;

/// Which state bag a property lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateScope {
    /// Per channel user
    User,
    /// Per channel user, holding data that requires a signed-in user
    AuthUser,
}

impl StateScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateScope::User => "user",
            StateScope::AuthUser => "auth-user",
        }
    }

    fn namespace(&self) -> &'static str {
        match self {
            StateScope::User => "users",
            StateScope::AuthUser => "auth-users",
        }
    }
}

/// Scope contents loaded into a turn
#[derive(Debug, Clone)]
pub struct CachedState {
    pub(crate) key: String,
    pub(crate) values: Map<String, Value>,
    pub(crate) dirty: bool,
}

/// A state scope bound to a store
#[derive(Clone)]
pub struct BotState {
    scope: StateScope,
    store: Arc<dyn StateStore>,
}

impl BotState {
    pub fn new(scope: StateScope, store: Arc<dyn StateStore>) -> Self {
        Self { scope, store }
    }

    pub fn user(store: Arc<dyn StateStore>) -> Self {
        Self::new(StateScope::User, store)
    }

    pub fn auth_user(store: Arc<dyn StateStore>) -> Self {
        Self::new(StateScope::AuthUser, store)
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Storage key for the sender of an activity
    pub fn storage_key(&self, activity: &Activity) -> Result<String, BotError> {
        if activity.channel_id.is_empty() {
            return Err(BotError::Parse("activity is missing channelId".to_string()));
        }
        if activity.from.id.is_empty() {
            return Err(BotError::Parse("activity is missing from.id".to_string()));
        }
        Ok(format!(
            "{}/{}/{}",
            activity.channel_id,
            self.scope.namespace(),
            activity.from.id
        ))
    }

    /// Load the scope into the turn unless it is already cached
    pub async fn load(&self, turn: &mut TurnContext, force: bool) -> Result<(), BotError> {
        if turn.cached_state(self.scope).is_some() && !force {
            return Ok(());
        }

        let key = self.storage_key(turn.activity())?;
        let values = match self.store.get(&key).await? {
            Some(raw) => serde_json::from_str::<Map<String, Value>>(&raw).map_err(StorageError::from)?,
            None => Map::new(),
        };
        debug!("Loaded {} state from {} ({} properties)", self.scope.as_str(), key, values.len());

        turn.insert_cached_state(self.scope, CachedState {
            key,
            values,
            dirty: false,
        });
        Ok(())
    }

    /// Write the scope back if it changed this turn (or always, when forced)
    pub async fn save_changes(&self, turn: &mut TurnContext, force: bool) -> Result<(), BotError> {
        turn.record_save(self.scope);

        let Some(cached) = turn.cached_state_mut(self.scope) else {
            debug!("No {} state loaded this turn, nothing to save", self.scope.as_str());
            return Ok(());
        };

        if !cached.dirty && !force {
            return Ok(());
        }

        let raw = serde_json::to_string(&cached.values).map_err(StorageError::from)?;
        self.store.set(&cached.key, &raw).await?;
        cached.dirty = false;
        debug!("Saved {} state to {}", self.scope.as_str(), cached.key);
        Ok(())
    }

    pub fn create_property<T>(&self, name: impl Into<String>) -> StateProperty<T> {
        StateProperty {
            state: self.clone(),
            name: name.into(),
            _marker: PhantomData,
        }
    }
}

/// Typed accessor for one property of a scope
pub struct StateProperty<T> {
    state: BotState,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateProperty<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the property, falling back to `default` when unset
    pub async fn get(&self, turn: &mut TurnContext, default: T) -> Result<T, BotError> {
        Ok(self.get_optional(turn).await?.unwrap_or(default))
    }

    pub async fn get_optional(&self, turn: &mut TurnContext) -> Result<Option<T>, BotError> {
        self.state.load(turn, false).await?;

        let value = turn
            .cached_state(self.state.scope)
            .and_then(|cached| cached.values.get(&self.name))
            .cloned();

        match value {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(StorageError::from)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, turn: &mut TurnContext, value: T) -> Result<(), BotError> {
        self.state.load(turn, false).await?;

        let value = serde_json::to_value(value).map_err(StorageError::from)?;
        let cached = turn
            .cached_state_mut(self.state.scope)
            .ok_or_else(|| BotError::Internal(format!("{} state not loaded", self.state.scope.as_str())))?;
        cached.values.insert(self.name.clone(), value);
        cached.dirty = true;
        Ok(())
    }

    pub async fn delete(&self, turn: &mut TurnContext) -> Result<(), BotError> {
        self.state.load(turn, false).await?;

        if let Some(cached) = turn.cached_state_mut(self.state.scope) {
            if cached.values.remove(&self.name).is_some() {
                cached.dirty = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ChannelAccount;
    use crate::infrastructure::storage::MemoryStore;

    fn turn() -> TurnContext {
        TurnContext::new(
            Activity::message("5")
                .with_channel("test")
                .with_from(ChannelAccount::new("user-1")),
        )
    }

    #[tokio::test]
    async fn property_defaults_until_set() {
        let store = Arc::new(MemoryStore::new());
        let state = BotState::auth_user(store);
        let total = state.create_property::<f64>("RunningTotal");

        let mut turn = turn();
        assert_eq!(total.get(&mut turn, 0.0).await.unwrap(), 0.0);

        total.set(&mut turn, 5.0).await.unwrap();
        assert_eq!(total.get(&mut turn, 0.0).await.unwrap(), 5.0);
    }

    #[tokio::test]
    async fn changes_are_only_visible_after_save() {
        let store = Arc::new(MemoryStore::new());
        let state = BotState::user(store.clone());
        let user_id = state.create_property::<String>("UserId");

        let mut first = turn();
        user_id.set(&mut first, "GitHub:octocat".to_string()).await.unwrap();
        assert!(store.get("test/users/user-1").await.unwrap().is_none());

        state.save_changes(&mut first, false).await.unwrap();

        let mut second = turn();
        assert_eq!(
            user_id.get_optional(&mut second).await.unwrap().as_deref(),
            Some("GitHub:octocat")
        );
    }

    #[tokio::test]
    async fn save_without_load_is_a_noop() {
        let store = Arc::new(MemoryStore::new());
        let state = BotState::user(store.clone());

        let mut turn = turn();
        state.save_changes(&mut turn, false).await.unwrap();

        assert_eq!(turn.saved_scopes(), &[StateScope::User]);
        assert!(store.get("test/users/user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn scopes_use_separate_keys() {
        let store = Arc::new(MemoryStore::new());
        let user = BotState::user(store.clone());
        let auth = BotState::auth_user(store.clone());

        let activity = turn();
        assert_eq!(user.storage_key(activity.activity()).unwrap(), "test/users/user-1");
        assert_eq!(auth.storage_key(activity.activity()).unwrap(), "test/auth-users/user-1");
    }

    #[tokio::test]
    async fn missing_sender_is_a_parse_error() {
        let store = Arc::new(MemoryStore::new());
        let state = BotState::user(store);
        let mut turn = TurnContext::new(Activity::message("hi").with_channel("test"));

        let err = state.load(&mut turn, false).await.unwrap_err();
        assert!(matches!(err, BotError::Parse(_)));
    }
}
