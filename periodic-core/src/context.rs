use crate::{Event, PeriodicError, Result, types::Content};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Maximum length of a state key.
pub const MAX_STATE_KEY_LEN: usize = 256;

pub fn validate_state_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(PeriodicError::State("state key must not be empty".to_string()));
    }
    if key.len() > MAX_STATE_KEY_LEN {
        return Err(PeriodicError::State(format!(
            "state key exceeds {} bytes: {}...",
            MAX_STATE_KEY_LEN,
            key.chars().take(32).collect::<String>()
        )));
    }
    Ok(())
}

pub trait ReadonlyContext: Send + Sync {
    fn invocation_id(&self) -> &str;
    fn agent_name(&self) -> &str;
    fn user_id(&self) -> &str;
    fn app_name(&self) -> &str;
    fn session_id(&self) -> &str;
    fn user_content(&self) -> &Content;
}

/// Key-value state bag. Implementations use interior mutability so a bag can
/// be shared between the session store and the contexts handed to tools.
pub trait State: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn all(&self) -> HashMap<String, Value>;

    /// Appends `value` to the list stored under `key`, creating the list when
    /// the key is absent. Returns the new length.
    fn append(&self, key: &str, value: Value) -> Result<usize> {
        let mut items = match self.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(PeriodicError::State(format!(
                    "state key '{key}' holds {other}, not a list"
                )));
            }
        };
        items.push(value);
        let len = items.len();
        self.set(key, Value::Array(items))?;
        Ok(len)
    }
}

/// Plain in-memory state bag.
#[derive(Debug, Default)]
pub struct MapState {
    values: RwLock<HashMap<String, Value>>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: HashMap<String, Value>) -> Self {
        Self { values: RwLock::new(values) }
    }

    /// Merges `delta` into the bag without key validation.
    pub fn extend(&self, delta: HashMap<String, Value>) {
        self.values.write().unwrap_or_else(PoisonError::into_inner).extend(delta);
    }
}

impl State for MapState {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        validate_state_key(key)?;
        self.values.write().unwrap_or_else(PoisonError::into_inner).insert(key.to_string(), value);
        Ok(())
    }

    fn all(&self) -> HashMap<String, Value> {
        self.values.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn append(&self, key: &str, value: Value) -> Result<usize> {
        validate_state_key(key)?;
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let slot = values.entry(key.to_string()).or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        match slot {
            Value::Array(items) => {
                items.push(value);
                Ok(items.len())
            }
            other => Err(PeriodicError::State(format!(
                "state key '{key}' holds {other}, not a list"
            ))),
        }
    }
}

/// Change-tracked view over a state bag.
///
/// Writes land in the underlying bag and are also recorded as a delta, which
/// the agent attaches to the event it emits for the tool call.
pub struct DeltaState {
    base: Arc<dyn State>,
    delta: RwLock<HashMap<String, Value>>,
}

impl DeltaState {
    pub fn new(base: Arc<dyn State>) -> Self {
        Self { base, delta: RwLock::new(HashMap::new()) }
    }

    pub fn delta(&self) -> HashMap<String, Value> {
        self.delta.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn has_delta(&self) -> bool {
        !self.delta.read().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl State for DeltaState {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.delta.read().unwrap_or_else(PoisonError::into_inner).get(key) {
            return Some(value.clone());
        }
        self.base.get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        validate_state_key(key)?;
        self.delta
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());
        self.base.set(key, value)
    }

    fn all(&self) -> HashMap<String, Value> {
        let mut merged = self.base.all();
        merged.extend(self.delta());
        merged
    }
}

pub trait Session: Send + Sync {
    fn id(&self) -> &str;
    fn app_name(&self) -> &str;
    fn user_id(&self) -> &str;
    fn state(&self) -> Arc<dyn State>;
    fn events(&self) -> Vec<Event>;
    fn last_update_time(&self) -> DateTime<Utc>;

    /// Contents of all non-partial events, oldest first.
    fn conversation_history(&self) -> Vec<Content> {
        self.events()
            .into_iter()
            .filter(|event| !event.llm_response.partial)
            .filter_map(|event| event.llm_response.content)
            .collect()
    }
}

#[async_trait]
pub trait Artifacts: Send + Sync {
    async fn save(&self, name: &str, data: &crate::Part) -> Result<i64>;
    async fn load(&self, name: &str) -> Result<crate::Part>;
    async fn list(&self) -> Result<Vec<String>>;
}
