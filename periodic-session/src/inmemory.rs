use crate::{CreateRequest, DeleteRequest, GetRequest, ListRequest, SessionService};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use periodic_core::{Event, MapState, PeriodicError, Result, Session, State};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SessionId {
    app_name: String,
    user_id: String,
    session_id: String,
}

impl SessionId {
    fn key(&self) -> String {
        format!("{}:{}:{}", self.app_name, self.user_id, self.session_id)
    }
}

pub struct InMemorySessionService {
    sessions: RwLock<HashMap<String, Arc<InMemorySession>>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self { sessions: RwLock::new(HashMap::new()) }
    }

    fn find(&self, id: &SessionId) -> Result<Arc<InMemorySession>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id.key())
            .cloned()
            .ok_or_else(|| PeriodicError::Session(format!("session not found: {}", id.session_id)))
    }
}

impl Default for InMemorySessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create(&self, req: CreateRequest) -> Result<Arc<dyn Session>> {
        let id = SessionId {
            app_name: req.app_name,
            user_id: req.user_id,
            session_id: req.session_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(&id.key()) {
            return Err(PeriodicError::Session(format!(
                "session already exists: {}",
                id.session_id
            )));
        }

        let session = Arc::new(InMemorySession {
            id: id.clone(),
            state: Arc::new(MapState::from_map(req.state)),
            events: RwLock::new(Vec::new()),
            updated_at: RwLock::new(Utc::now()),
        });
        sessions.insert(id.key(), session.clone());
        tracing::debug!(session_id = %id.session_id, "session created");

        Ok(session)
    }

    async fn get(&self, req: GetRequest) -> Result<Arc<dyn Session>> {
        let id = SessionId {
            app_name: req.app_name,
            user_id: req.user_id,
            session_id: req.session_id,
        };
        Ok(self.find(&id)?)
    }

    async fn list(&self, req: ListRequest) -> Result<Vec<Arc<dyn Session>>> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let mut result: Vec<Arc<dyn Session>> = sessions
            .values()
            .filter(|s| s.id.app_name == req.app_name && s.id.user_id == req.user_id)
            .map(|s| s.clone() as Arc<dyn Session>)
            .collect();
        result.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(result)
    }

    async fn delete(&self, req: DeleteRequest) -> Result<()> {
        let id = SessionId {
            app_name: req.app_name,
            user_id: req.user_id,
            session_id: req.session_id,
        };
        self.sessions.write().unwrap_or_else(PoisonError::into_inner).remove(&id.key());
        Ok(())
    }

    async fn append_event(&self, session_id: &str, event: Event) -> Result<()> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|s| s.id.session_id == session_id)
            .cloned()
            .ok_or_else(|| PeriodicError::Session(format!("session not found: {session_id}")))?;

        if !event.actions.state_delta.is_empty() {
            session.state.extend(event.actions.state_delta.clone());
        }
        *session.updated_at.write().unwrap_or_else(PoisonError::into_inner) = event.timestamp;
        session.events.write().unwrap_or_else(PoisonError::into_inner).push(event);

        Ok(())
    }
}

struct InMemorySession {
    id: SessionId,
    state: Arc<MapState>,
    events: RwLock<Vec<Event>>,
    updated_at: RwLock<DateTime<Utc>>,
}

impl Session for InMemorySession {
    fn id(&self) -> &str {
        &self.id.session_id
    }

    fn app_name(&self) -> &str {
        &self.id.app_name
    }

    fn user_id(&self) -> &str {
        &self.id.user_id
    }

    fn state(&self) -> Arc<dyn State> {
        self.state.clone()
    }

    fn events(&self) -> Vec<Event> {
        self.events.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn last_update_time(&self) -> DateTime<Utc> {
        *self.updated_at.read().unwrap_or_else(PoisonError::into_inner)
    }
}
