//! Session storage and turn orchestration
//!
//! The dialogue core is stateless; this layer keeps one `ConversationState`
//! per session id and feeds it back on the next turn.

use crate::dialogue::{transition, ConversationState, DialogueConfig, Effect, Intent};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Sessions kept before the oldest is evicted
pub const DEFAULT_SESSION_CAPACITY: usize = 100;

/// Generate an opaque session id: `session_<unix-millis>_<random>`
pub fn new_session_id() -> String {
    format!(
        "session_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

// ============================================================================
// Session Store
// ============================================================================

/// In-memory state per session id, evicting the oldest-created session
/// once over capacity
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    states: HashMap<String, ConversationState>,
    /// Session ids in creation order; re-putting an id keeps its slot
    order: VecDeque<String>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            states: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&ConversationState> {
        self.states.get(session_id)
    }

    pub fn put(&mut self, session_id: &str, state: ConversationState) {
        if self.states.insert(session_id.to_string(), state).is_none() {
            self.order.push_back(session_id.to_string());
        }

        while self.states.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.states.remove(&oldest);
            tracing::debug!(session_id = %oldest, "Evicted oldest session");
        }
    }

    pub fn remove(&mut self, session_id: &str) -> bool {
        let removed = self.states.remove(session_id).is_some();
        if removed {
            self.order.retain(|id| id != session_id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY)
    }
}

// ============================================================================
// Dialogue Service
// ============================================================================

/// Result of one turn as seen by the transport layer
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response: String,
    pub intent: Intent,
    pub state: ConversationState,
}

/// Runs transcripts through the dialogue core against stored sessions
pub struct DialogueService {
    config: Arc<DialogueConfig>,
    sessions: Mutex<SessionStore>,
}

impl DialogueService {
    pub fn new(config: DialogueConfig, capacity: usize) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Mutex::new(SessionStore::new(capacity)),
        }
    }

    #[cfg(test)]
    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Process one transcript. The store lock is held for the whole turn so
    /// turns are applied in arrival order.
    pub async fn handle_turn(&self, session_id: &str, transcript: &str) -> TurnOutcome {
        let mut sessions = self.sessions.lock().await;
        let prior = sessions.get(session_id).cloned().unwrap_or_default();

        let result = transition(&prior, &self.config, transcript);

        for effect in &result.effects {
            apply_effect(session_id, effect);
        }

        tracing::info!(
            session_id = %session_id,
            intent = %result.intent,
            pending = %result.new_state.intent(),
            from = ?StateLabel(&prior),
            to = ?StateLabel(&result.new_state),
            "Processed dialogue turn"
        );

        sessions.put(session_id, result.new_state.clone());

        TurnOutcome {
            response: result.response,
            intent: result.intent,
            state: result.new_state,
        }
    }

    #[cfg(test)]
    pub async fn session_state(&self, session_id: &str) -> Option<ConversationState> {
        self.sessions.lock().await.get(session_id).cloned()
    }

    pub async fn clear_session(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id)
    }

    pub async fn clear_all(&self) {
        self.sessions.lock().await.clear();
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Banking execution is mocked: effects are only recorded
fn apply_effect(session_id: &str, effect: &Effect) {
    match effect {
        Effect::ExecuteAction { action } => {
            tracing::info!(
                session_id = %session_id,
                action = ?action,
                "Executing banking action (mock)"
            );
        }
        Effect::DiscardAction { action } => {
            tracing::info!(
                session_id = %session_id,
                action = ?action,
                "Banking action cancelled"
            );
        }
    }
}

/// Compact state name for logs; slot values stay out of the log line
struct StateLabel<'a>(&'a ConversationState);

impl std::fmt::Debug for StateLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ConversationState::Idle => f.write_str("idle"),
            ConversationState::AwaitingSlot { action, slot, .. } => {
                write!(f, "{action:?}/awaiting_{slot:?}")
            }
            ConversationState::AwaitingConfirmation(pending) => {
                write!(f, "{:?}/awaiting_confirmation", pending.action())
            }
        }
    }
}
