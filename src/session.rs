use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) struct SessionKey {
    pub(super) user_id: u64,
    pub(super) chat_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) enum Session {
    #[default]
    Idle,
    AwaitingItemText {
        category: String,
    },
    AwaitingCategoryName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum SessionEvent {
    StartAddItem { category: String },
    StartAddCategory,
    Text(String),
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum SessionEffect {
    Prompted { replaced: Option<Session> },
    SaveEntry { category: String, text: String },
    CreateCategory { name: String },
    Cancelled { had_pending: bool },
    Unexpected { text: String },
}

pub(super) fn transition(session: Session, event: SessionEvent) -> (Session, SessionEffect) {
    match (session, event) {
        (current, SessionEvent::StartAddItem { category }) => (
            Session::AwaitingItemText { category },
            SessionEffect::Prompted {
                replaced: pending(current),
            },
        ),
        (current, SessionEvent::StartAddCategory) => (
            Session::AwaitingCategoryName,
            SessionEffect::Prompted {
                replaced: pending(current),
            },
        ),
        (Session::AwaitingItemText { category }, SessionEvent::Text(text)) => {
            (Session::Idle, SessionEffect::SaveEntry { category, text })
        }
        (Session::AwaitingCategoryName, SessionEvent::Text(text)) => (
            Session::Idle,
            SessionEffect::CreateCategory {
                name: text.trim().to_string(),
            },
        ),
        (Session::Idle, SessionEvent::Text(text)) => {
            (Session::Idle, SessionEffect::Unexpected { text })
        }
        (current, SessionEvent::Cancel) => (
            Session::Idle,
            SessionEffect::Cancelled {
                had_pending: current != Session::Idle,
            },
        ),
    }
}

fn pending(session: Session) -> Option<Session> {
    match session {
        Session::Idle => None,
        other => Some(other),
    }
}

pub(super) struct SessionStore {
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl SessionStore {
    pub(super) fn new() -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub(super) async fn current(&self, key: SessionKey) -> Session {
        self.sessions
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    pub(super) async fn apply(&self, key: SessionKey, event: SessionEvent) -> SessionEffect {
        let mut sessions = self.sessions.lock().await;
        let current = sessions.remove(&key).unwrap_or_default();
        let (next, effect) = transition(current, event);
        if next != Session::Idle {
            sessions.insert(key, next);
        }
        effect
    }
}
