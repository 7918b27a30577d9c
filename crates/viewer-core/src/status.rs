use std::time::{Duration, Instant};

/// Status bar text, optionally transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Option<Instant>,
}

impl StatusMessage {
    pub fn persistent(text: impl Into<String>) -> Self {
        Self { text: text.into(), expires_at: None }
    }

    pub fn transient(text: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self { text: text.into(), expires_at: Some(now + ttl) }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}
