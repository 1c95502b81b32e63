//! Session state machine
//!
//! A session is either idle or has exactly one backend round trip
//! outstanding. The phase is the sole concurrency-control primitive:
//! [`SessionState::begin_starting`] / [`SessionState::begin_sending`]
//! refuse to leave `Idle` twice, and [`SessionState::settle`] must be
//! reached on every exit path so a failed request can never leave the
//! session stuck in flight.

use crate::session::entities::Message;

/// Phase of the session's request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No request outstanding.
    Idle,
    /// A `conversation/start` round trip is outstanding.
    Starting,
    /// A `conversation/message` round trip is outstanding.
    Sending,
}

/// In-memory state of a conversation session.
///
/// Owned exclusively by the conversation controller; the view only ever
/// sees cloned snapshots.
#[derive(Debug, Clone)]
pub struct SessionState {
    conversation: Vec<Message>,
    draft: String,
    phase: SessionPhase,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            conversation: Vec::new(),
            draft: String::new(),
            phase: SessionPhase::Idle,
        }
    }

    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True exactly while a backend round trip is outstanding.
    pub fn in_flight(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Transition `Idle -> Starting`. Returns false (and does nothing)
    /// if a request is already in flight.
    pub fn begin_starting(&mut self) -> bool {
        if self.in_flight() {
            return false;
        }
        self.phase = SessionPhase::Starting;
        true
    }

    /// Transition `Idle -> Sending`. Returns false (and does nothing)
    /// if a request is already in flight.
    pub fn begin_sending(&mut self) -> bool {
        if self.in_flight() {
            return false;
        }
        self.phase = SessionPhase::Sending;
        true
    }

    /// Return to `Idle`. Called on success and failure paths alike.
    pub fn settle(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Append the user's turn locally and clear the draft.
    ///
    /// This is the optimistic half of a send: it happens before the
    /// network call so the turn is visible while the request is pending.
    pub fn push_optimistic(&mut self, message: Message) {
        self.conversation.push(message);
        self.draft.clear();
    }

    /// Replace the conversation wholesale with the server's authoritative
    /// copy. No merging: server wins, including any history rewrites.
    pub fn replace_conversation(&mut self, conversation: Vec<Message>) {
        self.conversation = conversation;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle_and_empty() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SessionPhase::Idle);
        assert!(!state.in_flight());
        assert!(state.conversation().is_empty());
        assert_eq!(state.draft(), "");
    }

    #[test]
    fn begin_refuses_second_transition() {
        let mut state = SessionState::new();
        assert!(state.begin_starting());
        assert!(state.in_flight());
        assert!(!state.begin_sending());
        assert!(!state.begin_starting());
        assert_eq!(state.phase(), SessionPhase::Starting);
    }

    #[test]
    fn settle_returns_to_idle() {
        let mut state = SessionState::new();
        assert!(state.begin_sending());
        state.settle();
        assert_eq!(state.phase(), SessionPhase::Idle);
        assert!(state.begin_starting());
    }

    #[test]
    fn push_optimistic_appends_and_clears_draft() {
        let mut state = SessionState::new();
        state.set_draft("hello");
        state.push_optimistic(Message::user("hello"));
        assert_eq!(state.conversation().len(), 1);
        assert_eq!(state.draft(), "");
    }

    #[test]
    fn replace_conversation_is_wholesale() {
        let mut state = SessionState::new();
        state.push_optimistic(Message::user("a"));
        state.replace_conversation(vec![Message::system("rewritten")]);
        assert_eq!(state.conversation(), &[Message::system("rewritten")]);
    }
}
