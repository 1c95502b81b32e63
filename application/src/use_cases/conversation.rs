//! Conversation controller use case.
//!
//! Owns the session state for one conversation and serializes backend
//! round trips against it. The two operations mirror the backend's
//! endpoints: [`start_conversation`](ConversationController::start_conversation)
//! resets the session to the server's opening history, and
//! [`send_message`](ConversationController::send_message) performs an
//! optimistic append followed by a server-wins reconciliation.
//!
//! # Ordering
//!
//! The session phase machine admits at most one outstanding request.
//! A second operation invoked while one is in flight is dropped, not
//! queued — the caller observes a `Busy` outcome and no state change.
//! State is only ever mutated before the suspension point (optimistic
//! append) or after resumption (reconciliation); the lock is never held
//! across an await.

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tabletalk_domain::{Message, SessionPhase, SessionState};
use tracing::{debug, info, warn};

/// Outcome of [`ConversationController::start_conversation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Conversation replaced with the server's opening history.
    Started,
    /// Backend unreachable or errored; conversation reset to empty.
    Failed,
    /// Another request was in flight; nothing happened.
    Busy,
}

/// Outcome of [`ConversationController::send_message`].
///
/// The rejection variants are silent no-ops by design: preconditions are
/// enforced by disabling the triggering affordance, not by surfacing
/// errors to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Server reply received and reconciled.
    Delivered,
    /// Backend call failed; the optimistic user turn is retained.
    Failed,
    /// Another request was in flight; dropped, not queued.
    Busy,
    /// Draft was blank after trimming.
    BlankDraft,
    /// No conversation has been started yet.
    NoSession,
}

/// Read-only snapshot of session state for the view layer.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub conversation: Vec<Message>,
    pub draft: String,
    pub phase: SessionPhase,
    pub in_flight: bool,
}

/// Controller owning one conversation session.
///
/// Cloneable; clones share the same session. All mutation goes through
/// the internal mutex, which is only held across synchronous sections.
pub struct ConversationController {
    gateway: Arc<dyn BackendGateway>,
    logger: Arc<dyn ConversationLogger>,
    state: Arc<Mutex<SessionState>>,
}

impl Clone for ConversationController {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            logger: self.logger.clone(),
            state: self.state.clone(),
        }
    }
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoConversationLogger),
            state: Arc::new(Mutex::new(SessionState::new())),
        }
    }

    /// Attach a conversation transcript logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Take a read-only snapshot of the session for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().unwrap();
        SessionSnapshot {
            conversation: state.conversation().to_vec(),
            draft: state.draft().to_string(),
            phase: state.phase(),
            in_flight: state.in_flight(),
        }
    }

    /// Update the not-yet-sent draft input.
    pub fn set_draft(&self, draft: impl Into<String>) {
        self.state.lock().unwrap().set_draft(draft);
    }

    /// Start a new conversation, discarding any existing one.
    ///
    /// On success the conversation becomes the server's opening history
    /// (empty if the server omits it); on failure it is reset to empty
    /// and the error is logged. The phase settles to `Idle` on both
    /// paths, so a failed start never blocks a retry.
    pub async fn start_conversation(&self) -> StartOutcome {
        {
            let mut state = self.state.lock().unwrap();
            if !state.begin_starting() {
                debug!("start_conversation dropped: request already in flight");
                return StartOutcome::Busy;
            }
        }

        let result = self.gateway.start_conversation().await;

        let mut state = self.state.lock().unwrap();
        let outcome = match result {
            Ok(conversation) => {
                info!(messages = conversation.len(), "Conversation started");
                self.logger.log(ConversationEvent::new(
                    "session_started",
                    json!({ "messages": conversation.len() }),
                ));
                state.replace_conversation(conversation);
                StartOutcome::Started
            }
            Err(e) => {
                warn!("Failed to start conversation: {}", e);
                self.logger.log(ConversationEvent::new(
                    "backend_error",
                    json!({ "operation": "start", "error": e.to_string() }),
                ));
                state.replace_conversation(Vec::new());
                StartOutcome::Failed
            }
        };
        state.settle();
        outcome
    }

    /// Send a user turn and reconcile with the server's reply.
    ///
    /// The user's message is appended locally (and the draft cleared)
    /// before the network call, so it is visible while the request is
    /// pending. On success the server's conversation replaces the local
    /// one wholesale; on failure the optimistic copy is retained and the
    /// error is logged. No automatic retry.
    pub async fn send_message(&self, draft: &str) -> SendOutcome {
        if draft.trim().is_empty() {
            debug!("send_message dropped: blank draft");
            return SendOutcome::BlankDraft;
        }

        // Optimistic append under the lock, released before the await.
        let conversation = {
            let mut state = self.state.lock().unwrap();
            if state.conversation().is_empty() {
                debug!("send_message dropped: no conversation started");
                return SendOutcome::NoSession;
            }
            if !state.begin_sending() {
                debug!("send_message dropped: request already in flight");
                return SendOutcome::Busy;
            }
            state.push_optimistic(Message::user(draft));
            state.conversation().to_vec()
        };

        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({ "content": draft }),
        ));

        let result = self.gateway.send_message(draft, &conversation).await;

        let mut state = self.state.lock().unwrap();
        let outcome = match result {
            Ok(reply) => {
                info!(messages = reply.len(), "Conversation reconciled");
                if let Some(last) = reply.last() {
                    self.logger.log(ConversationEvent::new(
                        "assistant_reply",
                        json!({ "role": last.role.as_str(), "content": last.content }),
                    ));
                }
                state.replace_conversation(reply);
                SendOutcome::Delivered
            }
            Err(e) => {
                // Keep the optimistic turn visible; the user may resend.
                warn!("Failed to send message: {}", e);
                self.logger.log(ConversationEvent::new(
                    "backend_error",
                    json!({ "operation": "message", "error": e.to_string() }),
                ));
                SendOutcome::Failed
            }
        };
        state.settle();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend_gateway::GatewayError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tabletalk_domain::Role;
    use tokio::sync::Notify;

    /// Gateway stub with scripted responses; records every send request.
    struct StubGateway {
        start_replies: Mutex<VecDeque<Result<Vec<Message>, GatewayError>>>,
        send_replies: Mutex<VecDeque<Result<Vec<Message>, GatewayError>>>,
        sent: Mutex<Vec<(String, Vec<Message>)>>,
        /// When set, `send_message` parks until notified.
        gate: Option<Arc<Notify>>,
    }

    impl StubGateway {
        fn new() -> Self {
            Self {
                start_replies: Mutex::new(VecDeque::new()),
                send_replies: Mutex::new(VecDeque::new()),
                sent: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn with_gate(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn on_start(self, reply: Result<Vec<Message>, GatewayError>) -> Self {
            self.start_replies.lock().unwrap().push_back(reply);
            self
        }

        fn on_send(self, reply: Result<Vec<Message>, GatewayError>) -> Self {
            self.send_replies.lock().unwrap().push_back(reply);
            self
        }
    }

    #[async_trait]
    impl BackendGateway for StubGateway {
        async fn start_conversation(&self) -> Result<Vec<Message>, GatewayError> {
            self.start_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn send_message(
            &self,
            message: &str,
            conversation: &[Message],
        ) -> Result<Vec<Message>, GatewayError> {
            self.sent
                .lock()
                .unwrap()
                .push((message.to_string(), conversation.to_vec()));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.send_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(conversation.to_vec()))
        }
    }

    fn welcome() -> Vec<Message> {
        vec![Message::system("Welcome")]
    }

    async fn started_controller(gateway: StubGateway) -> ConversationController {
        let controller = ConversationController::new(Arc::new(gateway.on_start(Ok(welcome()))));
        assert_eq!(controller.start_conversation().await, StartOutcome::Started);
        controller
    }

    #[tokio::test]
    async fn start_replaces_conversation_with_server_history() {
        let controller = started_controller(StubGateway::new()).await;
        let snap = controller.snapshot();
        assert_eq!(snap.conversation, welcome());
        assert!(!snap.in_flight);
    }

    #[tokio::test]
    async fn second_start_discards_first_regardless_of_outcome() {
        // First start fails, second succeeds: the session always ends up
        // equal to the second call's server response.
        let gateway = StubGateway::new()
            .on_start(Err(GatewayError::Transport("refused".into())))
            .on_start(Ok(welcome()));
        let controller = ConversationController::new(Arc::new(gateway));

        assert_eq!(controller.start_conversation().await, StartOutcome::Failed);
        assert!(controller.snapshot().conversation.is_empty());
        assert!(!controller.snapshot().in_flight);

        assert_eq!(controller.start_conversation().await, StartOutcome::Started);
        assert_eq!(controller.snapshot().conversation, welcome());
    }

    #[tokio::test]
    async fn send_appends_optimistically_then_server_wins() {
        let gate = Arc::new(Notify::new());
        let server_reply = vec![
            Message::system("Welcome"),
            Message::user("hello"),
            Message::assistant("hi!"),
        ];
        let gateway = StubGateway::new()
            .with_gate(gate.clone())
            .on_send(Ok(server_reply.clone()));
        let controller = started_controller(gateway).await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.send_message("hello").await })
        };

        // Wait until the request is in flight, then check the optimistic state.
        while !controller.snapshot().in_flight {
            tokio::task::yield_now().await;
        }
        let snap = controller.snapshot();
        assert_eq!(
            snap.conversation,
            vec![Message::system("Welcome"), Message::user("hello")]
        );
        assert_eq!(snap.phase, SessionPhase::Sending);

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), SendOutcome::Delivered);
        assert_eq!(controller.snapshot().conversation, server_reply);
        assert!(!controller.snapshot().in_flight);
    }

    #[tokio::test]
    async fn send_request_carries_full_optimistic_conversation() {
        let server_reply = vec![
            Message::system("Welcome"),
            Message::user("hello"),
            Message::assistant("hi!"),
        ];
        let gateway = StubGateway::new().on_send(Ok(server_reply));
        let sent = {
            let gateway = Arc::new(gateway.on_start(Ok(welcome())));
            let controller = ConversationController::new(gateway.clone());
            controller.start_conversation().await;
            controller.send_message("hello").await;
            gateway.sent.lock().unwrap().clone()
        };
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "hello");
        assert_eq!(
            sent[0].1,
            vec![Message::system("Welcome"), Message::user("hello")]
        );
    }

    #[tokio::test]
    async fn failed_send_retains_optimistic_turn() {
        let gateway =
            StubGateway::new().on_send(Err(GatewayError::Transport("timed out".into())));
        let controller = started_controller(gateway).await;

        assert_eq!(controller.send_message("hello").await, SendOutcome::Failed);
        let snap = controller.snapshot();
        assert_eq!(
            snap.conversation,
            vec![Message::system("Welcome"), Message::user("hello")]
        );
        // The failed round trip must not leave the session stuck in flight.
        assert!(!snap.in_flight);
    }

    #[tokio::test]
    async fn send_while_in_flight_is_dropped_not_queued() {
        let gate = Arc::new(Notify::new());
        let gateway = StubGateway::new().with_gate(gate.clone());
        let controller = started_controller(gateway).await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.send_message("first").await })
        };
        while !controller.snapshot().in_flight {
            tokio::task::yield_now().await;
        }

        let before = controller.snapshot().conversation;
        assert_eq!(controller.send_message("second").await, SendOutcome::Busy);
        assert_eq!(controller.snapshot().conversation, before);

        gate.notify_one();
        pending.await.unwrap();
        // "second" never made it into the conversation.
        assert!(
            !controller
                .snapshot()
                .conversation
                .iter()
                .any(|m| m.content == "second")
        );
    }

    #[tokio::test]
    async fn start_while_in_flight_is_dropped() {
        let gate = Arc::new(Notify::new());
        let gateway = StubGateway::new().with_gate(gate.clone());
        let controller = started_controller(gateway).await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.send_message("first").await })
        };
        while !controller.snapshot().in_flight {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.start_conversation().await, StartOutcome::Busy);

        gate.notify_one();
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn blank_draft_is_a_silent_no_op() {
        let controller = started_controller(StubGateway::new()).await;
        assert_eq!(controller.send_message("   ").await, SendOutcome::BlankDraft);
        assert_eq!(controller.snapshot().conversation, welcome());
    }

    #[tokio::test]
    async fn send_without_started_conversation_is_a_no_op() {
        let controller = ConversationController::new(Arc::new(StubGateway::new()));
        assert_eq!(controller.send_message("hello").await, SendOutcome::NoSession);
        assert!(controller.snapshot().conversation.is_empty());
    }

    #[tokio::test]
    async fn start_with_omitted_history_yields_empty_conversation() {
        let gateway = StubGateway::new().on_start(Ok(Vec::new()));
        let controller = ConversationController::new(Arc::new(gateway));
        assert_eq!(controller.start_conversation().await, StartOutcome::Started);
        assert!(controller.snapshot().conversation.is_empty());
    }

    #[tokio::test]
    async fn full_session_exchange() {
        // start -> welcome; send a SQL question -> optimistic turn;
        // server reply appends the assistant turn. Exact order preserved.
        let server_reply = vec![
            Message::system("Welcome"),
            Message::user("SQL: SELECT * FROM t"),
            Message::assistant("Done"),
        ];
        let gateway = StubGateway::new().on_send(Ok(server_reply.clone()));
        let controller = started_controller(gateway).await;

        assert_eq!(
            controller.send_message("SQL: SELECT * FROM t").await,
            SendOutcome::Delivered
        );
        let snap = controller.snapshot();
        assert_eq!(snap.conversation, server_reply);
        assert_eq!(snap.conversation[0].role, Role::System);
        assert_eq!(snap.conversation[2].role, Role::Assistant);
    }
}
