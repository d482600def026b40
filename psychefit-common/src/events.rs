//! Quiz event types and EventBus
//!
//! Every flow transition emits a [`QuizEvent`]. Front-ends subscribe to
//! log transitions or drive toasts; nothing depends on a subscriber
//! being present.

use crate::model::AttachmentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Quiz lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuizEvent {
    /// Welcome -> first question
    QuizStarted {
        question_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// An option was chosen (first answer or overwrite after going back)
    AnswerRecorded {
        question: usize,
        option: usize,
        timestamp: DateTime<Utc>,
    },

    /// Back action moved to an earlier question
    NavigatedBack { to: usize, timestamp: DateTime<Utc> },

    /// Last question answered, reflection animation begins
    ReflectionStarted {
        answered: usize,
        timestamp: DateTime<Utc>,
    },

    /// Scoring finished and the result is available
    ResultReady {
        attachment_type: AttachmentType,
        timestamp: DateTime<Utc>,
    },

    /// Session discarded, back to the welcome screen
    QuizRestarted { timestamp: DateTime<Utc> },
}

impl QuizEvent {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            QuizEvent::QuizStarted { .. } => "QuizStarted",
            QuizEvent::AnswerRecorded { .. } => "AnswerRecorded",
            QuizEvent::NavigatedBack { .. } => "NavigatedBack",
            QuizEvent::ReflectionStarted { .. } => "ReflectionStarted",
            QuizEvent::ResultReady { .. } => "ResultReady",
            QuizEvent::QuizRestarted { .. } => "QuizRestarted",
        }
    }
}

/// Broadcast channel for quiz events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QuizEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<QuizEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: QuizEvent) -> Result<usize, broadcast::error::SendError<QuizEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: QuizEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
