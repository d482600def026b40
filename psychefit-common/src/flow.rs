//! Quiz flow controller
//!
//! State machine over the four quiz stages:
//!
//! ```text
//! Welcome --start--> InProgress(0) --select--> InProgress(i+1) ... --select(last)--> Reflecting
//!                         ^   |                                                           |
//!                         +---+ back (no-op at 0)                    finish_reflection    |
//!                                                                                         v
//! Welcome <---------------------------- restart (from any stage) ------------------- Result
//! ```
//!
//! The session owns the answer set and current index. Timers (answer delay,
//! reflection animation) belong to the front-end; the session only enforces
//! which transitions are legal.

use crate::events::{EventBus, QuizEvent};
use crate::model::{AnswerSet, Question, QuizResult};
use crate::scoring::ScoringEngine;
use crate::{Error, QuestionBank, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Current quiz stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum QuizStage {
    Welcome,
    InProgress { index: usize },
    Reflecting,
    Result,
}

impl std::fmt::Display for QuizStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizStage::Welcome => write!(f, "welcome"),
            QuizStage::InProgress { index } => write!(f, "question {}", index + 1),
            QuizStage::Reflecting => write!(f, "reflecting"),
            QuizStage::Result => write!(f, "result"),
        }
    }
}

/// What happened after an answer was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved on to the next question
    Advance { next: usize },
    /// Last question answered; reflection stage begins
    Reflect,
}

/// One quiz run, from welcome screen to result
#[derive(Debug)]
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    engine: ScoringEngine,
    stage: QuizStage,
    answers: AnswerSet,
    result: Option<QuizResult>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    events: Option<EventBus>,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            engine: ScoringEngine::default(),
            stage: QuizStage::Welcome,
            answers: AnswerSet::new(),
            result: None,
            started_at: None,
            finished_at: None,
            events: None,
        }
    }

    /// Use a specific scoring engine (e.g. strict missing-answer policy)
    pub fn with_engine(mut self, engine: ScoringEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Emit transition events on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn stage(&self) -> QuizStage {
        self.stage
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Time from start to result, once the result exists
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Index of the question on screen, if a question is on screen
    pub fn current_index(&self) -> Option<usize> {
        match self.stage {
            QuizStage::InProgress { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.bank.get(i))
    }

    /// Progress bar fill, `(index + 1) / count * 100`
    pub fn progress_percent(&self) -> f64 {
        match self.stage {
            QuizStage::Welcome => 0.0,
            QuizStage::InProgress { index } => (index + 1) as f64 / self.bank.len() as f64 * 100.0,
            QuizStage::Reflecting | QuizStage::Result => 100.0,
        }
    }

    /// Back is disabled on the first question and outside the question stage
    pub fn can_go_back(&self) -> bool {
        matches!(self.stage, QuizStage::InProgress { index } if index > 0)
    }

    /// Welcome -> InProgress(0); clears any previous answers
    pub fn start(&mut self) -> Result<()> {
        if self.stage != QuizStage::Welcome {
            return Err(Error::InvalidState(format!(
                "cannot start quiz from {}",
                self.stage
            )));
        }

        self.answers.clear();
        self.result = None;
        self.finished_at = None;
        self.started_at = Some(Utc::now());
        self.stage = QuizStage::InProgress { index: 0 };

        info!("Quiz started with {} questions", self.bank.len());
        self.emit(QuizEvent::QuizStarted {
            question_count: self.bank.len(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Record the chosen option for the current question and move on
    pub fn select_option(&mut self, option: usize) -> Result<Transition> {
        let index = match self.stage {
            QuizStage::InProgress { index } => index,
            other => {
                return Err(Error::InvalidState(format!(
                    "cannot answer during {}",
                    other
                )))
            }
        };

        let option_count = self.bank.get(index).map(|q| q.options.len()).unwrap_or(0);
        if option >= option_count {
            return Err(Error::InvalidInput(format!(
                "question {} has {} options, got option {}",
                index + 1,
                option_count,
                option + 1
            )));
        }

        self.answers.record(index, option);
        debug!("Question {} answered with option {}", index + 1, option + 1);
        self.emit(QuizEvent::AnswerRecorded {
            question: index,
            option,
            timestamp: Utc::now(),
        });

        if index + 1 < self.bank.len() {
            self.stage = QuizStage::InProgress { index: index + 1 };
            Ok(Transition::Advance { next: index + 1 })
        } else {
            self.stage = QuizStage::Reflecting;
            self.emit(QuizEvent::ReflectionStarted {
                answered: self.answers.len(),
                timestamp: Utc::now(),
            });
            Ok(Transition::Reflect)
        }
    }

    /// InProgress(i) -> InProgress(i-1)
    ///
    /// No-op on the first question or outside the question stage. Returns
    /// whether the index moved.
    pub fn go_back(&mut self) -> bool {
        match self.stage {
            QuizStage::InProgress { index } if index > 0 => {
                self.stage = QuizStage::InProgress { index: index - 1 };
                self.emit(QuizEvent::NavigatedBack {
                    to: index - 1,
                    timestamp: Utc::now(),
                });
                true
            }
            _ => false,
        }
    }

    /// Reflecting -> Result; runs the scoring engine exactly once
    ///
    /// If strict scoring rejects the answers, the session returns to the
    /// first unanswered question and the error is passed on.
    pub fn finish_reflection<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&QuizResult> {
        if self.stage != QuizStage::Reflecting {
            return Err(Error::InvalidState(format!(
                "cannot finish reflection during {}",
                self.stage
            )));
        }

        let result = match self.engine.score(&self.answers, &self.bank, rng) {
            Ok(result) => result,
            Err(Error::IncompleteAnswers(gaps)) => {
                let first = gaps.first().copied().unwrap_or(0);
                self.stage = QuizStage::InProgress { index: first };
                return Err(Error::IncompleteAnswers(gaps));
            }
            Err(e) => return Err(e),
        };

        info!(
            "Quiz complete: {} (anxiety {:.2}, avoidance {:.2})",
            result.attachment_type, result.coordinates.y, result.coordinates.x
        );
        self.emit(QuizEvent::ResultReady {
            attachment_type: result.attachment_type,
            timestamp: Utc::now(),
        });

        self.finished_at = Some(Utc::now());
        self.stage = QuizStage::Result;
        Ok(&*self.result.insert(result))
    }

    /// Any stage -> Welcome; answers and result are discarded
    pub fn restart(&mut self) {
        self.answers.clear();
        self.result = None;
        self.started_at = None;
        self.finished_at = None;
        self.stage = QuizStage::Welcome;

        info!("Quiz restarted");
        self.emit(QuizEvent::QuizRestarted {
            timestamp: Utc::now(),
        });
    }

    fn emit(&self, event: QuizEvent) {
        if let Some(bus) = &self.events {
            bus.emit_lossy(event);
        }
    }
}
