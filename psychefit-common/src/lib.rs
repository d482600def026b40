//! # PsycheFit Common Library
//!
//! Core of the PsycheFit attachment-style quiz, shared by every front-end:
//! - Question bank and attachment detail models
//! - Scoring engine (averaging, normalization, jitter, classification)
//! - Quiz flow state machine
//! - Reflection progress model
//! - Report assembly (HTML and terminal text)
//! - Event types and EventBus
//! - Configuration loading

pub mod bank;
pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod model;
pub mod progress;
pub mod report;
pub mod scoring;

pub use bank::{DetailTable, QuestionBank};
pub use error::{Error, Result};
pub use flow::{QuizSession, QuizStage, Transition};
pub use model::{AnswerSet, AttachmentType, Coordinates, QuizResult, VisualPoint};
pub use scoring::{compute_result, MissingAnswerPolicy, ScoringEngine};
