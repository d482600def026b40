//! Scoring engine
//!
//! Turns an answer set into a [`QuizResult`]:
//!
//! 1. Sum `ax` and `av` over every answered option
//! 2. Divide by the total question count (averages in [-1, 1])
//! 3. Map each average to a percentage: `(avg + 1) / 2 * 100`
//! 4. Jitter the percentages for display
//! 5. Clamp to the [8, 92] safe margin
//! 6. Classify from the unjittered averages, threshold 0
//!
//! Classification is a pure function of the answers. Only the visual
//! marker consumes randomness, and the caller supplies the source.

use crate::model::{AnswerSet, AttachmentType, Coordinates, QuizResult, VisualPoint};
use crate::{Error, QuestionBank, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Classification threshold on both averaged axes (inclusive for "low")
pub const CLASSIFY_THRESHOLD: f64 = 0.0;

/// Half-width of the uniform base jitter, in percentage points
pub const JITTER_HALF_WIDTH: f64 = 1.5;

/// Distance from 50 under which a value counts as sitting on an axis line
pub const CENTER_BAND: f64 = 2.0;

/// Minimum extra push away from the centre line
pub const CENTER_PUSH_MIN: f64 = 1.5;

/// Maximum extra push away from the centre line
pub const CENTER_PUSH_MAX: f64 = 3.0;

/// Keeps the marker inside the circular plot
pub const SAFE_MARGIN: f64 = 8.0;

/// How to treat a question with no (or an invalid) answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAnswerPolicy {
    /// Contributes (0, 0); the denominator stays the full question count
    #[default]
    ZeroContribution,
    /// Scoring fails with [`Error::IncompleteAnswers`]
    Reject,
}

/// Scoring engine with a configurable missing-answer policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    policy: MissingAnswerPolicy,
}

/// Exact averages plus the questions that contributed nothing
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAverages {
    /// Anxiety average
    pub ax: f64,
    /// Avoidance average
    pub av: f64,
    pub unanswered: Vec<usize>,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MissingAnswerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MissingAnswerPolicy {
        self.policy
    }

    /// Deterministic part of scoring: sums divided by question count
    pub fn averages(&self, answers: &AnswerSet, bank: &QuestionBank) -> Result<AxisAverages> {
        let averages = sum_axes(answers, bank);

        if !averages.unanswered.is_empty() {
            match self.policy {
                MissingAnswerPolicy::Reject => {
                    return Err(Error::IncompleteAnswers(averages.unanswered));
                }
                MissingAnswerPolicy::ZeroContribution => warn_gaps(&averages, bank.len()),
            }
        }

        Ok(averages)
    }

    /// Score an answer set, drawing display jitter from `rng`
    pub fn score<R: Rng + ?Sized>(
        &self,
        answers: &AnswerSet,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<QuizResult> {
        let averages = self.averages(answers, bank)?;
        Ok(build_result(averages, rng))
    }
}

fn sum_axes(answers: &AnswerSet, bank: &QuestionBank) -> AxisAverages {
    let count = bank.len();
    let mut total_ax = 0.0;
    let mut total_av = 0.0;
    let mut unanswered = Vec::new();

    for (index, question) in bank.questions().iter().enumerate() {
        match answers.get(index).and_then(|opt| question.score_of(opt)) {
            Some(score) => {
                total_ax += score.ax;
                total_av += score.av;
            }
            None => unanswered.push(index),
        }
    }

    if let Some((q, _)) = answers.iter().find(|(q, _)| *q >= count) {
        debug!("Ignoring answer for question {} beyond bank size {}", q, count);
    }

    // QuestionBank guarantees count > 0
    AxisAverages {
        ax: total_ax / count as f64,
        av: total_av / count as f64,
        unanswered,
    }
}

fn warn_gaps(averages: &AxisAverages, count: usize) {
    warn!(
        "{} of {} questions have no valid answer; counted as zero: {:?}",
        averages.unanswered.len(),
        count,
        averages.unanswered
    );
}

fn build_result<R: Rng + ?Sized>(averages: AxisAverages, rng: &mut R) -> QuizResult {
    let percent_ax = clamp_to_safe_margin(jitter(to_percent(averages.ax), rng));
    let percent_av = clamp_to_safe_margin(jitter(to_percent(averages.av), rng));

    let attachment_type = classify(averages.ax, averages.av);
    debug!(
        "Scored: ax={:.3} av={:.3} -> {}",
        averages.ax, averages.av, attachment_type
    );

    QuizResult {
        attachment_type,
        coordinates: Coordinates {
            x: averages.av,
            y: averages.ax,
        },
        visual: VisualPoint {
            x: percent_av,
            y: percent_ax,
        },
        unanswered: averages.unanswered,
    }
}

/// Compute the quiz result with the default zero-contribution policy
///
/// Missing or out-of-range answers contribute nothing and are listed in
/// [`QuizResult::unanswered`].
pub fn compute_result<R: Rng + ?Sized>(
    answers: &AnswerSet,
    bank: &QuestionBank,
    rng: &mut R,
) -> QuizResult {
    let averages = sum_axes(answers, bank);
    if !averages.unanswered.is_empty() {
        warn_gaps(&averages, bank.len());
    }
    build_result(averages, rng)
}

/// Classify from the exact (unjittered) averages
pub fn classify(avg_ax: f64, avg_av: f64) -> AttachmentType {
    let high_anxiety = avg_ax > CLASSIFY_THRESHOLD;
    let high_avoidance = avg_av > CLASSIFY_THRESHOLD;

    match (high_anxiety, high_avoidance) {
        (false, false) => AttachmentType::Secure,
        (true, false) => AttachmentType::Anxious,
        (false, true) => AttachmentType::Avoidant,
        (true, true) => AttachmentType::Fearful,
    }
}

/// Map an average in [-1, 1] to a percentage in [0, 100]
pub fn to_percent(avg: f64) -> f64 {
    (avg + 1.0) / 2.0 * 100.0
}

/// Perturb a percentage so the marker never sits exactly on an axis line
///
/// Adds uniform noise in [-1.5, 1.5). Values within 2 points of 50 get an
/// extra push of 1.5 to 3.0 points in a random direction.
pub fn jitter<R: Rng + ?Sized>(value: f64, rng: &mut R) -> f64 {
    let mut offset = (rng.gen::<f64>() - 0.5) * (2.0 * JITTER_HALF_WIDTH);

    if (value - 50.0).abs() < CENTER_BAND {
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let magnitude = CENTER_PUSH_MIN + rng.gen::<f64>() * (CENTER_PUSH_MAX - CENTER_PUSH_MIN);
        offset += direction * magnitude;
    }

    value + offset
}

/// Clamp a percentage to [SAFE_MARGIN, 100 - SAFE_MARGIN]
pub fn clamp_to_safe_margin(value: f64) -> f64 {
    value.clamp(SAFE_MARGIN, 100.0 - SAFE_MARGIN)
}
