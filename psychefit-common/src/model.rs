//! Quiz data model
//!
//! Questions, options and their two-axis scores, the answer set collected
//! during a session, and the result produced by the scoring engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-option contribution to the two psychological axes
///
/// - `ax`: anxiety axis, in [-1, 1]
/// - `av`: avoidance axis, in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    pub ax: f64,
    pub av: f64,
}

impl Score {
    pub fn new(ax: f64, av: f64) -> Self {
        Self { ax, av }
    }
}

/// One selectable answer of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Display text
    pub text: String,
    /// Axis contribution when chosen
    #[serde(alias = "scores")]
    pub score: Score,
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Score of the option at `index`, if it exists
    pub fn score_of(&self, index: usize) -> Option<Score> {
        self.options.get(index).map(|o| o.score)
    }
}

/// Answers chosen so far, keyed by question index
///
/// Going back and re-answering overwrites the previous choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    choices: BTreeMap<usize, usize>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the option chosen for a question
    pub fn record(&mut self, question: usize, option: usize) {
        self.choices.insert(question, option);
    }

    /// Option chosen for a question, if any
    pub fn get(&self, question: usize) -> Option<usize> {
        self.choices.get(&question).copied()
    }

    pub fn remove(&mut self, question: usize) -> Option<usize> {
        self.choices.remove(&question)
    }

    pub fn clear(&mut self) {
        self.choices.clear();
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Iterate `(question, option)` pairs in question order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.choices.iter().map(|(q, o)| (*q, *o))
    }
}

impl FromIterator<(usize, usize)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

/// Attachment style classification
///
/// Determined by the sign of the averaged anxiety and avoidance scores.
/// Zero counts as "low" on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    /// Low anxiety, low avoidance
    Secure,
    /// High anxiety, low avoidance
    Anxious,
    /// Low anxiety, high avoidance
    Avoidant,
    /// High anxiety, high avoidance
    Fearful,
}

impl AttachmentType {
    /// Parse from the lowercase key used in data files (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "secure" => Some(AttachmentType::Secure),
            "anxious" => Some(AttachmentType::Anxious),
            "avoidant" => Some(AttachmentType::Avoidant),
            "fearful" => Some(AttachmentType::Fearful),
            _ => None,
        }
    }

    /// Key used in data files and JSON output
    pub fn as_key(&self) -> &'static str {
        match self {
            AttachmentType::Secure => "secure",
            AttachmentType::Anxious => "anxious",
            AttachmentType::Avoidant => "avoidant",
            AttachmentType::Fearful => "fearful",
        }
    }

    /// Human-readable name, used for quadrant labels
    pub fn display_name(&self) -> &'static str {
        match self {
            AttachmentType::Secure => "Secure",
            AttachmentType::Anxious => "Anxious",
            AttachmentType::Avoidant => "Avoidant",
            AttachmentType::Fearful => "Fearful",
        }
    }

    /// CSS class selecting the hero banner theme
    pub fn theme_class(&self) -> &'static str {
        match self {
            AttachmentType::Secure => "hero-secure",
            AttachmentType::Anxious => "hero-anxious",
            AttachmentType::Avoidant => "hero-avoidant",
            AttachmentType::Fearful => "hero-fearful",
        }
    }

    pub fn all_variants() -> &'static [AttachmentType] {
        &[
            AttachmentType::Secure,
            AttachmentType::Anxious,
            AttachmentType::Avoidant,
            AttachmentType::Fearful,
        ]
    }
}

impl std::fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// Exact averaged scores, each in [-1, 1]
///
/// `x` is the avoidance average, `y` the anxiety average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// Marker position on the quadrant plot, as percentages in [8, 92]
///
/// `x` measures from the left edge, `y` from the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualPoint {
    pub x: f64,
    pub y: f64,
}

/// Outcome of scoring a completed quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
    /// Deterministic averages used for classification
    pub coordinates: Coordinates,
    /// Jittered display position, never used for classification
    pub visual: VisualPoint,
    /// Questions that contributed nothing (missing or invalid answer)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unanswered: Vec<usize>,
}
