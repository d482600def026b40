//! Question bank and attachment detail table
//!
//! Both are static content loaded once at startup. Defaults are embedded
//! in the library; alternatives can be loaded from TOML or JSON files.

use crate::model::{AttachmentType, Question};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const DEFAULT_QUESTIONS_TOML: &str = include_str!("../data/questions.toml");
const DEFAULT_DETAILS_TOML: &str = include_str!("../data/attachment_styles.toml");

/// Validated, non-empty list of questions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct BankFile {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonBank {
    Wrapped(BankFile),
    Bare(Vec<Question>),
}

impl QuestionBank {
    /// Build a bank, rejecting empty or out-of-range content
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::InvalidInput("question bank is empty".to_string()));
        }

        for (q_index, question) in questions.iter().enumerate() {
            if question.title.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "question {} has an empty title",
                    q_index + 1
                )));
            }
            if question.options.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "question {} has no options",
                    q_index + 1
                )));
            }
            for (o_index, option) in question.options.iter().enumerate() {
                if option.text.trim().is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "question {} option {} has empty text",
                        q_index + 1,
                        o_index + 1
                    )));
                }
                for (axis, value) in [("ax", option.score.ax), ("av", option.score.av)] {
                    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                        return Err(Error::InvalidInput(format!(
                            "question {} option {}: {} = {} outside [-1, 1]",
                            q_index + 1,
                            o_index + 1,
                            axis,
                            value
                        )));
                    }
                }
            }
        }

        Ok(Self { questions })
    }

    /// The bank compiled into the library
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_QUESTIONS_TOML)
    }

    /// Parse `[[questions]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: BankFile = toml::from_str(content)?;
        Self::new(file.questions)
    }

    /// Parse either `{"questions": [...]}` or a bare array
    pub fn from_json_str(content: &str) -> Result<Self> {
        let questions = match serde_json::from_str::<JsonBank>(content)? {
            JsonBank::Wrapped(file) => file.questions,
            JsonBank::Bare(questions) => questions,
        };
        Self::new(questions)
    }

    /// Load from a file; `.json` selects JSON, anything else TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let bank = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!("Loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions (always at least one)
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A situation and the typical reaction to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub situation: String,
    pub response: String,
}

/// A growth suggestion with a concrete thing to try
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthAction {
    pub title: String,
    pub desc: String,
    pub how: String,
}

/// Advice for partners: a checklist, or one paragraph in older data files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartnerTips {
    List(Vec<String>),
    Text(String),
}

/// Report copy for one attachment type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentDetail {
    pub name: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub badge_text: String,
    pub subtitle: String,
    pub opening: String,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub relationship_impact: String,
    #[serde(default)]
    pub actions: Vec<GrowthAction>,
    pub partner_tips: PartnerTips,
    #[serde(default)]
    pub today_action: String,
}

/// Report copy keyed by attachment type
///
/// Entries may be missing; a lookup for a missing type fails with
/// [`Error::MissingDetail`] so the caller can show a fallback screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailTable {
    entries: BTreeMap<AttachmentType, AttachmentDetail>,
}

impl DetailTable {
    pub fn new(entries: BTreeMap<AttachmentType, AttachmentDetail>) -> Self {
        Self { entries }
    }

    /// The table compiled into the library
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_DETAILS_TOML)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a file; `.json` selects JSON, anything else TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!(
            "Loaded attachment details for {:?} from {}",
            table.entries.keys().map(|t| t.as_key()).collect::<Vec<_>>(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, attachment_type: AttachmentType) -> Result<&AttachmentDetail> {
        self.entries
            .get(&attachment_type)
            .ok_or(Error::MissingDetail(attachment_type))
    }

    pub fn insert(&mut self, attachment_type: AttachmentType, detail: AttachmentDetail) {
        self.entries.insert(attachment_type, detail);
    }

    pub fn remove(&mut self, attachment_type: AttachmentType) -> Option<AttachmentDetail> {
        self.entries.remove(&attachment_type)
    }

    /// Types without an entry
    pub fn missing_types(&self) -> Vec<AttachmentType> {
        AttachmentType::all_variants()
            .iter()
            .copied()
            .filter(|t| !self.entries.contains_key(t))
            .collect()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, Score};

    #[test]
    fn test_embedded_bank_is_valid() {
        let bank = QuestionBank::embedded().unwrap();
        assert_eq!(bank.len(), 10);
        assert!(bank.questions().iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn test_embedded_details_cover_all_types() {
        let table = DetailTable::embedded().unwrap();
        assert!(table.missing_types().is_empty());
        for t in AttachmentType::all_variants() {
            let detail = table.get(*t).unwrap();
            assert!(!detail.name.is_empty());
            assert!(matches!(detail.partner_tips, PartnerTips::List(_)));
        }
    }

    #[test]
    fn test_empty_bank_rejected() {
        assert!(matches!(
            QuestionBank::new(vec![]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_question_without_options_rejected() {
        let result = QuestionBank::new(vec![Question {
            title: "Lonely question".to_string(),
            options: vec![],
        }]);
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("no options")));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let result = QuestionBank::new(vec![Question {
            title: "Q".to_string(),
            options: vec![AnswerOption {
                text: "Too much".to_string(),
                score: Score::new(1.5, 0.0),
            }],
        }]);
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("ax = 1.5")));
    }

    #[test]
    fn test_nan_score_rejected() {
        let result = QuestionBank::new(vec![Question {
            title: "Q".to_string(),
            options: vec![AnswerOption {
                text: "NaN".to_string(),
                score: Score::new(0.0, f64::NAN),
            }],
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_bank_both_shapes() {
        let bare = r#"[{"title": "Q1", "options": [{"text": "A", "scores": {"ax": 0.1, "av": 0.2}}]}]"#;
        let wrapped = format!(r#"{{"questions": {}}}"#, bare);

        let a = QuestionBank::from_json_str(bare).unwrap();
        let b = QuestionBank::from_json_str(&wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(0).unwrap().options[0].score, Score::new(0.1, 0.2));
    }

    #[test]
    fn test_partner_tips_accepts_paragraph() {
        let toml = r#"
            [secure]
            name = "Secure"
            subtitle = "s"
            opening = "o"
            partner_tips = "Just be yourself."
        "#;
        let table = DetailTable::from_toml_str(toml).unwrap();
        let detail = table.get(AttachmentType::Secure).unwrap();
        assert_eq!(detail.partner_tips, PartnerTips::Text("Just be yourself.".to_string()));
        assert_eq!(
            table.missing_types(),
            vec![
                AttachmentType::Anxious,
                AttachmentType::Avoidant,
                AttachmentType::Fearful
            ]
        );
    }

    #[test]
    fn test_missing_detail_lookup() {
        let mut table = DetailTable::embedded().unwrap();
        table.remove(AttachmentType::Fearful);
        assert!(matches!(
            table.get(AttachmentType::Fearful),
            Err(Error::MissingDetail(AttachmentType::Fearful))
        ));
    }

    #[test]
    fn test_unknown_detail_key_is_parse_error() {
        let toml = r#"
            [dismissive]
            name = "x"
            subtitle = "s"
            opening = "o"
            partner_tips = "t"
        "#;
        assert!(matches!(
            DetailTable::from_toml_str(toml),
            Err(Error::Parse(_))
        ));
    }
}
