//! Result report assembly and rendering
//!
//! [`ResultReport`] joins a [`QuizResult`] with the matching
//! [`AttachmentDetail`] copy. Renderers turn it into a standalone HTML page
//! ([`HtmlRenderer`]) or terminal text ([`TextRenderer`]).

mod confetti;
mod html;
mod text;

pub use confetti::{Confetti, ConfettiPiece, CONFETTI_COLORS};
pub use html::{escape_html, HtmlRenderer};
pub use text::{wrap_text, TextRenderer};

use crate::bank::{AttachmentDetail, DetailTable};
use crate::model::QuizResult;
use crate::Result;
use serde::Serialize;
use tracing::error;

/// Everything a renderer needs for the result screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultReport {
    pub result: QuizResult,
    pub detail: AttachmentDetail,
    /// Seconds from quiz start to result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<i64>,
}

impl ResultReport {
    /// Look up the copy for the result's type
    ///
    /// Fails with `Error::MissingDetail` when the table has no entry; the
    /// caller shows a generic error screen instead of the report.
    pub fn assemble(result: &QuizResult, details: &DetailTable) -> Result<Self> {
        let detail = details.get(result.attachment_type).map_err(|e| {
            error!("Cannot build report: {}", e);
            e
        })?;

        Ok(Self {
            result: result.clone(),
            detail: detail.clone(),
            elapsed_seconds: None,
        })
    }

    pub fn with_elapsed(mut self, elapsed: Option<chrono::Duration>) -> Self {
        self.elapsed_seconds = elapsed.map(|d| d.num_seconds());
        self
    }

    /// Anxiety index (exact y coordinate) with two decimals
    pub fn anxiety_index(&self) -> String {
        format!("{:.2}", self.result.coordinates.y)
    }

    /// Avoidance index (exact x coordinate) with two decimals
    pub fn avoidance_index(&self) -> String {
        format!("{:.2}", self.result.coordinates.x)
    }
}

/// `42s`, `3m 07s`
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{}s", seconds)
    } else {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::bank::DetailTable;
    use crate::model::{AttachmentType, Coordinates, QuizResult, VisualPoint};

    pub fn result(attachment_type: AttachmentType, x: f64, y: f64) -> QuizResult {
        QuizResult {
            attachment_type,
            coordinates: Coordinates { x, y },
            visual: VisualPoint {
                x: ((x + 1.0) / 2.0 * 100.0).clamp(8.0, 92.0),
                y: ((y + 1.0) / 2.0 * 100.0).clamp(8.0, 92.0),
            },
            unanswered: vec![],
        }
    }

    pub fn details() -> DetailTable {
        DetailTable::embedded().unwrap()
    }
}
