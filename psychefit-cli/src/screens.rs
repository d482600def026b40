//! Terminal screen formatting
//!
//! Pure string builders; the driver decides when to write them.

use psychefit_common::model::Question;
use psychefit_common::progress::{ReflectionProgress, StepState, STEP_LABELS};

const BAR_WIDTH: usize = 30;
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub const WELCOME_TOAST: &str = "Welcome to PsycheFit 🌱";
pub const RESTART_TOAST: &str = "Starting a new exploration...";
pub const SHARE_TOAST: &str = "Thanks for sharing your growth journey 💚";
pub const TRY_TOAST: &str = "Added to your action list 💪";
pub const RESTART_CONFIRM: &str = "Retake the quiz? Your current result will not be saved.";

/// Formatter for every screen the terminal front-end shows
pub struct ScreenFormatter;

impl ScreenFormatter {
    /// Short transient notice, e.g. `[✨] Thanks for sharing`
    pub fn format_toast(icon: &str, message: &str) -> String {
        format!("  [{}] {}\n", icon, message)
    }

    pub fn format_welcome(question_count: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str("  PsycheFit · How do you attach?\n");
        output.push_str(&format!("{}\n\n", RULE));
        output.push_str(&format!(
            "  {} short questions about how you feel and act in close\n",
            question_count
        ));
        output.push_str("  relationships. There are no right or wrong answers.\n\n");
        output.push_str("  Press Enter to begin, or q to quit.\n");
        output
    }

    /// `[█████████░░░░░░░░░]  3/10`
    pub fn format_progress_bar(percent: f64, label: &str) -> String {
        let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        format!(
            "[{}{}] {}",
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled),
            label
        )
    }

    pub fn format_question(
        index: usize,
        total: usize,
        percent: f64,
        question: &Question,
        can_go_back: bool,
    ) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&Self::format_progress_bar(
            percent,
            &format!("{}/{}", index + 1, total),
        ));
        output.push_str("\n\n");
        output.push_str(&format!("  Q{}. {}\n\n", index + 1, question.title));
        for (i, option) in question.options.iter().enumerate() {
            output.push_str(&format!("    {}) {}\n", i + 1, option.text));
        }
        output.push('\n');

        let back = if can_go_back { "b = back" } else { "(b = back, disabled)" };
        output.push_str(&format!(
            "  Choose 1-{}, {}, q = quit\n",
            question.options.len(),
            back
        ));
        output
    }

    /// Reflection bar plus the step checklist
    pub fn format_reflection(progress: &ReflectionProgress) -> String {
        let mut output = String::new();
        output.push_str(&Self::format_progress_bar(
            progress.percent(),
            &format!("{}%", progress.rounded_percent()),
        ));
        output.push('\n');
        for (state, label) in progress.steps().iter().zip(STEP_LABELS) {
            let marker = match state {
                StepState::Completed => "✓",
                StepState::Active => "▸",
                StepState::Pending => "·",
            };
            output.push_str(&format!("    {} {}\n", marker, label));
        }
        output
    }

    pub fn format_result_menu() -> String {
        "\n  r = retake · s = share · t = I'll try · q = quit\n".to_string()
    }

    /// Shown instead of the report when no copy exists for the result
    pub fn format_report_error() -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str("  Sorry, we could not build your report.\n");
        output.push_str("  Your answers were scored, but the description for your\n");
        output.push_str("  style is unavailable. You can retake the quiz or quit.\n");
        output.push_str(&format!("{}\n", RULE));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psychefit_common::model::{AnswerOption, Score};

    fn question() -> Question {
        Question {
            title: "How do you feel?".to_string(),
            options: vec![
                AnswerOption {
                    text: "Fine".to_string(),
                    score: Score::new(-0.5, -0.5),
                },
                AnswerOption {
                    text: "Worried".to_string(),
                    score: Score::new(0.5, -0.5),
                },
            ],
        }
    }

    #[test]
    fn test_format_progress_bar() {
        let bar = ScreenFormatter::format_progress_bar(50.0, "5/10");
        assert_eq!(bar.matches('█').count(), BAR_WIDTH / 2);
        assert_eq!(bar.matches('░').count(), BAR_WIDTH / 2);
        assert!(bar.ends_with("5/10"));

        let full = ScreenFormatter::format_progress_bar(140.0, "");
        assert_eq!(full.matches('█').count(), BAR_WIDTH);
    }

    #[test]
    fn test_format_question() {
        let text = ScreenFormatter::format_question(0, 10, 10.0, &question(), false);
        assert!(text.contains("1/10"));
        assert!(text.contains("Q1. How do you feel?"));
        assert!(text.contains("1) Fine"));
        assert!(text.contains("2) Worried"));
        assert!(text.contains("Choose 1-2"));
        assert!(text.contains("disabled"));

        let text = ScreenFormatter::format_question(3, 10, 40.0, &question(), true);
        assert!(!text.contains("disabled"));
    }

    #[test]
    fn test_format_reflection_steps() {
        let mut progress = ReflectionProgress::new();
        progress.advance_by(45.0);
        let text = ScreenFormatter::format_reflection(&progress);
        assert!(text.contains("45%"));
        assert!(text.contains(&format!("✓ {}", STEP_LABELS[0])));
        assert!(text.contains(&format!("▸ {}", STEP_LABELS[1])));
        assert!(text.contains(&format!("· {}", STEP_LABELS[3])));
    }

    #[test]
    fn test_format_toast() {
        assert_eq!(
            ScreenFormatter::format_toast("✨", SHARE_TOAST),
            format!("  [✨] {}\n", SHARE_TOAST)
        );
    }
}
