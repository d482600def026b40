//! Terminal rendering of the result report

use super::{format_elapsed, ResultReport};
use crate::bank::PartnerTips;
use crate::model::{AttachmentType, VisualPoint};

const PLOT_WIDTH: usize = 41;
const PLOT_HEIGHT: usize = 17;
const MARKER: char = '●';

/// Plain-text renderer for the result screen
#[derive(Debug, Clone)]
pub struct TextRenderer {
    width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { width: 72 }
    }
}

impl TextRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(PLOT_WIDTH + 4),
        }
    }

    pub fn render(&self, report: &ResultReport) -> String {
        let detail = &report.detail;
        let rule = "━".repeat(self.width);
        let mut out = String::new();

        out.push_str(&format!("\n{}\n", rule));
        out.push_str("  Your attachment style is\n");
        out.push_str(&format!("  🌸 {}", detail.name.to_uppercase()));
        if !detail.badge_text.is_empty() {
            out.push_str(&format!("  [{}]", detail.badge_text));
        }
        out.push('\n');
        out.push_str(&format!("{}\n\n", rule));

        out.push_str(&render_plot(report.result.visual));
        out.push_str(&format!(
            "\n  Anxiety index: {}    Avoidance index: {}\n\n",
            report.anxiety_index(),
            report.avoidance_index()
        ));

        out.push_str(&format!("  {}\n\n", detail.subtitle));
        out.push_str(&self.paragraph(&detail.opening, "  "));
        out.push('\n');

        if !detail.scenarios.is_empty() {
            out.push_str("🪞 Your relationship mirror\n");
            for scenario in &detail.scenarios {
                out.push_str(&self.paragraph(&format!("• {}", scenario.situation), "  "));
                out.push_str(&self.paragraph(&scenario.response, "    → "));
            }
            out.push('\n');
        }

        if !detail.relationship_impact.is_empty() {
            out.push_str("💫 Deeper impact\n");
            out.push_str(&self.paragraph(&detail.relationship_impact, "  "));
            out.push('\n');
        }

        out.push_str("💡 For your partner or close friend\n");
        match &detail.partner_tips {
            PartnerTips::List(tips) => {
                for tip in tips {
                    out.push_str(&self.paragraph(tip, "  ✓ "));
                }
            }
            PartnerTips::Text(text) => out.push_str(&self.paragraph(text, "  ")),
        }
        out.push('\n');

        if !detail.actions.is_empty() {
            out.push_str("🌱 Growth suggestions\n");
            for (i, action) in detail.actions.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, action.title));
                out.push_str(&self.paragraph(&action.desc, "     "));
                out.push_str(&self.paragraph(&format!("Try: {}", action.how), "     "));
            }
            out.push('\n');
        }

        if !detail.today_action.is_empty() {
            out.push_str("✨ Start today\n");
            out.push_str(&self.paragraph(&detail.today_action, "  "));
        }

        if let Some(seconds) = report.elapsed_seconds {
            out.push_str(&format!("\n  Completed in {}\n", format_elapsed(seconds)));
        }
        out.push_str(&format!("{}\n", rule));
        out
    }

    /// Word-wrapped paragraph; continuation lines align under the text
    fn paragraph(&self, text: &str, prefix: &str) -> String {
        let indent = " ".repeat(prefix.chars().count());
        let available = self.width.saturating_sub(indent.len()).max(20);

        let mut out = String::new();
        for (i, line) in wrap_text(text, available).iter().enumerate() {
            out.push_str(if i == 0 { prefix } else { indent.as_str() });
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// ASCII quadrant plot: avoidance grows to the right, anxiety upward
fn render_plot(visual: VisualPoint) -> String {
    let mut grid = vec![vec![' '; PLOT_WIDTH]; PLOT_HEIGHT];
    let mid_col = PLOT_WIDTH / 2;
    let mid_row = PLOT_HEIGHT / 2;

    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = match (r == mid_row, c == mid_col) {
                (true, true) => '┼',
                (true, false) => '─',
                (false, true) => '│',
                (false, false) => ' ',
            };
        }
    }

    place_label(&mut grid, 1, 2, AttachmentType::Anxious.display_name());
    let right = PLOT_WIDTH - 2 - AttachmentType::Fearful.display_name().len();
    place_label(&mut grid, 1, right, AttachmentType::Fearful.display_name());
    place_label(&mut grid, PLOT_HEIGHT - 2, 2, AttachmentType::Secure.display_name());
    let right = PLOT_WIDTH - 2 - AttachmentType::Avoidant.display_name().len();
    place_label(&mut grid, PLOT_HEIGHT - 2, right, AttachmentType::Avoidant.display_name());

    let (row, col) = marker_cell(visual);
    grid[row][col] = MARKER;

    let mut out = String::new();
    out.push_str("            anxiety ↑\n");
    for row in &grid {
        out.push_str("    ");
        out.extend(row.iter());
        out.push('\n');
    }
    out.push_str(&format!("{:>width$}\n", "avoidance →", width = PLOT_WIDTH + 4));
    out
}

/// Grid cell for a visual point; row 0 is the top
fn marker_cell(visual: VisualPoint) -> (usize, usize) {
    let col = (visual.x.clamp(0.0, 100.0) / 100.0 * (PLOT_WIDTH - 1) as f64).round() as usize;
    let from_bottom = (visual.y.clamp(0.0, 100.0) / 100.0 * (PLOT_HEIGHT - 1) as f64).round() as usize;
    (PLOT_HEIGHT - 1 - from_bottom, col)
}

fn place_label(grid: &mut [Vec<char>], row: usize, col: usize, label: &str) {
    for (i, ch) in label.chars().enumerate() {
        if let Some(cell) = grid[row].get_mut(col + i) {
            *cell = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{details, result};
    use super::*;

    #[test]
    fn test_render_contains_sections() {
        let report =
            ResultReport::assemble(&result(AttachmentType::Fearful, 0.25, 0.5), &details()).unwrap();
        let text = TextRenderer::default().render(&report);

        assert!(text.contains("FEARFUL"));
        assert!(text.contains("Anxiety index: 0.50"));
        assert!(text.contains("Avoidance index: 0.25"));
        assert!(text.contains("Your relationship mirror"));
        assert!(text.contains("  ✓ "));
        assert!(text.contains("  2. "));
        assert!(text.contains("Start today"));
        assert_eq!(text.matches(MARKER).count(), 1);
    }

    #[test]
    fn test_marker_cell_corners() {
        // Top-right: high avoidance, high anxiety
        assert_eq!(marker_cell(VisualPoint { x: 100.0, y: 100.0 }), (0, PLOT_WIDTH - 1));
        // Bottom-left
        assert_eq!(marker_cell(VisualPoint { x: 0.0, y: 0.0 }), (PLOT_HEIGHT - 1, 0));
        // Safe margin keeps the marker off the edges
        let (row, col) = marker_cell(VisualPoint { x: 8.0, y: 92.0 });
        assert!(row > 0 && col > 0);
    }

    #[test]
    fn test_marker_in_anxious_quadrant() {
        let (row, col) = marker_cell(VisualPoint { x: 20.0, y: 80.0 });
        assert!(row < PLOT_HEIGHT / 2);
        assert!(col < PLOT_WIDTH / 2);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap_text("a extraordinarily b", 5);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
