//! Report export: standalone HTML file and JSON result

use psychefit_common::report::{Confetti, HtmlRenderer, ResultReport};
use psychefit_common::{QuizResult, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write the report as a self-contained HTML page
pub fn export_html<P: AsRef<Path>>(
    path: P,
    report: &ResultReport,
    confetti: Option<Confetti>,
) -> Result<()> {
    let mut renderer = HtmlRenderer::new();
    if let Some(confetti) = confetti {
        renderer = renderer.with_confetti(confetti);
    }
    let html = renderer.render(report);

    let mut file = File::create(path.as_ref())?;
    file.write_all(html.as_bytes())?;
    info!("HTML report written to {}", path.as_ref().display());
    Ok(())
}

/// Result as pretty-printed JSON (`type`, `coordinates`, `visual`)
pub fn result_json(result: &QuizResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use psychefit_common::{AttachmentType, Coordinates, DetailTable, VisualPoint};
    use tempfile::TempDir;

    fn result() -> QuizResult {
        QuizResult {
            attachment_type: AttachmentType::Avoidant,
            coordinates: Coordinates { x: 0.6, y: -0.3 },
            visual: VisualPoint { x: 79.2, y: 36.1 },
            unanswered: Vec::new(),
        }
    }

    #[test]
    fn test_export_html_writes_page() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.html");
        let details = DetailTable::embedded().unwrap();
        let report = ResultReport::assemble(&result(), &details).unwrap();

        export_html(&path, &report, None).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("result-hero hero-avoidant"));
    }

    #[test]
    fn test_export_html_bad_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("report.html");
        let details = DetailTable::embedded().unwrap();
        let report = ResultReport::assemble(&result(), &details).unwrap();

        assert!(export_html(&path, &report, None).is_err());
    }

    #[test]
    fn test_result_json_shape() {
        let json = result_json(&result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "avoidant");
        assert_eq!(value["coordinates"]["x"], 0.6);
        assert_eq!(value["visual"]["y"], 36.1);
        assert!(value.get("unanswered").is_none());
    }
}
