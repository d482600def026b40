//! Standalone HTML rendering of the result report

use super::{format_elapsed, Confetti, ResultReport};
use crate::bank::PartnerTips;
use crate::model::AttachmentType;

const REPORT_CSS: &str = include_str!("../../static/report.css");

/// Renders a [`ResultReport`] as a self-contained HTML page
///
/// Styles are embedded; the page has no external resources. All text from
/// the detail table is escaped.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    confetti: Option<Confetti>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include an animated confetti burst in the page
    pub fn with_confetti(mut self, confetti: Confetti) -> Self {
        self.confetti = Some(confetti);
        self
    }

    pub fn render(&self, report: &ResultReport) -> String {
        let mut body = String::new();
        body.push_str(&render_hero(report));
        body.push_str(&render_graph(report));
        body.push_str(&render_intro(report));
        body.push_str(&render_scenarios(report));
        body.push_str(&render_impact(report));
        body.push_str(&render_actions(report));
        body.push_str(&render_today(report));

        if let Some(seconds) = report.elapsed_seconds {
            body.push_str(&format!(
                "<p class=\"result-elapsed\">Completed in {}</p>\n",
                format_elapsed(seconds)
            ));
        }

        if let Some(confetti) = &self.confetti {
            body.push_str(&confetti.render_html());
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>PsycheFit: {}</title>\n<style>\n{}</style>\n</head>\n<body>\n\
             <main id=\"resultContent\">\n{}</main>\n</body>\n</html>\n",
            escape_html(&report.detail.name),
            REPORT_CSS,
            body
        )
    }
}

fn render_hero(report: &ResultReport) -> String {
    let detail = &report.detail;
    format!(
        r#"<div class="result-hero {theme}">
  <div class="result-hero-icon">🌸</div>
  <div class="result-hero-content">
    <div class="result-hero-subtitle">Your attachment style is</div>
    <h1 class="result-hero-title">{name}</h1>
    <div class="attachment-badge {badge}">{badge_text}</div>
  </div>
</div>
"#,
        theme = report.result.attachment_type.theme_class(),
        name = escape_html(&detail.name),
        badge = escape_html(&detail.badge),
        badge_text = escape_html(&detail.badge_text),
    )
}

fn render_graph(report: &ResultReport) -> String {
    let visual = report.result.visual;
    format!(
        r#"<div class="result-graph-card">
  <div class="graph-container">
    <div class="quadrant q-anxious"></div>
    <div class="quadrant q-fearful"></div>
    <div class="quadrant q-secure"></div>
    <div class="quadrant q-avoidant"></div>
    <div class="axis-x"></div>
    <div class="axis-y"></div>
    <div class="label-quad l-tl">{tl}</div>
    <div class="label-quad l-tr">{tr}</div>
    <div class="label-quad l-bl">{bl}</div>
    <div class="label-quad l-br">{br}</div>
    <div class="user-dot" style="left: {x:.2}%; bottom: {y:.2}%;"></div>
  </div>
  <div class="graph-footer">
    <span class="coord-pill">Anxiety index: {anxiety}</span>
    <span class="coord-pill">Avoidance index: {avoidance}</span>
  </div>
</div>
"#,
        tl = AttachmentType::Anxious.display_name(),
        tr = AttachmentType::Fearful.display_name(),
        bl = AttachmentType::Secure.display_name(),
        br = AttachmentType::Avoidant.display_name(),
        x = visual.x,
        y = visual.y,
        anxiety = report.anxiety_index(),
        avoidance = report.avoidance_index(),
    )
}

fn render_intro(report: &ResultReport) -> String {
    format!(
        r#"<div class="attachment-card">
  <p class="attachment-subtitle">{}</p>
  <p class="result-opening-text">{}</p>
</div>
"#,
        escape_html(&report.detail.subtitle),
        escape_html(&report.detail.opening),
    )
}

fn render_scenarios(report: &ResultReport) -> String {
    let mut out = String::from(
        "<div class=\"scenario-mirror\">\n  <div class=\"scenario-mirror-title\"><span>🪞</span><span>Your relationship mirror</span></div>\n",
    );
    for scenario in &report.detail.scenarios {
        out.push_str(&format!(
            "  <div class=\"scenario-item\">\n    <div class=\"scenario-situation\">{}</div>\n    <div class=\"scenario-response\">{}</div>\n  </div>\n",
            escape_html(&scenario.situation),
            escape_html(&scenario.response)
        ));
    }
    out.push_str("</div>\n");
    out
}

fn render_partner_tips(tips: &PartnerTips) -> String {
    let content = match tips {
        PartnerTips::List(items) => {
            let mut list = String::from("    <ul class=\"partner-tips-list\">\n");
            for tip in items {
                list.push_str(&format!(
                    "      <li class=\"partner-tips-item\"><span class=\"tips-bullet\">✓</span><span>{}</span></li>\n",
                    escape_html(tip)
                ));
            }
            list.push_str("    </ul>\n");
            list
        }
        PartnerTips::Text(text) => format!(
            "    <p class=\"partner-tips-text\">{}</p>\n",
            escape_html(text)
        ),
    };

    format!(
        "  <div class=\"partner-tips-card\">\n    <div class=\"partner-tips-header\">\n      <div class=\"partner-tips-icon\">💡</div>\n      <div class=\"partner-tips-title\">For your partner or close friend</div>\n    </div>\n{}  </div>\n",
        content
    )
}

fn render_impact(report: &ResultReport) -> String {
    format!(
        "<div class=\"relationship-impact\">\n  <div class=\"relationship-impact-title\"><span>💫</span><span>Deeper impact</span></div>\n  <p class=\"relationship-impact-text\">{}</p>\n{}</div>\n",
        escape_html(&report.detail.relationship_impact),
        render_partner_tips(&report.detail.partner_tips)
    )
}

fn render_actions(report: &ResultReport) -> String {
    let mut out = String::from(
        "<div class=\"action-plan\">\n  <div class=\"action-plan-title\"><span>🌱</span><span>Growth suggestions</span></div>\n",
    );
    for (i, action) in report.detail.actions.iter().enumerate() {
        out.push_str(&format!(
            "  <div class=\"action-item\">\n    <div class=\"action-number\">{}</div>\n    <div class=\"action-title\">{}</div>\n    <div class=\"action-desc\">{}</div>\n    <div class=\"action-how\"><strong>Try: </strong>{}</div>\n  </div>\n",
            i + 1,
            escape_html(&action.title),
            escape_html(&action.desc),
            escape_html(&action.how)
        ));
    }
    out.push_str("</div>\n");
    out
}

fn render_today(report: &ResultReport) -> String {
    format!(
        "<div class=\"today-action\">\n  <div class=\"today-action-icon\">✨</div>\n  <div class=\"today-action-title\">Start today</div>\n  <div class=\"today-action-text\">{}</div>\n</div>\n",
        escape_html(&report.detail.today_action)
    )
}

/// Escape text for inclusion in HTML element content and attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{details, result};
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn report(t: AttachmentType, x: f64, y: f64) -> ResultReport {
        ResultReport::assemble(&result(t, x, y), &details()).unwrap()
    }

    #[test]
    fn test_page_contains_all_sections() {
        let html = HtmlRenderer::new().render(&report(AttachmentType::Anxious, -0.4, 0.6));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("result-hero hero-anxious"));
        assert!(html.contains("<h1 class=\"result-hero-title\">Anxious</h1>"));
        assert!(html.contains("Anxiety index: 0.60"));
        assert!(html.contains("Avoidance index: -0.40"));
        assert!(html.contains("<div class=\"scenario-item\">"));
        assert!(html.contains("<ul class=\"partner-tips-list\">"));
        assert!(html.contains("<div class=\"action-number\">2</div>"));
        assert!(html.contains("today-action-text"));
        assert!(!html.contains("class=\"confetti\""));
    }

    #[test]
    fn test_marker_uses_visual_coordinates() {
        let r = report(AttachmentType::Secure, -0.5, -0.5);
        let html = HtmlRenderer::new().render(&r);
        let expected = format!(
            "left: {:.2}%; bottom: {:.2}%;",
            r.result.visual.x, r.result.visual.y
        );
        assert!(html.contains(&expected));
    }

    #[test]
    fn test_paragraph_tips_render_as_text() {
        let mut r = report(AttachmentType::Fearful, 0.2, 0.2);
        r.detail.partner_tips = PartnerTips::Text("Be patient & kind".to_string());
        let html = HtmlRenderer::new().render(&r);
        assert!(html.contains("<p class=\"partner-tips-text\">Be patient &amp; kind</p>"));
        assert!(!html.contains("<ul class=\"partner-tips-list\">"));
        assert!(!html.contains("<li class=\"partner-tips-item\">"));
    }

    #[test]
    fn test_stylesheet_class_names_do_not_count_as_markup() {
        // The embedded stylesheet names every class
        let mut r = report(AttachmentType::Secure, -0.3, -0.3);
        r.detail.scenarios.clear();
        r.detail.partner_tips = PartnerTips::Text("Stay close.".to_string());
        let html = HtmlRenderer::new().render(&r);

        assert!(html.contains(".partner-tips-list"));
        assert!(html.contains(".scenario-item"));
        assert!(!html.contains("<ul class=\"partner-tips-list\">"));
        assert!(!html.contains("<div class=\"scenario-item\">"));
    }

    #[test]
    fn test_detail_text_is_escaped() {
        let mut r = report(AttachmentType::Secure, -0.1, -0.1);
        r.detail.opening = "<script>alert('x')</script>".to_string();
        let html = HtmlRenderer::new().render(&r);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_confetti_included_when_requested() {
        let mut rng = StdRng::seed_from_u64(1);
        let confetti = Confetti::burst(&mut rng, 12, 80);
        let html = HtmlRenderer::new()
            .with_confetti(confetti)
            .render(&report(AttachmentType::Avoidant, 0.5, -0.5));
        assert_eq!(html.matches("class=\"confetti\"").count(), 12);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
