//! Celebration confetti shown when the result appears

use rand::Rng;

/// Confetti palette
pub const CONFETTI_COLORS: [&str; 6] = [
    "#ff6b9d", "#c44569", "#ffa502", "#ff6348", "#5f27cd", "#00d2d3",
];

/// Upper bound (exclusive) of a piece's animation delay, in seconds
const MAX_DELAY_SECS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal position in `[0, width)`
    pub column: u16,
    pub color: &'static str,
    pub delay_secs: f64,
}

/// A burst of randomly placed, randomly coloured pieces
#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    width: u16,
    pieces: Vec<ConfettiPiece>,
}

impl Confetti {
    pub fn burst<R: Rng + ?Sized>(rng: &mut R, count: usize, width: u16) -> Self {
        let width = width.max(1);
        let pieces = (0..count)
            .map(|_| ConfettiPiece {
                column: rng.gen_range(0..width),
                color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
                delay_secs: rng.gen::<f64>() * MAX_DELAY_SECS,
            })
            .collect();
        Self { width, pieces }
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// One terminal line of coloured glyphs (24-bit ANSI colour)
    ///
    /// Pieces sharing a column collapse to the last one drawn.
    pub fn render_ansi(&self) -> String {
        let mut cells: Vec<Option<&'static str>> = vec![None; self.width as usize];
        for piece in &self.pieces {
            cells[piece.column as usize] = Some(piece.color);
        }

        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            match cell.and_then(hex_to_rgb) {
                Some((r, g, b)) => {
                    let glyph = if i % 2 == 0 { '*' } else { '•' };
                    line.push_str(&format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, glyph));
                }
                None => line.push(' '),
            }
        }
        line
    }

    /// Absolutely positioned `<div class="confetti">` elements
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            let left = piece.column as f64 / self.width as f64 * 100.0;
            out.push_str(&format!(
                "<div class=\"confetti\" style=\"left: {:.1}%; background: {}; animation-delay: {:.2}s;\"></div>\n",
                left, piece.color, piece.delay_secs
            ));
        }
        out
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let confetti = Confetti::burst(&mut rng, 50, 60);
        assert_eq!(confetti.pieces().len(), 50);
        for piece in confetti.pieces() {
            assert!(piece.column < 60);
            assert!(CONFETTI_COLORS.contains(&piece.color));
            assert!((0.0..MAX_DELAY_SECS).contains(&piece.delay_secs));
        }
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let mut rng = StdRng::seed_from_u64(4);
        let confetti = Confetti::burst(&mut rng, 3, 0);
        assert_eq!(confetti.width(), 1);
        assert!(confetti.pieces().iter().all(|p| p.column == 0));
    }

    #[test]
    fn test_ansi_line_has_one_cell_per_column() {
        let mut rng = StdRng::seed_from_u64(5);
        let confetti = Confetti::burst(&mut rng, 10, 40);
        let line = confetti.render_ansi();
        let reset_count = line.matches("\x1b[0m").count();
        let blanks = line.matches(' ').count();
        assert_eq!(reset_count + blanks, 40);
    }

    #[test]
    fn test_html_one_element_per_piece() {
        let mut rng = StdRng::seed_from_u64(6);
        let confetti = Confetti::burst(&mut rng, 8, 50);
        let html = confetti.render_html();

        assert_eq!(html.lines().count(), 8);
        for (line, piece) in html.lines().zip(confetti.pieces()) {
            assert!(line.starts_with("<div class=\"confetti\" style=\"left: "));
            assert!(line.ends_with("></div>"));
            assert!(line.contains(&format!("background: {};", piece.color)));
        }
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff6b9d"), Some((255, 107, 157)));
        assert_eq!(hex_to_rgb("ff6b9d"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }
}
