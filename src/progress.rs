//! Rotating-glyph progress indicator for the crawl loop.
//!
//! Purely presentational: the spinner and status line give the user feedback
//! while the page is being scrolled, and have no influence on crawl control
//! flow or termination.

/// Glyphs cycled by the spinner, in display order.
const GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

/// Width the status text is right-padded to before the glyph is appended.
const STATUS_WIDTH: usize = 40;

/// An infinite, restartable sequence of spinner glyphs.
///
/// The iterator never terminates; callers pull one glyph per progress tick.
pub fn spinner() -> impl Iterator<Item = char> {
    GLYPHS.into_iter().cycle()
}

/// Format one fixed-width status line for the current article count.
///
/// ```
/// let line = medium_scroll::progress::render(12, '/');
/// assert!(line.starts_with("Found 12 articles so far"));
/// assert!(line.ends_with("[/]"));
/// ```
pub fn render(count: usize, glyph: char) -> String {
    let base = format!("Found {count} articles so far");
    let filler = STATUS_WIDTH.saturating_sub(base.len());
    format!("{base}{} [{glyph}]", " ".repeat(filler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles_through_all_four_glyphs() {
        let glyphs: Vec<char> = spinner().take(8).collect();
        assert_eq!(glyphs, vec!['|', '/', '-', '\\', '|', '/', '-', '\\']);
    }

    #[test]
    fn test_spinner_restarts_from_the_first_glyph() {
        assert_eq!(spinner().next(), Some('|'));
        assert_eq!(spinner().next(), Some('|'));
    }

    #[test]
    fn test_render_pads_to_a_fixed_width() {
        let short = render(1, '|');
        let long = render(1_000_000, '-');
        // Status text plus " [x]" suffix; both counts fit inside the padding.
        assert_eq!(short.len(), STATUS_WIDTH + 4);
        assert_eq!(long.len(), STATUS_WIDTH + 4);
    }

    #[test]
    fn test_render_reports_the_count_and_glyph() {
        let line = render(37, '\\');
        assert!(line.starts_with("Found 37 articles so far"));
        assert!(line.ends_with(" [\\]"));
    }
}
