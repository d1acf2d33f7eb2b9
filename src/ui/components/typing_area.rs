use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::TypingSession;
use crate::session::compare::{self, Outcome};
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    session: &'a TypingSession,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a TypingSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// A render token maps a single reference character to its display string.
struct RenderToken {
    ref_idx: usize,
    display: String,
    is_line_break: bool,
}

/// Expand reference chars into render tokens, making whitespace visible.
/// Newlines render as a return marker plus an actual line break; tabs as an
/// arrow padded to the next 4-column stop.
fn build_render_tokens(reference: &[char]) -> Vec<RenderToken> {
    let mut tokens = Vec::new();
    let mut col = 0usize;

    for (i, &ch) in reference.iter().enumerate() {
        match ch {
            '\n' => {
                tokens.push(RenderToken {
                    ref_idx: i,
                    display: "\u{21b5}".to_string(),
                    is_line_break: true,
                });
                col = 0;
            }
            '\t' => {
                let tab_width = 4 - (col % 4);
                let mut display = String::from("\u{2192}");
                for _ in 1..tab_width {
                    display.push('\u{00b7}');
                }
                tokens.push(RenderToken {
                    ref_idx: i,
                    display,
                    is_line_break: false,
                });
                col += tab_width;
            }
            _ => {
                tokens.push(RenderToken {
                    ref_idx: i,
                    display: ch.to_string(),
                    is_line_break: false,
                });
                col += 1;
            }
        }
    }

    tokens
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let reference = self.session.reference();
        let typed = self.session.typed();
        let cursor = self.session.cursor();
        let comparison = compare::compare(reference, typed);
        let tokens = build_render_tokens(reference);

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];

        for token in &tokens {
            let idx = token.ref_idx;

            let style = if idx < cursor {
                match comparison.outcomes.get(idx) {
                    Some(Outcome::Correct) => Style::default().fg(colors.text_correct()),
                    _ => Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                }
            } else if idx == cursor {
                Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg())
            } else {
                Style::default().fg(colors.text_pending())
            };

            // Mistyped positions show what was actually typed, except
            // whitespace markers which stay visible either way
            let display = if idx < cursor
                && comparison.outcomes.get(idx) == Some(&Outcome::Incorrect)
                && reference[idx] != '\n'
                && reference[idx] != '\t'
            {
                typed.get(idx).map(|ch| ch.to_string()).unwrap_or_else(|| token.display.clone())
            } else {
                token.display.clone()
            };

            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(display, style));
            }

            if token.is_line_break {
                lines.push(Vec::new());
            }
        }

        let ratatui_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(ratatui_lines)
            .block(block)
            .wrap(Wrap { trim: false });

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tokens_basic() {
        let reference: Vec<char> = "abc".chars().collect();
        let tokens = build_render_tokens(&reference);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].display, "a");
        assert!(!tokens[0].is_line_break);
    }

    #[test]
    fn test_render_tokens_newline() {
        let reference: Vec<char> = "a\nb".chars().collect();
        let tokens = build_render_tokens(&reference);
        assert_eq!(tokens[1].display, "\u{21b5}");
        assert!(tokens[1].is_line_break);
        assert_eq!(tokens[1].ref_idx, 1);
    }

    #[test]
    fn test_render_tokens_tab_alignment() {
        // Tab at col 0 pads to four columns; at col 2 it pads to two
        let tokens = build_render_tokens(&"\tx".chars().collect::<Vec<_>>());
        assert_eq!(tokens[0].display, "\u{2192}\u{00b7}\u{00b7}\u{00b7}");
        let tokens = build_render_tokens(&"ab\t".chars().collect::<Vec<_>>());
        assert_eq!(tokens[2].display, "\u{2192}\u{00b7}");
    }

    #[test]
    fn test_render_tokens_newline_resets_column() {
        let tokens = build_render_tokens(&"\n\tx".chars().collect::<Vec<_>>());
        assert!(tokens[0].is_line_break);
        assert_eq!(tokens[1].display, "\u{2192}\u{00b7}\u{00b7}\u{00b7}");
    }
}
