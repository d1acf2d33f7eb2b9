use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::compare::MissedKey;
use crate::session::{CompletionCause, SessionResult};
use crate::ui::theme::Theme;

/// Results dashboard shown after a session finishes: speed figures,
/// error count, and the most-missed keys.
pub struct ResultsPanel<'a> {
    result: &'a SessionResult,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(result: &'a SessionResult, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            result,
            title,
            theme,
        }
    }
}

/// Missed keys ranked like `SessionResult::top_missed_keys`: count
/// descending, then key ascending, so the panel and the practice drill
/// always agree on the same keys in the same order.
fn ranked_missed_keys(result: &SessionResult) -> Vec<(char, u32)> {
    let mut missed: Vec<(char, u32)> = result
        .key_error_tally
        .iter()
        .filter_map(|(key, &count)| match key {
            MissedKey::Char(ch) if count > 0 => Some((*ch, count)),
            _ => None,
        })
        .collect();
    missed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    missed
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let cause = match result.completion_cause {
            CompletionCause::Natural => "Text completed",
            CompletionCause::Timeout => "Time's up",
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(cause, Style::default().fg(colors.success()))),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Speed:      ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    format!("{} WPM", result.normal_wpm),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Net speed:  ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    format!("{} WPM", result.net_wpm),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Errors:     ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    format!("{}", result.error_count),
                    Style::default().fg(if result.error_count == 0 {
                        colors.success()
                    } else {
                        colors.error()
                    }),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Time:       ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    format!("{:.0}s", result.elapsed_secs),
                    Style::default().fg(colors.fg()),
                ),
            ]),
        ];

        let missed = ranked_missed_keys(result);
        if !missed.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Trouble keys:",
                Style::default().fg(colors.text_pending()),
            )));
            for (ch, count) in missed.iter().take(3) {
                lines.push(Line::from(Span::styled(
                    format!("    {}  missed {}x", MissedKey::Char(*ch), count),
                    Style::default().fg(colors.warning()),
                )));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .render(inner, buf);
    }
}
