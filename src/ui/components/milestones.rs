use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

const DOTS_PER_ROW: usize = 20;

/// One row of the progress pathway: a track name with a dot per exercise,
/// filled when that exercise has been completed.
pub struct MilestoneGrid<'a> {
    pub label: String,
    pub milestones: Vec<bool>,
    pub theme: &'a Theme,
}

impl<'a> MilestoneGrid<'a> {
    pub fn new(label: &str, milestones: Vec<bool>, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            milestones,
            theme,
        }
    }
}

impl Widget for MilestoneGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let done = self.milestones.iter().filter(|d| **d).count();

        let block = Block::bordered()
            .title(format!(" {} ({}/{}) ", self.label, done, self.milestones.len()))
            .border_style(Style::default().fg(if done == self.milestones.len() {
                colors.success()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for (i, completed) in self.milestones.iter().enumerate() {
            let row = (i / DOTS_PER_ROW) as u16;
            let col = ((i % DOTS_PER_ROW) * 2) as u16;
            if row >= inner.height || col >= inner.width {
                continue;
            }
            let (symbol, style) = if *completed {
                ("\u{25cf}", Style::default().fg(colors.success()))
            } else {
                ("\u{25cb}", Style::default().fg(colors.accent_dim()))
            };
            buf.set_string(inner.x + col, inner.y + row, symbol, style);
        }
    }
}
