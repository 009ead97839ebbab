use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;
use crate::ui::view::BoxRow;

/// Per-box counters with a due-share meter under each row.
pub struct BoxBoard<'a> {
    rows: &'a [BoxRow],
    title: &'a str,
    total: &'a str,
    theme: &'a Theme,
}

impl<'a> BoxBoard<'a> {
    pub fn new(rows: &'a [BoxRow], title: &'a str, total: &'a str, theme: &'a Theme) -> Self {
        Self {
            rows,
            title,
            total,
            theme,
        }
    }
}

impl Widget for BoxBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(format!(" {} ", self.title)))
            .title_bottom(Line::from(format!(" {} ", self.total)))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Two lines per box when there is room for the meters, one otherwise.
        let with_meter = inner.height as usize >= self.rows.len() * 2;
        let mut y = inner.y;
        for row in self.rows {
            if y >= inner.y + inner.height {
                break;
            }
            let counts = format!("{}/{}", row.due, row.total);
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<8}", row.label),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<9}", row.interval),
                    Style::default().fg(colors.muted()),
                ),
                Span::styled(counts, Style::default().fg(colors.fg())),
            ]);
            Paragraph::new(line).render(Rect::new(inner.x, y, inner.width, 1), buf);
            y += 1;

            if with_meter && y < inner.y + inner.height {
                ProgressBar::new(row.due_label.as_str(), row.ratio, self.theme)
                    .render(Rect::new(inner.x, y, inner.width, 1), buf);
                y += 1;
            }
        }
    }
}
