use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;
use crate::ui::view::StatsView;

pub struct StatsPanel<'a> {
    stats: &'a StatsView,
    locale: &'a str,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: &'a StatsView, locale: &'a str, theme: &'a Theme) -> Self {
        Self {
            stats,
            locale,
            theme,
        }
    }
}

/// Compact one-line form for the header on narrow terminals.
pub fn header_summary(stats: &StatsView, locale: &str) -> String {
    format!(
        "✓ {}  ✗ {}  {} {}%  {}",
        stats.correct,
        stats.incorrect,
        t!("stats.accuracy", locale = locale),
        stats.accuracy,
        stats.minutes
    )
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let locale = self.locale;

        let block = Block::bordered()
            .title(Line::from(format!(" {} ", t!("stats.title", locale = locale))))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let accuracy_color = if self.stats.correct + self.stats.incorrect == 0 {
            colors.muted()
        } else if self.stats.accuracy >= 80 {
            colors.success()
        } else if self.stats.accuracy >= 50 {
            colors.warning()
        } else {
            colors.error()
        };

        let row = |label: String, value: String, color: Color| {
            Line::from(vec![
                Span::styled(format!(" {label:<12}"), Style::default().fg(colors.muted())),
                Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ])
        };

        let lines = vec![
            row(
                t!("stats.correct", locale = locale).into_owned(),
                self.stats.correct.to_string(),
                colors.success(),
            ),
            row(
                t!("stats.incorrect", locale = locale).into_owned(),
                self.stats.incorrect.to_string(),
                colors.error(),
            ),
            row(
                t!("stats.accuracy", locale = locale).into_owned(),
                format!("{}%", self.stats.accuracy),
                accuracy_color,
            ),
            row(
                t!("stats.time", locale = locale).into_owned(),
                self.stats.minutes.clone(),
                colors.fg(),
            ),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
