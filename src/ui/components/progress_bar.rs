use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// One-row horizontal bar with a centred label.
pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: impl Into<String>, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.into(),
            ratio: if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 },
            theme,
        }
    }

    pub fn filled_width(&self, width: u16) -> u16 {
        (self.ratio * f64::from(width)).round() as u16
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let filled = self.filled_width(area.width);

        for x in area.x..area.x + area.width {
            let style = if x < area.x + filled {
                Style::default().fg(colors.header_fg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, area.y)].set_style(style);
        }

        let label_width = self.label.chars().count() as u16;
        if label_width <= area.width {
            let label_x = area.x + (area.width - label_width) / 2;
            // Keep the per-cell background, only write the glyphs.
            for (i, ch) in self.label.chars().enumerate() {
                buf[(label_x + i as u16, area.y)].set_char(ch);
            }
        }
    }
}
