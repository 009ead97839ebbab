use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::session::notify::Severity;
use crate::ui::theme::Theme;

const TOAST_WIDTH: u16 = 36;
const TOAST_HEIGHT: u16 = 3;

/// Stack of notices anchored to the top-right corner, newest at the bottom.
pub struct ToastStack<'a> {
    toasts: &'a [(Severity, String)],
    theme: &'a Theme,
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: &'a [(Severity, String)], theme: &'a Theme) -> Self {
        Self { toasts, theme }
    }

    /// Where each toast lands inside `area`. Toasts that do not fit are skipped.
    pub fn slots(&self, area: Rect) -> Vec<Rect> {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width - width;
        let fitting = (area.height / TOAST_HEIGHT) as usize;
        (0..self.toasts.len().min(fitting))
            .map(|i| Rect::new(x, area.y + i as u16 * TOAST_HEIGHT, width, TOAST_HEIGHT))
            .collect()
    }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let slots = self.slots(area);
        let skip = self.toasts.len() - slots.len();

        for ((severity, text), slot) in self.toasts.iter().skip(skip).zip(slots) {
            let color = match severity {
                Severity::Info => colors.accent(),
                Severity::Success => colors.success(),
                Severity::Error => colors.error(),
            };
            Clear.render(slot, buf);
            let block = Block::bordered()
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(colors.bg()));
            let inner = block.inner(slot);
            block.render(slot, buf);
            Paragraph::new(Line::from(Span::styled(
                text.as_str(),
                Style::default().fg(color),
            )))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_anchor_top_right() {
        let theme = Theme::default();
        let toasts = vec![(Severity::Info, "a".to_string()), (Severity::Error, "b".to_string())];
        let stack = ToastStack::new(&toasts, &theme);
        let slots = stack.slots(Rect::new(0, 0, 100, 20));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], Rect::new(64, 0, 36, 3));
        assert_eq!(slots[1].y, 3);
    }

    #[test]
    fn keeps_newest_when_short_on_room() {
        let theme = Theme::default();
        let toasts = vec![
            (Severity::Info, "old".to_string()),
            (Severity::Error, "new".to_string()),
        ];
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        ToastStack::new(&toasts, &theme).render(area, &mut buf);
        let row: String = (0..20).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("new"));
        assert!(!row.contains("old"));
    }
}
