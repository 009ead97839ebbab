use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::ui::layout::centered_rect;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Popup for typing a deck filter.
pub struct DeckInputPopup<'a> {
    input: &'a LineInput,
    locale: &'a str,
    theme: &'a Theme,
}

impl<'a> DeckInputPopup<'a> {
    pub fn new(input: &'a LineInput, locale: &'a str, theme: &'a Theme) -> Self {
        Self {
            input,
            locale,
            theme,
        }
    }
}

impl Widget for DeckInputPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(50, 30, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(Line::from(format!(
                " {} ",
                t!("deck_input.title", locale = self.locale)
            )))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let (before, cursor, after) = self.input.render_parts();
        let cursor_style = Style::default()
            .fg(colors.bg())
            .bg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(" > ", Style::default().fg(colors.accent())),
                Span::styled(before, Style::default().fg(colors.fg())),
                Span::styled(cursor_text, cursor_style),
                Span::styled(after, Style::default().fg(colors.fg())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                t!("deck_input.hint", locale = self.locale).into_owned(),
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_current_text() {
        let theme = Theme::default();
        let input = LineInput::new("rescate", Vec::new());
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DeckInputPopup::new(&input, "es", &theme).render(area, &mut buf);
        let all: String = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(all.contains("Filtrar por mazo"));
        assert!(all.contains("> rescate"));
    }
}
