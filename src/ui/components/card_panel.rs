use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::ui::view::{CardView, Panel};

/// Main study panel: the current card, or the loading/empty/expired states.
pub struct CardPanel<'a> {
    panel: &'a Panel,
    title: &'a str,
    status: Option<&'a str>,
    feedback: Option<&'a (bool, String)>,
    theme: &'a Theme,
}

impl<'a> CardPanel<'a> {
    pub fn new(panel: &'a Panel, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            panel,
            title,
            status: None,
            feedback: None,
            theme,
        }
    }

    /// Text shown for the loading state and while an answer is in flight.
    pub fn status(mut self, status: &'a str) -> Self {
        self.status = Some(status);
        self
    }

    pub fn feedback(mut self, feedback: Option<&'a (bool, String)>) -> Self {
        self.feedback = feedback;
        self
    }

    fn card_lines(&self, card: &'a CardView) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                card.question.as_str(),
                Style::default()
                    .fg(colors.question())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        match &card.answer {
            Some(answer) => {
                lines.push(Line::from(Span::styled(
                    "─".repeat(12),
                    Style::default().fg(colors.border()),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    answer.as_str(),
                    Style::default().fg(colors.answer()),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                format!("[ {} ]", card.toggle_label),
                Style::default().fg(colors.muted()),
            ))),
        }

        if card.submitting {
            if let Some(status) = self.status {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    status,
                    Style::default()
                        .fg(colors.muted())
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
        lines
    }

    fn feedback_line(&self) -> Option<Line<'a>> {
        let (correct, text) = self.feedback?;
        let colors = &self.theme.colors;
        let color = if *correct { colors.success() } else { colors.error() };
        Some(Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
    }
}

impl Widget for CardPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = match self.panel {
            Panel::Card(_) => colors.border_focused(),
            Panel::Expired { .. } => colors.error(),
            _ => colors.border(),
        };
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", self.title)))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = match self.panel {
            Panel::Loading => vec![
                Line::from(""),
                Line::from(Span::styled(
                    self.status.unwrap_or_default(),
                    Style::default().fg(colors.muted()),
                )),
            ],
            Panel::Card(card) => self.card_lines(card),
            Panel::Empty {
                message,
                hint,
                unavailable,
            } => {
                let color = if *unavailable {
                    colors.warning()
                } else {
                    colors.fg()
                };
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        message.as_str(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        hint.as_str(),
                        Style::default().fg(colors.muted()),
                    )),
                ]
            }
            Panel::Expired { title, message } => vec![
                Line::from(""),
                Line::from(Span::styled(
                    title.as_str(),
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(message.as_str(), Style::default().fg(colors.fg()))),
            ],
        };

        if let Some(line) = self.feedback_line() {
            lines.push(Line::from(""));
            lines.push(line);
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
