use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use crate::app::App;
use crate::ui::components::box_board::BoxBoard;
use crate::ui::components::card_panel::CardPanel;
use crate::ui::components::deck_input::DeckInputPopup;
use crate::ui::components::stats_panel::{StatsPanel, header_summary};
use crate::ui::components::toast::ToastStack;
use crate::ui::layout::{StudyLayout, pack_hint_lines};
use crate::ui::view::{Panel, SessionView};

/// Draw the whole study screen for the current frame.
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let locale = app.locale();
    let view = app.view(now);

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let hint_lines = pack_hint_lines(&view.hints, area.width as usize);
    let layout = StudyLayout::new(area, hint_lines.len() as u16);

    render_header(frame, app, &view, layout.header, !layout.tier.show_sidebar());

    let title = match &view.panel {
        Panel::Card(_) => view.box_label.clone(),
        _ => t!("study.title", locale = locale).into_owned(),
    };
    let status = match &view.panel {
        Panel::Card(card) if card.submitting => t!("study.submitting", locale = locale),
        _ => t!("study.loading", locale = locale),
    };
    frame.render_widget(
        CardPanel::new(&view.panel, &title, &app.theme)
            .status(&status)
            .feedback(view.feedback.as_ref()),
        layout.card,
    );

    if let Some(board) = layout.board {
        let board_title = t!("boxes.title", locale = locale);
        frame.render_widget(
            BoxBoard::new(&view.boxes, &board_title, &view.due_total, &app.theme),
            board,
        );
    }
    if let Some(stats) = layout.stats {
        frame.render_widget(StatsPanel::new(&view.stats, locale, &app.theme), stats);
    }

    let footer: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);

    if !view.toasts.is_empty() {
        let below_header = Rect::new(
            area.x,
            layout.card.y,
            area.width,
            area.height.saturating_sub(layout.card.y - area.y),
        );
        frame.render_widget(ToastStack::new(&view.toasts, &app.theme), below_header);
    }

    if let Some(input) = &app.deck_input {
        frame.render_widget(DeckInputPopup::new(input, locale, &app.theme), area);
    }
}

fn render_header(frame: &mut Frame, app: &App, view: &SessionView, area: Rect, compact: bool) {
    let colors = &app.theme.colors;
    let locale = app.locale();
    let base = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

    let mut spans = vec![
        Span::styled(
            format!(" {} ", t!("study.title", locale = locale)),
            base.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("| {} ", view.deck_label), base),
        Span::styled(
            format!(
                "| {}: {} ",
                t!("study.next_review", locale = locale),
                view.next_review
            ),
            base,
        ),
    ];
    if compact {
        spans.push(Span::styled(
            format!("| {} ", header_summary(&view.stats, locale)),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg())),
        area,
    );
}
