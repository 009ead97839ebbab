use std::time::Instant;

use chrono::Local;
use rust_i18n::t;

use crate::api::{BoxCount, DueCard};
use crate::session::notify::{Notice, Severity};
use crate::session::summary::{due_percent, interval_days};
use crate::session::{EmptyReason, SessionController, SessionPhase};

/// What the main panel shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    Loading,
    Card(CardView),
    Empty { message: String, hint: String, unavailable: bool },
    Expired { title: String, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub question: String,
    /// `None` while the answer is hidden.
    pub answer: Option<String>,
    pub toggle_label: String,
    pub submitting: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsView {
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: u32,
    pub minutes: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoxRow {
    pub label: String,
    pub interval: String,
    pub due: u32,
    pub total: u32,
    pub ratio: f64,
    pub due_label: String,
}

/// Display projection of a [`SessionController`]. Widgets render from this
/// and never look at the controller directly.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionView {
    pub panel: Panel,
    pub judgement_enabled: bool,
    pub box_label: String,
    pub next_review: String,
    pub deck_label: String,
    pub stats: StatsView,
    pub boxes: Vec<BoxRow>,
    pub due_total: String,
    pub toasts: Vec<(Severity, String)>,
    pub feedback: Option<(bool, String)>,
    pub hints: Vec<String>,
}

impl SessionView {
    pub fn build(controller: &SessionController, locale: &str, now: Instant) -> Self {
        let phase = controller.phase();
        let current = controller.current();

        let panel = match phase {
            SessionPhase::Loading => Panel::Loading,
            SessionPhase::Empty(reason) => {
                let message = match reason {
                    EmptyReason::NothingDue => t!("study.empty", locale = locale),
                    EmptyReason::Unavailable => t!("study.unavailable", locale = locale),
                };
                Panel::Empty {
                    message: message.into_owned(),
                    hint: t!("study.retry", locale = locale).into_owned(),
                    unavailable: reason == EmptyReason::Unavailable,
                }
            }
            SessionPhase::Expired => Panel::Expired {
                title: t!("study.expired_title", locale = locale).into_owned(),
                message: t!("study.expired_body", locale = locale, url = controller.login_url())
                    .into_owned(),
            },
            SessionPhase::ShowingQuestion
            | SessionPhase::ShowingAnswer
            | SessionPhase::Submitting { .. } => match current {
                Some(due) => Panel::Card(card_view(due, phase, locale)),
                None => Panel::Loading,
            },
        };

        let (box_label, next_review) = match (phase, current) {
            (SessionPhase::Empty(_) | SessionPhase::Expired, _) | (_, None) => (
                t!("study.no_box", locale = locale).into_owned(),
                t!("study.no_box", locale = locale).into_owned(),
            ),
            (_, Some(due)) => (box_label(due.card.box_no, locale), next_review_label(due)),
        };

        let deck = controller
            .deck()
            .map(str::to_string)
            .unwrap_or_else(|| t!("study.deck_all", locale = locale).into_owned());

        let stats = controller.stats();
        let summary = controller.summary();

        Self {
            panel,
            judgement_enabled: controller.judgement_enabled(),
            box_label,
            next_review,
            deck_label: t!("study.deck", locale = locale, deck = deck).into_owned(),
            stats: StatsView {
                correct: stats.correct(),
                incorrect: stats.incorrect(),
                accuracy: stats.accuracy_percent(),
                minutes: t!("stats.minutes", locale = locale, n = stats.elapsed_minutes(now))
                    .into_owned(),
            },
            boxes: summary
                .rows()
                .iter()
                .map(|count| box_row(count, locale))
                .collect(),
            due_total: t!("boxes.due_total", locale = locale, n = summary.due_total())
                .into_owned(),
            toasts: controller
                .notifications()
                .visible()
                .iter()
                .map(|toast| (toast.notice.severity(), notice_text(&toast.notice, locale)))
                .collect(),
            feedback: controller.feedback().map(|f| {
                let key = if f.correct {
                    t!("study.correct_feedback", locale = locale)
                } else {
                    t!("study.incorrect_feedback", locale = locale)
                };
                (f.correct, key.into_owned())
            }),
            hints: hints(controller, locale),
        }
    }

    pub fn answer_visible(&self) -> bool {
        matches!(&self.panel, Panel::Card(card) if card.answer.is_some())
    }
}

pub fn box_label(box_no: u8, locale: &str) -> String {
    t!("study.box_label", locale = locale, n = box_no).into_owned()
}

fn card_view(due: &DueCard, phase: SessionPhase, locale: &str) -> CardView {
    let revealed = match phase {
        SessionPhase::Submitting { revealed, .. } => revealed,
        other => other.answer_visible(),
    };
    let question = if due.card.question.is_empty() {
        t!("study.no_question", locale = locale).into_owned()
    } else {
        due.card.question.clone()
    };
    let answer = revealed.then(|| {
        if due.card.answer.is_empty() {
            t!("study.no_answer", locale = locale).into_owned()
        } else {
            due.card.answer.clone()
        }
    });
    CardView {
        question,
        answer,
        toggle_label: toggle_label(revealed, locale),
        submitting: matches!(phase, SessionPhase::Submitting { .. }),
    }
}

fn toggle_label(revealed: bool, locale: &str) -> String {
    if revealed {
        t!("study.hide_answer", locale = locale).into_owned()
    } else {
        t!("study.show_answer", locale = locale).into_owned()
    }
}

/// `dd/mm/yy HH:MM` in local time, `—` when the server sent nothing usable.
fn next_review_label(due: &DueCard) -> String {
    due.state
        .next_review_at()
        .map(|at| at.with_timezone(&Local).format("%d/%m/%y %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn interval_label(box_no: u8, locale: &str) -> String {
    match interval_days(box_no) {
        Some(0) => t!("boxes.today", locale = locale).into_owned(),
        Some(1) => t!("boxes.one_day", locale = locale).into_owned(),
        Some(days) => t!("boxes.days", locale = locale, n = days).into_owned(),
        None => String::new(),
    }
}

fn box_row(count: &BoxCount, locale: &str) -> BoxRow {
    let percent = due_percent(count);
    BoxRow {
        label: box_label(count.id, locale),
        interval: interval_label(count.id, locale),
        due: count.due,
        total: count.total,
        ratio: f64::from(percent) / 100.0,
        due_label: t!("boxes.due_percent", locale = locale, p = percent).into_owned(),
    }
}

pub fn notice_text(notice: &Notice, locale: &str) -> String {
    match notice {
        Notice::ConnectionError => t!("notice.connection_error", locale = locale).into_owned(),
        Notice::AnswerRejected(detail) => {
            let base = t!("notice.answer_rejected", locale = locale);
            match detail {
                Some(detail) => format!("{base}: {detail}"),
                None => base.into_owned(),
            }
        }
        Notice::Synced(n) => t!("notice.synced", locale = locale, n = n).into_owned(),
        Notice::SyncFailed => t!("notice.sync_failed", locale = locale).into_owned(),
        Notice::DeckChanged(deck) => {
            let deck = deck
                .clone()
                .unwrap_or_else(|| t!("study.deck_all", locale = locale).into_owned());
            t!("notice.deck_changed", locale = locale, deck = deck).into_owned()
        }
    }
}

fn hints(controller: &SessionController, locale: &str) -> Vec<String> {
    let phase = controller.phase();
    if phase == SessionPhase::Expired {
        return vec![t!("study.expired_hint", locale = locale).into_owned()];
    }
    let mut hints = Vec::new();
    if matches!(phase, SessionPhase::ShowingQuestion | SessionPhase::ShowingAnswer) {
        let label = toggle_label(phase.answer_visible(), locale);
        hints.push(t!("hint.reveal", locale = locale, label = label).into_owned());
    }
    if controller.judgement_enabled() {
        hints.push(t!("hint.correct", locale = locale).into_owned());
        hints.push(t!("hint.incorrect", locale = locale).into_owned());
    }
    if !phase.is_busy() {
        hints.push(t!("hint.next", locale = locale).into_owned());
    }
    if phase.is_empty() {
        hints.push(t!("hint.retry", locale = locale).into_owned());
    }
    if controller.sync_enabled() && !controller.sync_in_flight() {
        hints.push(t!("hint.sync", locale = locale).into_owned());
    }
    hints.push(t!("hint.deck", locale = locale).into_owned());
    if !controller.notifications().is_empty() {
        hints.push(t!("hint.dismiss", locale = locale).into_owned());
    }
    hints.push(t!("hint.quit", locale = locale).into_owned());
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Card, ReviewState};
    use crate::session::{ControllerSettings, Outcome};

    fn loaded(box_no: u8) -> SessionController {
        let now = Instant::now();
        let mut c = SessionController::new(ControllerSettings::default(), now);
        c.start();
        c.handle(
            Outcome::Fetched(Ok(Some(DueCard {
                card: Card {
                    id: "c1".to_string(),
                    question: "Q1".to_string(),
                    answer: "A1".to_string(),
                    box_no,
                    deck: None,
                },
                state: ReviewState {
                    box_no: Some(box_no),
                    next_review_at: None,
                },
            }))),
            now,
        );
        c
    }

    #[test]
    fn card_view_hides_answer_until_revealed() {
        let mut c = loaded(2);
        let view = SessionView::build(&c, "es", Instant::now());
        assert_eq!(view.box_label, "Caja 2");
        assert_eq!(view.next_review, "—");
        assert!(!view.answer_visible());
        match &view.panel {
            Panel::Card(card) => {
                assert_eq!(card.question, "Q1");
                assert_eq!(card.toggle_label, "Mostrar respuesta");
            }
            other => panic!("unexpected panel {other:?}"),
        }

        c.toggle_reveal();
        let view = SessionView::build(&c, "es", Instant::now());
        match &view.panel {
            Panel::Card(card) => {
                assert_eq!(card.answer.as_deref(), Some("A1"));
                assert_eq!(card.toggle_label, "Ocultar respuesta");
            }
            other => panic!("unexpected panel {other:?}"),
        }
    }

    #[test]
    fn english_catalogue_is_available() {
        let c = loaded(4);
        let view = SessionView::build(&c, "en", Instant::now());
        assert_eq!(view.box_label, "Box 4");
    }

    #[test]
    fn empty_and_unavailable_panels_differ() {
        let now = Instant::now();
        let mut c = SessionController::new(ControllerSettings::default(), now);
        c.start();
        c.handle(Outcome::Fetched(Ok(None)), now);
        let view = SessionView::build(&c, "es", now);
        assert_eq!(
            view.panel,
            Panel::Empty {
                message: "No hay tarjetas pendientes".to_string(),
                hint: "Pulsa [r] para reintentar".to_string(),
                unavailable: false,
            }
        );
        assert!(view.toasts.is_empty());

        c.try_again();
        c.handle(Outcome::Fetched(Err(ApiError::Status(502))), now);
        let view = SessionView::build(&c, "es", now);
        assert!(matches!(view.panel, Panel::Empty { unavailable: true, .. }));
        assert_eq!(
            view.toasts,
            vec![(Severity::Error, "Error de conexión".to_string())]
        );
        assert!(!view.judgement_enabled);
    }

    #[test]
    fn board_rows_carry_interval_and_due_share() {
        let now = Instant::now();
        let mut c = SessionController::new(ControllerSettings::default(), now);
        c.handle(
            Outcome::Summary {
                deck: None,
                result: Ok(vec![
                    BoxCount { id: 1, due: 1, total: 4 },
                    BoxCount { id: 3, due: 2, total: 2 },
                ]),
            },
            now,
        );
        let view = SessionView::build(&c, "es", now);
        assert_eq!(view.boxes.len(), 6);
        assert_eq!(view.boxes[0].interval, "hoy");
        assert_eq!(view.boxes[0].due_label, "25% vencidas");
        assert_eq!(view.boxes[1].interval, "1 día");
        assert_eq!(view.boxes[2].interval, "3 días");
        assert_eq!(view.boxes[2].due_label, "100% vencidas");
        assert_eq!(view.due_total, "Pendientes: 3");
    }

    #[test]
    fn expired_view_points_at_login() {
        let now = Instant::now();
        let mut c = SessionController::new(ControllerSettings::default(), now);
        c.start();
        c.handle(Outcome::Fetched(Err(ApiError::Unauthorized)), now);
        let view = SessionView::build(&c, "es", now);
        match view.panel {
            Panel::Expired { message, .. } => {
                assert!(message.contains("http://localhost:5000/login"))
            }
            other => panic!("unexpected panel {other:?}"),
        }
        assert_eq!(view.hints, vec!["[q] Salir".to_string()]);
    }

    #[test]
    fn notices_are_localised() {
        assert_eq!(notice_text(&Notice::Synced(5), "es"), "Sincronizadas 5 tarjetas");
        assert_eq!(notice_text(&Notice::SyncFailed, "en"), "Sync failed");
        assert_eq!(
            notice_text(&Notice::AnswerRejected(Some("Carta no encontrada".into())), "es"),
            "La respuesta no fue aceptada: Carta no encontrada"
        );
    }
}
