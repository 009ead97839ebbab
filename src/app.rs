use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::input::{self, Action, Focus, KeyboardRouter};
use crate::session::{Command, ControllerSettings, Outcome, SessionController};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;
use crate::ui::view::SessionView;

/// Host for the study screen. Owns the controller and turns key presses,
/// ticks and finished requests into network commands for the event loop.
pub struct App {
    pub controller: SessionController,
    pub router: KeyboardRouter,
    pub config: Config,
    pub theme: Theme,
    pub deck_input: Option<LineInput>,
    pub should_quit: bool,
    outbox: Vec<Command>,
    redirected_to: Option<String>,
}

impl App {
    pub fn new(config: Config, theme: Theme, now: Instant) -> Self {
        let settings = ControllerSettings::from_config(&config);
        Self {
            controller: SessionController::new(settings, now),
            router: KeyboardRouter::new(config.sync_enabled),
            config,
            theme,
            deck_input: None,
            should_quit: false,
            outbox: Vec::new(),
            redirected_to: None,
        }
    }

    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    pub fn focus(&self) -> Focus {
        if self.deck_input.is_some() {
            Focus::TextInput
        } else {
            Focus::Study
        }
    }

    pub fn view(&self, now: Instant) -> SessionView {
        SessionView::build(&self.controller, self.locale(), now)
    }

    /// Login URL the session was sent to after it expired, if any.
    pub fn redirected_to(&self) -> Option<&str> {
        self.redirected_to.as_deref()
    }

    pub fn start(&mut self) {
        let commands = self.controller.start();
        self.queue(commands);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        let focus = self.focus();
        if let Some(action) = self.router.route(&key, focus) {
            self.on_action(action);
            return;
        }
        if focus == Focus::TextInput {
            self.on_deck_input_key(key, now);
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        let commands = self.controller.tick(now);
        self.queue(commands);
    }

    pub fn on_net(&mut self, outcome: Outcome, now: Instant) {
        let commands = self.controller.handle(outcome, now);
        self.queue(commands);
    }

    /// Network commands waiting to be dispatched.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    fn on_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::EditDeck => {
                let current = self.controller.deck().unwrap_or_default().to_string();
                let candidates = self.controller.known_decks().map(str::to_string).collect();
                self.deck_input = Some(LineInput::new(&current, candidates));
            }
            other => {
                let commands = input::apply(&mut self.controller, other);
                self.queue(commands);
            }
        }
    }

    fn on_deck_input_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(field) = self.deck_input.as_mut() else {
            return;
        };
        match field.handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.deck_input = None,
            InputResult::Submit => {
                let value = field.value().to_string();
                self.deck_input = None;
                let commands = self.controller.set_deck(Some(&value), now);
                self.queue(commands);
            }
        }
    }

    fn queue(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Redirect { url } => self.redirect(url),
                other => self.outbox.push(other),
            }
        }
    }

    fn redirect(&mut self, url: String) {
        log::warn!("session expired, login required at {url}");
        if self.config.open_login {
            if let Err(e) = open::that(&url) {
                log::error!("could not open {url}: {e}");
            }
        }
        self.deck_input = None;
        self.redirected_to = Some(url);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::api::{ApiError, Card, DueCard, ReviewState};
    use crate::session::SessionPhase;

    fn app() -> App {
        let config = Config {
            open_login: false,
            ..Config::default()
        };
        App::new(config, Theme::default(), Instant::now())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn due(id: &str) -> DueCard {
        DueCard {
            card: Card {
                id: id.to_string(),
                question: "Q".to_string(),
                answer: "A".to_string(),
                box_no: 1,
                deck: None,
            },
            state: ReviewState::default(),
        }
    }

    #[test]
    fn start_queues_summary_and_first_fetch() {
        let mut app = app();
        app.start();
        assert_eq!(
            app.take_commands(),
            vec![
                Command::RefreshSummary { deck: None },
                Command::FetchNext { deck: None }
            ]
        );
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn judging_queues_a_submit() {
        let mut app = app();
        app.start();
        app.take_commands();
        app.on_net(Outcome::Fetched(Ok(Some(due("c1")))), Instant::now());
        app.on_key(press(KeyCode::Char('c')), Instant::now());
        assert_eq!(
            app.take_commands(),
            vec![Command::Submit {
                card_id: "c1".to_string(),
                correct: true
            }]
        );
    }

    #[test]
    fn deck_popup_captures_keys_until_submitted() {
        let mut app = app();
        app.start();
        app.take_commands();
        app.on_net(Outcome::Fetched(Ok(Some(due("c1")))), Instant::now());

        app.on_key(press(KeyCode::Char('d')), Instant::now());
        assert_eq!(app.focus(), Focus::TextInput);
        for ch in "rcp".chars() {
            app.on_key(press(KeyCode::Char(ch)), Instant::now());
        }
        // 'c' went into the field, not to the judge shortcut.
        assert!(app.take_commands().is_empty());
        assert_eq!(app.controller.phase(), SessionPhase::ShowingQuestion);

        app.on_key(press(KeyCode::Enter), Instant::now());
        assert_eq!(app.focus(), Focus::Study);
        assert_eq!(app.controller.deck(), Some("rcp"));
        assert_eq!(
            app.take_commands(),
            vec![
                Command::RefreshSummary {
                    deck: Some("rcp".to_string())
                },
                Command::FetchNext {
                    deck: Some("rcp".to_string())
                }
            ]
        );
    }

    #[test]
    fn escape_closes_deck_popup_without_changes() {
        let mut app = app();
        app.on_key(press(KeyCode::Char('d')), Instant::now());
        app.on_key(press(KeyCode::Char('z')), Instant::now());
        app.on_key(press(KeyCode::Esc), Instant::now());
        assert!(app.deck_input.is_none());
        assert_eq!(app.controller.deck(), None);
    }

    #[test]
    fn unauthorized_redirects_instead_of_queueing() {
        let mut app = app();
        app.start();
        app.take_commands();
        app.on_net(Outcome::Fetched(Err(ApiError::Unauthorized)), Instant::now());
        assert!(app.take_commands().is_empty());
        assert_eq!(app.redirected_to(), Some("http://localhost:5000/login"));
        assert_eq!(app.controller.phase(), SessionPhase::Expired);
    }

    #[test]
    fn quit_keys() {
        let mut study = app();
        study.on_key(press(KeyCode::Char('q')), Instant::now());
        assert!(study.should_quit);

        let mut typing = app();
        typing.on_key(press(KeyCode::Char('d')), Instant::now());
        typing.on_key(press(KeyCode::Char('q')), Instant::now());
        assert!(!typing.should_quit);
        typing.on_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(typing.should_quit);
    }
}
