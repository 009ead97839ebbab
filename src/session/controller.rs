use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::api::{AnswerReply, ApiError, BoxCount, DueCard};
use crate::config::Config;
use crate::session::notify::{Feedback, Notice, Notifications};
use crate::session::phase::{EmptyReason, SessionPhase};
use crate::session::stats::SessionStats;
use crate::session::summary::BoxSummary;

/// Work the controller asks its host to perform. The controller itself
/// never touches the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchNext { deck: Option<String> },
    Submit { card_id: String, correct: bool },
    RefreshSummary { deck: Option<String> },
    Sync,
    /// Leave the study screen for the login entry point.
    Redirect { url: String },
}

impl Command {
    pub fn is_network(&self) -> bool {
        !matches!(self, Command::Redirect { .. })
    }
}

/// A finished network call, fed back through [`SessionController::handle`].
#[derive(Debug)]
pub enum Outcome {
    Fetched(Result<Option<DueCard>, ApiError>),
    Submitted {
        card_id: String,
        correct: bool,
        result: Result<AnswerReply, ApiError>,
    },
    /// Box counters, tagged with the deck filter they were requested for.
    Summary {
        deck: Option<String>,
        result: Result<Vec<BoxCount>, ApiError>,
    },
    Synced(Result<u32, ApiError>),
}

impl Outcome {
    fn is_unauthorized(&self) -> bool {
        match self {
            Outcome::Fetched(Err(e)) | Outcome::Synced(Err(e)) => e.is_unauthorized(),
            Outcome::Summary { result: Err(e), .. } => e.is_unauthorized(),
            Outcome::Submitted { result: Err(e), .. } => e.is_unauthorized(),
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Outcome::Fetched(_) => "fetch",
            Outcome::Submitted { .. } => "submit",
            Outcome::Summary { .. } => "summary",
            Outcome::Synced(_) => "sync",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ControllerSettings {
    pub summary_interval: Duration,
    pub notification_ttl: Duration,
    pub feedback_ttl: Duration,
    pub sync_enabled: bool,
    pub login_url: String,
    pub deck: Option<String>,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            summary_interval: config.summary_interval(),
            notification_ttl: config.notification_ttl(),
            feedback_ttl: config.feedback_ttl(),
            sync_enabled: config.sync_enabled,
            login_url: config.login_url(),
            deck: normalize_deck(config.deck.as_deref()),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn normalize_deck(deck: Option<&str>) -> Option<String> {
    deck.map(|d| d.trim().to_lowercase()).filter(|d| !d.is_empty())
}

/// State machine for one study session.
///
/// Exactly one instance exists per process; the keyboard router and the
/// renderer borrow it. Every mutating method returns the commands that must
/// be executed next, and every finished command comes back as an [`Outcome`].
pub struct SessionController {
    phase: SessionPhase,
    current: Option<DueCard>,
    stats: SessionStats,
    summary: BoxSummary,
    notifications: Notifications,
    feedback: Option<Feedback>,
    deck: Option<String>,
    known_decks: BTreeSet<String>,
    settings: ControllerSettings,
    next_summary_at: Instant,
    sync_in_flight: bool,
}

impl SessionController {
    pub fn new(settings: ControllerSettings, now: Instant) -> Self {
        Self {
            phase: SessionPhase::Loading,
            current: None,
            stats: SessionStats::new(now),
            summary: BoxSummary::default(),
            notifications: Notifications::new(settings.notification_ttl),
            feedback: None,
            deck: settings.deck.clone(),
            known_decks: settings.deck.iter().cloned().collect(),
            next_summary_at: now + settings.summary_interval,
            settings,
            sync_in_flight: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&DueCard> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn summary(&self) -> &BoxSummary {
        &self.summary
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn deck(&self) -> Option<&str> {
        self.deck.as_deref()
    }

    pub fn known_decks(&self) -> impl Iterator<Item = &str> {
        self.known_decks.iter().map(String::as_str)
    }

    pub fn sync_enabled(&self) -> bool {
        self.settings.sync_enabled
    }

    pub fn sync_in_flight(&self) -> bool {
        self.sync_in_flight
    }

    pub fn judgement_enabled(&self) -> bool {
        self.phase.judgement_enabled()
    }

    pub fn login_url(&self) -> &str {
        &self.settings.login_url
    }

    /// Kick off the session: load the first card and the box counters.
    pub fn start(&mut self) -> Vec<Command> {
        if self.phase == SessionPhase::Expired {
            return Vec::new();
        }
        log::info!("starting study session (deck: {:?})", self.deck);
        let mut commands = vec![self.summary_command()];
        commands.extend(self.begin_fetch());
        commands
    }

    /// Show or hide the answer of the current card.
    pub fn toggle_reveal(&mut self) -> bool {
        self.phase = match self.phase {
            SessionPhase::ShowingQuestion => SessionPhase::ShowingAnswer,
            SessionPhase::ShowingAnswer => SessionPhase::ShowingQuestion,
            _ => return false,
        };
        true
    }

    pub fn judge(&mut self, correct: bool) -> Vec<Command> {
        if !self.phase.judgement_enabled() {
            log::debug!("judgement ignored in phase {}", self.phase.as_str());
            return Vec::new();
        }
        let Some(due) = &self.current else {
            return Vec::new();
        };
        let card_id = due.card.id.clone();
        self.phase = SessionPhase::Submitting {
            correct,
            revealed: self.phase.answer_visible(),
        };
        vec![Command::Submit { card_id, correct }]
    }

    /// Skip to the next due card without judging the current one.
    pub fn advance(&mut self) -> Vec<Command> {
        match self.phase {
            SessionPhase::Empty(_)
            | SessionPhase::ShowingQuestion
            | SessionPhase::ShowingAnswer => self.begin_fetch(),
            _ => Vec::new(),
        }
    }

    /// Retry from the empty panel.
    pub fn try_again(&mut self) -> Vec<Command> {
        if self.phase.is_empty() {
            self.begin_fetch()
        } else {
            Vec::new()
        }
    }

    pub fn sync(&mut self) -> Vec<Command> {
        if self.phase == SessionPhase::Expired || !self.settings.sync_enabled || self.sync_in_flight
        {
            return Vec::new();
        }
        self.sync_in_flight = true;
        vec![Command::Sync]
    }

    pub fn set_deck(&mut self, deck: Option<&str>, now: Instant) -> Vec<Command> {
        let deck = normalize_deck(deck);
        if self.phase == SessionPhase::Expired || deck == self.deck {
            return Vec::new();
        }
        log::info!("deck filter changed to {deck:?}");
        if let Some(d) = &deck {
            self.known_decks.insert(d.clone());
        }
        self.deck = deck;
        self.notifications
            .push(Notice::DeckChanged(self.deck.clone()), now);
        let mut commands = vec![self.summary_command()];
        if !self.phase.is_busy() {
            commands.extend(self.begin_fetch());
        }
        commands
    }

    pub fn dismiss_notification(&mut self) -> bool {
        self.notifications.dismiss()
    }

    /// Periodic housekeeping: expire toasts and schedule the summary refresh.
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        if self.phase == SessionPhase::Expired {
            return Vec::new();
        }
        self.notifications.expire(now);
        if self.feedback.is_some_and(|f| f.until <= now) {
            self.feedback = None;
        }
        if now >= self.next_summary_at {
            self.next_summary_at = now + self.settings.summary_interval;
            return vec![self.summary_command()];
        }
        Vec::new()
    }

    pub fn handle(&mut self, outcome: Outcome, now: Instant) -> Vec<Command> {
        if self.phase == SessionPhase::Expired {
            log::debug!("dropping {} result after session expiry", outcome.kind());
            return Vec::new();
        }
        if outcome.is_unauthorized() {
            return self.expire();
        }
        match outcome {
            Outcome::Fetched(result) => self.on_fetched(result, now),
            Outcome::Submitted {
                card_id,
                correct,
                result,
            } => self.on_submitted(&card_id, correct, result, now),
            Outcome::Summary { deck, result } => {
                if deck != self.deck {
                    log::debug!("dropping box summary for deck {deck:?}");
                    return Vec::new();
                }
                match result {
                    Ok(boxes) => self.summary.replace(boxes),
                    // Counters keep their last good values; no toast.
                    Err(e) => log::warn!("box summary refresh failed: {e}"),
                }
                Vec::new()
            }
            Outcome::Synced(result) => self.on_synced(result, now),
        }
    }

    fn on_fetched(
        &mut self,
        result: Result<Option<DueCard>, ApiError>,
        now: Instant,
    ) -> Vec<Command> {
        if self.phase != SessionPhase::Loading {
            log::debug!("stale fetch result in phase {}", self.phase.as_str());
            return Vec::new();
        }
        match result {
            Ok(Some(due)) => self.adopt(due),
            Ok(None) => {
                self.current = None;
                self.phase = SessionPhase::Empty(EmptyReason::NothingDue);
            }
            Err(e) => {
                log::warn!("fetching next card failed: {e}");
                self.current = None;
                self.phase = SessionPhase::Empty(EmptyReason::Unavailable);
                self.notifications.push(Notice::ConnectionError, now);
            }
        }
        Vec::new()
    }

    fn on_submitted(
        &mut self,
        card_id: &str,
        correct: bool,
        result: Result<AnswerReply, ApiError>,
        now: Instant,
    ) -> Vec<Command> {
        let SessionPhase::Submitting {
            correct: pending,
            revealed,
        } = self.phase
        else {
            log::debug!("stale submit result in phase {}", self.phase.as_str());
            return Vec::new();
        };
        let is_current = self
            .current
            .as_ref()
            .is_some_and(|due| due.card.id == card_id);
        if !is_current || pending != correct {
            log::debug!("submit result for {card_id} does not match the pending judgement");
            return Vec::new();
        }

        match result {
            Ok(reply) if reply.accepted => {
                log::info!(
                    "card {card_id} judged {} (now in box {:?})",
                    if correct { "correct" } else { "incorrect" },
                    reply.new_box
                );
                self.stats.record(correct);
                self.feedback = Some(Feedback {
                    correct,
                    until: now + self.settings.feedback_ttl,
                });
                let mut commands = vec![self.summary_command()];
                match reply.next {
                    Some(due) => self.adopt(due),
                    None => commands.extend(self.begin_fetch()),
                }
                commands
            }
            Ok(reply) => {
                log::warn!("server rejected judgement for {card_id}: {:?}", reply.detail);
                self.restore(revealed);
                self.notifications
                    .push(Notice::AnswerRejected(reply.detail), now);
                Vec::new()
            }
            Err(e) => {
                log::warn!("submitting judgement for {card_id} failed: {e}");
                self.restore(revealed);
                self.notifications.push(Notice::ConnectionError, now);
                Vec::new()
            }
        }
    }

    fn on_synced(&mut self, result: Result<u32, ApiError>, now: Instant) -> Vec<Command> {
        self.sync_in_flight = false;
        match result {
            Ok(count) => {
                log::info!("synced {count} external cards");
                self.notifications.push(Notice::Synced(count), now);
                let mut commands = vec![self.summary_command()];
                if !self.phase.is_busy() {
                    commands.extend(self.begin_fetch());
                }
                commands
            }
            Err(e) => {
                log::warn!("sync failed: {e}");
                self.notifications.push(Notice::SyncFailed, now);
                Vec::new()
            }
        }
    }

    fn adopt(&mut self, due: DueCard) {
        if let Some(deck) = &due.card.deck {
            self.known_decks.insert(deck.to_lowercase());
        }
        self.current = Some(due);
        self.phase = SessionPhase::ShowingQuestion;
    }

    fn restore(&mut self, revealed: bool) {
        self.phase = if revealed {
            SessionPhase::ShowingAnswer
        } else {
            SessionPhase::ShowingQuestion
        };
    }

    fn begin_fetch(&mut self) -> Vec<Command> {
        self.phase = SessionPhase::Loading;
        vec![Command::FetchNext {
            deck: self.deck.clone(),
        }]
    }

    fn summary_command(&self) -> Command {
        Command::RefreshSummary {
            deck: self.deck.clone(),
        }
    }

    fn expire(&mut self) -> Vec<Command> {
        log::warn!("session is no longer authenticated; redirecting to login");
        self.phase = SessionPhase::Expired;
        self.current = None;
        self.feedback = None;
        self.sync_in_flight = false;
        vec![Command::Redirect {
            url: self.settings.login_url.clone(),
        }]
    }
}
