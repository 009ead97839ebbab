use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::api::LeitnerApi;
use crate::event::AppEvent;
use crate::session::{Command, Outcome};

/// Run one network command to completion. `Redirect` is not a network
/// command and yields `None`.
pub fn execute(api: &dyn LeitnerApi, command: &Command) -> Option<Outcome> {
    let outcome = match command {
        Command::FetchNext { deck } => Outcome::Fetched(api.next_card(deck.as_deref())),
        Command::Submit { card_id, correct } => Outcome::Submitted {
            card_id: card_id.clone(),
            correct: *correct,
            result: api.answer(card_id, *correct),
        },
        Command::RefreshSummary { deck } => Outcome::Summary {
            deck: deck.clone(),
            result: api.summary(deck.as_deref()),
        },
        Command::Sync => Outcome::Synced(api.sync()),
        Command::Redirect { .. } => return None,
    };
    Some(outcome)
}

/// Runs each command on its own short-lived thread and posts the outcome
/// back to the event loop. The UI thread stays the only writer of session
/// state; the controller guarantees at most one fetch or submit in flight.
pub struct Dispatcher {
    api: Arc<dyn LeitnerApi>,
    tx: Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn LeitnerApi>, tx: Sender<AppEvent>) -> Self {
        Self { api, tx }
    }

    pub fn dispatch(&self, command: Command) {
        if !command.is_network() {
            return;
        }
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let job = command.clone();
        let spawned = thread::Builder::new()
            .name("cajas-net".to_string())
            .spawn(move || run(api.as_ref(), &job, &tx));
        if let Err(e) = spawned {
            // Never leave the controller waiting on a request that was never sent.
            log::error!("could not spawn network worker, running inline: {e}");
            run(self.api.as_ref(), &command, &self.tx);
        }
    }
}

fn run(api: &dyn LeitnerApi, command: &Command, tx: &Sender<AppEvent>) {
    log::debug!("running {command:?}");
    if let Some(outcome) = execute(api, command) {
        // The receiver is gone only when the app is shutting down.
        let _ = tx.send(AppEvent::Net(outcome));
    }
}
