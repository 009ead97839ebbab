pub mod controller;
pub mod notify;
pub mod phase;
pub mod stats;
pub mod summary;

pub use controller::{Command, ControllerSettings, Outcome, SessionController};
pub use phase::{EmptyReason, SessionPhase};
