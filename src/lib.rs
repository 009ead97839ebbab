rust_i18n::i18n!("locales", fallback = "es");

pub mod api;
pub mod app;
pub mod config;
pub mod event;
pub mod input;
pub mod logging;
pub mod net;
pub mod session;
pub mod ui;
