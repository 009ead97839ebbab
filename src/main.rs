use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use cajas::api::HttpApi;
use cajas::app::App;
use cajas::config::Config;
use cajas::event::{AppEvent, EventHandler};
use cajas::logging;
use cajas::net::Dispatcher;
use cajas::ui::render;
use cajas::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "cajas", version, about = "Terminal Leitner study client")]
struct Cli {
    #[arg(short, long, help = "Server base URL, e.g. http://localhost:5000")]
    server: Option<String>,

    #[arg(short, long, help = "Only study cards from this deck")]
    deck: Option<String>,

    #[arg(short, long, help = "Interface language (es, en)")]
    locale: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, env = "CAJAS_TOKEN", help = "Bearer token for the study API")]
    token: Option<String>,

    #[arg(long, help = "Disable the manual sync shortcut")]
    no_sync: bool,

    #[arg(long, help = "Write the effective configuration to the config file and exit")]
    write_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = logging::init().context("could not set up logging")?;

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("using default configuration: {e:#}");
        Config::default()
    });
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(deck) = cli.deck {
        config.deck = Some(deck);
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.token.is_some() {
        config.auth_token = cli.token;
    }
    if cli.no_sync {
        config.sync_enabled = false;
    }
    config.normalize();

    if cli.write_config {
        config.save()?;
        println!("Wrote {}", Config::config_path().display());
        return Ok(());
    }

    log::info!(
        "cajas {} against {} (log: {})",
        env!("CARGO_PKG_VERSION"),
        config.server_url,
        log_path.display()
    );

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!(
            "theme {:?} not found, using default (bundled: {})",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let api = HttpApi::from_config(&config).context("could not build HTTP client")?;

    let events = EventHandler::new(Duration::from_millis(100));
    let dispatcher = Dispatcher::new(Arc::new(api), events.sender());
    let mut app = App::new(config, theme, Instant::now());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events, &dispatcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(url) = app.redirected_to() {
        println!("Session expired. Log in again at {url}");
    }
    if let Err(err) = result {
        log::error!("exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    dispatcher: &Dispatcher,
) -> Result<()> {
    app.start();
    loop {
        for command in app.take_commands() {
            dispatcher.dispatch(command);
        }

        terminal.draw(|frame| render::draw(frame, app, Instant::now()))?;

        match events.next()? {
            AppEvent::Key(key) => app.on_key(key, Instant::now()),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::Net(outcome) => app.on_net(outcome, Instant::now()),
        }

        if app.should_quit {
            log::info!("quitting");
            return Ok(());
        }
    }
}
