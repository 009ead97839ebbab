use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use env_logger::{Env, Target};

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cajas")
        .join("cajas.log")
}

/// Route `log` output to a file; the terminal belongs to the UI.
/// `RUST_LOG` selects the filter, `info` when unset.
pub fn init() -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(path)
}
