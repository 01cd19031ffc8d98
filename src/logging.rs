use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing::Level;

fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

/// Logs go to a file while the TUI owns the terminal.
pub fn init_file(path: &Path, level: &str, json: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(path)?;

    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(parse_level(level))
        .with_thread_names(true)
        .with_writer(Mutex::new(file));

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

pub fn init_stderr(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}
