use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Environment variable holding the log filter, in `env_logger` syntax
pub const LOG_ENV: &str = "TYPIST_LOG";

/// Route the `log` facade into an append-only file.
///
/// Raw mode owns stdout/stderr, so nothing may be written to the terminal.
/// Without `TYPIST_LOG` only warnings and errors are kept.
pub fn init(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_env(env_logger::Env::new().filter(LOG_ENV))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;

    log::info!("logging to {}", path.display());
    Ok(())
}
