mod actions;
mod app;
mod config;
mod error;
mod input;
mod model;
mod random;
mod render;
mod store;
mod timer;

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::{File, OpenOptions};
use std::path::Path;

fn main() -> Result<()> {
    let paths = config::project_paths()?;
    init_logging(&paths.log_path);
    app::run(paths)
}

/// The game owns the terminal, so log lines go to a file instead of stderr.
fn init_logging(path: &Path) {
    let file = match open_log(path) {
        Ok(f) => f,
        Err(e) => {
            // still on the normal screen here, so this line stays visible
            eprintln!("whackafrog: logging disabled: {:#}", e);
            return;
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .unwrap_or(());
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))
}
