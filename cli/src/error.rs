//! Errors surfaced by the command-line front ends.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("example {number} does not exist (choose 1-{max})")]
    ExampleOutOfRange { number: usize, max: usize },
    #[error("cannot read context file {}: {source}", path.display())]
    ContextFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("theme preference: {0}")]
    Prefs(#[from] config::PrefsError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
