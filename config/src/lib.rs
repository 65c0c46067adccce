//! Configuration for rulegen.
//!
//! Two concerns live here:
//! - [`load_and_apply`]: read `$XDG_CONFIG_HOME/<app>/config.toml` (`[env]` table) and a project
//!   `.env`, then fill in process environment variables that are not already set. Priority is
//!   **existing env > .env > XDG**.
//! - [`PrefsStore`]: a tiny TOML file (`prefs.toml`, next to `config.toml`) holding UI preferences
//!   such as the theme.

mod dotenv;
mod prefs;
mod xdg_toml;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use prefs::{PrefsError, PrefsStore};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Returns `$XDG_CONFIG_HOME/<app_name>`; the directory may not exist yet.
pub fn app_config_dir(app_name: &str) -> Result<PathBuf, LoadError> {
    xdg_toml::app_dir(app_name)
}

/// Applies `.env` and XDG `[env]` values to the process environment, never overriding keys that
/// are already set.
///
/// * `app_name`: e.g. `"rulegen"`; selects `~/.config/<app_name>/config.toml`.
/// * `override_dir`: look for `.env` here instead of the current directory.
///
/// Returns the keys that were newly set, sorted.
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<String>, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut merged = xdg_map;
    merged.extend(dotenv_map);

    let mut applied = Vec::new();
    for (key, value) in merged {
        if std::env::var_os(&key).is_some() {
            continue;
        }
        std::env::set_var(&key, value);
        applied.push(key);
    }
    applied.sort();
    Ok(applied)
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
