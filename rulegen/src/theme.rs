//! Colour theme and its persisted preference.

use std::fmt;

use env_config::{PrefsError, PrefsStore};

/// Preference key under which the theme is stored.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Parses a stored preference. Only exactly `"light"` is `Light`; anything else is `Dark`.
    pub fn from_pref(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the persisted theme. An unreadable store is logged and treated as unset.
pub fn load_theme(store: &PrefsStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(value) => Theme::from_pref(value.as_deref()),
        Err(e) => {
            tracing::warn!(path = %store.path().display(), error = %e, "could not read theme preference");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &PrefsStore, theme: Theme) -> Result<(), PrefsError> {
    store.set(THEME_KEY, theme.as_str())?;
    tracing::debug!(theme = theme.as_str(), "theme preference saved");
    Ok(())
}
