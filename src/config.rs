//! Client configuration: optional TOML file, overridden by CLI flags.

use std::path::Path;

use serde::Deserialize;

use crate::cli::Args;
use crate::endpoint::DEFAULT_ORIGIN;
use crate::error::ChatError;
use crate::render::{locale_from_env, parse_locale, Clock, TimeStyle, DEFAULT_TIME_FORMAT};

/// On-disk configuration. Every key is optional.
///
/// ```toml
/// origin = "https://chat.example.com"
/// time_format = "%H:%M"
/// clock = "utc"
/// locale = "de_DE.UTF-8"
/// color = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Origin of the chat page; the socket endpoint is derived from it.
    pub origin: String,
    pub time_format: String,
    pub clock: Clock,
    /// Locale for the time column; `LC_ALL`/`LC_TIME`/`LANG` when unset.
    pub locale: Option<String>,
    pub color: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            clock: Clock::Local,
            locale: None,
            color: true,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self, ChatError> {
        let text = std::fs::read_to_string(path).map_err(|source| ChatError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ChatError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File values (or defaults when no file is given), then CLI overrides.
    pub fn resolve(args: &Args) -> Result<Self, ChatError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(origin) = &args.origin {
            self.origin = origin.clone();
        }
        if let Some(format) = &args.time_format {
            self.time_format = format.clone();
        }
        if let Some(locale) = &args.locale {
            self.locale = Some(locale.clone());
        }
        if args.utc {
            self.clock = Clock::Utc;
        }
        if args.no_color {
            self.color = false;
        }
    }

    pub fn time_style(&self) -> Result<TimeStyle, ChatError> {
        let locale = match &self.locale {
            Some(name) => parse_locale(name),
            None => locale_from_env(),
        };
        Ok(TimeStyle::new(self.time_format.clone(), self.clock)?.with_locale(locale))
    }
}
