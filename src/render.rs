//! Chat line rendering: timestamp to time-of-day, `user:` label, content.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Locale, Utc};
use serde::Deserialize;

use crate::envelope::ChatMessage;
use crate::error::ChatError;

/// Default strftime pattern: the locale's own time-of-day representation.
pub const DEFAULT_TIME_FORMAT: &str = "%X";

/// Shown when a timestamp is outside chrono's representable range.
///
/// chrono stops at year 262143 (about ±8.2e15 ms), short of the ±8.64e15 ms a
/// browser `Date` accepts, so timestamps in between render this too.
pub const INVALID_TIME: &str = "Invalid Date";

/// Locale environment variables, highest precedence first.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_TIME", "LANG"];

/// Which clock timestamps are displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

/// Parse a POSIX locale name such as `de_DE.UTF-8` or `sr_RS@latin`.
///
/// `C`, `POSIX`, empty and unknown names all map to [`Locale::POSIX`].
pub fn parse_locale(name: &str) -> Locale {
    let base = name.split(['.', '@']).next().unwrap_or_default();
    match base {
        "" | "C" | "POSIX" => Locale::POSIX,
        other => Locale::try_from(other).unwrap_or(Locale::POSIX),
    }
}

/// Locale for time formatting from `LC_ALL`, `LC_TIME`, then `LANG`.
pub fn locale_from_env() -> Locale {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(|value| parse_locale(&value))
        .unwrap_or(Locale::POSIX)
}

/// How the time-of-day column is produced.
#[derive(Debug, Clone)]
pub struct TimeStyle {
    pub format: String,
    pub clock: Clock,
    pub locale: Locale,
}

impl Default for TimeStyle {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIME_FORMAT.to_string(),
            clock: Clock::Local,
            locale: Locale::POSIX,
        }
    }
}

impl TimeStyle {
    /// Validate `format` up front; chrono panics when an invalid pattern is
    /// rendered through `Display`. The locale starts as POSIX.
    pub fn new(format: impl Into<String>, clock: Clock) -> Result<Self, ChatError> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(ChatError::InvalidTimeFormat(format));
        }
        Ok(Self {
            format,
            clock,
            locale: Locale::POSIX,
        })
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn format_millis(&self, epoch_ms: i64) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(epoch_ms) else {
            return INVALID_TIME.to_string();
        };
        match self.clock {
            Clock::Utc => utc.format_localized(&self.format, self.locale).to_string(),
            Clock::Local => utc
                .with_timezone(&Local)
                .format_localized(&self.format, self.locale)
                .to_string(),
        }
    }
}

/// A rendered log entry. Fields are kept apart so a view can style each one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub time: String,
    /// Sender name with its trailing colon, e.g. `alice:`.
    pub sender: String,
    pub content: String,
}

impl ChatLine {
    pub fn render(msg: &ChatMessage, style: &TimeStyle) -> Self {
        Self {
            time: style.format_millis(msg.timestamp),
            sender: format!("{}:", msg.user),
            content: msg.content.clone(),
        }
    }
}

impl std::fmt::Display for ChatLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.time, self.sender, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_style() -> TimeStyle {
        TimeStyle::new(DEFAULT_TIME_FORMAT, Clock::Utc).unwrap()
    }

    fn msg(user: &str, content: &str, timestamp: i64) -> ChatMessage {
        ChatMessage {
            user: user.to_string(),
            content: content.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_render_fields_in_order() {
        let line = ChatLine::render(&msg("alice", "hi", 1_700_000_000_000), &utc_style());
        assert_eq!(line.time, "22:13:20");
        assert_eq!(line.sender, "alice:");
        assert_eq!(line.content, "hi");
        assert_eq!(line.to_string(), "22:13:20 alice: hi");
    }

    #[test]
    fn test_render_keeps_content_verbatim() {
        let line = ChatLine::render(&msg("bob", "  spaced <b>out</b> ", 0), &utc_style());
        assert_eq!(line.content, "  spaced <b>out</b> ");
        assert_eq!(line.time, "00:00:00");
    }

    #[test]
    fn test_custom_format() {
        let style = TimeStyle::new("%Y-%m-%d %H:%M", Clock::Utc).unwrap();
        assert_eq!(style.format_millis(1_700_000_000_000), "2023-11-14 22:13");
    }

    #[test]
    fn test_new_rejects_bad_pattern() {
        assert!(matches!(
            TimeStyle::new("%H:%Q", Clock::Utc),
            Err(ChatError::InvalidTimeFormat(_))
        ));
        assert!(TimeStyle::new("%I:%M %p", Clock::Local).is_ok());
    }

    #[test]
    fn test_out_of_range_timestamp() {
        assert_eq!(utc_style().format_millis(i64::MAX), INVALID_TIME);
    }

    #[test]
    fn test_chrono_range_edge_is_invalid() {
        // A browser still renders this one; chrono cannot.
        assert_eq!(utc_style().format_millis(8_300_000_000_000_000), INVALID_TIME);
        assert_ne!(utc_style().format_millis(8_000_000_000_000_000), INVALID_TIME);
    }

    #[test]
    fn test_locale_time_of_day_differs_by_locale() {
        let us = utc_style().with_locale(Locale::en_US);
        let de = utc_style().with_locale(Locale::de_DE);
        let us_time = us.format_millis(1_700_000_000_000);
        assert!(us_time.starts_with("10:13:20"), "{us_time}");
        assert!(us_time.ends_with("PM"), "{us_time}");
        assert_eq!(de.format_millis(1_700_000_000_000), "22:13:20");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("de_DE.UTF-8"), Locale::de_DE);
        assert_eq!(parse_locale("en_US"), Locale::en_US);
        assert_eq!(parse_locale("sr_RS@latin"), Locale::sr_RS);
        assert_eq!(parse_locale("C.UTF-8"), Locale::POSIX);
        assert_eq!(parse_locale("POSIX"), Locale::POSIX);
        assert_eq!(parse_locale(""), Locale::POSIX);
        assert_eq!(parse_locale("xx_NOWHERE"), Locale::POSIX);
    }

    #[test]
    fn test_local_clock_produces_time_of_day() {
        let style = TimeStyle::default();
        let rendered = style.format_millis(1_700_000_000_000);
        // Offset depends on the host; only the shape is stable.
        assert_eq!(rendered.len(), 8);
        assert_eq!(rendered.matches(':').count(), 2);
        assert!(rendered.ends_with(":20"));
    }

    #[test]
    fn test_empty_user_still_gets_colon() {
        let line = ChatLine::render(&msg("", "anon", 0), &utc_style());
        assert_eq!(line.sender, ":");
    }
}
