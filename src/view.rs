//! Display regions of the chat page.
//!
//! The page exposes four regions, addressed by the same identifiers the HTML
//! chat page uses. A [`ChatView`] owns the two display regions (log and user
//! list); the input side lives in [`crate::composer`].

use std::borrow::Cow;
use std::io::{self, Write};

use colored::*;

use crate::render::ChatLine;

/// Page regions the client reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Message log container.
    ChatBox,
    /// Submission form.
    ChatForm,
    /// Text field inside the form.
    MessageInput,
    /// Connected-user list container.
    UserList,
}

impl Region {
    pub fn id(self) -> &'static str {
        match self {
            Region::ChatBox => "chat-box",
            Region::ChatForm => "chat-form",
            Region::MessageInput => "message-input",
            Region::UserList => "user-list",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Sink for the mutations inbound frames cause.
pub trait ChatView {
    /// Append one entry after everything already in the log.
    fn append_line(&mut self, line: &ChatLine) -> io::Result<()>;

    /// Replace the whole user list with `users`, in order.
    fn replace_users(&mut self, users: &[String]) -> io::Result<()>;

    /// Make the newest log entry visible.
    fn scroll_to_bottom(&mut self) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// Terminal view
// ---------------------------------------------------------------------------

/// Writes the log and user-list updates to a terminal stream.
///
/// A terminal cannot redraw a region in place without a full-screen UI, so a
/// user-list replacement is printed as a fresh block listing everyone.
pub struct TerminalView<W: Write> {
    out: W,
    color: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Make remote text inert for the terminal: control characters (newlines,
/// ESC, ...) are written in escaped form so one entry stays one line and no
/// escape sequence reaches the terminal.
pub fn inert(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

impl<W: Write> ChatView for TerminalView<W> {
    fn append_line(&mut self, line: &ChatLine) -> io::Result<()> {
        let time = inert(&line.time);
        let sender = inert(&line.sender);
        let content = inert(&line.content);
        if self.color {
            writeln!(self.out, "{} {} {}", time.dimmed(), sender.bold(), content)
        } else {
            writeln!(self.out, "{time} {sender} {content}")
        }
    }

    fn replace_users(&mut self, users: &[String]) -> io::Result<()> {
        let header = format!("online ({})", users.len());
        if self.color {
            writeln!(self.out, "{}", header.cyan().bold())?;
        } else {
            writeln!(self.out, "{header}")?;
        }
        for user in users {
            writeln!(self.out, "  • {}", inert(user))?;
        }
        self.out.flush()
    }

    fn scroll_to_bottom(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ---------------------------------------------------------------------------
// In-memory view
// ---------------------------------------------------------------------------

/// Region contents kept in memory. Used for headless runs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryView {
    pub log: Vec<ChatLine>,
    pub users: Vec<String>,
    /// Index of the last log entry scrolled into view, if any.
    pub scrolled_to: Option<usize>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the newest entry is the one in view.
    pub fn at_bottom(&self) -> bool {
        match self.log.len() {
            0 => true,
            n => self.scrolled_to == Some(n - 1),
        }
    }
}

impl ChatView for MemoryView {
    fn append_line(&mut self, line: &ChatLine) -> io::Result<()> {
        self.log.push(line.clone());
        Ok(())
    }

    fn replace_users(&mut self, users: &[String]) -> io::Result<()> {
        self.users.clear();
        self.users.extend(users.iter().cloned());
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> io::Result<()> {
        self.scrolled_to = self.log.len().checked_sub(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(time: &str, user: &str, content: &str) -> ChatLine {
        ChatLine {
            time: time.to_string(),
            sender: format!("{user}:"),
            content: content.to_string(),
        }
    }

    fn users(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_region_ids() {
        assert_eq!(Region::ChatBox.id(), "chat-box");
        assert_eq!(Region::ChatForm.id(), "chat-form");
        assert_eq!(Region::MessageInput.id(), "message-input");
        assert_eq!(Region::UserList.to_string(), "user-list");
    }

    #[test]
    fn test_terminal_plain_line() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.append_line(&line("10:00:00", "alice", "hi")).unwrap();
        view.scroll_to_bottom().unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "10:00:00 alice: hi\n");
    }

    #[test]
    fn test_terminal_user_block() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.replace_users(&users(&["alice", "bob"])).unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "online (2)\n  • alice\n  • bob\n");
    }

    #[test]
    fn test_terminal_empty_user_block() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.replace_users(&[]).unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "online (0)\n");
    }

    #[test]
    fn test_terminal_colored_line_keeps_text() {
        let mut view = TerminalView::new(Vec::new(), true);
        view.append_line(&line("10:00:00", "alice", "hi")).unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.contains("10:00:00"));
        assert!(out.contains("alice:"));
        assert!(out.ends_with("hi\n"));
    }

    #[test]
    fn test_inert_leaves_plain_text_borrowed() {
        assert!(matches!(inert("héllo • wörld"), Cow::Borrowed("héllo • wörld")));
    }

    #[test]
    fn test_inert_escapes_controls() {
        assert_eq!(inert("a\nb\r\tc\u{1b}[2J"), "a\\nb\\r\\tc\\u{1b}[2J");
    }

    #[test]
    fn test_terminal_multiline_content_stays_one_line() {
        let mut view = TerminalView::new(Vec::new(), false);
        let forged = "hi\n22:13:20 bob: send me your password\u{1b}[2J";
        view.append_line(&line("22:13:20", "mallory", forged)).unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out.matches('\n').count(), 1);
        assert!(!out.contains('\u{1b}'));
        assert_eq!(
            out,
            "22:13:20 mallory: hi\\n22:13:20 bob: send me your password\\u{1b}[2J\n"
        );
    }

    #[test]
    fn test_terminal_user_names_are_escaped() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.replace_users(&users(&["eve\n  • admin", "\u{7}bell"])).unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "online (2)\n  • eve\\n  • admin\n  • \\u{7}bell\n");
    }

    #[test]
    fn test_memory_replace_users_clears_previous() {
        let mut view = MemoryView::new();
        view.replace_users(&users(&["a", "b", "c"])).unwrap();
        view.replace_users(&users(&["z"])).unwrap();
        assert_eq!(view.users, users(&["z"]));
    }

    #[test]
    fn test_memory_scroll_tracks_newest() {
        let mut view = MemoryView::new();
        assert!(view.at_bottom());
        view.append_line(&line("1", "a", "x")).unwrap();
        view.append_line(&line("2", "a", "y")).unwrap();
        assert!(!view.at_bottom());
        view.scroll_to_bottom().unwrap();
        assert_eq!(view.scrolled_to, Some(1));
        assert!(view.at_bottom());
    }
}
