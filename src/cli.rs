use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "ws-chat")]
#[command(version)]
#[command(about = "Terminal chat client: shows the room's messages and users, sends what you type")]
pub struct Args {
    /// Origin of the chat page (e.g. https://chat.example.com); the socket is {ws|wss}://host/ws
    #[arg(long)]
    pub origin: Option<String>,

    /// TOML config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// strftime pattern for message times
    #[arg(long)]
    pub time_format: Option<String>,

    /// Locale for message times (e.g. de_DE.UTF-8); defaults to LC_ALL/LC_TIME/LANG
    #[arg(long)]
    pub locale: Option<String>,

    /// Show message times in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print a shell completion script and exit
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

/// Default log directive for the given `-v` count.
pub fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}
