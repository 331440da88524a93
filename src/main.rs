use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use ws_chat_client::cli::{default_log_level, write_completions, Args};
use ws_chat_client::endpoint::endpoint_url;
use ws_chat_client::session::{run_stdin, ChatSession, SessionEnd};
use ws_chat_client::{ClientConfig, TerminalView};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        write_completions(shell, &mut std::io::stdout());
        return Ok(());
    }

    // Logs go to stderr so they never interleave with the chat on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(args.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::resolve(&args)?;
    if !config.color {
        colored::control::set_override(false);
    }
    let endpoint = endpoint_url(&config.origin)?;
    let time_style = config.time_style()?;

    eprintln!("{} {}", "connecting to".dimmed(), endpoint);
    let mut session = ChatSession::new(TerminalView::stdout(config.color), time_style);

    match run_stdin(&endpoint, &mut session).await? {
        SessionEnd::ServerClosed => eprintln!("{}", "connection closed by server".yellow()),
        SessionEnd::InputClosed => {}
    }

    Ok(())
}
