//! gemchat CLI: chat with Gemini from the terminal

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use gemchat_engine::{
    ChatConfig, Conversation, GeminiClient, MockClient, ModelClient, Rejected,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Minimal Gemini chat client with a terminal UI
#[derive(Parser)]
#[command(name = "gemchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to chat with (overrides config and GEMINI_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Seconds to wait for a reply before giving up (0 = wait forever)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Use an offline echo model instead of the Gemini API
    #[arg(long, global = true)]
    mock: bool,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat box (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Ask {
        /// Message text
        text: String,
    },

    /// Print the effective configuration (API key redacted)
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Stderr logging would draw over the TUI, so it only logs to a file there.
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(cli.verbose, cli.log_file.as_deref(), !interactive)?;

    let config = resolve_config(&cli)?;
    debug!(model = %config.model, base_url = %config.base_url, "Configuration resolved");

    match cli.command {
        None | Some(Commands::Tui) => {
            let conversation = build_conversation(&config, cli.mock);
            gemchat_tui::run_tui(conversation)
                .await
                .map_err(|e| anyhow!("TUI failed: {e}"))?;
        }
        Some(Commands::Ask { ref text }) => {
            let mut conversation = build_conversation(&config, cli.mock);
            cmd_ask(&mut conversation, text).await?;
        }
        Some(Commands::Config { json }) => {
            cmd_config(&config, json)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else if to_stderr {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        return Ok(());
    };

    installed.map_err(|e| anyhow!("failed to install logger: {e}"))
}

/// Defaults, then the config file, then the environment, then flags.
fn resolve_config(cli: &Cli) -> Result<ChatConfig> {
    let mut config = match &cli.config {
        Some(path) => ChatConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ChatConfig::default(),
    };
    config.apply_env();
    apply_flags(&mut config, cli);
    Ok(config)
}

fn apply_flags(config: &mut ChatConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.model.clone_from(model);
    }
    if let Some(timeout) = cli.timeout {
        config.turn_timeout_secs = timeout;
    }
}

fn build_conversation(config: &ChatConfig, mock: bool) -> Conversation {
    let client: Arc<dyn ModelClient> = if mock {
        Arc::new(MockClient::new())
    } else {
        if !config.has_api_key() {
            warn!(
                "{} is not set; requests will be sent without a credential",
                gemchat_engine::config::ENV_API_KEY
            );
        }
        Arc::new(GeminiClient::from_config(config))
    };

    Conversation::new(client).with_turn_timeout(config.turn_timeout())
}

async fn cmd_ask(conversation: &mut Conversation, text: &str) -> Result<()> {
    match conversation.submit(text).await {
        Ok(reply) => {
            println!("{}", reply.content);
            Ok(())
        }
        Err(Rejected::Empty) => bail!("nothing to send: the message is empty"),
        Err(e) => bail!(e),
    }
}

fn cmd_config(config: &ChatConfig, json: bool) -> Result<()> {
    let shown = config.redacted();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    let api_key = if shown.api_key.is_empty() {
        "(not set)"
    } else {
        shown.api_key.as_str()
    };
    let timeout = match config.turn_timeout() {
        Some(t) => format!("{}s", t.as_secs()),
        None => "none".into(),
    };

    println!("Model:        {}", shown.model);
    println!("Base URL:     {}", shown.base_url);
    println!("API key:      {api_key}");
    println!("Turn timeout: {timeout}");
    println!("HTTP timeout: {}s", shown.request_timeout_secs);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_engine::FALLBACK_REPLY;

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["gemchat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.mock);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gemchat", "ask", "Hello", "--model", "gemini-1.5-flash", "--timeout", "0", "--mock",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Ask { ref text }) if text == "Hello"));
        assert!(cli.mock);

        let mut config = ChatConfig::default();
        apply_flags(&mut config, &cli);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.turn_timeout(), None);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["gemchat", "--config", "/nonexistent/gemchat.json", "config"])
                .unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[tokio::test]
    async fn test_ask_with_mock_echoes() {
        let mut conversation = build_conversation(&ChatConfig::default(), true);
        cmd_ask(&mut conversation, "ping").await.unwrap();
        assert_eq!(conversation.last().unwrap().content, "Echo: ping");
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_text() {
        let mut conversation = build_conversation(&ChatConfig::default(), true);
        assert!(cmd_ask(&mut conversation, "   ").await.is_err());
        assert!(conversation.is_empty());
    }

    #[tokio::test]
    async fn test_ask_failure_prints_fallback() {
        let mut conversation = Conversation::new(Arc::new(MockClient::failing("down")));
        cmd_ask(&mut conversation, "Test").await.unwrap();
        assert_eq!(conversation.last().unwrap().content, FALLBACK_REPLY);
    }
}
