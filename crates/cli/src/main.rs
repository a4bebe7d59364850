use std::{path::PathBuf, sync::Arc};

use {
    clap::{CommandFactory, Parser},
    secrecy::{ExposeSecret, Secret},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    saltygram_relay::{Dispatcher, IdentityGate, SessionId},
    saltygram_salty::SaltyConnector,
    saltygram_telegram::{TelegramSurface, intake},
};

#[derive(Parser)]
#[command(name = "saltygram", about = "Bridge between a Telegram chat and salty.im")]
struct Cli {
    /// Path to the salty.im identity key.
    #[arg(short = 'k', long = "key")]
    key: Option<PathBuf>,

    /// Telegram bot token.
    #[arg(short = 't', long = "token", env = "SALTYGRAM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Chat ID allowed to use the bridge (repeatable).
    #[arg(long = "allow", value_name = "CHAT_ID")]
    allow: Vec<i64>,

    /// Sticker file ID sent to unauthorized chats.
    #[arg(long)]
    sticker: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let Some(key) = cli.key.clone().filter(|p| !p.as_os_str().is_empty()) else {
        eprintln!("please provide the path to the salty.im key");
        Cli::command().print_help()?;
        return Ok(());
    };
    let Some(token) = cli
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .map(Secret::new)
    else {
        eprintln!("please provide the Telegram bot token (--token or SALTYGRAM_TOKEN)");
        Cli::command().print_help()?;
        return Ok(());
    };

    let bot = teloxide::Bot::new(token.expose_secret().clone());

    let mut surface = TelegramSurface::new(bot.clone());
    if let Some(sticker) = cli.sticker.clone() {
        surface = surface.with_rejection_sticker(sticker);
    }

    let gate = IdentityGate::new(cli.allow.iter().copied().map(SessionId));
    let connector = SaltyConnector::new(key);
    let dispatcher = Dispatcher::new(gate, Arc::new(surface), Arc::new(connector));

    info!(allowed = cli.allow.len(), "starting intake loop");
    intake::run(bot, dispatcher).await;
    Ok(())
}
