mod echo;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use courier_api::Bot;
use courier_core::config::{self, LogConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "Telegram Bot API client with long polling and login data validation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "courier.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an echo bot until Ctrl-C.
    Echo,
    /// Print the bot's identity.
    Me,
    /// Check a login widget callback query string.
    VerifyLogin {
        /// The query string Telegram redirected with.
        query: String,
    },
    /// Check Web App init data.
    VerifyWebApp {
        /// `Telegram.WebApp.initData` as sent by the client.
        init_data: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_logging(&cfg.log)?;

    match cli.command {
        Commands::Echo => {
            require_token(&cfg.bot.token)?;
            let bot = Bot::new(cfg.bot.clone());
            echo::run(bot, cfg.polling.clone()).await?;
        }
        Commands::Me => {
            require_token(&cfg.bot.token)?;
            let bot = Bot::new(cfg.bot.clone());
            let me = bot.get_me().await?;
            println!("{}", serde_json::to_string_pretty(&me)?);
        }
        Commands::VerifyLogin { query } => {
            require_token(&cfg.bot.token)?;
            let payload = courier_auth::payload_from_query(&query);
            courier_auth::validate_login_widget(&payload, &cfg.bot.token)
                .context("login data rejected")?;
            println!("valid");
        }
        Commands::VerifyWebApp { init_data } => {
            require_token(&cfg.bot.token)?;
            let payload = courier_auth::payload_from_query(&init_data);
            courier_auth::validate_web_app_data(&payload, &cfg.bot.token)
                .context("web app data rejected")?;
            println!("valid");
        }
    }

    Ok(())
}

fn require_token(token: &str) -> anyhow::Result<()> {
    if token.is_empty() {
        anyhow::bail!(
            "bot token is empty. Set it in courier.toml or the {} env var.",
            config::TOKEN_ENV
        );
    }
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` overrides `log.level`.
///
/// When `log.dir` is set, output also goes to a daily rolling file; the
/// returned guard must live until exit so buffered lines get flushed.
fn init_logging(log: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("invalid log level '{}'", log.level))?;

    let (file_layer, guard) = if log.dir.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&log.dir, "courier.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}
