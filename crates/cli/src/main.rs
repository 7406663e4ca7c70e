//! `gangway` — WhatsApp bridge tools from the command line.
//!
//! The binary is a thin shell over the tool registry: the same catalog a
//! hosting layer would expose to an agent, driven by hand. `gangway status`,
//! `gangway qr`, and `gangway wait` cover the pairing workflow; `gangway
//! tools call` reaches anything else.

use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    gangway_backend::{FallbackRouter, WhatsAppBackend},
    gangway_tools::{ToolRegistry, default_registry},
};

#[derive(Parser)]
#[command(name = "gangway", about = "Gangway — WhatsApp bridge tool server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Bridge base URL (overrides config value).
    #[arg(long, global = true, env = "GANGWAY_BRIDGE_URL")]
    bridge_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show connection status (default when no subcommand is provided).
    Status,
    /// Print the pairing QR code to the terminal.
    Qr,
    /// Wait until WhatsApp is connected.
    Wait {
        /// Seconds to wait before giving up.
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },
    /// Send a text message.
    Send {
        /// Recipient JID (e.g. 15551234567@s.whatsapp.net).
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        message: String,
    },
    /// Tool catalog access.
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand)]
enum ToolsAction {
    /// List tools with their parameter schemas.
    List,
    /// Call a tool by name with JSON parameters.
    Call {
        /// Tool name (see `gangway tools list`).
        name: String,
        /// Tool parameters as a JSON object.
        #[arg(default_value = "{}")]
        params: String,
    },
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
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let mut config = gangway_config::discover_and_load();
    if let Some(url) = &cli.bridge_url {
        config.bridge.base_url = url.clone();
    }
    debug!(mode = ?config.backend.mode, bridge = %config.bridge.base_url, "configuration loaded");

    let backend: Arc<dyn WhatsAppBackend> = Arc::new(FallbackRouter::from_config(&config)?);
    let registry = default_registry(backend, &config);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => call_and_print(&registry, "get_status", serde_json::json!({})).await,
        Commands::Qr => print_qr(&registry).await,
        Commands::Wait { timeout } => {
            call_and_print(
                &registry,
                "wait_for_connection",
                serde_json::json!({ "timeout_seconds": timeout }),
            )
            .await
        },
        Commands::Send { to, message } => {
            call_and_print(
                &registry,
                "send_message",
                serde_json::json!({ "recipient": to, "message": message }),
            )
            .await
        },
        Commands::Tools { action } => match action {
            ToolsAction::List => {
                let schemas = registry.list_schemas();
                println!("{}", serde_json::to_string_pretty(&schemas)?);
                Ok(())
            },
            ToolsAction::Call { name, params } => {
                let params: serde_json::Value = serde_json::from_str(&params)
                    .map_err(|e| anyhow::anyhow!("params must be a JSON object: {e}"))?;
                call_and_print(&registry, &name, params).await
            },
        },
    }
}

async fn call_and_print(
    registry: &ToolRegistry,
    name: &str,
    params: serde_json::Value,
) -> anyhow::Result<()> {
    let result = registry.execute(name, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// `gangway qr` renders the ASCII matrix directly so it is scannable in the
/// terminal, instead of burying it in a JSON string.
async fn print_qr(registry: &ToolRegistry) -> anyhow::Result<()> {
    let result = registry.execute("get_qr", serde_json::json!({})).await?;

    match result.get("qr_ascii").and_then(serde_json::Value::as_str) {
        Some(ascii) => {
            println!("{ascii}");
            if let Some(message) = result.get("message").and_then(serde_json::Value::as_str) {
                println!("{message}");
            }
        },
        None => {
            let message = result
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("no QR code available");
            println!("{message}");
        },
    }
    Ok(())
}
