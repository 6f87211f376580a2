//! Herald Runner
//!
//! Runs a notification sync session against a configured backend:
//! starts the polling scheduler, attaches the push bridge when a transport
//! is configured, and prints incoming toasts until interrupted.
//!
//! # Configuration
//!
//! Reads `config.toml` (see `herald init-config`) with `HERALD_*`
//! environment overrides; `RUST_LOG` controls log filtering.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herald::alert::{AlertGate, AlertSink, HapticSink, ToastSink};
use herald::backend::{BackendConfig, NotificationApi};
use herald::center::NotificationCenter;
use herald::config::{generate_default_config, Config};
use herald::push::{PushBridge, WsTransport};
use herald::routing::resolve_target;
use herald::sync::{SyncScheduler, SyncTarget};

#[derive(Parser)]
#[command(name = "herald")]
#[command(version = herald::VERSION)]
#[command(about = "Real-time notification sync client with polling fallback")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// View to keep in sync: badge (unread counter) or inbox (full list)
    #[arg(short, long, default_value = "inbox", global = true)]
    target: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sync session until interrupted (default)
    Run,

    /// Perform a single fetch and print the result
    Once,

    /// Print a default config file to stdout
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::InitConfig)) {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };

    init_tracing(&config);
    tracing::info!("Herald v{}", herald::VERSION);

    let target = match cli.target.as_str() {
        "badge" => SyncTarget::Badge,
        "inbox" => SyncTarget::Inbox,
        other => anyhow::bail!("unknown sync target {:?} (expected badge or inbox)", other),
    };

    // No session, nothing to sync; exit before acquiring any resources.
    if !config.session.is_valid() {
        tracing::warn!("No session configured (token/user_id missing), exiting");
        return Ok(());
    }

    let api = Arc::new(NotificationApi::new(BackendConfig {
        base_url: config.backend.base_url.clone(),
        token: config.session.token.clone(),
        request_timeout_ms: config.backend.request_timeout_ms,
    }));
    let center = Arc::new(NotificationCenter::new(api));

    if matches!(cli.command, Some(Commands::Once)) {
        return run_once(&center, target).await;
    }

    // Alert sinks: toast always, haptics when enabled and supported.
    let (toast_sink, mut toasts) = ToastSink::channel();
    let mut sinks: Vec<Box<dyn AlertSink>> = vec![Box::new(toast_sink)];
    if config.alerts.haptics {
        sinks.push(Box::new(HapticSink::detect()));
    }
    let gate = Arc::new(AlertGate::new(sinks));

    let scheduler = Arc::new(SyncScheduler::with_interval(
        Arc::clone(&center),
        target,
        std::time::Duration::from_secs(config.sync.interval_secs),
    ));
    let sync_handle = scheduler.clone().start();

    let bridge = if config.push.enabled {
        tracing::info!(url = %config.push.url, "Connecting push transport");
        let transport = Arc::new(WsTransport::new(config.push.url.clone()));
        let bridge = Arc::new(PushBridge::new(
            transport,
            Arc::clone(&center),
            Arc::clone(&gate),
            target,
            config.session.user_id.clone(),
        ));
        bridge.connect().await;
        Some(bridge)
    } else {
        tracing::info!("Push disabled, polling only");
        None
    };

    // Surface toasts on the terminal until interrupted.
    loop {
        tokio::select! {
            Some(toast) = toasts.recv() => {
                println!("🔔 {} — {}", toast.title, toast.message);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    tracing::info!("Shutting down...");
    if let Some(bridge) = bridge {
        bridge.disconnect().await;
    }
    scheduler.stop().await;
    sync_handle.abort();

    tracing::info!("Herald shutdown complete");
    Ok(())
}

async fn run_once(center: &NotificationCenter, target: SyncTarget) -> anyhow::Result<()> {
    match target {
        SyncTarget::Badge => {
            center.fetch_unread_count().await;
            println!("unread: {}", center.unread().await);
        }
        SyncTarget::Inbox => {
            center.fetch_list().await;
            for n in center.items().await {
                println!(
                    "[{}] {} {} — {} -> {}",
                    if n.read { " " } else { "*" },
                    n.created_at_display(),
                    n.title,
                    n.message,
                    resolve_target(&n).as_str(),
                );
            }
        }
    }
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("herald={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
