//! lobbyd - lobby daemon for coordinating a shared game server over a
//! private mesh link.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lobbyd::config::Settings;
use lobbyd::server::LobbyListener;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let config_path = get_config_path(&args);

    // Load configuration
    let settings = match Settings::load(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging based on configuration
    init_logging(&settings);

    info!("Starting {} v{}", NAME, VERSION);
    info!("Configuration loaded from: {}", config_path);
    info!(
        "Listening on {}:{}",
        settings.server.host, settings.server.port
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(async_main(settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Daemon failed");
            ExitCode::FAILURE
        }
    }
}

/// Async main function.
async fn async_main(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Arc::new(settings);
    let drain_timeout = Duration::from_secs(settings.limits.shutdown_drain_seconds);

    let listener = LobbyListener::bind(Arc::clone(&settings)).await?;

    let shutdown = Arc::new(Notify::new());
    let shutdown_for_run = Arc::clone(&shutdown);

    tokio::select! {
        result = listener.run(Arc::clone(&shutdown_for_run)) => {
            result?;
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, initiating graceful shutdown...");
            shutdown.notify_waiters();

            match tokio::time::timeout(drain_timeout, listener.wait_for_drain()).await {
                Ok(()) => info!("Graceful shutdown complete"),
                Err(_) => warn!(
                    "Shutdown timeout after {}s, some connections may be terminated",
                    drain_timeout.as_secs()
                ),
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Lobby daemon for coordinating a shared game server over a private mesh link.

USAGE:
    {} [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file
                           [default: /etc/lobbyd/config.toml]
    -h, --help             Print help information
    -V, --version          Print version information
"#,
        NAME, VERSION, NAME
    );
}

/// Get configuration file path from command line arguments.
fn get_config_path(args: &[String]) -> String {
    for (i, arg) in args.iter().enumerate() {
        if (arg == "--config" || arg == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    // Default path
    "/etc/lobbyd/config.toml".to_string()
}

/// Initialize logging based on settings.
fn init_logging(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Default to pretty format
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}
