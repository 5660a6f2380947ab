//! Start command implementation

use crate::cli::StartArgs;
use crate::config::{LogFormat, VigilConfig};
use crate::probe::HttpProber;
use crate::report::ConsoleSink;
use crate::retry::RetryPolicy;
use crate::scheduler::Scheduler;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &StartArgs,
) -> Result<VigilConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        VigilConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        VigilConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(tick) = args.tick {
        config.scheduler.tick_seconds = tick;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main start command handler
pub async fn run_start(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting Vigil daemon");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Build the scheduler and register endpoints
    let mut scheduler = Scheduler::new(
        config.scheduler.clone(),
        RetryPolicy::new(),
        Arc::new(HttpProber::new()),
        Arc::new(ConsoleSink),
    );

    let registered = scheduler.register_all(&config.endpoints);
    if registered == 0 {
        tracing::warn!("No valid endpoints registered; nothing to monitor");
    } else {
        tracing::info!(
            registered,
            skipped = config.endpoints.len() - registered,
            "Endpoints loaded from config"
        );
    }

    // 4. Single pass mode for config smoke-testing
    if args.oneshot {
        scheduler.run_once().await;
        return Ok(());
    }

    // 5. Run until a shutdown signal arrives
    let cancel_token = CancellationToken::new();
    let handle = scheduler.start(cancel_token.clone());

    shutdown_signal(cancel_token).await;

    handle.await?;
    tracing::info!("Vigil daemon stopped");

    Ok(())
}
