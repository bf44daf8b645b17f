use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use imageshare::config::{CliArgs, Config, get_config};
use imageshare::{create_app_with_config, db, run_migrations};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Sets up logging to stdout and, when a log directory is configured, to a
/// daily rotated file
///
/// The returned guard flushes the file writer on drop and has to live as long
/// as the server.
fn init_logging(config: &Config, debug: bool) -> Option<WorkerGuard> {
    let default_level = if debug {
        "imageshare=debug,tower_http=debug"
    } else {
        "imageshare=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "imageshare.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = config.log_json.then(|| fmt::layer().json());
    let text_layer = (!config.log_json).then(|| fmt::layer().with_target(true));
    let file_layer = file_writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let config = get_config(&args);
    let _guard = init_logging(&config, args.debug);

    info!(
        database_url = %config.database_url,
        assets_dir = ?config.assets_dir,
        max_upload_bytes = config.max_upload_bytes,
        "Starting imageshare"
    );

    let pool = Arc::new(db::init_pool(&config.database_url).context("Failed to create database pool")?);
    {
        let mut conn = pool.get().context("Failed to get a database connection")?;
        run_migrations(&mut conn)?;
    }

    let app = create_app_with_config(pool, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("imageshare listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
