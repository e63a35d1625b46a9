// Cricket dashboard entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing
// 3. Load the three CSV tables; any failure aborts startup
// 4. Build the dashboard (resolvers capture the shared tables)
// 5. Bind the listener and serve until Ctrl+C

use std::sync::Arc;

use anyhow::Context;
use cricket_core::{loader, Dashboard};
use cricket_dash::{config, server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Tracing
    init_tracing(&config.log_filter)?;
    info!("Cricket dashboard starting up");

    // 3. Data
    let tables = loader::load_tables(&config.data_paths).context("failed to load data files")?;

    // 4. Dashboard
    let dashboard = Arc::new(Dashboard::new(config.title.clone(), Arc::new(tables)));

    // 5. Serve
    let listener = server::bind(&config.server)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr()))?;

    tokio::select! {
        result = server::run(listener, dashboard) => {
            if let Err(e) = &result {
                error!("Server error: {e}");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
        }
    }

    info!("Cricket dashboard shut down cleanly");
    Ok(())
}

/// Log to stdout. `RUST_LOG` overrides the configured filter.
fn init_tracing(filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
