use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use compiler_service::config::{load_config, ServiceConfig};
use compiler_service::observability::{logging, metrics};
use compiler_service::optimizer::MinifierFactory;
use compiler_service::lifecycle::wait_for_signal;
use compiler_service::HttpServer;

#[derive(Parser)]
#[command(name = "compiler-service")]
#[command(about = "HTTP service that optimizes JavaScript source", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides LISTEN_ADDRESS and the config file.
    #[arg(short, long)]
    address: Option<String>,

    /// Listen port, overrides LISTEN_PORT and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    if let Some(address) = cli.address {
        config.listener.address = address;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    config.validate()?;

    logging::init_tracing(&config.observability.log_level);

    tracing::info!("compiler-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        max_body_size = config.limits.max_body_size,
        request_timeout_secs = config.timeouts.request_secs,
        strict_compilation_level = config.compiler.strict_compilation_level,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated above.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, Arc::new(MinifierFactory));
    server.run(listener, wait_for_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
