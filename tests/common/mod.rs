//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use compiler_service::config::ServiceConfig;
use compiler_service::optimizer::{CompilationLevel, CompileOutcome, Optimizer, OptimizerFactory};
use compiler_service::HttpServer;
use tokio::sync::oneshot;

/// Start the service on `addr` with `factory` and wait until it accepts.
/// Sending on (or dropping) the returned handle stops the server.
pub async fn start_server(
    addr: SocketAddr,
    mut config: ServiceConfig,
    factory: Arc<dyn OptimizerFactory>,
) -> oneshot::Sender<()> {
    config.listener.address = addr.ip().to_string();
    config.listener.port = addr.port();

    let (shutdown, stopped) = oneshot::channel();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server = HttpServer::new(config, factory);

    tokio::spawn(async move {
        let _ = server
            .run(listener, async move {
                let _ = stopped.await;
            })
            .await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Answers by source text: sources containing `ERROR` fail with one error
/// per occurrence, `WARN` adds a warning per occurrence. Anything else
/// compiles to the source with spaces removed, tagged with the level.
#[allow(dead_code)]
pub struct ScriptedOptimizer;

impl Optimizer for ScriptedOptimizer {
    fn optimize(&mut self, source: &str, level: Option<CompilationLevel>) -> CompileOutcome {
        let errors: Vec<String> = (0..source.matches("ERROR").count())
            .map(|i| format!("input.js:{}: ERROR - scripted", i + 1))
            .collect();
        let warnings = (0..source.matches("WARN").count())
            .map(|i| format!("input.js:{}: WARNING - scripted", i + 1))
            .collect();
        let output = if errors.is_empty() {
            let level = level.map(|l| l.as_str()).unwrap_or("NONE");
            format!("/*{level}*/{}", source.replace(' ', ""))
        } else {
            String::new()
        };
        CompileOutcome { output, errors, warnings }
    }
}

#[allow(dead_code)]
pub fn scripted() -> Arc<dyn OptimizerFactory> {
    Arc::new(|| -> Box<dyn Optimizer> { Box::new(ScriptedOptimizer) })
}
