//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router; every path answers with the compile handler
//! - Wire up middleware (request ID, timeout, tracing)
//! - Buffer the whole request body, bounded by the configured limit (413 beyond)
//! - Run the optimizer on the blocking pool
//! - Serve until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, FromRequest, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::error::Rejection;
use crate::http::handler::{handle, is_post};
use crate::http::request::RequestPolicy;
use crate::http::request_id::{request_id_of, MakeRequestUuidV4};
use crate::observability::metrics;
use crate::optimizer::OptimizerFactory;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub factory: Arc<dyn OptimizerFactory>,
    pub policy: RequestPolicy,
    pub max_body_size: usize,
}

/// HTTP server for the compiler service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServiceConfig, factory: Arc<dyn OptimizerFactory>) -> Self {
        let state = AppState {
            factory,
            policy: config.compiler.policy(),
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(compile_handler))
            .route("/{*path}", any(compile_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The router, for serving it elsewhere or calling it directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Compile handler for every path and method.
async fn compile_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id_of(&request);
    let method = request.method().as_str().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        "Compile request"
    );

    // Non-POST requests are answered by the method gate without reading the body.
    let body = if is_post(&method) {
        match read_body(request, state.max_body_size).await {
            Ok(body) => body,
            Err(rejection) => {
                tracing::warn!(
                    request_id = %request_id,
                    reason = %rejection,
                    "Request body rejected"
                );
                let status = rejection.as_status();
                metrics::record_request(status.as_u16(), rejection.as_label(), start_time);
                return rejection.into_response();
            }
        }
    } else {
        Bytes::new()
    };

    let factory = state.factory.clone();
    let policy = state.policy;
    let result =
        tokio::task::spawn_blocking(move || handle(&method, &body, factory.as_ref(), policy))
            .await;

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Optimizer task failed");
            metrics::record_request(500, "internal_error", start_time);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        status = response.status.as_u16(),
        outcome = response.outcome,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Compile request finished"
    );
    metrics::record_request(response.status.as_u16(), response.outcome, start_time);

    response.into_response()
}

/// Read the complete body, bounded by the router's `DefaultBodyLimit`.
async fn read_body(request: Request<Body>, limit: usize) -> Result<Bytes, Rejection> {
    Bytes::from_request(request, &()).await.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Rejection::BodyTooLarge { limit }
        } else {
            Rejection::UnreadableBody
        }
    })
}
