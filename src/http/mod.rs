//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, body buffering, blocking pool dispatch)
//!     → handler.rs (method gate, form decoding, optimizer call)
//!         → request.rs (contract validation, defaults)
//!         → response.rs (output mode selection, report formatting)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use handler::handle;
pub use request::{CompileRequest, OutputInfo, RequestPolicy};
pub use request_id::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::HttpResponse;
pub use server::HttpServer;
