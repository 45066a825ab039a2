//! Form body decoding.
//!
//! # Data Flow
//! ```text
//! raw request body (bytes)
//!     → split on '&' into definitions
//!     → split each definition on the first '='
//!     → name kept literally, value percent-decoded
//!     → ParameterMap (name → ordered values)
//! ```
//!
//! # Design Decisions
//! - Names are never percent-decoded; clients of the compiler API rely on it
//! - Decoding never fails: malformed escapes pass through literally
//! - Empty definitions (`a=1&&b=2`, trailing `&`) are skipped

pub mod params;

pub use params::ParameterMap;
