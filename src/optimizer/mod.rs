//! Source optimization subsystem.
//!
//! # Data Flow
//! ```text
//! OptimizerFactory (shared, one per server)
//!     → create() a fresh Optimizer per request
//!     → optimize(source, level)
//!         → lexer.rs (tokens + lexical errors)
//!         → minify.rs (bracket checks, warnings, passes, printing)
//!     → CompileOutcome (output text or diagnostics)
//! ```
//!
//! # Design Decisions
//! - An optimizer owns its diagnostic state; instances are never shared
//!   between requests, the factory is
//! - An unknown optimization level is not an error here: it means no
//!   optimization passes, only compact reprinting

pub mod lexer;
pub mod minify;

pub use minify::{Minifier, MinifierFactory};

/// Name under which diagnostics cite the submitted source.
pub const INPUT_NAME: &str = "input.js";

/// Optimization preset selected by `compilation_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompilationLevel {
    WhitespaceOnly,
    #[default]
    SimpleOptimizations,
    AdvancedOptimizations,
}

impl CompilationLevel {
    /// Parse the exact wire name of a level.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WHITESPACE_ONLY" => Some(Self::WhitespaceOnly),
            "SIMPLE_OPTIMIZATIONS" => Some(Self::SimpleOptimizations),
            "ADVANCED_OPTIMIZATIONS" => Some(Self::AdvancedOptimizations),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhitespaceOnly => "WHITESPACE_ONLY",
            Self::SimpleOptimizations => "SIMPLE_OPTIMIZATIONS",
            Self::AdvancedOptimizations => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

/// Result of one optimizer invocation.
///
/// `output` is empty whenever `errors` is not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutcome {
    pub output: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CompileOutcome {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// True when the optimizer reported no errors.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A source-to-source optimizer.
///
/// Implementations may accumulate diagnostics across the call, so an
/// instance serves exactly one request.
pub trait Optimizer {
    /// Optimize `source`. `None` means the requested level is not one the
    /// optimizer knows; no optimization passes are applied.
    fn optimize(&mut self, source: &str, level: Option<CompilationLevel>) -> CompileOutcome;
}

/// Produces an independently owned [`Optimizer`] for every request.
pub trait OptimizerFactory: Send + Sync {
    fn create(&self) -> Box<dyn Optimizer>;
}

impl<F> OptimizerFactory for F
where
    F: Fn() -> Box<dyn Optimizer> + Send + Sync,
{
    fn create(&self) -> Box<dyn Optimizer> {
        self()
    }
}
