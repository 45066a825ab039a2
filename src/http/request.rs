//! Compile request validation.
//!
//! # Responsibilities
//! - Check the recognized parameters in contract order
//! - Apply defaults for the optional parameters
//! - Select the source text (first `js_code` value wins)

use crate::error::{Rejection, RequestResult};
use crate::form::ParameterMap;
use crate::optimizer::CompilationLevel;

pub const JS_CODE: &str = "js_code";
pub const OUTPUT_FORMAT: &str = "output_format";
pub const COMPILATION_LEVEL: &str = "compilation_level";
pub const OUTPUT_INFO: &str = "output_info";

/// The only `output_format` this service produces.
pub const TEXT_FORMAT: &str = "text";

/// What the response body carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputInfo {
    #[default]
    CompiledCode,
    Errors,
}

impl OutputInfo {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "compiled_code" => Some(Self::CompiledCode),
            "errors" => Some(Self::Errors),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompiledCode => "compiled_code",
            Self::Errors => "errors",
        }
    }
}

/// How strictly requests are checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestPolicy {
    /// Reject unknown `compilation_level` values instead of compiling
    /// without optimization passes.
    pub strict_compilation_level: bool,
}

/// A validated compile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub source: String,
    /// `None` when the client named a level the optimizer does not know.
    pub compilation_level: Option<CompilationLevel>,
    pub output_info: OutputInfo,
}

impl CompileRequest {
    /// Build a request from decoded form parameters.
    ///
    /// Checks run in a fixed order so a request with several problems is
    /// always rejected for the same one: `js_code`, then `output_format`,
    /// `compilation_level` and `output_info`.
    pub fn from_params(params: &ParameterMap, policy: RequestPolicy) -> RequestResult<Self> {
        let source = params.first(JS_CODE).ok_or(Rejection::MissingSource)?;

        if let Some(format) = params.first(OUTPUT_FORMAT) {
            if format != TEXT_FORMAT {
                return Err(Rejection::UnsupportedOutputFormat(format.to_string()));
            }
        }

        let compilation_level = match params.first(COMPILATION_LEVEL) {
            None => Some(CompilationLevel::default()),
            Some(value) => match CompilationLevel::parse(value) {
                Some(level) => Some(level),
                None if policy.strict_compilation_level => {
                    return Err(Rejection::UnknownCompilationLevel(value.to_string()))
                }
                None => {
                    tracing::debug!(
                        compilation_level = %value,
                        "Unknown compilation level, no passes applied"
                    );
                    None
                }
            },
        };

        let output_info = match params.first(OUTPUT_INFO) {
            None => OutputInfo::default(),
            Some(value) => OutputInfo::parse(value)
                .ok_or_else(|| Rejection::UnsupportedOutputInfo(value.to_string()))?,
        };

        Ok(Self {
            source: source.to_string(),
            compilation_level,
            output_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> RequestResult<CompileRequest> {
        let params = ParameterMap::decode(body.as_bytes());
        CompileRequest::from_params(&params, RequestPolicy::default())
    }

    #[test]
    fn test_defaults() {
        let request = parse("js_code=a()").unwrap();
        assert_eq!(request.source, "a()");
        assert_eq!(request.compilation_level, Some(CompilationLevel::SimpleOptimizations));
        assert_eq!(request.output_info, OutputInfo::CompiledCode);
    }

    #[test]
    fn test_missing_source() {
        assert_eq!(parse("output_info=errors"), Err(Rejection::MissingSource));
        assert_eq!(parse(""), Err(Rejection::MissingSource));
    }

    #[test]
    fn test_empty_source_is_present() {
        assert_eq!(parse("js_code").unwrap().source, "");
        assert_eq!(parse("js_code=").unwrap().source, "");
    }

    #[test]
    fn test_output_format() {
        assert!(parse("js_code=a&output_format=text").is_ok());
        assert_eq!(
            parse("js_code=a&output_format=html"),
            Err(Rejection::UnsupportedOutputFormat("html".into()))
        );
        assert_eq!(
            parse("js_code=a&output_format=TEXT"),
            Err(Rejection::UnsupportedOutputFormat("TEXT".into()))
        );
        // Only the first value counts.
        assert!(parse("js_code=a&output_format=text&output_format=json").is_ok());
    }

    #[test]
    fn test_first_source_wins() {
        assert_eq!(parse("js_code=first()&js_code=second()").unwrap().source, "first()");
    }

    #[test]
    fn test_levels() {
        assert_eq!(
            parse("js_code=a&compilation_level=WHITESPACE_ONLY").unwrap().compilation_level,
            Some(CompilationLevel::WhitespaceOnly)
        );
        assert_eq!(
            parse("js_code=a&compilation_level=ADVANCED_OPTIMIZATIONS").unwrap().compilation_level,
            Some(CompilationLevel::AdvancedOptimizations)
        );
        assert_eq!(parse("js_code=a&compilation_level=FAST").unwrap().compilation_level, None);
    }

    #[test]
    fn test_strict_level_policy() {
        let params = ParameterMap::decode(b"js_code=a&compilation_level=FAST&output_info=bogus");
        let policy = RequestPolicy {
            strict_compilation_level: true,
        };
        assert_eq!(
            CompileRequest::from_params(&params, policy),
            Err(Rejection::UnknownCompilationLevel("FAST".into()))
        );
    }

    #[test]
    fn test_output_info() {
        assert_eq!(parse("js_code=a&output_info=errors").unwrap().output_info, OutputInfo::Errors);
        assert_eq!(
            parse("js_code=a&output_info=warnings"),
            Err(Rejection::UnsupportedOutputInfo("warnings".into()))
        );
    }

    #[test]
    fn test_check_order() {
        assert_eq!(parse("output_format=html"), Err(Rejection::MissingSource));
        assert_eq!(
            parse("js_code=a&output_format=html&output_info=bogus"),
            Err(Rejection::UnsupportedOutputFormat("html".into()))
        );
    }
}
