//! The compile request pipeline.
//!
//! `handle` is a pure function of the method and body, composed with exactly
//! one call to a freshly created optimizer.

use crate::error::Rejection;
use crate::form::ParameterMap;
use crate::http::request::{CompileRequest, RequestPolicy};
use crate::http::response::HttpResponse;
use crate::optimizer::OptimizerFactory;

pub fn is_post(method: &str) -> bool {
    method.eq_ignore_ascii_case("POST")
}

/// Validate, compile and format one request.
pub fn handle(
    method: &str,
    body: &[u8],
    factory: &dyn OptimizerFactory,
    policy: RequestPolicy,
) -> HttpResponse {
    if !is_post(method) {
        return HttpResponse::rejected(&Rejection::MethodNotAllowed(method.to_string()));
    }

    let params = ParameterMap::decode(body);
    let request = match CompileRequest::from_params(&params, policy) {
        Ok(request) => request,
        Err(rejection) => {
            tracing::debug!(reason = %rejection, "Request rejected");
            return HttpResponse::rejected(&rejection);
        }
    };

    let mut optimizer = factory.create();
    let outcome = optimizer.optimize(&request.source, request.compilation_level);

    tracing::debug!(
        source_bytes = request.source.len(),
        level = request.compilation_level.map(|l| l.as_str()).unwrap_or("none"),
        output_info = request.output_info.as_str(),
        errors = outcome.error_count(),
        warnings = outcome.warning_count(),
        "Compiled"
    );

    HttpResponse::from_outcome(outcome, request.output_info)
}
