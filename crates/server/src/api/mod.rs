use converter::{ConvertError, Converter};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ConvertResponse, VariableSummary},
};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ApiContext {
    pub max_source_bytes: usize,
}

pub fn convert_route() -> &'static str {
    "/api/convert"
}

pub fn convert_source(ctx: &ApiContext, source: &str) -> Result<ConvertResponse, ApiError> {
    validate_source(ctx, source)?;

    let assembly = Converter::new(source).assemble().map_err(|err| {
        debug!(line = err.line(), %err, "conversion rejected");
        conversion_error(err)
    })?;
    info!(
        source_bytes = source.len(),
        variables = assembly.variables().len(),
        "converted source"
    );

    let variables = assembly
        .variables()
        .iter()
        .map(|variable| VariableSummary {
            name: variable.name.clone(),
            initial: variable.initial,
        })
        .collect();
    Ok(ConvertResponse {
        assembly: assembly.into_listing(),
        variables,
    })
}

fn validate_source(ctx: &ApiContext, source: &str) -> Result<(), ApiError> {
    if source.trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "source cannot be empty",
        ));
    }
    if source.len() > ctx.max_source_bytes {
        return Err(ApiError::new(
            ErrorCode::PayloadTooLarge,
            format!("source exceeds {} bytes", ctx.max_source_bytes),
        ));
    }
    Ok(())
}

fn conversion_error(err: ConvertError) -> ApiError {
    ApiError::new(ErrorCode::Conversion, err.to_string()).at_line(err.line())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
