//! Mapping between internal error kinds and each transport's status
//! language. Transport concerns stop here; the pipeline and tenancy crates
//! know nothing about gRPC codes or HTTP statuses.

use axum::http::StatusCode;
use tonic::Status;

use tracevault_pipeline::PipelineError;
use tracevault_tenancy::TenancyError;

use crate::consumer::ConsumeError;

pub fn to_grpc_status(err: &ConsumeError) -> Status {
    match err {
        ConsumeError::Tenancy(err) => Status::permission_denied(err.to_string()),
        ConsumeError::Pipeline(PipelineError::QueueFull) => {
            Status::resource_exhausted("span queue is full, retry with backoff")
        }
        ConsumeError::Pipeline(PipelineError::Cancelled) => {
            Status::cancelled("submission cancelled")
        }
        ConsumeError::Pipeline(PipelineError::Closed) => {
            Status::unavailable("collector is shutting down")
        }
    }
}

pub fn to_http_status(err: &ConsumeError) -> (StatusCode, String) {
    let code = match err {
        ConsumeError::Tenancy(TenancyError::MissingTenant) => StatusCode::UNAUTHORIZED,
        ConsumeError::Tenancy(_) => StatusCode::FORBIDDEN,
        ConsumeError::Pipeline(PipelineError::QueueFull) => StatusCode::TOO_MANY_REQUESTS,
        ConsumeError::Pipeline(PipelineError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
        ConsumeError::Pipeline(PipelineError::Cancelled) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, err.to_string())
}
