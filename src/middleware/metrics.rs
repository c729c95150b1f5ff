use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{errors::ErrorKind, handlers::AppState};

/// Counts error responses by `AppError` kind. Errors raised outside the
/// handlers (unknown route, wrong method) fall back to their status class.
pub async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let status = response.status();
    if let Some(ErrorKind(kind)) = response.extensions().get::<ErrorKind>() {
        state.metrics.record_error(kind);
    } else if status.is_server_error() {
        state.metrics.record_error("server_error");
    } else if status.is_client_error() {
        state.metrics.record_error("client_error");
    }

    response
}
