use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Body of a successful admin call: either a JSON payload or a raw document
/// written verbatim (the batch generation CSV).
#[derive(Debug)]
pub enum AdminResponse {
    Payload(serde_json::Value),
    Document {
        content_type: &'static str,
        body: String,
    },
}

impl IntoResponse for AdminResponse {
    fn into_response(self) -> Response {
        match self {
            AdminResponse::Payload(value) => (StatusCode::OK, Json(value)).into_response(),
            AdminResponse::Document { content_type, body } => {
                (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
        }
    }
}
