use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid parameters")]
    InvalidParams,

    #[error("User not found")]
    UserNotFound,

    #[error("Plan not found")]
    PlanNotFound,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Save failed")]
    SaveFailed,

    #[error("Generation failed")]
    GenerateFailed,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Validation(_) => "validation",
            AppError::InvalidParams => "invalid_params",
            AppError::UserNotFound => "user_not_found",
            AppError::PlanNotFound => "plan_not_found",
            AppError::EmailInUse => "email_in_use",
            AppError::SaveFailed => "save_failed",
            AppError::GenerateFailed => "generate_failed",
            AppError::Internal(_) => "internal",
        }
    }

    /// Status code and the localized message shown to the operator.
    pub fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "数据库错误"),
            AppError::Validation(ref msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::InvalidParams => (StatusCode::INTERNAL_SERVER_ERROR, "参数错误"),
            AppError::UserNotFound => (StatusCode::INTERNAL_SERVER_ERROR, "用户不存在"),
            AppError::PlanNotFound => (StatusCode::INTERNAL_SERVER_ERROR, "订阅计划不存在"),
            AppError::EmailInUse => (StatusCode::INTERNAL_SERVER_ERROR, "邮箱已被使用"),
            AppError::SaveFailed => (StatusCode::INTERNAL_SERVER_ERROR, "保存失败"),
            AppError::GenerateFailed => (StatusCode::INTERNAL_SERVER_ERROR, "生成失败"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "服务器内部错误"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(ref e) => tracing::error!("Database error: {}", e),
            AppError::Internal(ref e) => tracing::error!("Internal error: {}", e),
            ref other => tracing::warn!(kind = other.kind(), "request rejected: {}", other),
        }
        let (status, error_message) = self.status_and_message();
        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(ErrorKind(self.kind()));
        response
    }
}

/// `AppError::kind` of an error response, readable by middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKind(pub &'static str);

/// Postgres reports unique constraint violations with SQLSTATE 23505.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_body_carries_localized_message() {
        let response = AppError::EmailInUse.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "邮箱已被使用");
        assert_eq!(body["status"], 500);
    }

    #[test]
    fn test_response_carries_error_kind() {
        let response = AppError::PlanNotFound.into_response();
        assert_eq!(
            response.extensions().get::<ErrorKind>(),
            Some(&ErrorKind("plan_not_found"))
        );
    }

    #[test]
    fn test_validation_is_client_error() {
        let err = AppError::Validation("bad filter".to_string());
        let (status, msg) = err.status_and_message();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "bad filter");
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = AppError::Internal(anyhow::anyhow!("connection reset by peer"));
        let (_, msg) = err.status_and_message();
        assert!(!msg.contains("connection"));
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
