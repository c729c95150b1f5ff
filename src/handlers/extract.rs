use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON body extractor whose rejection is an `AppError`.
#[derive(Debug)]
pub struct AdminJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AdminJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string extractor whose rejection is an `AppError`.
#[derive(Debug)]
pub struct AdminQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AdminQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "json body rejected");
        let message = match rejection {
            JsonRejection::JsonDataError(_) => "请求参数格式错误",
            JsonRejection::JsonSyntaxError(_) => "请求体不是合法的 JSON",
            JsonRejection::MissingJsonContentType(_) => "请求类型必须为 application/json",
            _ => "请求体无法读取",
        };
        AppError::Validation(message.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "query string rejected");
        AppError::Validation("查询参数格式错误".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_syntax_error_becomes_validation() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("not json"))
            .unwrap();

        let err = AdminJson::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();
        let (status, msg) = err.status_and_message();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "请求体不是合法的 JSON");
    }

    #[tokio::test]
    async fn test_missing_content_type_becomes_validation() {
        let req = Request::builder()
            .method("POST")
            .body(axum::body::Body::from("{}"))
            .unwrap();

        let err = AdminJson::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("application/json")));
    }
}
