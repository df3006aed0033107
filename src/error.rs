use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::{models::Envelope, services::downstream::Downstream};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidatorError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Comment contains forbidden words")]
    ContentRejected,

    #[error("Not found: {0}")]
    NotFound(String),

    /// 下游服务拒绝了请求（非 404 的 4xx）
    #[error("{service} rejected the request: {message}")]
    DownstreamRejected { service: Downstream, message: String },

    /// 连接失败、超时、5xx 或信封格式错误
    #[error("{service} unavailable: {message}")]
    DownstreamUnavailable { service: Downstream, message: String },

    #[error("Request deadline exceeded")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::ValidatorError(e) => {
                let mut messages = e
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |error| match &error.message {
                            Some(message) => message.to_string(),
                            None => format!("{} is invalid", field),
                        })
                    })
                    .collect::<Vec<_>>();
                messages.sort();
                messages.join("; ")
            }
            AppError::ContentRejected => self.to_string(),
            AppError::DownstreamRejected { service, message } => {
                tracing::warn!("{} rejected request: {}", service, message);
                message.clone()
            }
            AppError::DownstreamUnavailable { service, message } => {
                tracing::error!("{} unavailable: {}", service, message);
                self.to_string()
            }
            AppError::Timeout => {
                tracing::error!("Request deadline exceeded");
                self.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        (self.status_code(), Json(Envelope::<Value>::error(error_message))).into_response()
    }
}

// 便利函数，用于创建常见错误
impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn unavailable(service: Downstream, message: impl Into<String>) -> Self {
        Self::DownstreamUnavailable {
            service,
            message: message.into(),
        }
    }

    /// 下游调用失败时对应的服务
    pub fn downstream(&self) -> Option<Downstream> {
        match self {
            Self::DownstreamRejected { service, .. }
            | Self::DownstreamUnavailable { service, .. } => Some(*service),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidatorError(_)
            | Self::BadRequest(_)
            | Self::ContentRejected
            | Self::DownstreamRejected { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DownstreamUnavailable { .. } | Self::Timeout | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// 总超时层的错误处理
pub async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}
