//! Shared transport helpers for the gateway's downstream collaborators.
//!
//! Every collaborator speaks the same envelope contract, so the status-code
//! mapping and envelope decoding live here rather than in each client.

use std::{fmt, time::Duration};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{AppError, Result},
    models::Envelope,
    utils::middleware::{RequestId, REQUEST_ID_HEADER},
};

/// 下游服务标识，用于错误归因和日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Downstream {
    NewsSource,
    CommentStore,
    Moderator,
}

impl fmt::Display for Downstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewsSource => "news source",
            Self::CommentStore => "comment store",
            Self::Moderator => "moderation service",
        };
        f.write_str(name)
    }
}

/// 构建带单次调用超时的 HTTP 客户端
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// 拼接服务根地址和路径
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// 附加关联 ID 后发送请求，传输层错误归因到对应服务
pub async fn send(
    service: Downstream,
    request: RequestBuilder,
    request_id: &RequestId,
) -> Result<Response> {
    request
        .header(REQUEST_ID_HEADER, request_id.as_str())
        .send()
        .await
        .map_err(|e| map_transport_error(service, e))
}

/// 读取响应并解码信封；404 映射为 NotFound，其他非 2xx 状态视为下游失败，
/// 信封状态为 error 时同样视为下游失败
pub async fn read_envelope(service: Downstream, response: Response) -> Result<Envelope<Value>> {
    let envelope = read_raw_envelope(service, response).await?;

    if !envelope.status.is_success() {
        let message = envelope
            .error
            .unwrap_or_else(|| "envelope reported an error".to_string());
        warn!("{} returned an error envelope: {}", service, message);
        return Err(AppError::unavailable(service, message));
    }

    Ok(envelope)
}

/// 只做状态码映射和信封解析，不检查信封内的 `status`
pub async fn read_raw_envelope(service: Downstream, response: Response) -> Result<Envelope<Value>> {
    let status = response.status();
    let path = response.url().path().to_string();
    let body = response
        .bytes()
        .await
        .map_err(|e| map_transport_error(service, e))?;

    debug!("{} responded {} for {}", service, status.as_u16(), path);

    if !status.is_success() {
        return Err(map_status_error(service, status, &body));
    }

    serde_json::from_slice(&body)
        .map_err(|e| AppError::unavailable(service, format!("malformed envelope: {}", e)))
}

pub fn map_transport_error(service: Downstream, error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::unavailable(service, "timed out")
    } else if error.is_connect() {
        AppError::unavailable(service, format!("connection failed: {}", error))
    } else {
        AppError::unavailable(service, error.to_string())
    }
}

pub fn map_status_error(service: Downstream, status: StatusCode, body: &[u8]) -> AppError {
    let detail = error_message(body);
    let message = match &detail {
        Some(detail) => format!("status {}: {}", status.as_u16(), detail),
        None => format!("status {}", status.as_u16()),
    };

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(detail.unwrap_or(message)),
        _ => AppError::unavailable(service, message),
    }
}

/// 写入路径使用：下游对请求内容的 4xx 裁决（404、408 除外）原样转给客户端，
/// 其余响应交给 `read_envelope` 处理
pub async fn relay_rejection(service: Downstream, response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_client_error()
        || status == StatusCode::NOT_FOUND
        || status == StatusCode::REQUEST_TIMEOUT
    {
        return Ok(response);
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| map_transport_error(service, e))?;
    let message = error_message(&body).unwrap_or_else(|| format!("status {}", status.as_u16()));

    warn!("{} rejected the request with status {}: {}", service, status.as_u16(), message);
    Err(AppError::DownstreamRejected { service, message })
}

/// 提取错误信息：优先取信封的 `error` 字段，否则使用纯文本响应体
pub fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(envelope) = serde_json::from_slice::<Envelope<Value>>(body) {
        if let Some(error) = envelope.error.filter(|e| !e.trim().is_empty()) {
            return Some(error.trim().to_string());
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    const MAX_PREVIEW: usize = 200;
    Some(text.chars().take(MAX_PREVIEW).collect())
}
