use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::{convert::Infallible, fmt};
use tracing::{debug, info};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 最长接受的外部请求 ID，超出则重新生成
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// 关联 ID，由中间件生成并显式传递给每一次下游调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 复用调用方的 `X-Request-ID`，缺失或不合法时生成新的
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LENGTH)
            .filter(|v| v.chars().all(|c| c.is_ascii_graphic()))
            .map(Self::new)
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| RequestId::from_header(parts.headers.get(REQUEST_ID_HEADER))))
    }
}

/// 请求 ID 中间件：写入请求扩展并回写到响应头
pub async fn request_id_middleware<B>(mut request: Request<B>, next: Next<B>) -> Response {
    let request_id = RequestId::from_header(request.headers().get(REQUEST_ID_HEADER));
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// 请求日志中间件
pub async fn request_logging_middleware<B>(request: Request<B>, next: Next<B>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(ToString::to_string)
        .unwrap_or_default();

    let start_time = std::time::Instant::now();

    debug!("[{}] Incoming request: {} {}", request_id, method, uri);

    let response = next.run(request).await;

    let elapsed = start_time.elapsed();
    let status = response.status();

    info!(
        "[{}] Request completed: {} {} {} - {}ms",
        request_id,
        method,
        uri,
        status.as_u16(),
        elapsed.as_millis()
    );

    response
}
