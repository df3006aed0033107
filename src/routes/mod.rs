pub mod comments;
pub mod health;
pub mod news;

use crate::{
    config::Config,
    error::handle_timeout_error,
    state::AppState,
    utils::middleware::{request_id_middleware, request_logging_middleware, REQUEST_ID_HEADER},
};
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// 构建网关路由及其中间件栈
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);
    let request_timeout = state.config.request_timeout;

    Router::new()
        .merge(health::router())
        .nest("/news", news::router())
        .nest("/comment", comments::router())
        // 整个请求的总超时，超时后未完成的下游调用随 future 一起被丢弃
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 配置 CORS
fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config.cors_allowed_origins.trim();
    let allow_origin = if origins.is_empty() || origins == "*" {
        AllowOrigin::from(Any)
    } else {
        let parsed = origins
            .split(',')
            .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}
