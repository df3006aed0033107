#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use news_gateway::{build_router, AppState, Config};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use wiremock::MockServer;

/// 三个下游服务的模拟实例
pub struct Collaborators {
    pub news: MockServer,
    pub comments: MockServer,
    pub moderation: MockServer,
}

impl Collaborators {
    pub async fn start() -> Self {
        Self {
            news: MockServer::start().await,
            comments: MockServer::start().await,
            moderation: MockServer::start().await,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            news_service_url: self.news.uri(),
            comment_service_url: self.comments.uri(),
            moderation_service_url: self.moderation.uri(),
            request_timeout: Duration::from_secs(5),
            downstream_timeout: Duration::from_secs(2),
            ..Config::default()
        }
    }

    pub fn app(&self) -> Router {
        app_with(self.config())
    }
}

pub fn app_with(config: Config) -> Router {
    let state = AppState::new(config).expect("gateway state");
    build_router(Arc::new(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .expect("response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse { status, headers, body }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub fn article_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Новость {}", id),
        "content": format!("Это содержание новости {}", id),
        "created_at": "2023-01-15T10:30:00Z"
    })
}

pub fn comment_json(id: i64, news_id: i64, text: &str) -> Value {
    json!({
        "id": id,
        "news_id": news_id,
        "text": text,
        "created_at": "2024-03-01T12:00:00Z"
    })
}

pub fn success(data: Value) -> Value {
    json!({ "status": "success", "data": data })
}

pub fn paginated(data: Value, page: u32, page_size: u32, total: u64) -> Value {
    let pagination = news_gateway::models::Pagination::new(page, page_size, total);
    json!({ "status": "success", "data": data, "pagination": pagination })
}
