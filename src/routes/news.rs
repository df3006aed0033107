use crate::{
    error::{AppError, Result},
    models::{AggregatedView, Envelope, NewsQuery},
    services::GatewayService,
    state::AppState,
    utils::middleware::RequestId,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_news))
        .route("/:id", get(get_news_by_id))
}

/// 获取新闻列表（分页 + 搜索）
/// GET /news
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    query: std::result::Result<Query<NewsQuery>, QueryRejection>,
) -> Result<Json<Envelope<Value>>> {
    let Query(query) = query.map_err(|e| {
        debug!("[{}] Rejected news query: {}", request_id, e);
        AppError::bad_request("Invalid query parameters")
    })?;
    debug!("[{}] Fetching news list with query: {:?}", request_id, query);

    let envelope = state.gateway.list_news(&query, &request_id).await?;
    Ok(Json(envelope))
}

/// 获取新闻详情及其全部评论
/// GET /news/:id
pub async fn get_news_by_id(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Result<Json<Envelope<AggregatedView>>> {
    let article_id = GatewayService::parse_article_id(&id)?;
    debug!("[{}] Fetching news {} with comments", request_id, article_id);

    let view = state.gateway.article_view(article_id, &request_id).await?;
    Ok(Json(Envelope::success(view)))
}
