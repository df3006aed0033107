use crate::{
    error::{AppError, Result},
    models::{Comment, CreateCommentRequest, Envelope},
    state::AppState,
    utils::middleware::RequestId,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;
use tracing::{debug, info};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_comment))
}

/// 创建评论：先审核再写入评论服务
/// POST /comment
async fn create_comment(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    payload: std::result::Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<Json<Envelope<Comment>>> {
    let Json(request) = payload.map_err(|e| {
        debug!("[{}] Rejected comment body: {}", request_id, e);
        AppError::bad_request("Invalid request body")
    })?;

    let comment = state.gateway.submit_comment(request, &request_id).await?;

    info!("[{}] Comment {} created", request_id, comment.id);
    Ok(Json(Envelope::success(comment)))
}
