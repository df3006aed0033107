use crate::{
    config::Config,
    error::{AppError, Result},
    models::{article::MAX_PAGE_SIZE, Comment, CreateCommentRequest, Pagination},
    services::downstream::{self, Downstream},
    utils::middleware::RequestId,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 评论服务客户端
#[derive(Clone)]
pub struct CommentStoreClient {
    http_client: Client,
    base_url: String,
    call_timeout: Duration,
}

/// 一页评论及评论服务返回的分页信息
#[derive(Debug, Clone)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub pagination: Option<Pagination>,
}

impl CommentStoreClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http_client: downstream::build_client(config.downstream_timeout)?,
            base_url: config.comment_service_url.clone(),
            call_timeout: config.downstream_timeout,
        })
    }

    /// POST /comments
    pub async fn create_comment(
        &self,
        request: &CreateCommentRequest,
        request_id: &RequestId,
    ) -> Result<Comment> {
        debug!("[{}] Persisting comment for article {}", request_id, request.news_id);

        let builder = self
            .http_client
            .post(downstream::endpoint(&self.base_url, "/comments"))
            .json(request);

        let response = downstream::send(Downstream::CommentStore, builder, request_id).await?;
        // 父评论不存在等裁决由评论服务给出，作为客户端错误转发
        let response = downstream::relay_rejection(Downstream::CommentStore, response).await?;
        let envelope = downstream::read_envelope(Downstream::CommentStore, response).await?;

        let comment: Comment = envelope
            .decode_one()
            .map_err(|e| AppError::unavailable(Downstream::CommentStore, e))?;

        info!("[{}] Comment {} stored for article {}", request_id, comment.id, comment.article_id);
        Ok(comment)
    }

    /// GET /comments?news_id&page&page_size
    pub async fn list_comments(
        &self,
        article_id: i64,
        page: u32,
        page_size: u32,
        request_id: &RequestId,
    ) -> Result<CommentPage> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        debug!(
            "[{}] Listing comments for article {} page={} page_size={}",
            request_id, article_id, page, page_size
        );

        let builder = self
            .http_client
            .get(downstream::endpoint(&self.base_url, "/comments"))
            .query(&[
                ("news_id", article_id.to_string()),
                ("page", page.to_string()),
                ("page_size", page_size.to_string()),
            ]);

        let response = downstream::send(Downstream::CommentStore, builder, request_id).await?;
        let envelope = downstream::read_envelope(Downstream::CommentStore, response).await?;
        let pagination = envelope.pagination;

        let comments = envelope
            .decode_many::<Comment>()
            .map_err(|e| AppError::unavailable(Downstream::CommentStore, e))?;

        Ok(CommentPage { comments, pagination })
    }

    /// 取回文章的全部评论：按最大页长逐页读取，整体受单次调用超时约束
    pub async fn list_all_comments(&self, article_id: i64, request_id: &RequestId) -> Result<Vec<Comment>> {
        let walk = async {
            let mut comments = Vec::new();
            let mut page = 1;

            loop {
                let batch = self
                    .list_comments(article_id, page, MAX_PAGE_SIZE, request_id)
                    .await?;
                let fetched = batch.comments.len();
                comments.extend(batch.comments);

                let more = match batch.pagination {
                    Some(pagination) => u64::from(page) < pagination.page_count,
                    None => false,
                };
                // 空页也终止，避免分页信息异常时无限翻页
                if !more || fetched == 0 {
                    break;
                }
                page += 1;
            }

            Ok::<_, AppError>(comments)
        };

        let comments = tokio::time::timeout(self.call_timeout, walk)
            .await
            .map_err(|_| AppError::unavailable(Downstream::CommentStore, "timed out"))??;

        if let Some(stray) = comments.iter().find(|c| c.article_id != article_id) {
            warn!(
                "[{}] Comment {} belongs to article {}, expected {}",
                request_id, stray.id, stray.article_id, article_id
            );
            return Err(AppError::unavailable(
                Downstream::CommentStore,
                format!("comment {} does not belong to article {}", stray.id, article_id),
            ));
        }

        Ok(comments)
    }

    /// DELETE /comments/{id}
    pub async fn delete_comment(&self, comment_id: i64, request_id: &RequestId) -> Result<String> {
        debug!("[{}] Deleting comment {}", request_id, comment_id);

        let builder = self
            .http_client
            .delete(downstream::endpoint(&self.base_url, &format!("/comments/{}", comment_id)));

        let response = downstream::send(Downstream::CommentStore, builder, request_id).await?;
        let envelope = downstream::read_envelope(Downstream::CommentStore, response).await?;

        envelope
            .decode_one::<String>()
            .map_err(|e| AppError::unavailable(Downstream::CommentStore, e))
    }
}
