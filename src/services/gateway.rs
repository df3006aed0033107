//! Request orchestration: the concurrent article + comments read, the listing
//! proxy and the moderate-then-persist comment pipeline.

use crate::{
    config::Config,
    error::{AppError, Result},
    models::{AggregatedView, Comment, CreateCommentRequest, Envelope, ListingParams, NewsQuery},
    services::{CommentStoreClient, ModerationClient, NewsClient},
    utils::middleware::RequestId,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct GatewayService {
    news: NewsClient,
    comments: CommentStoreClient,
    moderation: ModerationClient,
    max_search_length: usize,
}

impl GatewayService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            news: NewsClient::new(config)?,
            comments: CommentStoreClient::new(config)?,
            moderation: ModerationClient::new(config)?,
            max_search_length: config.max_search_length,
        })
    }

    /// 文章列表代理：规范化分页参数后原样转发新闻源的信封
    pub async fn list_news(
        &self,
        query: &NewsQuery,
        request_id: &RequestId,
    ) -> Result<Envelope<Value>> {
        if let Some(search) = &query.search {
            if search.chars().count() > self.max_search_length {
                return Err(AppError::bad_request("Search query too long"));
            }
        }

        let params = ListingParams::from_query(query);
        self.news.list_articles(&params, request_id).await
    }

    /// 解析路径中的文章 ID，非法或非正数直接拒绝
    pub fn parse_article_id(raw: &str) -> Result<i64> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(AppError::bad_request("Invalid news ID")),
        }
    }

    /// 并发获取文章和评论，两者都成功才返回聚合视图
    pub async fn article_view(&self, article_id: i64, request_id: &RequestId) -> Result<AggregatedView> {
        debug!("[{}] Fan-out for article {}", request_id, article_id);

        // try_join! 同时驱动两个调用；任一失败立即返回，另一个被丢弃
        let (article, comments) = tokio::try_join!(
            self.news.get_article(article_id, request_id),
            self.comments.list_all_comments(article_id, request_id),
        )
        .map_err(|e| {
            match e.downstream() {
                Some(service) => warn!(
                    "[{}] Aggregation for article {} failed at {}: {}",
                    request_id, article_id, service, e
                ),
                None => warn!("[{}] Aggregation for article {} failed: {}", request_id, article_id, e),
            }
            e
        })?;

        info!(
            "[{}] Aggregated article {} with {} comments",
            request_id,
            article.id,
            comments.len()
        );

        Ok(AggregatedView { article, comments })
    }

    /// 两阶段写入：先审核，通过后再持久化，中间不做补偿
    pub async fn submit_comment(
        &self,
        request: CreateCommentRequest,
        request_id: &RequestId,
    ) -> Result<Comment> {
        request.validate()?;

        // Stage 1
        self.moderation.check(&request.text, request_id).await?;

        // Stage 2
        let comment = self
            .comments
            .create_comment(&request, request_id)
            .await
            .map_err(|e| {
                error!(
                    "[{}] Comment for article {} passed moderation but was not stored: {}",
                    request_id, request.news_id, e
                );
                e
            })?;

        Ok(comment)
    }
}
