use crate::{
    config::Config,
    error::{AppError, Result},
    models::{Article, Envelope, ListingParams},
    services::downstream::{self, Downstream},
    utils::middleware::RequestId,
};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// 新闻源客户端
#[derive(Clone)]
pub struct NewsClient {
    http_client: Client,
    base_url: String,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http_client: downstream::build_client(config.downstream_timeout)?,
            base_url: config.news_service_url.clone(),
        })
    }

    /// GET /news?page&page_size&search
    ///
    /// `data` 只用于校验，返回的是新闻源的原始信封（状态、分页、`data` 是否存在都保持不变）
    pub async fn list_articles(
        &self,
        params: &ListingParams,
        request_id: &RequestId,
    ) -> Result<Envelope<Value>> {
        debug!(
            "[{}] Listing articles page={} page_size={} search={:?}",
            request_id, params.page, params.page_size, params.search
        );

        let request = self
            .http_client
            .get(downstream::endpoint(&self.base_url, "/news"))
            .query(&params.to_query_pairs());

        let response = downstream::send(Downstream::NewsSource, request, request_id).await?;
        let envelope = downstream::read_envelope(Downstream::NewsSource, response).await?;

        let articles = envelope
            .clone()
            .decode_many::<Article>()
            .map_err(|e| AppError::unavailable(Downstream::NewsSource, e))?;

        debug!("[{}] Relaying {} articles", request_id, articles.len());
        Ok(envelope)
    }

    /// GET /news/{id}
    pub async fn get_article(&self, article_id: i64, request_id: &RequestId) -> Result<Article> {
        debug!("[{}] Fetching article {}", request_id, article_id);

        let request = self
            .http_client
            .get(downstream::endpoint(&self.base_url, &format!("/news/{}", article_id)));

        let response = downstream::send(Downstream::NewsSource, request, request_id).await?;
        let envelope = downstream::read_envelope(Downstream::NewsSource, response).await?;

        let article: Article = envelope
            .decode_one()
            .map_err(|e| AppError::unavailable(Downstream::NewsSource, e))?;

        if article.id != article_id {
            return Err(AppError::unavailable(
                Downstream::NewsSource,
                format!("requested article {} but received {}", article_id, article.id),
            ));
        }

        Ok(article)
    }
}
