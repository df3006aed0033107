use crate::{
    config::Config,
    error::{AppError, Result},
    models::comment::ModerationRequest,
    services::downstream::{self, Downstream},
    utils::middleware::RequestId,
};
use reqwest::Client;
use tracing::{debug, info};

/// 审核服务客户端
#[derive(Clone)]
pub struct ModerationClient {
    http_client: Client,
    base_url: String,
}

impl ModerationClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http_client: downstream::build_client(config.downstream_timeout)?,
            base_url: config.moderation_service_url.clone(),
        })
    }

    /// POST /check
    ///
    /// 审核服务以非 2xx 状态表示文本含违禁词，映射为 `ContentRejected`；
    /// 连接失败、超时或无法解析的应答表示无法完成审核。
    pub async fn check(&self, text: &str, request_id: &RequestId) -> Result<()> {
        debug!("[{}] Moderating comment text ({} chars)", request_id, text.chars().count());

        let request = self
            .http_client
            .post(downstream::endpoint(&self.base_url, "/check"))
            .json(&ModerationRequest { text });

        let response = downstream::send(Downstream::Moderator, request, request_id).await?;

        if !response.status().is_success() {
            info!(
                "[{}] Comment rejected by moderation (status {})",
                request_id,
                response.status().as_u16()
            );
            return Err(AppError::ContentRejected);
        }

        let envelope = downstream::read_raw_envelope(Downstream::Moderator, response).await?;

        // 2xx 但信封状态为 error 同样表示未通过审核
        if !envelope.status.is_success() {
            info!(
                "[{}] Comment rejected by moderation: {}",
                request_id,
                envelope.error.as_deref().unwrap_or("no reason given")
            );
            return Err(AppError::ContentRejected);
        }

        Ok(())
    }
}
