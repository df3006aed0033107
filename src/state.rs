use crate::{
    config::Config,
    error::Result,
    services::GatewayService,
};

/// 应用程序的共享状态
/// 每个请求只读访问，不含可变共享数据
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 请求编排服务
    pub gateway: GatewayService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let gateway = GatewayService::new(&config)?;
        Ok(Self { config, gateway })
    }
}
