use std::{future::Future, io, net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use news_gateway::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 初始化日志
    init_tracing(&config);

    info!("Starting API gateway...");
    info!(
        "Downstream services: news={} comments={} moderation={}",
        config.news_service_url, config.comment_service_url, config.moderation_service_url
    );

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;

    // 创建应用状态
    let app_state = Arc::new(AppState::new(config)?);
    let app = build_router(app_state);

    info!("API Gateway listening on http://{}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API Gateway stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(&config.log_level);
    let json = config.is_production()
        || std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
    info!("Shutting down API gateway...");
}

/// 监听失败时永不返回，服务器继续运行
async fn wait_for_signal(signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
