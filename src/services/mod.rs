pub mod downstream;
pub mod news;
pub mod comments;
pub mod moderation;
pub mod gateway;

// 重新导出常用类型
pub use downstream::Downstream;
pub use news::NewsClient;
pub use comments::CommentStoreClient;
pub use moderation::ModerationClient;
pub use gateway::GatewayService;
