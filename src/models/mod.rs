pub mod article;
pub mod comment;
pub mod response;

// 重新导出常用类型
pub use article::{AggregatedView, Article, ListingParams, NewsQuery};
pub use comment::{Comment, CreateCommentRequest};
pub use response::{Envelope, EnvelopeStatus, Pagination};
