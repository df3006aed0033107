use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::comment::Comment;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// 新闻源返回的文章，网关只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    #[serde(rename = "content", alias = "body")]
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// 文章 + 评论的聚合视图，每次请求临时构建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedView {
    pub article: Article,
    pub comments: Vec<Comment>,
}

/// `GET /news` 的原始查询参数，数值保持字符串以便宽松解析
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
}

/// 规范化后转发给新闻源的列表参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingParams {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl ListingParams {
    pub fn from_query(query: &NewsQuery) -> Self {
        let page = parse_number(query.page.as_deref());
        let page_size = parse_number(query.page_size.as_deref());

        Self {
            page: clamp_page(page),
            page_size: clamp_page_size(page_size),
            search: query
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// 转发给新闻源的查询串参数
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// `page < 1` 或无法解析时取 1
pub fn clamp_page(page: Option<i64>) -> u32 {
    match page {
        Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
        _ => DEFAULT_PAGE,
    }
}

/// `page_size` 不在 `[1, 100]` 内时取默认值 10
pub fn clamp_page_size(page_size: Option<i64>) -> u32 {
    match page_size {
        Some(size) if (1..=i64::from(MAX_PAGE_SIZE)).contains(&size) => size as u32,
        _ => DEFAULT_PAGE_SIZE,
    }
}
