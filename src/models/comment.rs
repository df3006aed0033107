use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

pub const MAX_COMMENT_LENGTH: u64 = 1000;

/// 评论服务持有的评论，网关不保存副本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "news_id")]
    pub article_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /comment` 请求体，同时也是转发给评论服务的载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(range(min = 1, message = "news_id must be a positive integer"))]
    pub news_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "parent_id must be a positive integer"))]
    pub parent_id: Option<i64>,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "text must be between 1 and 1000 characters"
    ))]
    pub text: String,
}

/// 审核服务的请求体
#[derive(Debug, Clone, Serialize)]
pub struct ModerationRequest<'a> {
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(text: String) -> CreateCommentRequest {
        CreateCommentRequest {
            news_id: 5,
            parent_id: None,
            text,
        }
    }

    #[test]
    fn test_text_length_boundaries() {
        assert!(request("a".repeat(MAX_COMMENT_LENGTH as usize)).validate().is_ok());
        assert!(request("a".repeat(MAX_COMMENT_LENGTH as usize + 1)).validate().is_err());
        assert!(request(String::new()).validate().is_err());
        assert!(request("hello".to_string()).validate().is_ok());
    }

    #[test]
    fn test_text_length_counts_characters() {
        // 1000 个西里尔字母超过 1000 字节，但仍是 1000 个字符
        let text = "й".repeat(1000);
        assert!(text.len() > 1000);
        assert!(request(text).validate().is_ok());
    }

    #[test]
    fn test_ids_must_be_positive() {
        let mut req = request("hi".to_string());
        req.news_id = 0;
        assert!(req.validate().is_err());

        let mut req = request("hi".to_string());
        req.parent_id = Some(-3);
        assert!(req.validate().is_err());

        let mut req = request("hi".to_string());
        req.parent_id = Some(9999);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_forwarded_payload_omits_missing_parent() {
        let value = serde_json::to_value(request("hello".to_string())).unwrap();
        assert_eq!(value, json!({"news_id": 5, "text": "hello"}));
    }

    #[test]
    fn test_comment_wire_format() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 42,
            "news_id": 5,
            "text": "hello",
            "created_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(comment.article_id, 5);
        assert_eq!(comment.parent_id, None);

        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["news_id"], 5);
        assert!(value.get("parent_id").is_none());
        assert!(value.get("article_id").is_none());
    }
}
