use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// 信封状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
    Ok,
}

impl EnvelopeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::Ok)
    }
}

/// 所有服务统一使用的响应信封
/// `{status, data, error, pagination}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Option<Pagination>) -> Self {
        Self {
            pagination,
            ..Self::success(data)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            error: Some(message.into()),
            pagination: None,
        }
    }
}

impl Envelope<Value> {
    pub fn ok() -> Self {
        Self {
            status: EnvelopeStatus::Ok,
            data: None,
            error: None,
            pagination: None,
        }
    }

    /// 将 `data` 严格解码为单个对象，缺失或结构不符都视为错误
    pub fn decode_one<T: DeserializeOwned>(self) -> Result<T, String> {
        match self.data {
            None | Some(Value::Null) => Err("envelope is missing `data`".to_string()),
            Some(Value::Array(_)) => Err("expected an object in `data`, got a sequence".to_string()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| format!("malformed `data`: {}", e)),
        }
    }

    /// 将 `data` 解码为列表；缺失或 null 表示空列表，单个对象视为一个元素
    pub fn decode_many<T: DeserializeOwned>(self) -> Result<Vec<T>, String> {
        let data = self.data.unwrap_or(Value::Null);
        let items: OneOrMany<T> = serde_json::from_value(data)
            .map_err(|e| format!("malformed `data`: {}", e))?;
        Ok(items.into_vec())
    }
}

/// 下游 `data` 字段可能出现的三种形态
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
    Empty(()),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
            Self::Empty(()) => Vec::new(),
        }
    }
}

/// 分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub page_count: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            page_count: page_count(total, page_size),
        }
    }
}

/// `ceil(total / page_size)`
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    let size = u64::from(page_size);
    (total + size - 1) / size
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    fn envelope(value: Value) -> Envelope<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_status_values() {
        let ok = envelope(json!({"status": "ok"}));
        assert!(ok.status.is_success());
        let err = envelope(json!({"status": "error", "error": "boom"}));
        assert!(!err.status.is_success());
        assert_eq!(err.error.as_deref(), Some("boom"));

        let unknown: Result<Envelope<Value>, _> =
            serde_json::from_value(json!({"status": "maybe"}));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_decode_one_requires_data() {
        let missing = envelope(json!({"status": "success"}));
        assert!(missing.decode_one::<Item>().is_err());

        let null = envelope(json!({"status": "success", "data": null}));
        assert!(null.decode_one::<Item>().is_err());

        let wrong_type = envelope(json!({"status": "success", "data": {"id": "seven"}}));
        assert!(wrong_type.decode_one::<Item>().is_err());

        let list = envelope(json!({"status": "success", "data": [{"id": 1}]}));
        assert!(list.decode_one::<Item>().is_err());

        let good = envelope(json!({"status": "success", "data": {"id": 7}}));
        assert_eq!(good.decode_one::<Item>().unwrap(), Item { id: 7 });
    }

    #[test]
    fn test_decode_many_tolerates_shapes() {
        let absent = envelope(json!({"status": "success"}));
        assert!(absent.decode_many::<Item>().unwrap().is_empty());

        let null = envelope(json!({"status": "success", "data": null}));
        assert!(null.decode_many::<Item>().unwrap().is_empty());

        let single = envelope(json!({"status": "success", "data": {"id": 3}}));
        assert_eq!(single.decode_many::<Item>().unwrap(), vec![Item { id: 3 }]);

        let many = envelope(json!({"status": "success", "data": [{"id": 1}, {"id": 2}]}));
        assert_eq!(
            many.decode_many::<Item>().unwrap(),
            vec![Item { id: 1 }, Item { id: 2 }]
        );

        let broken = envelope(json!({"status": "success", "data": [{"id": 1}, {"nope": 2}]}));
        assert!(broken.decode_many::<Item>().is_err());

        let scalar = envelope(json!({"status": "success", "data": "text"}));
        assert!(scalar.decode_many::<Item>().is_err());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(250, 100), 3);
        assert_eq!(page_count(5, 0), 0);

        let pagination = Pagination::new(2, 100, 250);
        assert_eq!(pagination.page_count, 3);
        assert_eq!(pagination.total, 250);
    }

    #[test]
    fn test_error_envelope_serialization() {
        let value = serde_json::to_value(Envelope::<Value>::error("Invalid news ID")).unwrap();
        assert_eq!(value, json!({"status": "error", "error": "Invalid news ID"}));

        let health = serde_json::to_value(Envelope::<Value>::ok()).unwrap();
        assert_eq!(health, json!({"status": "ok"}));
    }
}
