use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_MESSAGE_PREFIX: &str = "Hello from publisher - message";

/// 發佈到 topic 的訊息本體
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u32,
    pub message: String,
}

impl Message {
    pub fn new(id: u32, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }

    pub fn numbered(id: u32, prefix: &str) -> Self {
        Self::new(id, format!("{} {}", prefix, id))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.message).map_err(|_| fmt::Error)?;
        write!(f, "{{\"id\": {}, \"message\": {}}}", self.id, text)
    }
}

/// `GET /dapr/subscribe` 回傳的訂閱描述，欄位名稱由 sidecar 決定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub pubsubname: String,
    pub topic: String,
    pub route: String,
}

impl Subscription {
    pub fn new(pubsub: &str, topic: &str, route: Option<&str>) -> Self {
        Self {
            pubsubname: pubsub.to_string(),
            topic: topic.to_string(),
            route: route
                .map(str::to_string)
                .unwrap_or_else(|| default_route(pubsub, topic)),
        }
    }
}

pub fn default_route(pubsub: &str, topic: &str) -> String {
    format!("/events/{}/{}", pubsub, topic)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn success() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}

impl ServiceStatus {
    pub fn running() -> Self {
        Self {
            message: "Subscriber service is running".to_string(),
        }
    }
}

/// Callback 收到的事件。Sidecar 通常送 CloudEvents 信封，
/// 但也接受直接送 payload 的呼叫者。
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub id: Option<String>,
    pub topic: Option<String>,
    pub pubsubname: Option<String>,
    pub data_content_type: Option<String>,
    payload: Value,
}

impl InboundEvent {
    pub fn from_body(body: Value) -> Self {
        if !is_cloud_event(&body) {
            return Self {
                id: None,
                topic: None,
                pubsubname: None,
                data_content_type: None,
                payload: body,
            };
        }

        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
        let data = body.get("data").cloned().unwrap_or(Value::Null);

        Self {
            id: field("id"),
            topic: field("topic"),
            pubsubname: field("pubsubname"),
            data_content_type: field("datacontenttype"),
            payload: decode_data(data),
        }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    pub fn message(&self) -> Option<Message> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

fn is_cloud_event(body: &Value) -> bool {
    body.get("specversion").is_some() && body.get("data").is_some()
}

// 發佈端送的是已序列化的 JSON 字串，sidecar 可能原樣包成字串
fn decode_data(data: Value) -> Value {
    match data {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(decoded @ (Value::Object(_) | Value::Array(_))) => decoded,
            _ => Value::String(text),
        },
        other => other,
    }
}
