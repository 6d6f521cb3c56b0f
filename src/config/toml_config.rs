use crate::domain::model::{default_route, Subscription, DEFAULT_MESSAGE_PREFIX};
use crate::utils::error::{PubSubError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SIDECAR_HTTP_PORT: u16 = 3500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sidecar: SidecarConfig,
    pub publisher: PublisherSettings,
    pub subscriber: SubscriberSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    pub http_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub request_timeout_seconds: u64,
    pub ready_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherSettings {
    pub pubsub_name: String,
    pub topic: String,
    pub count: u32,
    pub interval_ms: u64,
    pub content_type: String,
    pub message_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberSettings {
    pub host: String,
    pub port: u16,
    pub pubsub_name: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            http_endpoint: format!("http://127.0.0.1:{}", DEFAULT_SIDECAR_HTTP_PORT),
            api_token: None,
            request_timeout_seconds: 60,
            ready_timeout_seconds: 60,
        }
    }
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            pubsub_name: "pubsub".to_string(),
            topic: "orders".to_string(),
            count: 10,
            interval_ms: 1000,
            content_type: "application/json".to_string(),
            message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
        }
    }
}

impl Default for SubscriberSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            pubsub_name: "pubsub".to_string(),
            topic: "orders".to_string(),
            route: None,
        }
    }
}

impl SidecarConfig {
    /// 依照 sidecar SDK 的慣例讀取環境變數
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_endpoint = non_empty("DAPR_HTTP_ENDPOINT")
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .or_else(|| {
                non_empty("DAPR_HTTP_PORT").map(|port| format!("http://127.0.0.1:{}", port.trim()))
            })
            .unwrap_or(defaults.http_endpoint);

        let seconds = |name: &str, fallback: u64| {
            non_empty(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(fallback)
        };

        Self {
            http_endpoint,
            api_token: non_empty("DAPR_API_TOKEN"),
            request_timeout_seconds: seconds(
                "DAPR_HTTP_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            ready_timeout_seconds: seconds("DAPR_HEALTH_TIMEOUT", defaults.ready_timeout_seconds),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_seconds)
    }
}

impl PublisherSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl SubscriberSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn route(&self) -> String {
        self.route
            .clone()
            .unwrap_or_else(|| default_route(&self.pubsub_name, &self.topic))
    }

    pub fn subscription(&self) -> Subscription {
        Subscription::new(&self.pubsub_name, &self.topic, Some(&self.route()))
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PubSubError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，未出現的區段使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PubSubError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 沒有指定檔案時：內建預設值加上環境變數
    pub fn from_env() -> Self {
        Self {
            sidecar: SidecarConfig::from_env(),
            ..Self::default()
        }
    }

    /// 環境變數為底，檔案中出現的欄位覆蓋之
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let base = Self::from_env();
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(PubSubError::IoError)?;
                Self::layered(base, &content)
            }
            None => Ok(base),
        }
    }

    pub fn layered(base: AppConfig, content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        let overlay: toml::Table =
            toml::from_str(&processed_content).map_err(|e| PubSubError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        let mut merged = toml::Value::try_from(&base).map_err(|e| PubSubError::ConfigError {
            message: format!("Cannot serialize base configuration: {}", e),
        })?;
        merge_values(&mut merged, toml::Value::Table(overlay));

        merged
            .try_into()
            .map_err(|e: toml::de::Error| PubSubError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })
    }

    /// 替換環境變數 (例如 ${DAPR_API_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PubSubError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_publisher(&self) -> Result<()> {
        self.validate_sidecar()?;
        let publisher = &self.publisher;
        validation::validate_path_segment("publisher.pubsub_name", &publisher.pubsub_name)?;
        validation::validate_path_segment("publisher.topic", &publisher.topic)?;
        validation::validate_positive_number("publisher.count", publisher.count as usize, 1)?;
        validation::validate_non_empty_string("publisher.content_type", &publisher.content_type)?;
        Ok(())
    }

    pub fn validate_subscriber(&self) -> Result<()> {
        let subscriber = &self.subscriber;
        validation::validate_non_empty_string("subscriber.host", &subscriber.host)?;
        validation::validate_path_segment("subscriber.pubsub_name", &subscriber.pubsub_name)?;
        validation::validate_path_segment("subscriber.topic", &subscriber.topic)?;
        validation::validate_route("subscriber.route", &subscriber.route())?;
        Ok(())
    }

    fn validate_sidecar(&self) -> Result<()> {
        validation::validate_url("sidecar.http_endpoint", &self.sidecar.http_endpoint)?;
        validation::validate_positive_number(
            "sidecar.request_timeout_seconds",
            self.sidecar.request_timeout_seconds as usize,
            1,
        )?;
        Ok(())
    }
}

fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_publisher()?;
        self.validate_subscriber()
    }
}
