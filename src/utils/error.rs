use thiserror::Error;

#[derive(Error, Debug)]
pub enum PubSubError {
    #[error("Sidecar request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Sidecar rejected publish to '{topic}' with status {status}: {body}")]
    PublishRejected {
        topic: String,
        status: u16,
        body: String,
    },

    #[error("Sidecar at {endpoint} not ready after {timeout_seconds}s")]
    SidecarUnavailable {
        endpoint: String,
        timeout_seconds: u64,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PubSubError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PubSubError::HttpError(_)
            | PubSubError::PublishRejected { .. }
            | PubSubError::SidecarUnavailable { .. } => ErrorCategory::Network,
            PubSubError::SerializationError(_) => ErrorCategory::Data,
            PubSubError::ConfigError { .. }
            | PubSubError::ConfigValidationError { .. }
            | PubSubError::InvalidConfigValueError { .. }
            | PubSubError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PubSubError::IoError(_) | PubSubError::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路類錯誤通常可以重新執行
            PubSubError::HttpError(_)
            | PubSubError::PublishRejected { .. }
            | PubSubError::SidecarUnavailable { .. } => ErrorSeverity::Medium,
            PubSubError::SerializationError(_)
            | PubSubError::ConfigError { .. }
            | PubSubError::ConfigValidationError { .. }
            | PubSubError::InvalidConfigValueError { .. }
            | PubSubError::MissingConfigError { .. } => ErrorSeverity::High,
            PubSubError::IoError(_) | PubSubError::ServerError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PubSubError::HttpError(_) | PubSubError::SidecarUnavailable { .. } => {
                "Check that the sidecar is running and DAPR_HTTP_ENDPOINT / DAPR_HTTP_PORT point at it"
                    .to_string()
            }
            PubSubError::PublishRejected { .. } => {
                "Verify the pubsub component name and that the topic is allowed by the component"
                    .to_string()
            }
            PubSubError::SerializationError(_) => {
                "Check that the message payload is valid JSON".to_string()
            }
            PubSubError::ConfigError { .. }
            | PubSubError::ConfigValidationError { .. }
            | PubSubError::InvalidConfigValueError { .. }
            | PubSubError::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
            PubSubError::IoError(_) => {
                "Check file permissions and that the address is not already in use".to_string()
            }
            PubSubError::ServerError { .. } => "Restart the subscriber service".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not talk to the sidecar: {}", self),
            ErrorCategory::Data => format!("Message could not be encoded: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System failure: {}", self),
        }
    }

    /// 對應 bin 的結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PubSubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_rejected_is_retryable_network_error() {
        let err = PubSubError::PublishRejected {
            topic: "orders".to_string(),
            status: 404,
            body: "ERR_PUBSUB_NOT_FOUND".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = PubSubError::MissingConfigError {
            field: "publisher.topic".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
    }
}
