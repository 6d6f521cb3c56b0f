use crate::utils::error::{PubSubError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PubSubError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Pubsub 與 topic 名稱會直接拼進 sidecar 的 URL path
pub fn validate_path_segment(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains('/') || value.contains(char::is_whitespace) {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot contain '/' or whitespace".to_string(),
        });
    }
    Ok(())
}

const ROUTE_SYNTAX_CHARS: [char; 4] = ['*', ':', '{', '}'];

pub fn validate_route(field_name: &str, route: &str) -> Result<()> {
    if !route.starts_with('/') {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: route.to_string(),
            reason: "Route must start with '/'".to_string(),
        });
    }
    // axum 的路徑語法字元，不能出現在字面路由中
    if let Some(c) = route.chars().find(|c| ROUTE_SYNTAX_CHARS.contains(c)) {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: route.to_string(),
            reason: format!("Route cannot contain '{}'", c),
        });
    }
    if route.contains(char::is_whitespace) {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: route.to_string(),
            reason: "Route cannot contain whitespace".to_string(),
        });
    }
    if route == "/" || route == "/dapr/subscribe" {
        return Err(PubSubError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: route.to_string(),
            reason: "Route collides with a built-in endpoint".to_string(),
        });
    }
    Ok(())
}
