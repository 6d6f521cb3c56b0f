pub mod cli;
pub mod toml_config;

pub use cli::{PublisherArgs, SubscriberArgs};
pub use toml_config::{AppConfig, PublisherSettings, SidecarConfig, SubscriberSettings};
