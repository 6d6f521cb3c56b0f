use crate::config::toml_config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "publisher")]
#[command(about = "Publish numbered JSON messages to a topic through the sidecar")]
pub struct PublisherArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Sidecar HTTP endpoint (overrides DAPR_HTTP_ENDPOINT / DAPR_HTTP_PORT)
    #[arg(long)]
    pub dapr_endpoint: Option<String>,

    #[arg(long)]
    pub pubsub: Option<String>,

    #[arg(long)]
    pub topic: Option<String>,

    /// Number of messages to publish
    #[arg(long)]
    pub count: Option<u32>,

    /// Delay between two publish calls, in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Skip waiting for the sidecar health endpoint before publishing
    #[arg(long)]
    pub no_wait: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "subscriber")]
#[command(about = "Serve the topic callback the sidecar delivers messages to")]
pub struct SubscriberArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub pubsub: Option<String>,

    #[arg(long)]
    pub topic: Option<String>,

    /// Callback path registered for the subscription (default: /events/<pubsub>/<topic>)
    #[arg(long)]
    pub route: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl PublisherArgs {
    /// 命令列參數優先於檔案與環境變數
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.dapr_endpoint {
            config.sidecar.http_endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(pubsub) = &self.pubsub {
            config.publisher.pubsub_name = pubsub.clone();
        }
        if let Some(topic) = &self.topic {
            config.publisher.topic = topic.clone();
        }
        if let Some(count) = self.count {
            config.publisher.count = count;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.publisher.interval_ms = interval_ms;
        }
    }
}

impl SubscriberArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.subscriber.host = host.clone();
        }
        if let Some(port) = self.port {
            config.subscriber.port = port;
        }
        if let Some(pubsub) = &self.pubsub {
            config.subscriber.pubsub_name = pubsub.clone();
        }
        if let Some(topic) = &self.topic {
            config.subscriber.topic = topic.clone();
        }
        if let Some(route) = &self.route {
            config.subscriber.route = Some(route.clone());
        }
    }
}
