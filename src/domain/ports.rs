use crate::utils::error::Result;
use async_trait::async_trait;

/// 把已序列化的訊息交給外部投遞通道
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_event(
        &self,
        pubsub_name: &str,
        topic: &str,
        data: String,
        content_type: &str,
    ) -> Result<()>;
}
