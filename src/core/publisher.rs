use crate::config::PublisherSettings;
use crate::domain::model::Message;
use crate::domain::ports::EventPublisher;
use crate::utils::error::Result;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    pub published: u32,
    pub elapsed: Duration,
}

/// 依序發佈編號訊息；沒有重試，第一個錯誤即終止
pub struct PublishLoop<P: EventPublisher> {
    publisher: P,
    settings: PublisherSettings,
}

impl<P: EventPublisher> PublishLoop<P> {
    pub fn new(publisher: P, settings: PublisherSettings) -> Self {
        Self {
            publisher,
            settings,
        }
    }

    pub fn settings(&self) -> &PublisherSettings {
        &self.settings
    }

    pub async fn run(&self) -> Result<PublishSummary> {
        let started = Instant::now();
        let settings = &self.settings;
        tracing::info!(
            "🚀 Publishing {} messages to {}/{} every {:?}",
            settings.count,
            settings.pubsub_name,
            settings.topic,
            settings.interval()
        );

        for id in 0..settings.count {
            let message = Message::numbered(id, &settings.message_prefix);
            let data = message.to_json()?;

            self.publisher
                .publish_event(
                    &settings.pubsub_name,
                    &settings.topic,
                    data,
                    &settings.content_type,
                )
                .await?;

            tracing::info!("📤 Published: {}", message);
            println!("Published: {}", message);

            tokio::time::sleep(settings.interval()).await;
        }

        Ok(PublishSummary {
            published: settings.count,
            elapsed: started.elapsed(),
        })
    }
}
