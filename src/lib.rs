pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::DaprClient;
pub use config::{AppConfig, PublisherArgs, SubscriberArgs};
pub use crate::core::{PublishLoop, PublishSummary};
pub use domain::model::{Ack, InboundEvent, Message, ServiceStatus, Subscription};
pub use server::{build_router, SubscriberState};
pub use utils::error::{PubSubError, Result};
