pub mod publisher;

pub use crate::domain::model::{Message, Subscription};
pub use crate::domain::ports::EventPublisher;
pub use crate::utils::error::Result;
pub use publisher::{PublishLoop, PublishSummary};
