use crate::domain::model::{Ack, InboundEvent, ServiceStatus, Subscription};
use crate::utils::error::Result;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const SUBSCRIBE_PATH: &str = "/dapr/subscribe";

#[derive(Clone)]
pub struct SubscriberState {
    subscriptions: Arc<Vec<Subscription>>,
}

impl SubscriberState {
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Arc::new(subscriptions),
        }
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

pub fn build_router(state: SubscriberState) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route(SUBSCRIBE_PATH, get(list_subscriptions));

    for subscription in state.subscriptions() {
        router = router.route(&subscription.route, post(receive_event));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// 服務直到 `shutdown` 完成
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🎧 Subscriber listening on {}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus::running())
}

async fn list_subscriptions(State(state): State<SubscriberState>) -> Json<Vec<Subscription>> {
    Json(state.subscriptions().to_vec())
}

async fn receive_event(Json(body): Json<Value>) -> Json<Ack> {
    let event = InboundEvent::from_body(body);
    tracing::info!(
        event_id = event.id.as_deref().unwrap_or("-"),
        topic = event.topic.as_deref().unwrap_or("-"),
        "📥 Received message: {}",
        event.payload()
    );
    println!("Received message: {}", event.payload());
    Json(Ack::success())
}
