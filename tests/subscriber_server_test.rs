use orders_pubsub::config::AppConfig;
use orders_pubsub::{build_router, server, InboundEvent, Message, SubscriberState};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct RunningSubscriber {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<orders_pubsub::Result<()>>,
}

async fn start_subscriber(config: &AppConfig) -> RunningSubscriber {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(SubscriberState::new(vec![config.subscriber.subscription()]));

    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(listener, router, async move {
        let _ = stopped.await;
    }));

    RunningSubscriber { addr, stop, handle }
}

#[tokio::test]
async fn test_subscriber_receives_published_message() {
    let config = AppConfig::default();
    let subscriber = start_subscriber(&config).await;
    let client = reqwest::Client::new();

    let published = Message::numbered(3, &config.publisher.message_prefix);
    let envelope = json!({
        "specversion": "1.0",
        "type": "com.dapr.event.sent",
        "source": "publisher",
        "id": "evt-3",
        "topic": "orders",
        "pubsubname": "pubsub",
        "datacontenttype": "application/json",
        "data": published.to_json().unwrap()
    });

    // 字串形式的 data 會被解回發佈時的訊息
    let decoded = InboundEvent::from_body(envelope.clone());
    assert_eq!(decoded.message(), Some(published.clone()));
    assert_eq!(
        decoded.payload(),
        &json!({"id": 3, "message": "Hello from publisher - message 3"})
    );

    let response = client
        .post(format!("http://{}{}", subscriber.addr, config.subscriber.route()))
        .header("content-type", "application/cloudevents+json")
        .body(envelope.to_string())
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let ack: Value = response.json().await.unwrap();
    assert_eq!(ack, json!({"success": true}));

    subscriber.stop.send(()).unwrap();
    subscriber.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_subscriber_exposes_liveness_and_subscriptions() {
    let config = AppConfig::default();
    let subscriber = start_subscriber(&config).await;
    let client = reqwest::Client::new();

    let status: Value = client
        .get(format!("http://{}/", subscriber.addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status, json!({"message": "Subscriber service is running"}));

    let subscriptions: Value = client
        .get(format!("http://{}/dapr/subscribe", subscriber.addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        subscriptions,
        json!([{"pubsubname": "pubsub", "topic": "orders", "route": "/events/pubsub/orders"}])
    );

    subscriber.stop.send(()).unwrap();
    subscriber.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let config = AppConfig::default();
    let subscriber = start_subscriber(&config).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/events/pubsub/payments", subscriber.addr))
        .json(&json!({"id": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    subscriber.stop.send(()).unwrap();
    subscriber.handle.await.unwrap().unwrap();
}
