use httpmock::prelude::*;
use orders_pubsub::config::{PublisherSettings, SidecarConfig};
use orders_pubsub::{DaprClient, PubSubError, PublishLoop};

fn sidecar_for(server: &MockServer) -> SidecarConfig {
    SidecarConfig {
        http_endpoint: server.base_url(),
        api_token: None,
        request_timeout_seconds: 5,
        ready_timeout_seconds: 2,
    }
}

#[tokio::test]
async fn test_publisher_delivers_every_message_to_sidecar() {
    let server = MockServer::start();

    let message_mocks: Vec<_> = (0..10)
        .map(|i| {
            server.mock(|when, then| {
                when.method(POST)
                    .path("/v1.0/publish/pubsub/orders")
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({
                        "id": i,
                        "message": format!("Hello from publisher - message {}", i)
                    }));
                then.status(204);
            })
        })
        .collect();

    let client = DaprClient::new(sidecar_for(&server)).unwrap();
    let settings = PublisherSettings {
        interval_ms: 0,
        ..PublisherSettings::default()
    };

    let summary = PublishLoop::new(client, settings).run().await.unwrap();

    assert_eq!(summary.published, 10);
    for mock in &message_mocks {
        mock.assert_hits(1);
    }
}

#[tokio::test]
async fn test_publisher_waits_for_sidecar_then_publishes() {
    let server = MockServer::start();
    let health_mock = server.mock(|when, then| {
        when.method(GET).path("/v1.0/healthz/outbound");
        then.status(204);
    });
    let publish_mock = server.mock(|when, then| {
        when.method(POST).path("/v1.0/publish/pubsub/orders");
        then.status(204);
    });

    let config = sidecar_for(&server);
    let client = DaprClient::new(config.clone()).unwrap();
    client.wait_until_ready(config.ready_timeout()).await.unwrap();

    let settings = PublisherSettings {
        count: 3,
        interval_ms: 0,
        ..PublisherSettings::default()
    };
    PublishLoop::new(client, settings).run().await.unwrap();

    health_mock.assert();
    publish_mock.assert_hits(3);
}

#[tokio::test]
async fn test_publisher_stops_at_first_rejection() {
    let server = MockServer::start();
    let publish_mock = server.mock(|when, then| {
        when.method(POST).path("/v1.0/publish/pubsub/orders");
        then.status(500)
            .body(r#"{"errorCode":"ERR_PUBSUB_PUBLISH_MESSAGE"}"#);
    });

    let client = DaprClient::new(sidecar_for(&server)).unwrap();
    let settings = PublisherSettings {
        interval_ms: 0,
        ..PublisherSettings::default()
    };

    let result = PublishLoop::new(client, settings).run().await;

    let err = tokio_test::assert_err!(result);
    assert!(matches!(err, PubSubError::PublishRejected { status: 500, .. }));
    publish_mock.assert_hits(1);
}

#[tokio::test]
async fn test_unreachable_sidecar_is_network_error() {
    // 沒有任何服務監聽的埠
    let client = DaprClient::new(SidecarConfig {
        http_endpoint: "http://127.0.0.1:9".to_string(),
        api_token: None,
        request_timeout_seconds: 2,
        ready_timeout_seconds: 1,
    })
    .unwrap();

    let settings = PublisherSettings {
        count: 1,
        interval_ms: 0,
        ..PublisherSettings::default()
    };
    let err = PublishLoop::new(client, settings).run().await.unwrap_err();

    assert!(matches!(err, PubSubError::HttpError(_)));
    assert_eq!(err.exit_code(), 2);
}
