//! Integration tests for concurrent dispatch and cancellation.
//!
//! These tests verify that many calls can share one configured service
//! without their results mixing, and that dropping an in-flight call
//! leaves the service usable.

use std::time::{Duration, Instant};

use api_resource::{BaseUrl, ClientConfig, RemoteService, Resource};
use serde::Deserialize;
use tokio::task::JoinSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Item {
    id: u32,
    label: String,
}

fn create_service(server: &MockServer) -> RemoteService {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    RemoteService::from_config(&config).unwrap()
}

// ============================================================================
// Isolation Under Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_do_not_mix_results() {
    const CALLS: u32 = 16;

    let server = MockServer::start().await;
    for id in 0..CALLS {
        // Later ids answer sooner, so completion order differs from issue order
        let delay = Duration::from_millis(u64::from(CALLS - id) * 5);
        Mock::given(method("GET"))
            .and(path(format!("/items/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": id, "label": format!("item-{id}")}))
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let service = create_service(&server);
    let mut tasks = JoinSet::new();
    for id in 0..CALLS {
        let service = service.clone();
        tasks.spawn(async move {
            let item = Resource::<Item>::new("items/{id}").field("id", id);
            (id, service.get(&item, None).await)
        });
    }

    let mut completed = 0;
    while let Some(joined) = tasks.join_next().await {
        let (id, result) = joined.unwrap();
        let response = result.unwrap();
        assert_eq!(response.id, id);
        assert_eq!(response.label, format!("item-{id}"));
        completed += 1;
    }
    assert_eq!(completed, CALLS);
}

#[tokio::test]
async fn test_shared_reference_dispatch_with_join() {
    let server = MockServer::start().await;
    for (name, count) in [("alpha", 1), ("beta", 2)] {
        Mock::given(method("GET"))
            .and(path(format!("/counters/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(count))
            .mount(&server)
            .await;
    }

    let service = create_service(&server);
    let alpha = Resource::<u32>::new("counters/alpha");
    let beta = Resource::<u32>::new("counters/beta");

    let (a, b) = tokio::join!(service.get(&alpha, None), service.get(&beta, None));

    assert_eq!(*a.unwrap(), 1);
    assert_eq!(*b.unwrap(), 2);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_dropping_in_flight_call_leaves_service_usable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": 1, "label": "slow"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 2, "label": "fast"})),
        )
        .mount(&server)
        .await;

    let service = create_service(&server);
    let slow = Resource::<Item>::new("slow");
    let fast = Resource::<Item>::new("fast");

    let started = Instant::now();
    let cancelled = tokio::time::timeout(Duration::from_millis(50), service.get(&slow, None)).await;
    assert!(cancelled.is_err());
    // The slow mock answers after 5 s; the dropped call must not wait for it
    assert!(started.elapsed() < Duration::from_secs(1));

    let response = service.get(&fast, None).await.unwrap();
    assert_eq!(response.id, 2);
    assert_eq!(response.label, "fast");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
