use serial_test::serial;

mod common;

// NOTE: Metrics use a global Prometheus registry.
// Tests are serial to avoid double-registration races.

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn metrics_endpoint_with_prometheus() {
    // ---
    // Set environment to use Prometheus metrics for this test
    std::env::set_var("ARENA_METRICS_TYPE", "prom");

    let server = common::TestServer::new().await;

    // Hit some endpoints to generate traffic, including one counted event.
    let _ = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    let _ = server
        .client
        .post(server.url("/register"))
        .json(&serde_json::json!({
            "name": "Metrics Probe",
            "phone_number": "555-0199",
            "date_of_birth": "1990-01-01",
            "email": "probe@x.com",
        }))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(
        body.contains("users_registered_total"),
        "metrics exposition missing registration counter: {body}"
    );
    assert!(
        body.contains("http_request_duration_seconds"),
        "metrics exposition missing request duration histogram: {body}"
    );

    std::env::set_var("ARENA_METRICS_TYPE", "noop");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn metrics_endpoint_with_noop_renders_empty() {
    // ---
    std::env::set_var("ARENA_METRICS_TYPE", "noop");

    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().is_empty());
}
