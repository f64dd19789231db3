use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use roomcast::error::ReportError;
use roomcast::kernel::label::RoomLabel;
use roomcast::kernel::smoother::Confirmation;
use roomcast::services::map::client::{LocationPayload, LocationReporter, MapLocationClient};
use roomcast::source::InMemoryVariableSource;
use roomcast::{ProviderConfig, RoomTypeLocationProvider, StartOutcome, StopOutcome};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ROUTE: &str = "/maps/locations/add/slam";

type Seen = Arc<Mutex<Vec<Value>>>;

// Helper: serve `router` on an ephemeral port, return the POST URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}{}", addr, ROUTE)
}

// Records every body it receives and answers with `status`
async fn recording_server(status: StatusCode) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route(
            ROUTE,
            post(move |State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().push(body);
                (status, "stored")
            }),
        )
        .with_state(Arc::clone(&seen));
    (serve(router).await, seen)
}

fn payload(label: RoomLabel) -> LocationPayload {
    LocationPayload::from_confirmation(
        "map",
        &Confirmation {
            label,
            majority_fraction: 0.8,
            stable_for: Duration::from_secs(20),
            window_size: 5,
        },
    )
}

#[test]
fn test_payload_description_embeds_vote_details() {
    let p = payload(RoomLabel::Kitchen);
    assert_eq!(p.map_name, "map");
    assert_eq!(
        p.description,
        "Auto-generated location for room type 'kitchen' (majority 80% of 5 samples, stable for 20.0s)"
    );

    let body = serde_json::to_value(&p).unwrap();
    assert_eq!(body["label"], "kitchen");
    assert_eq!(body.as_object().unwrap().len(), 3, "Only map_name, label, description");
}

#[tokio::test]
async fn test_success_status_returns_receipt_and_json_body() {
    let (url, seen) = recording_server(StatusCode::CREATED).await;
    let client = MapLocationClient::new(url, Duration::from_secs(5));

    let receipt = client.report(&payload(RoomLabel::LivingRoom)).await.expect("201 is success");
    assert_eq!(receipt.status, 201);
    assert_eq!(receipt.body, "stored");

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["map_name"], "map");
    assert_eq!(bodies[0]["label"], "living_room");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (url, _seen) = recording_server(StatusCode::INTERNAL_SERVER_ERROR).await;
    let client = MapLocationClient::new(url, Duration::from_secs(5));

    match client.report(&payload(RoomLabel::Study)).await {
        Err(ReportError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "stored");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let router = Router::new().route(
        ROUTE,
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            StatusCode::OK
        }),
    );
    let url = serve(router).await;
    let client = MapLocationClient::new(url, Duration::from_millis(200));

    let result = client.report(&payload(RoomLabel::Outdoor)).await;
    assert!(matches!(result, Err(ReportError::Timeout)), "{:?}", result);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    // Grab a free port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = MapLocationClient::new(format!("http://{}{}", addr, ROUTE), Duration::from_secs(2));
    let result = client.report(&payload(RoomLabel::Bedroom)).await;
    assert!(matches!(result, Err(ReportError::Transport(_))), "{:?}", result);
}

#[tokio::test]
async fn test_end_to_end_outdoor_posted_once_over_http() {
    let (url, seen) = recording_server(StatusCode::OK).await;

    let store = Arc::new(InMemoryVariableSource::new());
    let config = ProviderConfig::for_interval(Duration::from_millis(20))
        .with_endpoint(url.clone())
        .with_map_name("ground_floor");
    let client = Arc::new(MapLocationClient::new(url, config.request_timeout));
    let provider = RoomTypeLocationProvider::new(config, Arc::clone(&store), client);

    store.set("room_type", "outdoor");
    assert_eq!(provider.start(), StartOutcome::Started);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(provider.stop().await, StopOutcome::Stopped);

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1, "Outdoor must reach the service exactly once");
    assert_eq!(bodies[0]["label"], "outdoor");
    assert_eq!(bodies[0]["map_name"], "ground_floor");
    assert_eq!(provider.delivery_gate().delivered(), vec![RoomLabel::Outdoor]);
}
