use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use flightdesk_api::{app, AppState};
use flightdesk_core::weather::{ForecastDate, Location, UpstreamError, Weather, WeatherLookup};
use flightdesk_core::InMemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Knows one city and one forecast day.
struct StubWeather;

#[async_trait]
impl WeatherLookup for StubWeather {
    async fn search_location(&self, city: &str) -> Result<Vec<Location>, UpstreamError> {
        match city {
            "San Francisco" => Ok(vec![Location {
                title: "San Francisco".to_string(),
                location_type: Some("City".to_string()),
                woeid: 2487956,
                latt_long: None,
            }]),
            "Timeout City" => Err(UpstreamError::Timeout {
                endpoint: "/api/location/search/".to_string(),
            }),
            _ => Ok(vec![]),
        }
    }

    async fn forecast(&self, woeid: i64, date: &ForecastDate) -> Result<Vec<Weather>, UpstreamError> {
        if woeid == 2487956 && date.path() == "2024/03/10" {
            Ok(vec![Weather {
                weather_state_name: Some("Clear".to_string()),
                ..Default::default()
            }])
        } else {
            Ok(vec![])
        }
    }
}

fn test_app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    app(AppState::new(store.clone(), store, Arc::new(StubWeather)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_flight(app: &Router, city: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/flight",
        Some(json!({
            "pilot": "Amelia",
            "airplane": "B737",
            "destinationCity": city,
            "flightDate": "2024-03-10T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_create_then_get_enriched_flight() {
    let app = test_app();
    let created = create_flight(&app, "San Francisco").await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["passengers"], json!([]));

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/flight/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["destinationCity"], "San Francisco");
    assert_eq!(body["flightDate"], "2024-03-10T00:00:00Z");
    assert_eq!(body["weather"], json!([{ "weather_state_name": "Clear" }]));
}

#[tokio::test]
async fn test_list_flights_has_no_weather() {
    let app = test_app();
    create_flight(&app, "San Francisco").await;
    create_flight(&app, "Lisbon").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/flight", None).await;
    assert_eq!(status, StatusCode::OK);
    let flights = body.as_array().unwrap();
    assert_eq!(flights.len(), 2);
    assert!(flights.iter().all(|flight| flight.get("weather").is_none()));
}

#[tokio::test]
async fn test_get_unknown_flight_is_404() {
    let app = test_app();
    let uri = format!("/api/v1/flight/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_city_is_bad_gateway() {
    let app = test_app();
    let created = create_flight(&app, "Atlantis").await;
    let uri = format!("/api/v1/flight/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "LOCATION_NOT_FOUND");
}

#[tokio::test]
async fn test_upstream_timeout_is_bad_gateway() {
    let app = test_app();
    let created = create_flight(&app, "Timeout City").await;
    let uri = format!("/api/v1/flight/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_delete_is_existence_agnostic() {
    let app = test_app();
    let created = create_flight(&app, "San Francisco").await;
    let uri = format!("/api/v1/flight/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": 200, "message": "deleted" }));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": 200, "message": "deleted" }));
}

#[tokio::test]
async fn test_add_passenger_twice_keeps_one_entry() {
    let app = test_app();
    let flight = create_flight(&app, "San Francisco").await;

    let (status, passenger) = send(
        &app,
        Method::POST,
        "/api/v1/passenger",
        Some(json!({ "name": "Ada Lovelace", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!(
        "/api/v1/flight/{}/passenger/{}",
        flight["id"].as_str().unwrap(),
        passenger["id"].as_str().unwrap()
    );
    send(&app, Method::POST, &uri, None).await;
    let (status, body) = send(&app, Method::POST, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    let passengers = body["passengers"].as_array().unwrap();
    assert_eq!(passengers.len(), 1);
    assert_eq!(passengers[0]["name"], "Ada Lovelace");
    assert_eq!(passengers[0]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_add_passenger_to_unknown_flight_is_404() {
    let app = test_app();
    let uri = format!(
        "/api/v1/flight/{}/passenger/{}",
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4()
    );

    let (status, _) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_keeps_identifier() {
    let app = test_app();
    let created = create_flight(&app, "San Francisco").await;
    let uri = format!("/api/v1/flight/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "pilot": "Bessie" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["pilot"], "Bessie");
    assert_eq!(body["airplane"], "B737");
}

#[tokio::test]
async fn test_update_with_blank_field_is_400() {
    let app = test_app();
    let created = create_flight(&app, "San Francisco").await;
    let uri = format!("/api/v1/flight/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "airplane": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_with_missing_field_is_rejected() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/flight",
        Some(json!({ "pilot": "Amelia", "airplane": "B737" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/api/v1/flight/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "connected");
}
