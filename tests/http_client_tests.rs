//! `HttpVoucherApi` against a local actix-web stand-in for the voucher server.

use std::time::Duration;

use actix_web::{web, App, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crew_voucher_form::api::{
    ApiError, CheckVoucherRequest, GenerateVoucherRequest, GetVoucherRequest,
    RegenerateSeatRequest,
};
use crew_voucher_form::voucher::{AircraftType, SeatPosition};
use crew_voucher_form::{ClientConfig, HttpVoucherApi, VoucherApi};

#[derive(Default)]
struct Received {
    bodies: Mutex<Vec<(String, Value)>>,
}

impl Received {
    fn record(&self, path: &str, body: &Value) {
        self.bodies.lock().push((path.to_string(), body.clone()));
    }

    fn last(&self) -> (String, Value) {
        self.bodies.lock().last().cloned().unwrap()
    }
}

fn flight_number(body: &Value) -> &str {
    body["flightNumber"].as_str().unwrap_or_default()
}

async fn check(received: web::Data<Received>, body: web::Json<Value>) -> HttpResponse {
    received.record("/api/check", &body);
    HttpResponse::Ok().json(json!({ "exists": flight_number(&body) == "GA102" }))
}

async fn generate(received: web::Data<Received>, body: web::Json<Value>) -> HttpResponse {
    received.record("/api/generate", &body);
    match flight_number(&body) {
        "GA409" => HttpResponse::Conflict().json(json!({
            "error": "conflict",
            "message": "Vouchers already exist for this flight",
        })),
        "GA500" => HttpResponse::InternalServerError().body("database is locked"),
        "GA200" => HttpResponse::Ok()
            .content_type("application/json")
            .body("{\"success\": tru"),
        _ => HttpResponse::Ok().json(json!({ "success": true, "seats": ["3B", "7C", "14D"] })),
    }
}

async fn voucher(received: web::Data<Received>, body: web::Json<Value>) -> HttpResponse {
    received.record("/api/voucher", &body);
    if flight_number(&body) != "GA102" {
        return HttpResponse::Ok().json(json!({ "exists": false }));
    }
    HttpResponse::Ok().json(json!({
        "exists": true,
        "voucher": {
            "id": 7,
            "crew_name": "John Doe",
            "crew_id": "12345",
            "flight_number": "GA102",
            "flight_date": body["date"],
            "aircraft_type": "Airbus 320",
            "seat1": "3B",
            "seat2": "7C",
            "seat3": "14D",
            "created_at": "2025-07-01 08:00:00",
        }
    }))
}

async fn regenerate_seat(received: web::Data<Received>, body: web::Json<Value>) -> HttpResponse {
    received.record("/api/regenerate-seat", &body);
    HttpResponse::Ok().json(json!({
        "success": true,
        "newSeat": "9F",
        "allSeats": ["3B", "9F", "14D"],
    }))
}

async fn start_server(received: web::Data<Received>) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(received.clone())
            .route("/api/check", web::post().to(check))
            .route("/api/generate", web::post().to(generate))
            .route("/api/voucher", web::post().to(voucher))
            .route("/api/regenerate-seat", web::post().to(regenerate_seat))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}/", addr)
}

fn client_for(base_url: &str) -> HttpVoucherApi {
    let config = ClientConfig {
        api_base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    HttpVoucherApi::new(&config).unwrap()
}

fn generate_request(flight: &str) -> GenerateVoucherRequest {
    GenerateVoucherRequest {
        name: "John Doe".to_string(),
        id: "12345".to_string(),
        flight_number: flight.to_string(),
        date: "2025-07-09".to_string(),
        aircraft: AircraftType::Airbus320,
    }
}

#[actix_web::test]
async fn test_check_existence_posts_camel_case_body() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received.clone()).await);

    let response = api
        .check_existence(&CheckVoucherRequest {
            flight_number: "GA102".to_string(),
            date: "2025-07-09".to_string(),
        })
        .await
        .unwrap();

    assert!(response.exists);
    let (path, body) = received.last();
    assert_eq!(path, "/api/check");
    assert_eq!(body, json!({ "flightNumber": "GA102", "date": "2025-07-09" }));
}

#[actix_web::test]
async fn test_generate_sends_aircraft_label() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received.clone()).await);

    let response = api.generate(&generate_request("GA102")).await.unwrap();

    assert!(response.success);
    assert_eq!(response.seats, vec!["3B", "7C", "14D"]);
    let (_, body) = received.last();
    assert_eq!(
        body,
        json!({
            "name": "John Doe",
            "id": "12345",
            "flightNumber": "GA102",
            "date": "2025-07-09",
            "aircraft": "Airbus 320",
        })
    );
}

#[actix_web::test]
async fn test_get_voucher_reads_stored_seats() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received.clone()).await);

    let found = api
        .get_voucher(&GetVoucherRequest {
            flight_number: "GA102".to_string(),
            date: "2025-07-09".to_string(),
        })
        .await
        .unwrap();
    assert!(found.exists);
    let voucher = found.voucher.unwrap();
    assert_eq!(voucher.seats(), vec!["3B", "7C", "14D"]);
    assert_eq!(voucher.flight_date, "2025-07-09");

    let missing = api
        .get_voucher(&GetVoucherRequest {
            flight_number: "GA103".to_string(),
            date: "2025-07-09".to_string(),
        })
        .await
        .unwrap();
    assert!(!missing.exists);
    assert!(missing.voucher.is_none());
}

#[actix_web::test]
async fn test_regenerate_seat_sends_numeric_position() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received.clone()).await);

    let response = api
        .regenerate_seat(&RegenerateSeatRequest {
            flight_number: "GA102".to_string(),
            date: "2025-07-09".to_string(),
            seat_position: SeatPosition::Second,
        })
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.new_seat, "9F");
    assert_eq!(response.all_seats, vec!["3B", "9F", "14D"]);
    let (path, body) = received.last();
    assert_eq!(path, "/api/regenerate-seat");
    assert_eq!(body["seatPosition"], json!(2));
}

#[actix_web::test]
async fn test_conflict_carries_server_message() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received).await);

    match api.generate(&generate_request("GA409")).await {
        Err(ApiError::Conflict(message)) => {
            assert_eq!(message, "Vouchers already exist for this flight")
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_server_error_keeps_status_and_plain_body() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received).await);

    match api.generate(&generate_request("GA500")).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database is locked");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_unparseable_success_body_is_malformed() {
    let received = web::Data::new(Received::default());
    let api = client_for(&start_server(received).await);

    let result = api.generate(&generate_request("GA200")).await;
    assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
}

#[actix_web::test]
async fn test_unreachable_server_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = client_for(&format!("http://127.0.0.1:{}", port));

    let result = api
        .check_existence(&CheckVoucherRequest {
            flight_number: "GA102".to_string(),
            date: "2025-07-09".to_string(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::Transport(_))));
}

#[test]
fn test_base_url_drops_trailing_slash() {
    let api = client_for("http://localhost:8080/");
    assert_eq!(api.base_url(), "http://localhost:8080");
}
