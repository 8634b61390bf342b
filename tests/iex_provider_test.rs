/// IexProvider against a fake IEX Cloud served from a local ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use tokio::net::TcpListener;

use stockalpha_backend::config::{ApiToken, UpstreamConfig};
use stockalpha_backend::external::iex::IexProvider;
use stockalpha_backend::external::price_provider::{PriceProvider, PriceProviderError};
use stockalpha_backend::models::DateRange;

const TOKEN: &str = "pk_test_token";

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn company(
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("token").map(String::as_str) != Some(TOKEN) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }
    match symbol.as_str() {
        "AAPL" => r#"{"symbol":"AAPL","companyName":"Apple Inc."}"#.into_response(),
        "BRK/B" => r#"{"symbol":"BRK.B","companyName":"Berkshire Hathaway Inc."}"#.into_response(),
        "ZZZZ" => "[]".into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn historical(
    State(seen): State<Seen>,
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    seen.lock().unwrap().push(params.clone());
    if params.get("token").map(String::as_str) != Some(TOKEN) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }
    match symbol.as_str() {
        "AAPL" => r#"[
            {"date": 1672876800000, "priceDate": "2023-01-05", "open": 127.13, "close": 125.02, "volume": 80962708},
            {"date": 1672704000000, "priceDate": "2023-01-03", "open": 130.28, "close": 125.07, "volume": 112117471},
            {"date": 1672790400000, "priceDate": "2023-01-04", "open": 126.89, "close": 126.36, "volume": 89113633}
        ]"#
        .into_response(),
        "GARBLED" => "<html>maintenance</html>".into_response(),
        "SLOW" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "[]".into_response()
        }
        _ => (StatusCode::NOT_FOUND, "Unknown symbol").into_response(),
    }
}

async fn spawn_upstream() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/v1/data/CORE/COMPANY/:symbol", get(company))
        .route("/v1/data/CORE/HISTORICAL_PRICES/:symbol", get(historical))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}/v1/data/CORE/", addr), seen)
}

fn provider(base_url: &str, token: &str) -> IexProvider {
    let config = UpstreamConfig::new(base_url, ApiToken::new(token), Duration::from_secs(1)).unwrap();
    IexProvider::new(&config).unwrap()
}

fn january() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_company_info_returns_raw_body() {
    let (base, _) = spawn_upstream().await;
    let iex = provider(&base, TOKEN);

    let body = iex.fetch_company_info("AAPL").await.unwrap();
    assert!(body.contains("Apple Inc."));

    let body = iex.fetch_company_info("ZZZZ").await.unwrap();
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_company_info_symbol_is_one_path_segment() {
    let (base, _) = spawn_upstream().await;
    let iex = provider(&base, TOKEN);

    let body = iex.fetch_company_info("BRK/B").await.unwrap();
    assert!(body.contains("Berkshire"));
}

#[tokio::test]
async fn test_company_info_non_success_status() {
    let (base, _) = spawn_upstream().await;

    let err = provider(&base, TOKEN).fetch_company_info("FAIL").await.unwrap_err();
    assert!(matches!(err, PriceProviderError::BadStatus(500)));

    let err = provider(&base, "wrong").fetch_company_info("AAPL").await.unwrap_err();
    assert!(matches!(err, PriceProviderError::BadStatus(403)));
}

#[tokio::test]
async fn test_historical_prices_sorted_with_range_params() {
    let (base, seen) = spawn_upstream().await;
    let iex = provider(&base, TOKEN);

    let points = iex.fetch_historical_prices("AAPL", &january()).await.unwrap();

    let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, vec!["2023-01-03", "2023-01-04", "2023-01-05"]);
    assert_eq!(points[0].open.to_string(), "130.28");
    assert_eq!(points[2].close.to_string(), "125.02");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("from").map(String::as_str), Some("2023-01-03"));
    assert_eq!(seen[0].get("to").map(String::as_str), Some("2023-01-05"));
}

#[tokio::test]
async fn test_historical_prices_failures() {
    let (base, _) = spawn_upstream().await;
    let iex = provider(&base, TOKEN);

    let err = iex.fetch_historical_prices("MISSING", &january()).await.unwrap_err();
    assert!(matches!(err, PriceProviderError::BadStatus(404)));

    let err = iex.fetch_historical_prices("GARBLED", &january()).await.unwrap_err();
    assert!(matches!(err, PriceProviderError::Parse(_)));
}

#[tokio::test]
async fn test_timeout_is_a_network_failure() {
    let (base, _) = spawn_upstream().await;
    let iex = provider(&base, TOKEN);

    let err = iex.fetch_historical_prices("SLOW", &january()).await.unwrap_err();
    assert!(matches!(err, PriceProviderError::Network(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_a_network_failure() {
    // Bind then drop so the port is very likely closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let iex = provider(&format!("http://{}/", addr), TOKEN);
    let err = iex.fetch_company_info("AAPL").await.unwrap_err();
    assert!(matches!(err, PriceProviderError::Network(_)));
}
