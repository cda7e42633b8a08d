use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use time::macros::datetime;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinspot_updater::auth::StaticCredentials;
use coinspot_updater::rate_limit::RateLimitConfig;
use coinspot_updater::sheets::{GoogleSheetsClient, SpreadsheetService};
use coinspot_updater::updater::ranges;
use coinspot_updater::{CoinSpotClient, CoinSpotError, Updater};

const SPREADSHEET: &str = "sheet-1";

fn values_path(range: &str) -> String {
    format!("/v4/spreadsheets/{SPREADSHEET}/values/{range}")
}

fn sheets_client(server: &MockServer) -> GoogleSheetsClient {
    GoogleSheetsClient::builder()
        .base_url(server.uri())
        .spreadsheet_id(SPREADSHEET)
        .access_token(SecretString::from("ya29.token"))
        .build()
        .unwrap()
}

fn coinspot_client(server: &MockServer) -> CoinSpotClient {
    CoinSpotClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("key", "secret")))
        .rate_limit(RateLimitConfig {
            enabled: false,
            ..Default::default()
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(values_path("Summary!G5:G8")))
        .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Summary!G5:G8",
            "majorDimension": "ROWS",
            "values": [[1000], [1250.75], [250.75], [0.25075]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let grid = sheets_client(&server).get_range("Summary!G5:G8").await.unwrap();

    assert_eq!(grid.len(), 4);
    assert_eq!(grid[1], vec![json!(1250.75)]);
}

#[tokio::test]
async fn test_set_value() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(values_path("Summary!G6")))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(body_json(json!({
            "range": "Summary!G6",
            "majorDimension": "ROWS",
            "values": [["123.45"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": SPREADSHEET,
            "updatedRange": "Summary!G6",
            "updatedCells": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    sheets_client(&server)
        .set_value("Summary!G6", json!("123.45"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_append_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(values_path("History!A:C:append")))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": SPREADSHEET,
            "tableRange": "History!A1:C9",
            "updates": {
                "spreadsheetId": SPREADSHEET,
                "updatedRange": "History!A10:C10",
                "updatedRows": 1,
                "updatedCells": 3
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let range = sheets_client(&server)
        .append_row("History!A:C", vec![json!("05 Mar"), json!("3:07 PM"), json!("1.00")])
        .await
        .unwrap();

    assert_eq!(range, "History!A10:C10");
}

#[tokio::test]
async fn test_sheets_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("UNAUTHENTICATED"))
        .mount(&server)
        .await;

    let err = sheets_client(&server).get_range("Summary!G8").await.unwrap_err();
    match err {
        CoinSpotError::Sheets(message) => assert!(message.contains("UNAUTHENTICATED")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_spreadsheet_end_to_end() {
    let exchange = MockServer::start().await;
    let sheets = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ro/my/balances"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"ok","balances":[
                {"AUD":{"balance":50,"audbalance":50,"rate":1}},
                {"BTC":{"balance":0.01,"audbalance":1000.10,"rate":100010}},
                {"ETH":{"balance":0.5,"audbalance":2000.25,"rate":4000.5}}
            ]}"#,
        ))
        .expect(1)
        .mount(&exchange)
        .await;

    for (range, value) in [
        (ranges::TOTAL_VALUE, "3000.35"),
        (ranges::UPDATE_DATE, "05 Mar"),
        (ranges::UPDATE_TIME, "3:07 PM"),
    ] {
        Mock::given(method("PUT"))
            .and(path(values_path(range)))
            .and(body_json(json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [[value]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "updatedRange": range
            })))
            .expect(1)
            .mount(&sheets)
            .await;
    }

    let updater = Updater::new(coinspot_client(&exchange), sheets_client(&sheets));
    let report = updater
        .update_spreadsheet_at(datetime!(2024-03-05 15:07 UTC))
        .await
        .unwrap();

    assert_eq!(report.total, "3000.35".parse().unwrap());
    assert_eq!(
        report.to_string(),
        "Updated spreadsheet: $3000.35 at 05 Mar 3:07 PM"
    );
}

#[tokio::test]
async fn test_status_end_to_end() {
    let exchange = MockServer::start().await;
    let sheets = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(values_path(ranges::STATUS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": ranges::STATUS,
            "values": [[2000], [2500], [500], [25]]
        })))
        .mount(&sheets)
        .await;

    let updater = Updater::new(coinspot_client(&exchange), sheets_client(&sheets));
    let status = updater.status().await.unwrap();

    assert_eq!(status.gain, Some(500.into()));
    assert_eq!(
        status.to_string(),
        "Spent = $2000.00\nValue = $2500.00\nGain$ = $500.00\nGain% = 25"
    );
    assert!(exchange.received_requests().await.unwrap().is_empty());
}
