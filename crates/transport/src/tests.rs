use procura_core::Partition;
use wiremock::matchers::{body_string_contains, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{RecordSource, SheetClient, TransportError, WriteEndpoint};

#[tokio::test]
async fn test_fetch_parses_record_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "read"))
        .and(query_param("sheet", "rejected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"ID": "PR-001", "Items": "Toner", "Status": "rejected"},
            {"ID": "PR-002", "Items": "Paper", "Status": "rejected"},
        ])))
        .mount(&server)
        .await;

    let client = SheetClient::new(&server.uri()).unwrap();
    let records = client.fetch(&Partition::rejected()).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id(), Some("PR-001"));
    assert_eq!(records[1].text("Items"), "Paper");
}

#[tokio::test]
async fn test_fetch_main_uses_empty_sheet_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "read"))
        .and(query_param("sheet", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = SheetClient::new(&server.uri()).unwrap();
    let records = client.fetch(&Partition::main()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_surfaces_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = SheetClient::new(&server.uri()).unwrap();
    let err = client.fetch(&Partition::main()).await.unwrap_err();
    match err {
        TransportError::HttpStatus { code, ref body } => {
            assert_eq!(code, 503);
            assert_eq!(body, "maintenance");
        },
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_fetch_rejects_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = SheetClient::new(&server.uri()).unwrap();
    let err = client.fetch(&Partition::main()).await.unwrap_err();
    assert!(matches!(err, TransportError::JsonParse { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_post_sends_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("ID=PR-007"))
        .and(body_string_contains("Status=approved"))
        .and(body_string_contains("ApprovedBy=budi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetClient::new(&server.uri()).unwrap();
    let form = vec![
        ("ID".to_owned(), "PR-007".to_owned()),
        ("Status".to_owned(), "approved".to_owned()),
        ("ApprovedBy".to_owned(), "budi".to_owned()),
    ];
    client.post(&form).await.unwrap();
}

#[tokio::test]
async fn test_post_surfaces_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("script error"))
        .mount(&server)
        .await;

    let client = SheetClient::new(&server.uri()).unwrap();
    let err = client.post(&[]).await.unwrap_err();
    assert!(matches!(err, TransportError::HttpStatus { code: 500, .. }));
}

#[test]
fn test_invalid_url_is_config_error() {
    let err = SheetClient::new("not a url").unwrap_err();
    assert!(err.is_config());
    assert!(!err.is_transient());
}
