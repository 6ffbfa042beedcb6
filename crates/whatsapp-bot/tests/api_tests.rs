//! Integration tests for the WhatsApp bot API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;
use whatsapp_bot::{
    api::{create_router_with_rate_limit, AppState, WebhookRateLimit},
    Config,
};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SID: &str = "AC0123456789";

fn config(gateway_url: &str, twilio_url: Option<&str>) -> Config {
    let mut config = Config::default();
    config.gateway.url = gateway_url.to_string();
    if let Some(url) = twilio_url {
        config.twilio.api_base = url.to_string();
        config.twilio.account_sid = Some(SID.to_string());
        config.twilio.auth_token = Some(SecretString::new("secret-token".into()));
    }
    config
}

fn app(config: &Config) -> Router {
    create_router_with_rate_limit(AppState::from_config(config).unwrap(), WebhookRateLimit::per_minute(1000))
}

fn webhook(body: &str) -> Request<Body> {
    let form = format!(
        "Body={}&From=whatsapp%3A%2B962790000000",
        body.replace(' ', "+").replace('?', "%3F")
    );
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

async fn text_body(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn json_body(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, text) = text_body(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_webhook_canned_reply_is_twiml() {
    let app = app(&config("http://127.0.0.1:1", None));
    let response = app.oneshot(webhook("mall summary")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>"));
    assert!(body.contains("Transaction Summary:"));
}

#[tokio::test]
async fn test_webhook_help() {
    let (status, body) = text_body(app(&config("http://127.0.0.1:1", None)), webhook("/help")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("RightNow Financial Advisor"));
    assert!(body.contains("&quot;Give me a mall summary&quot;"));
}

#[tokio::test]
async fn test_webhook_routes_to_tool() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/call_tool"))
        .and(body_partial_json(json!({"tool_name": "get_transaction_anomalies"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": "Refunds > 20 JOD spiked at Y Mall & Z Mall."})),
        )
        .expect(1)
        .mount(&gateway)
        .await;

    let (status, body) = text_body(app(&config(&gateway.uri(), None)), webhook("anything suspicious?")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Refunds &gt; 20 JOD spiked at Y Mall &amp; Z Mall."));
}

#[tokio::test]
async fn test_webhook_financial_analysis_sends_question() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/call_tool"))
        .and(body_partial_json(json!({
            "tool_name": "get_financial_analysis",
            "arguments": {"question": "How did Z Mall do?"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "Z Mall grew steadily."})))
        .expect(1)
        .mount(&gateway)
        .await;

    let (_, body) = text_body(app(&config(&gateway.uri(), None)), webhook("How did Z Mall do?")).await;
    assert!(body.contains("Z Mall grew steadily."));
}

#[tokio::test]
async fn test_webhook_gateway_error_status() {
    let gateway = MockServer::start().await;
    Mock::given(path("/call_tool"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&gateway)
        .await;

    let (_, body) = text_body(app(&config(&gateway.uri(), None)), webhook("give me an overview")).await;
    assert!(body.contains("(Error: 503)"));
}

#[tokio::test]
async fn test_webhook_gateway_unreachable() {
    let (status, body) = text_body(app(&config("http://127.0.0.1:1", None)), webhook("How are sales?")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("trouble connecting to our AI system"));
}

#[tokio::test]
async fn test_webhook_is_rate_limited() {
    let state = AppState::from_config(&config("http://127.0.0.1:1", None)).unwrap();
    let app = create_router_with_rate_limit(state, WebhookRateLimit::per_minute(1));

    let (status, _) = text_body(app.clone(), webhook("mall summary")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = text_body(app.clone(), webhook("mall summary")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Other routes are not limited.
    let (status, _) = text_body(app, get("/status")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_send_message() {
    let twilio = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/2010-04-01/Accounts/{}/Messages.json", SID)))
        .and(body_string_contains("To=whatsapp%3A%2B962790000000"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM42", "status": "queued"})))
        .expect(1)
        .mount(&twilio)
        .await;

    let (status, json) = json_body(
        app(&config("http://127.0.0.1:1", Some(&twilio.uri()))),
        post_json("/send_message", json!({"to": "+962790000000", "message": "Report ready"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["message_sid"], "SM42");
}

#[tokio::test]
async fn test_send_message_requires_fields() {
    let (status, json) = json_body(
        app(&config("http://127.0.0.1:1", None)),
        post_json("/send_message", json!({"to": "+962790000000"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Both 'to' and 'message' are required");
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let app = app(&config("http://127.0.0.1:1", None));

    let request = Request::builder()
        .method("POST")
        .uri("/send_message")
        .header("content-type", "application/json")
        .body(Body::from("{\"to\": "))
        .unwrap();
    let (status, json) = json_body(app.clone(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_BODY");

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .body(Body::from("Body=hi"))
        .unwrap();
    let (status, json) = json_body(app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_send_message_without_twilio() {
    let (status, _) = json_body(
        app(&config("http://127.0.0.1:1", None)),
        post_json("/send_message", json!({"to": "+962790000000", "message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_send_message_twilio_failure() {
    let twilio = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Channel not found"))
        .mount(&twilio)
        .await;

    let (status, json) = json_body(
        app(&config("http://127.0.0.1:1", Some(&twilio.uri()))),
        post_json("/send_message", json!({"to": "+962790000000", "message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].as_str().unwrap().starts_with("Failed to send message"));
}

#[tokio::test]
async fn test_status_with_connected_gateway() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "connected", "tools_count": 5})),
        )
        .mount(&gateway)
        .await;
    let twilio = MockServer::start().await;

    let (status, json) = json_body(app(&config(&gateway.uri(), Some(&twilio.uri()))), get("/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["twilio_configured"], true);
    assert_eq!(json["twilio_account_sid"], SID);
    assert_eq!(json["twilio_phone_number"], "+14155238886");
    assert_eq!(json["mcp_connection"], "connected");
    assert_eq!(json["mcp_status"]["tools_count"], 5);
}

#[tokio::test]
async fn test_status_gateway_error_and_down() {
    let gateway = MockServer::start().await;
    Mock::given(path("/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&gateway)
        .await;

    let (_, json) = json_body(app(&config(&gateway.uri(), None)), get("/status")).await;
    assert_eq!(json["mcp_connection"], "error");
    assert_eq!(json["twilio_configured"], false);
    assert!(json.get("mcp_status").is_none());

    let (_, json) = json_body(app(&config("http://127.0.0.1:1", None)), get("/status")).await;
    assert_eq!(json["mcp_connection"], "failed");
}

#[tokio::test]
async fn test_send_test_message() {
    let twilio = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("RightNow+Financial+Advisor"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM7"})))
        .expect(1)
        .mount(&twilio)
        .await;

    let (status, json) = json_body(
        app(&config("http://127.0.0.1:1", Some(&twilio.uri()))),
        get("/send_test_message/+962790000000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["details"]["sid"], "SM7");
}

#[tokio::test]
async fn test_send_test_message_without_twilio() {
    let (status, json) = json_body(
        app(&config("http://127.0.0.1:1", None)),
        get("/send_test_message/+962790000000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "error");
}
