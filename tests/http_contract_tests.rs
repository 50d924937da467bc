//! HTTP contract tests for WechatClient
//!
//! Cover the transport classification boundaries:
//! - 4xx/5xx HTTP status codes surface as `WechatError::Http`
//! - 200 OK with `errcode != 0` surfaces as `WechatError::Api`
//! - 200 OK with `errcode: 0` or no `errcode` at all is a success
//! - malformed JSON surfaces as a decode error
//! - a failed call is issued exactly once (no implicit retry)

use serde::Deserialize;
use wechat_pub_sdk::client::WechatClient;
use wechat_pub_sdk::error::WechatError;
use wechat_pub_sdk::types::{AppId, AppSecret};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> WechatClient {
    let appid = AppId::new("wx1234567890abcdef").unwrap();
    let secret = AppSecret::new("secret1234567890ab").unwrap();

    WechatClient::builder()
        .appid(appid)
        .secret(secret)
        .base_url(mock_server.uri())
        .build()
        .unwrap()
}

#[derive(Deserialize, Debug)]
struct CardCreateBody {
    #[serde(default)]
    card_id: String,
}

#[tokio::test]
async fn test_http_4xx_status_returns_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/menu/get"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .get::<CardCreateBody>("/cgi-bin/menu/get", &[])
        .await;

    assert!(
        matches!(result, Err(WechatError::Http(_))),
        "expected Http error, got: {:?}",
        result
    );
}

#[tokio::test]
async fn test_http_5xx_status_returns_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/menu/get"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .get::<CardCreateBody>("/cgi-bin/menu/get", &[])
        .await;

    assert!(matches!(result, Err(WechatError::Http(_))));
}

#[tokio::test]
async fn test_errcode_nonzero_returns_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/card/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 40099,
            "errmsg": "invalid card status"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .post::<CardCreateBody, _>("/card/create", &serde_json::json!({"card": {}}))
        .await;

    match result {
        Err(WechatError::Api { code, message }) => {
            assert_eq!(code, 40099);
            assert_eq!(message, "invalid card status");
        }
        other => panic!("expected Api error, got: {:?}", other),
    }

    // expect(1) on the mock verifies the request went out exactly once;
    // dropping the server runs the verification.
}

#[tokio::test]
async fn test_errcode_zero_is_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/card/create"))
        .and(body_json(
            serde_json::json!({"card": {"card_type": "CASH"}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 0,
            "errmsg": "ok",
            "card_id": "abc"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let response: CardCreateBody = client
        .post(
            "/card/create",
            &serde_json::json!({"card": {"card_type": "CASH"}}),
        )
        .await
        .unwrap();

    assert_eq!(response.card_id, "abc");
}

#[tokio::test]
async fn test_absent_errcode_is_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .and(query_param("grant_type", "client_credential"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "T1",
            "expires_in": 7200
        })))
        .mount(&mock_server)
        .await;

    #[derive(Deserialize)]
    struct TokenBody {
        access_token: String,
    }

    let client = create_test_client(&mock_server);
    let response: TokenBody = client
        .get(
            "/cgi-bin/token",
            &[("grant_type", "client_credential"), ("appid", "x"), ("secret", "y")],
        )
        .await
        .unwrap();

    assert_eq!(response.access_token, "T1");
}

#[tokio::test]
async fn test_post_form_sends_urlencoded_body() {
    let mock_server = MockServer::start().await;

    // The server must see a form-encoded body, not JSON: pairs joined
    // with `&`, reserved characters percent-escaped, space as `+`.
    Mock::given(method("POST"))
        .and(path("/cgi-bin/shorturl"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "action=long2short&long_url=http%3A%2F%2Fexample.com%2Fa+b%26c",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 0,
            "errmsg": "ok",
            "short_url": "http://w.url.cn/s/AvCo6Ih"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    #[derive(Deserialize)]
    struct ShortUrlBody {
        short_url: String,
    }

    let client = create_test_client(&mock_server);
    let response: ShortUrlBody = client
        .post_form(
            "/cgi-bin/shorturl",
            &[
                ("action", "long2short"),
                ("long_url", "http://example.com/a b&c"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(response.short_url, "http://w.url.cn/s/AvCo6Ih");
}

#[tokio::test]
async fn test_post_form_errcode_nonzero_returns_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cgi-bin/shorturl"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 40013,
            "errmsg": "invalid appid"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .post_form::<CardCreateBody>("/cgi-bin/shorturl", &[("action", "long2short")])
        .await;

    match result {
        Err(WechatError::Api { code, message }) => {
            assert_eq!(code, 40013);
            assert_eq!(message, "invalid appid");
        }
        other => panic!("expected Api error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_post_form_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cgi-bin/shorturl"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .post_form::<CardCreateBody>("/cgi-bin/shorturl", &[("action", "long2short")])
        .await;

    assert!(matches!(result, Err(WechatError::Http(_))));
}

#[tokio::test]
async fn test_malformed_json_returns_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/menu/get"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>not json</html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .get::<CardCreateBody>("/cgi-bin/menu/get", &[])
        .await;

    // reqwest's .json() decode failure comes back as an Http variant;
    // either way the call must not be mistaken for success.
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_sends_parameters_on_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/cgi-bin/menu/delete"))
        .and(query_param("access_token", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 0,
            "errmsg": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    #[derive(Deserialize)]
    struct Empty {}

    let client = create_test_client(&mock_server);
    let result: Result<Empty, _> = client
        .delete("/cgi-bin/menu/delete", &[("access_token", "T1")])
        .await;

    assert!(result.is_ok());
}
