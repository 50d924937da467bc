//! Token lifecycle tests against a stubbed token endpoint

use std::sync::Arc;

use wechat_pub_sdk::error::WechatError;
use wechat_pub_sdk::token::TokenManager;
use wechat_pub_sdk::types::{AppId, AppSecret};
use wechat_pub_sdk::WechatClient;
use wiremock::matchers::{method, path, query_param};
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

#[tokio::test]
async fn test_token_fetched_once_and_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .and(query_param("grant_type", "client_credential"))
        .and(query_param("appid", "wx1234567890abcdef"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "T1",
            "expires_in": 7200
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));

    let first = manager.get_token().await.unwrap();
    let second = manager.get_token().await.unwrap();

    assert_eq!(first, "T1");
    assert_eq!(second, "T1");
}

#[tokio::test]
async fn test_concurrent_callers_trigger_single_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "access_token": "T1",
                    "expires_in": 7200
                }))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = Arc::new(TokenManager::new(create_test_client(&mock_server)));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.get_token().await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "T1");
    }
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "T1",
            "expires_in": 7200
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));

    manager.get_token().await.unwrap();
    manager.invalidate().await;
    manager.get_token().await.unwrap();
}

#[tokio::test]
async fn test_refresh_replaces_cached_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "T2",
            "expires_in": 7200
        })))
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    let token = manager.refresh().await.unwrap();
    assert_eq!(token, "T2");
    assert_eq!(manager.get_token().await.unwrap(), "T2");
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_token_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 40001,
            "errmsg": "invalid credential"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    let result = manager.get_token().await;

    match result {
        Err(WechatError::Token(message)) => {
            assert!(message.contains("40001"), "message was: {message}");
        }
        other => panic!("expected Token error, got: {:?}", other),
    }
}
