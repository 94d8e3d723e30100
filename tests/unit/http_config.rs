//! Tests for HttpClientConfig network binding functionality.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use memoq_wsapi::memoq::{Client, ClientConfig, MemoQProject, ServerProjectListFilter};
use memoq_wsapi::HttpClientConfig;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{list_projects_response, setup_mock_server};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), Uuid::nil())
}

#[tokio::test]
async fn test_local_address_binding_to_localhost_works() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/serverproject"))
        .respond_with(ResponseTemplate::new(200).set_body_string(list_projects_response(&[])))
        .mount(&server)
        .await;

    let http = HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(http.local_address, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));

    let client = Client::with_http_config(config_for(&server), http).unwrap();
    let projects = client
        .list_projects(&ServerProjectListFilter::default())
        .await
        .unwrap();
    assert!(projects.is_empty());
}

#[tokio::test]
async fn test_local_address_binding_to_unavailable_ip_fails_on_connect() {
    let server = setup_mock_server().await;

    // 192.0.2.1 is TEST-NET-1 (RFC 5737) and not assigned to any interface.
    let http = HttpClientConfig::new().local_address(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));

    // Binding happens on connect, not on client creation.
    let client = Client::with_http_config(config_for(&server), http).unwrap();
    let result = client.list_projects(&ServerProjectListFilter::default()).await;
    assert!(result.is_err());
}

#[test]
fn test_timeout_configuration() {
    let http = HttpClientConfig::new().timeout(Duration::from_secs(5));
    assert_eq!(http.timeout, Some(Duration::from_secs(5)));
    assert_eq!(HttpClientConfig::new().timeout, None);
    assert_eq!(HttpClientConfig::DEFAULT_TIMEOUT, Duration::from_secs(30));

    let config = ClientConfig::new("http://localhost", Uuid::nil());
    assert!(MemoQProject::with_http_config(config, http).is_ok());
}

#[tokio::test]
async fn test_timeout_is_applied() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/serverproject"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(list_projects_response(&[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let http = HttpClientConfig::new().timeout(Duration::from_millis(200));
    let client = Client::with_http_config(config_for(&server), http).unwrap();
    let result = client.list_projects(&ServerProjectListFilter::default()).await;
    assert!(matches!(result, Err(memoq_wsapi::MemoqError::Request(_))));
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "android",
    target_os = "fuchsia",
))]
#[test]
fn test_interface_binding_config() {
    let http = HttpClientConfig::new().interface("lo");
    assert_eq!(http.interface, Some("lo".to_string()));

    // Interface binding is validated on connect.
    let config = ClientConfig::new("http://localhost", Uuid::nil());
    assert!(Client::with_http_config(config, http).is_ok());
}
