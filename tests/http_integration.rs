//! Integration tests for the Proxmox client using wiremock
//!
//! These tests run the full configure → request → decode → project pipeline
//! against a mocked `/api2/json/storage` endpoint.

use pve_storages::config::ProviderConfig;
use pve_storages::error::ErrorKind;
use pve_storages::provider::{Provider, StoragesDataSource};
use pve_storages::pve::client::PveClient;
use pve_storages::pve::field::Field;
use pve_storages::pve::storages::list_storages;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_ID: &str = "root@pam!test";
const TOKEN_SECRET: &str = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx";

fn config_for(endpoint: &str) -> ProviderConfig {
    ProviderConfig {
        endpoint: Some(endpoint.to_string()),
        token_id: Some(TOKEN_ID.to_string()),
        token_secret: Some(TOKEN_SECRET.to_string()),
        skip_verify: None,
    }
}

fn client_for(server: &MockServer) -> PveClient {
    // Trailing slash must not produce `//api2`
    PveClient::from_config(&config_for(&format!("{}/", server.uri()))).expect("valid config")
}

/// Test module for storage listing integration tests
mod storages_tests {
    use super::*;

    /// Successful GET sends the token header and projects every record
    #[tokio::test]
    async fn test_list_storages_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .and(header(
                "Authorization",
                format!("PVEAPIToken={}={}", TOKEN_ID, TOKEN_SECRET).as_str(),
            ))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "storage": "local",
                        "type": "dir",
                        "content": "iso,vztmpl,backup",
                        "path": "/var/lib/vz",
                        "digest": "a1b2c3",
                        "prune-backups": "keep-all=1"
                    },
                    {"storage": "local-lvm", "type": "lvmthin", "content": "rootdir,images"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let storages = list_storages(&client_for(&server))
            .await
            .expect("Request should succeed");

        assert_eq!(storages.len(), 2);
        assert_eq!(storages[0].storage, Field::Present("local".to_string()));
        assert_eq!(storages[0].prune_backups, Field::Present("keep-all=1".to_string()));
        assert!(storages[0].priority.is_absent());
        assert_eq!(storages[1].storage, Field::Present("local-lvm".to_string()));
        assert!(storages[1].path.is_absent());
    }

    /// The reference payload projects exactly the fields it carries
    #[tokio::test]
    async fn test_partial_record() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"storage":"local","type":"dir","priority":10}]}"#,
            ))
            .mount(&server)
            .await;

        let storages = list_storages(&client_for(&server)).await.unwrap();

        assert_eq!(storages.len(), 1);
        let local = &storages[0];
        assert_eq!(local.storage, Field::Present("local".to_string()));
        assert_eq!(local.storage_type, Field::Present("dir".to_string()));
        assert_eq!(local.priority, Field::Present(10));
        assert!(local.content.is_absent());
        assert!(local.path.is_absent());
        assert!(local.digest.is_absent());
        assert!(local.prune_backups.is_absent());
    }

    /// A null entry keeps its slot as an all-absent record
    #[tokio::test]
    async fn test_null_entry_keeps_position() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"data":[{"storage":"local"},null]}"#),
            )
            .mount(&server)
            .await;

        let storages = list_storages(&client_for(&server)).await.unwrap();

        assert_eq!(storages.len(), 2);
        assert_eq!(storages[0].storage, Field::Present("local".to_string()));
        assert!(storages[1].storage.is_absent());
        assert!(storages[1].storage_type.is_absent());
    }

    /// Empty data array is zero records, not an error
    #[tokio::test]
    async fn test_empty_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let storages = list_storages(&client_for(&server)).await.unwrap();
        assert!(storages.is_empty());
    }

    /// 401 response is an API error carrying status and body
    #[tokio::test]
    async fn test_401_returns_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(401).set_body_string("authentication failure"))
            .mount(&server)
            .await;

        let err = list_storages(&client_for(&server)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(401));
        match err {
            pve_storages::error::PveError::Api { body, .. } => {
                assert_eq!(body, "authentication failure")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Any non-200 status fails, including other 2xx codes
    #[tokio::test]
    async fn test_non_200_success_codes_fail() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let err = list_storages(&client_for(&server)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(204));
    }

    /// 500 response is an API error
    #[tokio::test]
    async fn test_500_returns_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let err = list_storages(&client_for(&server)).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    /// Malformed JSON is a decode error
    #[tokio::test]
    async fn test_invalid_json_returns_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        let err = list_storages(&client_for(&server)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    /// Body without the data array is a decode error
    #[tokio::test]
    async fn test_missing_data_returns_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": {}})))
            .mount(&server)
            .await;

        let err = list_storages(&client_for(&server)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    /// Connection refused is a transport error
    #[tokio::test]
    async fn test_connection_refused_returns_transport_error() {
        let client = PveClient::from_config(&config_for("http://127.0.0.1:1")).unwrap();

        let err = list_storages(&client).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}

/// Validation failures never reach the network
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_token_id_sends_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server.uri());
        config.token_id = Some("root@pam".to_string());

        let err = Provider::new("test").configure(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[tokio::test]
    async fn test_missing_secret_sends_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server.uri());
        config.token_secret = None;

        let err = Provider::new("test").configure(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingConfiguration);
    }

    #[tokio::test]
    async fn test_header_unsafe_secret_sends_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server.uri());
        config.token_secret = Some("s3cret\r\nX-Injected: 1".to_string());

        let err = Provider::new("test").configure(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }
}

/// Data source level behaviour
mod data_source_tests {
    use super::*;

    #[tokio::test]
    async fn test_read_sets_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"storage": "nfs-backup", "type": "nfs", "priority": 3.0}]
            })))
            .mount(&server)
            .await;

        let client = Provider::new("test").configure(&config_for(&server.uri())).unwrap();
        let state = StoragesDataSource::new(client).read().await.unwrap();

        assert_eq!(state.id, "storages");
        assert_eq!(state.storages.len(), 1);
        assert_eq!(state.storages[0].priority, Field::Present(3));
    }

    /// One client descriptor serves concurrent reads
    #[tokio::test]
    async fn test_shared_client_concurrent_reads() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"storage": "local"}]
            })))
            .expect(4)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { list_storages(&client).await })
            })
            .collect();

        for handle in handles {
            let storages = handle.await.unwrap().unwrap();
            assert_eq!(storages.len(), 1);
        }
    }

    /// Failed reads produce no partial state
    #[tokio::test]
    async fn test_read_failure_has_no_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api2/json/storage"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission check failed"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = StoragesDataSource::new(client).read().await;
        assert!(result.is_err());
    }
}
