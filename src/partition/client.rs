//! HTTP client for the Unstructured partition endpoint.

use crate::partition::{
    form::build_form,
    mappers::{describe_value, display_file_name, map_elements},
    types::{Document, PartitionConfig, PartitionError},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Header carrying the partition API credential.
pub const API_KEY_HEADER: &str = "unstructured-api-key";

/// Interface implemented by anything able to partition raw bytes into documents.
#[async_trait]
pub trait Partitioner: Send + Sync {
    /// Partition `bytes` submitted as `file_name` using the supplied options.
    async fn partition(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        config: &PartitionConfig,
    ) -> Result<Vec<Document>, PartitionError>;
}

/// Stateless client issuing one multipart request per partition call.
#[derive(Clone, Debug)]
pub struct UnstructuredClient {
    http: Client,
}

impl UnstructuredClient {
    /// Construct a client with the crate's default transport settings.
    pub fn new() -> Result<Self, PartitionError> {
        let http = Client::builder().user_agent("rusty-partition/0.1").build()?;
        Ok(Self { http })
    }

    /// Construct a client whose transport aborts requests after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, PartitionError> {
        let http = Client::builder()
            .user_agent("rusty-partition/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Wrap a caller-built HTTP client.
    pub fn from_http(http: Client) -> Self {
        Self { http }
    }

    /// Submit `bytes` to the partition endpoint and normalize the returned elements.
    ///
    /// Only the final path segment of `file_name` is sent. Exactly one request is issued;
    /// failures are never retried here.
    pub async fn partition(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        config: &PartitionConfig,
    ) -> Result<Vec<Document>, PartitionError> {
        let file_name = display_file_name(file_name);
        let url = config.effective_url();
        let strategy = config.effective_strategy();
        tracing::debug!(
            url,
            file = file_name,
            size = bytes.len(),
            strategy = %strategy,
            has_api_key = config
                .api_key
                .as_deref()
                .map(|value| !value.is_empty())
                .unwrap_or(false),
            "Submitting partition request"
        );

        let form = build_form(bytes, file_name, config);
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, config.api_key.as_deref().unwrap_or_default())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let error = PartitionError::Request {
                file_name: file_name.to_string(),
                status: status.as_u16(),
                body,
            };
            tracing::error!(file = file_name, error = %error, "Partition request failed");
            return Err(error);
        }

        let elements = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(elements)) => elements,
            Ok(other) => {
                return Err(shape_error(file_name, describe_value(&other)));
            }
            Err(err) => {
                return Err(shape_error(file_name, format!("invalid JSON ({err})")));
            }
        };

        let element_count = elements.len();
        let documents = map_elements(elements);
        tracing::info!(
            file = file_name,
            elements = element_count,
            documents = documents.len(),
            "Partitioned document"
        );
        Ok(documents)
    }
}

#[async_trait]
impl Partitioner for UnstructuredClient {
    async fn partition(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        config: &PartitionConfig,
    ) -> Result<Vec<Document>, PartitionError> {
        UnstructuredClient::partition(self, bytes, file_name, config).await
    }
}

fn shape_error(file_name: &str, received: String) -> PartitionError {
    let error = PartitionError::ResponseShape {
        file_name: file_name.to_string(),
        received,
    };
    tracing::error!(file = file_name, error = %error, "Partition response rejected");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::types::Strategy;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn test_client() -> UnstructuredClient {
        UnstructuredClient::from_http(
            Client::builder()
                .user_agent("rusty-partition-test")
                .build()
                .expect("client"),
        )
    }

    fn config_for(server: &MockServer) -> PartitionConfig {
        PartitionConfig {
            api_url: Some(server.url("/general/v0/general")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn partition_emits_expected_multipart_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/general/v0/general")
                    .header(API_KEY_HEADER, "secret")
                    .header_exists("content-type")
                    .body_contains(r#"name="files"; filename="report.pdf""#)
                    .body_contains("%PDF-1.7 fake")
                    .body_contains("name=\"strategy\"\r\n\r\nfast\r\n")
                    .body_contains("name=\"ocr_languages\"\r\n\r\neng\r\n")
                    .body_contains("name=\"ocr_languages\"\r\n\r\nfra\r\n")
                    .body_contains("name=\"coordinates\"\r\n\r\ntrue\r\n");
                then.status(200).json_body(json!([]));
            })
            .await;

        let config = PartitionConfig {
            api_key: Some("secret".into()),
            strategy: Some(Strategy::Fast),
            ocr_languages: vec!["eng".into(), "fra".into()],
            coordinates: true,
            ..config_for(&server)
        };

        let documents = test_client()
            .partition(b"%PDF-1.7 fake".to_vec(), "inbox/2024/report.pdf", &config)
            .await
            .expect("partition request");

        mock.assert_async().await;
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn partition_sends_empty_credential_header_when_unset() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/general/v0/general")
                    .header_exists(API_KEY_HEADER)
                    .body_contains("name=\"strategy\"\r\n\r\nhi_res\r\n");
                then.status(200).json_body(json!([]));
            })
            .await;

        test_client()
            .partition(Vec::new(), "empty.txt", &config_for(&server))
            .await
            .expect("partition request");

        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn partition_maps_text_elements() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/general/v0/general");
                then.status(200).json_body(json!([
                    { "type": "Title", "text": "Hello", "metadata": { "page": 1 } },
                    { "type": "Marker" }
                ]));
            })
            .await;

        let documents = test_client()
            .partition(b"hello".to_vec(), "hello.txt", &config_for(&server))
            .await
            .expect("partition request");

        assert_eq!(
            documents,
            vec![Document {
                content: "Hello".into(),
                attributes: json!({ "page": 1, "category": "Title" })
                    .as_object()
                    .cloned()
                    .expect("object"),
            }]
        );
    }

    #[tokio::test]
    async fn partition_reports_error_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/general/v0/general");
                then.status(500).body("bad file");
            })
            .await;

        let error = test_client()
            .partition(b"data".to_vec(), "docs/broken.pdf", &config_for(&server))
            .await
            .expect_err("error response");

        assert_eq!(mock.hits_async().await, 1);
        assert!(matches!(
            &error,
            PartitionError::Request { file_name, status: 500, body }
                if file_name == "broken.pdf" && body == "bad file"
        ));
        let message = error.to_string();
        assert!(message.contains("broken.pdf"));
        assert!(message.contains("500"));
        assert!(message.contains("bad file"));
    }

    #[tokio::test]
    async fn partition_rejects_non_array_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/general/v0/general");
                then.status(200).json_body(json!({ "foo": "bar" }));
            })
            .await;

        let error = test_client()
            .partition(b"data".to_vec(), "doc.pdf", &config_for(&server))
            .await
            .expect_err("shape error");

        assert!(matches!(
            &error,
            PartitionError::ResponseShape { received, .. } if received.contains("foo")
        ));
    }

    #[tokio::test]
    async fn partition_rejects_non_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/general/v0/general");
                then.status(200).body("<html>gateway</html>");
            })
            .await;

        let error = test_client()
            .partition(b"data".to_vec(), "doc.pdf", &config_for(&server))
            .await
            .expect_err("shape error");

        assert!(matches!(error, PartitionError::ResponseShape { .. }));
    }

    #[tokio::test]
    async fn partition_surfaces_transport_failures() {
        let config = PartitionConfig {
            api_url: Some("http://127.0.0.1:1/general/v0/general".into()),
            ..Default::default()
        };

        let error = test_client()
            .partition(b"data".to_vec(), "doc.pdf", &config)
            .await
            .expect_err("connection refused");

        assert!(matches!(error, PartitionError::Http(_)));
    }
}
