//! HTTP transport: GET with query, POST JSON, POST multipart.
//!
//! Returns raw body bytes and never inspects payload semantics.

use courier_core::error::CourierError;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// A file attached to a multipart request.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Thin wrapper over an injected `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// `timeout` applies to every request that does not set its own.
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, CourierError> {
        let mut request = self
            .client
            .get(url)
            .timeout(timeout.unwrap_or(self.timeout));
        if !query.is_empty() {
            request = request.query(query);
        }
        execute(request).await
    }

    /// POST `body` as JSON. `None` sends an empty body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, CourierError> {
        let request = self.client.post(url).timeout(self.timeout);
        let request = match body {
            Some(body) => request.json(body),
            None => request
                .header(CONTENT_TYPE, "application/json")
                .body(Vec::new()),
        };
        execute(request).await
    }

    pub async fn post_multipart(
        &self,
        url: &str,
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> Result<Vec<u8>, CourierError> {
        let mut form = Form::new();
        if let Some(file) = file {
            form = form.part(file.field, Part::bytes(file.data).file_name(file.file_name));
        }
        for (name, value) in fields {
            form = form.text(name, value);
        }

        let request = self.client.post(url).timeout(self.timeout).multipart(form);
        execute(request).await
    }
}

async fn execute(request: RequestBuilder) -> Result<Vec<u8>, CourierError> {
    // Request URLs embed the bot token; keep them out of error text.
    let resp = request
        .send()
        .await
        .map_err(|e| CourierError::Transport(e.without_url().to_string()))?;

    let status = resp.status();
    // 400 carries a useful envelope description, anything above does not.
    if status.as_u16() > StatusCode::BAD_REQUEST.as_u16() {
        return Err(CourierError::Http {
            status: status.as_u16(),
        });
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| CourierError::Transport(format!("failed to read body: {}", e.without_url())))?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> HttpTransport {
        HttpTransport::new(reqwest::Client::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_get_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/botT/getUpdates"))
            .and(query_param("offset", "8"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/botT/getUpdates", server.uri());
        let query = [("offset", "8".to_string()), ("limit", "100".to_string())];
        let body = transport().get(&url, &query, None).await.unwrap();
        assert_eq!(body, b"payload");
    }

    #[tokio::test]
    async fn test_conflict_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(409).set_body_string(
                r#"{"ok":false,"error_code":409,"description":"Conflict"}"#,
            ))
            .mount(&server)
            .await;

        let err = transport()
            .get(&server.uri(), &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_bad_request_body_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("described"))
            .mount(&server)
            .await;

        let body = transport().get(&server.uri(), &[], None).await.unwrap();
        assert_eq!(body, b"described");
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = transport()
            .post_json::<()>(&server.uri(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CourierError::Http { status: 502 }));
        assert!(!err.is_conflict());
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"chat_id": 1, "text": "hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/sendMessage", server.uri());
        let body = serde_json::json!({"chat_id": 1, "text": "hi"});
        transport().post_json(&url, Some(&body)).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_multipart_fields_and_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("name=\"url\""))
            .and(body_string_contains("https://example.com/hook"))
            .and(body_string_contains("filename=\"certificate\""))
            .and(body_string_contains("PEMDATA"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let file = FilePart {
            field: "certificate".into(),
            file_name: "certificate".into(),
            data: b"PEMDATA".to_vec(),
        };
        let fields = vec![("url".to_string(), "https://example.com/hook".to_string())];
        transport()
            .post_multipart(&server.uri(), fields, Some(file))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = transport()
            .get(&server.uri(), &[], Some(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, CourierError::Transport(_)));
    }
}
