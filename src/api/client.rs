//! Blocking REST client for the device management backend
//!
//! Every request carries the session's bearer token. A 401 response clears
//! the stored token so the rest of the session runs unauthenticated until a
//! new token is configured.

use super::error::ApiError;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Longest error body echoed back in an `ApiError::Http` message
const MAX_ERROR_MESSAGE: usize = 200;

/// Handle to the backend. Cheap to clone; clones share the session token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Arc<Mutex<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("uem-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: Arc::new(Mutex::new(token.filter(|t| !t.trim().is_empty()))),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.filter(|t| !t.trim().is_empty());
    }

    /// Base URL joined with percent-encoded path segments
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);
        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Map non-success statuses to errors; 401 also drops the session token
    fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = error_message(&body, status);

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend returned 401 ({}), clearing session token", message);
            self.set_token(None);
            return Err(ApiError::Unauthorized(message));
        }

        warn!("Backend returned {}: {}", status.as_u16(), message);
        Err(ApiError::http(status.as_u16(), message))
    }

    fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.check(builder.send()?)?;
        let text = response.text()?;
        parse_body(text)
    }

    /// Writes may answer 201/204 with nothing; an empty body is `None`
    fn send_optional_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let response = self.check(builder.send()?)?;
        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        parse_body(text).map(Some)
    }

    pub fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, segments)?.query(query);
        self.send_json(builder)
    }

    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        let builder = self.request(Method::POST, segments)?.json(body);
        self.send_optional_json(builder)
    }

    pub fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        let builder = self.request(Method::PUT, segments)?.json(body);
        self.send_optional_json(builder)
    }

    /// DELETE; any success status counts, the body is ignored
    pub fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, segments)?;
        self.check(builder.send()?)?;
        Ok(())
    }
}

fn parse_body<T: DeserializeOwned>(text: String) -> Result<T, ApiError> {
    serde_json::from_str(&text).map_err(|e| ApiError::Parse {
        message: e.to_string(),
        body: Some(text),
    })
}

/// Pull a readable message out of an error body
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_MESSAGE).collect()
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP stub for exercising the client without a backend

    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve a single canned response. The join handle yields the raw request.
    pub fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(head_end) = find_head_end(&request) {
                    let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
                    let content_length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn find_head_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::serve_once;
    use super::*;

    fn client(base: &str, token: Option<&str>) -> ApiClient {
        ApiClient::new(base, token.map(String::from), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", None, Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("ftp://example.com", None, Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_joins_and_encodes_segments() {
        let api = client("http://localhost:8080/api/", None);
        let url = api.url(&["android", "profiles", "a b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/android/profiles/a%20b");

        let api = client("http://localhost:8080", None);
        assert_eq!(api.url(&["groups"]).unwrap().path(), "/groups");
    }

    #[test]
    fn test_blank_token_is_no_token() {
        let api = client("http://localhost", Some("  "));
        assert!(!api.has_token());
        api.set_token(Some("abc".to_string()));
        assert_eq!(api.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_bearer_token_sent() {
        let (base, server) = serve_once("200 OK", "[]");
        let api = client(&base, Some("secret"));

        let items: Vec<serde_json::Value> = api.get_json(&["groups"], &[]).unwrap();
        assert!(items.is_empty());

        let request = server.join().unwrap().to_lowercase();
        assert!(request.starts_with("get /groups "));
        assert!(request.contains("authorization: bearer secret"));
    }

    #[test]
    fn test_unauthorized_clears_token() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"message": "token expired"}"#);
        let api = client(&base, Some("stale"));
        let shared = api.clone();

        let result: Result<Vec<serde_json::Value>, _> = api.get_json(&["groups"], &[]);
        server.join().unwrap();

        match result {
            Err(ApiError::Unauthorized(message)) => assert_eq!(message, "token expired"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
        assert!(!api.has_token());
        assert!(!shared.has_token());
    }

    #[test]
    fn test_http_error_message() {
        let (base, server) = serve_once("404 Not Found", "");
        let api = client(&base, None);

        let err = api.delete(&["groups", "g-9"]).unwrap_err();
        let request = server.join().unwrap();

        assert!(request.starts_with("DELETE /groups/g-9 "));
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_parse_error_keeps_body() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let api = client(&base, None);

        let result: Result<Vec<u32>, _> = api.get_json(&["groups"], &[]);
        server.join().unwrap();

        match result {
            Err(ApiError::Parse { body, .. }) => {
                assert_eq!(body.as_deref(), Some("<html>oops</html>"))
            }
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_write_response_is_none() {
        let (base, server) = serve_once("204 No Content", "");
        let api = client(&base, None);

        let result: Option<Vec<u32>> = api.put_json(&["groups", "g-1"], &vec![1u32]).unwrap();
        server.join().unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn test_network_error() {
        // Bind then drop to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let api = client(&format!("http://127.0.0.1:{}", port), None);
        let result: Result<Vec<u32>, _> = api.get_json(&["groups"], &[]);
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(r#"{"error": "bad"}"#, StatusCode::BAD_REQUEST),
            "bad"
        );
        assert_eq!(
            error_message("  plain text  ", StatusCode::BAD_REQUEST),
            "plain text"
        );
        assert_eq!(
            error_message("", StatusCode::INTERNAL_SERVER_ERROR),
            "Internal Server Error"
        );
    }
}
