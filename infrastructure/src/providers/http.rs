//! Shared HTTP plumbing for provider clients
//!
//! Maps status codes and transport failures onto [`GatewayError`] so the
//! fallback policy can tell transient capacity problems from permanent ones.

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, trace};
use triplet_application::GatewayError;
use triplet_domain::preview;

/// Longest error body excerpt kept in an error value
const ERROR_EXCERPT_CHARS: usize = 200;

/// Send a JSON request and return the parsed JSON body of a 2xx response
pub async fn send_json(request: RequestBuilder, name: &str) -> Result<Value, GatewayError> {
    let response = request.send().await.map_err(classify_transport)?;
    let status = response.status();
    let text = response.text().await.map_err(classify_transport)?;
    trace!("{} response ({}): {}", name, status, text);

    if !status.is_success() {
        let error = classify_status(status, &text);
        debug!("{} returned {}: {}", name, status, error);
        return Err(error);
    }

    serde_json::from_str(&text).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

/// Classify a non-success HTTP status
pub fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let detail = format!("{} {}", status.as_u16(), error_message(body));

    match status.as_u16() {
        529 | 503 => GatewayError::Overloaded(detail),
        429 => GatewayError::RateLimited(detail),
        401 | 403 => GatewayError::Authentication(detail),
        404 => GatewayError::ModelNotAvailable(detail),
        400 | 422 => GatewayError::InvalidRequest(detail),
        408 | 504 => GatewayError::Timeout,
        _ if body.contains("overloaded_error") => GatewayError::Overloaded(detail),
        _ => GatewayError::RequestFailed(detail),
    }
}

/// Classify a transport-level failure
pub fn classify_transport(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(error.to_string())
    } else if error.is_decode() {
        GatewayError::InvalidResponse(error.to_string())
    } else {
        GatewayError::RequestFailed(error.to_string())
    }
}

/// `error.message` from a JSON error body, or an excerpt of the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| preview(body.trim(), ERROR_EXCERPT_CHARS))
}

/// `{base_url}/v1/{path}`, tolerating a trailing slash or an existing `/v1`
pub fn endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{}/v1/{}", base, path.trim_start_matches('/'))
}

#[cfg(test)]
pub(crate) mod stub_server {
    //! One-shot HTTP server returning a canned response

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one request. The handle resolves to the raw request text.
    pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + length
    }
}
