//! reqwest-backed [`BookingApi`].

use std::sync::Arc;
use std::time::Duration;

use barbershop_core::json::read_optional_string;
use barbershop_core::{ReservaPayload, User};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::booking::{BookingApi, BoxFuture, session_from_login, user_from_body};
use crate::error::{ApiError, ApiResult};
use crate::session::{Session, SessionStore};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Keys holding a human-readable error in a failure body.
const MESSAGE_PATHS: &[&str] = &["message", "error", "mensagem", "detail"];

/// Connection settings for [`HttpBookingApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against.
    pub base_url: Url,
    /// Timeout for a whole request.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Parses a base URL. A trailing slash is added so endpoint paths nest
    /// under any path prefix (`https://host/api` serves `https://host/api/barbers`).
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|e| {
            ApiError::configuration(format!("invalid base URL {:?}: {}", base_url, e))
                .with_source(e)
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::configuration(format!(
                "unsupported URL scheme: {}",
                base_url.scheme()
            )));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves an endpoint path against the base URL.
    pub fn endpoint_url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::configuration(format!("invalid endpoint {}: {}", path, e)))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("Invalid default base URL"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Booking API over HTTP.
///
/// Sends `Authorization: Bearer <token>` whenever the session store holds a
/// token.
pub struct HttpBookingApi {
    client: Client,
    config: ApiConfig,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for HttpBookingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBookingApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpBookingApi {
    /// Creates a client for the given backend.
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("barbershop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::unreachable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Returns the connection settings.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn token(&self) -> Option<String> {
        match self.session.token() {
            Ok(token) => token,
            Err(e) => {
                warn!("session unavailable, sending anonymous request: {}", e);
                None
            }
        }
    }

    /// Sends a request and decodes the JSON body. An empty body yields `null`.
    async fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> ApiResult<Value> {
        let endpoint = format!("{} {}", method, path);
        self.send(method, path, body)
            .await
            .map_err(|e| e.with_endpoint(endpoint))
    }

    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> ApiResult<Value> {
        let url = self.config.endpoint_url(path)?;
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::unreachable("request timeout")
            } else if e.is_connect() {
                ApiError::unreachable(format!("connection failed: {}", e))
            } else {
                ApiError::unreachable(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::unreachable(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(error_for_status(status, &text, retry_after));
        }

        parse_body(&text)
    }

    async fn get(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::GET, path, None).await
    }
}

/// Decodes a success body. Blank bodies (204, empty 200) are `null`.
pub fn parse_body(text: &str) -> ApiResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| {
        ApiError::invalid_response(format!("failed to parse response: {}", e)).with_source(e)
    })
}

/// Maps a non-success status to an error, surfacing the server's message.
pub fn error_for_status(status: StatusCode, body: &str, retry_after: Option<u64>) -> ApiError {
    let server_message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .as_object()
                .and_then(|record| read_optional_string(record, MESSAGE_PATHS))
        });
    let message = |default: &str| server_message.clone().unwrap_or_else(|| default.to_string());

    let error = match status {
        StatusCode::UNAUTHORIZED => {
            ApiError::not_logged_in(message("not logged in or session expired"))
        }
        StatusCode::FORBIDDEN => ApiError::forbidden(message("access denied")),
        StatusCode::NOT_FOUND => ApiError::not_found(message("resource not found")),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::rejected(message("request rejected"))
        }
        StatusCode::TOO_MANY_REQUESTS => ApiError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )),
        _ => ApiError::server(format!(
            "API error ({}): {}",
            status,
            message(body.trim())
        )),
    };
    error.with_status(status.as_u16())
}

impl BookingApi for HttpBookingApi {
    fn name(&self) -> &str {
        "http"
    }

    fn list_barbers(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(self.get("/barbers"))
    }

    fn list_services(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(self.get("/services"))
    }

    fn list_time_slots<'a>(&'a self, barber_id: &'a str) -> BoxFuture<'a, ApiResult<Value>> {
        Box::pin(async move {
            let path = format!("/times/barber/{}", urlencoding::encode(barber_id));
            self.get(&path).await
        })
    }

    fn list_reservas(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(self.get("/reservas"))
    }

    fn create_reserva<'a>(
        &'a self,
        payload: &'a ReservaPayload,
    ) -> BoxFuture<'a, ApiResult<Value>> {
        Box::pin(async move {
            let body = serde_json::to_vec(payload)
                .map_err(|e| ApiError::internal(format!("failed to encode payload: {}", e)))?;
            self.request(Method::POST, "/reservas", Some(body)).await
        })
    }

    fn today_appointments(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(self.get("/barber/today-appointments"))
    }

    fn attend_appointment<'a>(&'a self, appointment_id: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            let path = format!("/appointment/attend/{}", urlencoding::encode(appointment_id));
            self.request(Method::PATCH, &path, None).await?;
            Ok(())
        })
    }

    fn cancel_appointment<'a>(&'a self, appointment_id: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            let path = format!("/appointment/cancel/{}", urlencoding::encode(appointment_id));
            self.request(Method::PATCH, &path, None).await?;
            Ok(())
        })
    }

    fn login<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, ApiResult<Session>> {
        Box::pin(async move {
            let body = serde_json::to_vec(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .map_err(|e| ApiError::internal(format!("failed to encode credentials: {}", e)))?;

            let response = self
                .request(Method::POST, "/user/login", Some(body))
                .await?;
            session_from_login(&response).map_err(|e| e.with_endpoint("POST /user/login"))
        })
    }

    fn me(&self) -> BoxFuture<'_, ApiResult<User>> {
        Box::pin(async move {
            let response = self.get("/user/me").await?;
            user_from_body(&response).map_err(|e| e.with_endpoint("GET /user/me"))
        })
    }

    fn logout(&self) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.request(Method::POST, "/user/logout", None).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorCode;
    use crate::session::MemorySessionStore;
    use barbershop_core::UserKind;

    mod config {
        use super::*;

        #[test]
        fn adds_trailing_slash() {
            let config = ApiConfig::new("https://api.example.com/v1").unwrap();
            assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
            assert_eq!(
                config.endpoint_url("/times/barber/3").unwrap().as_str(),
                "https://api.example.com/v1/times/barber/3"
            );
        }

        #[test]
        fn default_points_at_localhost() {
            let config = ApiConfig::default();
            assert_eq!(
                config.endpoint_url("/barbers").unwrap().as_str(),
                "http://localhost:3000/barbers"
            );
            assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        }

        #[test]
        fn rejects_bad_urls() {
            let err = ApiConfig::new("not a url").unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::Configuration);

            let err = ApiConfig::new("ftp://example.com").unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::Configuration);
        }
    }

    mod status {
        use super::*;

        #[test]
        fn maps_client_errors() {
            let cases = [
                (StatusCode::UNAUTHORIZED, ApiErrorCode::NotLoggedIn),
                (StatusCode::FORBIDDEN, ApiErrorCode::Forbidden),
                (StatusCode::NOT_FOUND, ApiErrorCode::NotFound),
                (StatusCode::BAD_REQUEST, ApiErrorCode::Rejected),
                (StatusCode::UNPROCESSABLE_ENTITY, ApiErrorCode::Rejected),
                (StatusCode::TOO_MANY_REQUESTS, ApiErrorCode::RateLimited),
                (StatusCode::INTERNAL_SERVER_ERROR, ApiErrorCode::ServerError),
                (StatusCode::BAD_GATEWAY, ApiErrorCode::ServerError),
            ];
            for (status, code) in cases {
                let err = error_for_status(status, "", None);
                assert_eq!(err.code(), code, "{status}");
                assert_eq!(err.status(), Some(status.as_u16()));
            }
        }

        #[test]
        fn surfaces_server_message() {
            let err = error_for_status(
                StatusCode::UNAUTHORIZED,
                r#"{"message":"Credenciais inválidas"}"#,
                None,
            );
            assert_eq!(err.message(), "Credenciais inválidas");

            let err = error_for_status(StatusCode::BAD_REQUEST, "<html>", None);
            assert_eq!(err.message(), "request rejected");
        }

        #[test]
        fn rate_limit_mentions_retry_after() {
            let err = error_for_status(StatusCode::TOO_MANY_REQUESTS, "", Some(30));
            assert!(err.message().contains("retry after 30 seconds"));
            assert_eq!(err.status(), Some(429));
        }
    }

    mod body {
        use super::*;

        #[test]
        fn blank_is_null() {
            assert_eq!(parse_body("  ").unwrap(), Value::Null);
        }

        #[test]
        fn garbage_is_invalid_response() {
            let err = parse_body("<html>").unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::InvalidResponse);
        }
    }

    mod roundtrip {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        /// Serves one canned HTTP response and returns the raw request head.
        async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());

            let handle = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
                String::from_utf8_lossy(&request).to_string()
            });

            (base, handle)
        }

        #[tokio::test]
        async fn sends_bearer_token() {
            let (base, handle) = serve_once("200 OK", r#"{"items":[{"id":1,"nome":"João"}]}"#).await;
            let user = User {
                id: "u-1".to_string(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
                kind: Some(UserKind::Client),
            };
            let store = Arc::new(MemorySessionStore::with_session(Session::new(
                Some("tok-123".to_string()),
                user,
            )));

            let api = HttpBookingApi::new(ApiConfig::new(&base).unwrap(), store).unwrap();
            let body = api.list_barbers().await.unwrap();
            assert_eq!(body["items"][0]["nome"], "João");

            let request = handle.await.unwrap();
            assert!(request.starts_with("GET /barbers HTTP/1.1"));
            assert!(request.to_lowercase().contains("authorization: bearer tok-123"));
        }

        #[tokio::test]
        async fn maps_unauthorized_with_endpoint() {
            let (base, handle) = serve_once("401 Unauthorized", r#"{"message":"Token inválido"}"#).await;
            let api = HttpBookingApi::new(
                ApiConfig::new(&base).unwrap(),
                Arc::new(MemorySessionStore::new()),
            )
            .unwrap();

            let err = api.today_appointments().await.unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::NotLoggedIn);
            assert_eq!(err.endpoint(), Some("GET /barber/today-appointments"));
            assert_eq!(err.message(), "Token inválido");

            let request = handle.await.unwrap();
            assert!(!request.to_lowercase().contains("authorization:"));
        }
    }
}
