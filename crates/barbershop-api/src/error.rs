//! Errors raised while talking to the booking backend.
//!
//! Only the transport layer produces these. Normalizing a response body never
//! fails; a body that cannot be decoded at all is reported here as
//! [`ApiErrorCode::InvalidResponse`].

use std::fmt;
use thiserror::Error;

/// What went wrong with a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// No session, or the server rejected its token (401).
    NotLoggedIn,
    /// The account may not do this, e.g. a client opening the barber agenda (403).
    Forbidden,
    /// The barber, slot or appointment does not exist (404).
    NotFound,
    /// The server refused the request, e.g. a slot already taken (400, 422).
    Rejected,
    /// Too many requests (429).
    RateLimited,
    /// The backend failed (5xx).
    ServerError,
    /// The backend could not be reached or did not answer in time.
    Unreachable,
    /// The body is not JSON, or a login answer carries no user.
    InvalidResponse,
    /// Bad base URL or timeout.
    Configuration,
    /// The session file could not be written or removed.
    SessionStore,
    /// A request body could not be encoded.
    Internal,
}

impl ApiErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not_logged_in",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Unreachable => "unreachable",
            Self::InvalidResponse => "invalid_response",
            Self::Configuration => "configuration",
            Self::SessionStore => "session_store",
            Self::Internal => "internal",
        }
    }

    /// Returns what the user can do about it, when there is something.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotLoggedIn => Some("run `barbershop login` first"),
            Self::Forbidden => Some("this command needs a barber account"),
            Self::NotFound => Some("list ids again with `barbershop barbers` or `barbershop slots`"),
            Self::Rejected => Some("check the selected ids; the slot may already be taken"),
            Self::RateLimited => Some("wait a moment before trying again"),
            Self::Unreachable => Some("check api.base_url in the config or pass --base-url"),
            Self::Configuration => Some("run `barbershop config validate`"),
            Self::SessionStore => Some("check permissions on the session file"),
            Self::ServerError | Self::InvalidResponse | Self::Internal => None,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed booking request.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
    /// The request that failed, e.g. `GET /barbers`.
    endpoint: Option<String>,
    /// HTTP status, when the server answered.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Creates an error with the given code and message.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            endpoint: None,
            status: None,
            source: None,
        }
    }

    pub fn not_logged_in(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotLoggedIn, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Rejected, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ServerError, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Unreachable, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Configuration, message)
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::SessionStore, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }

    /// Records the request this error came from.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Records the HTTP status the server answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref endpoint) = self.endpoint {
            write!(f, "[{}] ", endpoint)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result of a booking API call.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_stable_names() {
        assert_eq!(ApiErrorCode::SessionStore.as_str(), "session_store");
        assert_eq!(ApiErrorCode::NotLoggedIn.to_string(), "not_logged_in");
    }

    #[test]
    fn hints_point_at_commands() {
        assert!(ApiErrorCode::NotLoggedIn.hint().unwrap().contains("barbershop login"));
        assert!(ApiErrorCode::Unreachable.hint().unwrap().contains("--base-url"));
        assert_eq!(ApiErrorCode::ServerError.hint(), None);
        assert_eq!(ApiErrorCode::InvalidResponse.hint(), None);
    }

    #[test]
    fn display_includes_endpoint() {
        let err = ApiError::rejected("horário indisponível")
            .with_endpoint("POST /reservas")
            .with_status(422);
        assert_eq!(
            err.to_string(),
            "[POST /reservas] rejected: horário indisponível"
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.endpoint(), Some("POST /reservas"));
    }

    #[test]
    fn keeps_source() {
        use std::error::Error;
        let err = ApiError::session("failed to save session")
            .with_source(std::io::Error::other("disk full"));
        assert!(err.source().is_some());
        assert!(err.status().is_none());
    }
}
