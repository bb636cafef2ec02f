//! Client error types.

use std::fmt;

use barbershop_api::ApiError;
use barbershop_core::{CredentialsError, PayloadError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// The backend call failed.
    Api(ApiError),
    /// IO error.
    Io(std::io::Error),
    /// Bad command-line input or input file.
    Input(String),
    /// The reservation payload did not pass validation.
    Validation(PayloadError),
    /// Login input rejected before contacting the server.
    Credentials(CredentialsError),
}

impl ClientError {
    /// Returns a follow-up suggestion for the user, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Api(err) => err.code().hint(),
            Self::Validation(_) => Some("pass --no-validate to send the ids as typed"),
            Self::Config(_) => Some("run `barbershop config path` to find the file"),
            Self::Io(_) | Self::Input(_) | Self::Credentials(_) => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Api(err) => write!(f, "API error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Input(msg) => write!(f, "invalid input: {}", msg),
            Self::Validation(err) => write!(f, "{}", err),
            Self::Credentials(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Credentials(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<PayloadError> for ClientError {
    fn from(err: PayloadError) -> Self {
        Self::Validation(err)
    }
}

impl From<CredentialsError> for ClientError {
    fn from(err: CredentialsError) -> Self {
        Self::Credentials(err)
    }
}
