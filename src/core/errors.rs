use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The venue answered with `success != "1"`. `message` is the venue text, untouched.
    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Coarse classification callers use to decide what to do with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The venue could not be reached or its answer could not be read.
    Transport,
    /// The venue rejected the request.
    Protocol,
    /// The venue answered, but not in the shape this client expects.
    Decode,
    /// The request was refused locally before anything was sent.
    Client,
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpError(_) | Self::NetworkError(_) | Self::HttpStatus { .. } => {
                ErrorKind::Transport
            }
            Self::ApiError { .. } => ErrorKind::Protocol,
            Self::JsonError(_) | Self::DeserializationError(_) | Self::ParseError(_) => {
                ErrorKind::Decode
            }
            Self::AuthError(_)
            | Self::InvalidParameters(_)
            | Self::ConfigError(_)
            | Self::ConfigurationError(_) => ErrorKind::Client,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_protocol(&self) -> bool {
        self.kind() == ErrorKind::Protocol
    }

    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }

    /// Venue-supplied message for protocol errors
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message } => Some(message),
            _ => None,
        }
    }
}
