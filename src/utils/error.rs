use std::fmt;
use thiserror::Error;

/// 外部依賴服務
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Directory,
    Weather,
    Backend,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Upstream::Directory => "directory service",
            Upstream::Weather => "weather service",
            Upstream::Backend => "resolver backend",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    LocationNotFound,
    UpstreamFailure,
}

/// Request-path failure. Display carries internal detail for logs;
/// callers only ever see [`PipelineError::user_friendly_message`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("No locality found for postal code {cep}")]
    LocationNotFound { cep: String },

    #[error("{service} request failed: {message}")]
    UpstreamFailure { service: Upstream, message: String },
}

impl PipelineError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn upstream(service: Upstream, message: impl fmt::Display) -> Self {
        Self::UpstreamFailure {
            service,
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::LocationNotFound { .. } => ErrorKind::LocationNotFound,
            Self::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 422,
            ErrorKind::LocationNotFound => 404,
            ErrorKind::UpstreamFailure => 500,
        }
    }

    /// 對外回應使用的固定訊息，不包含任何內部細節
    pub fn user_friendly_message(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid zipcode",
            Self::LocationNotFound { .. } => "can not find zipcode",
            Self::UpstreamFailure { service, .. } => match service {
                Upstream::Directory => "failed to fetch location",
                Upstream::Weather => "failed to fetch temperature",
                Upstream::Backend => "failed to connect to resolver backend",
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {message}")]
    Parse { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config field: {field}")]
    Missing { field: String },

    #[error("Telemetry setup failed: {message}")]
    Telemetry { message: String },

    #[error("HTTP client setup failed: {message}")]
    HttpClient { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
