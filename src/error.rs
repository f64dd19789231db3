use thiserror::Error;

/// Failure reading from the variable store. Never fatal: the cycle simply
/// produces no sample.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("variable source unavailable: {0}")]
    Unavailable(String),
}

/// Failure delivering a location to the map service.
/// All variants leave the label eligible for a later attempt.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("location API request timed out")]
    Timeout,
    #[error("location API request failed: {0}")]
    Transport(String),
    #[error("location API returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl ReportError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ReportError::Timeout
        } else {
            ReportError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("sampling interval must be greater than zero")]
    ZeroInterval,
    #[error("window horizon must be greater than zero")]
    ZeroWindow,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("majority threshold must be within (0, 1], got {0}")]
    InvalidThreshold(f64),
}
