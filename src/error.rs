use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    #[error("Navigation failed: {0}")]
    NavigationError(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("JavaScript error: {0}")]
    JsError(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Cookie input could not be used: {0}")]
    CookieParse(String),

    #[error(
        "Insufficient authentication: supply a cookies file, raw cookies text, \
         a cookies list, a sessionid, or a username and password pair"
    )]
    InsufficientAuth,

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Failed to upload: {0}")]
    FailedToUpload(String),

    #[error("CDP error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
