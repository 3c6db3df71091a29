pub mod auth;
pub mod browser;
pub mod config;
pub mod cookies;
pub mod disguise;
pub mod element;
pub mod error;
pub mod page;
pub mod schedule;
pub mod selectors;
pub mod upload;

pub use auth::AuthBackend;
pub use browser::UploaderBrowser;
pub use config::{ProxyConfig, UploaderConfig};
pub use cookies::Cookie;
pub use error::{Error, Result};
pub use page::Page;
pub use selectors::Selectors;
pub use upload::{upload_video, upload_videos, FailedVideo, Video, Visibility};
