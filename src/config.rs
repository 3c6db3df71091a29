use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration for a whole upload run: browser launch options, site URLs,
/// wait durations and input validation limits.
///
/// Passed explicitly to the components that need it; there is no global
/// configuration. `Default` carries working values, and the whole struct can
/// be loaded from a TOML file to override them.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub headless: bool,
    /// Apply anti-automation-detection flags and scripts to every page.
    pub disguise: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
    pub proxy: Option<ProxyConfig>,

    /// Wait used for secondary elements that may legitimately be absent.
    pub implicit_wait_secs: u64,
    /// Wait used for elements the flow cannot proceed without.
    pub explicit_wait_secs: u64,

    /// How many times the file-attach step is retried before giving up.
    pub num_retries: u32,

    pub supported_file_types: Vec<String>,
    pub supported_image_file_types: Vec<String>,
    pub max_description_length: usize,

    /// When set, a screenshot of the form is saved here for each failed video.
    pub error_screenshot_dir: Option<PathBuf>,

    pub paths: Paths,
}

/// Site entry points.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub main: String,
    pub login: String,
    pub upload: String,
}

/// Proxy configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ProxyConfig {
    /// Proxy server URL (e.g. "http://host:port", "socks5://host:port")
    pub server: String,
    /// Optional username for proxy authentication
    pub username: Option<String>,
    /// Optional password for proxy authentication
    pub password: Option<String>,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            main: "https://www.tiktok.com".into(),
            login: "https://www.tiktok.com/login/phone-or-email/email".into(),
            upload: "https://www.tiktok.com/tiktokstudio/upload".into(),
        }
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            headless: true,
            disguise: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
            proxy: None,
            implicit_wait_secs: 5,
            explicit_wait_secs: 30,
            num_retries: 3,
            supported_file_types: ["mp4", "webm", "avi", "mov"]
                .map(String::from)
                .to_vec(),
            supported_image_file_types: ["jpg", "jpeg", "png"].map(String::from).to_vec(),
            max_description_length: 2200,
            error_screenshot_dir: None,
            paths: Paths::default(),
        }
    }
}

impl UploaderConfig {
    pub fn builder() -> UploaderConfigBuilder {
        UploaderConfigBuilder::new()
    }

    /// Load overrides from a TOML file on top of the defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))
    }

    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    pub fn explicit_wait(&self) -> Duration {
        Duration::from_secs(self.explicit_wait_secs)
    }
}

pub struct UploaderConfigBuilder {
    config: UploaderConfig,
}

impl UploaderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: UploaderConfig::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn disguise(mut self, disguise: bool) -> Self {
        self.config.disguise = disguise;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set a proxy server (e.g. "http://host:port", "socks5://host:port").
    pub fn proxy(mut self, server: impl Into<String>) -> Self {
        self.config.proxy = Some(ProxyConfig {
            server: server.into(),
            username: None,
            password: None,
        });
        self
    }

    /// Set a proxy server with authentication.
    pub fn proxy_with_auth(
        mut self,
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.proxy = Some(ProxyConfig {
            server: server.into(),
            username: Some(username.into()),
            password: Some(password.into()),
        });
        self
    }

    pub fn explicit_wait(mut self, wait: Duration) -> Self {
        self.config.explicit_wait_secs = wait.as_secs();
        self
    }

    pub fn implicit_wait(mut self, wait: Duration) -> Self {
        self.config.implicit_wait_secs = wait.as_secs();
        self
    }

    pub fn num_retries(mut self, retries: u32) -> Self {
        self.config.num_retries = retries;
        self
    }

    pub fn error_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.error_screenshot_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> UploaderConfig {
        self.config
    }
}

impl Default for UploaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
