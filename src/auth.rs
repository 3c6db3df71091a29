//! Resolves a browsing session from cookie material or credentials and
//! applies it to a browser context.
//!
//! State machine: `Unauthenticated -> (cookies applied | login flow) ->
//! Authenticated | Failed`. A failure is terminal and surfaced to the caller;
//! there is no automatic retry.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::UploaderConfig;
use crate::cookies::{self, Cookie};
use crate::error::{Error, Result};
use crate::page::Page;
use crate::selectors::Selectors;

/// Domain applied when only a bare session id is supplied.
const SESSION_COOKIE_DOMAIN: &str = ".tiktok.com";

/// How often the login flow re-reads the context cookies while waiting for
/// the session cookie to appear.
const LOGIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Credential material for one upload run.
///
/// The session cookie is the only thing the site actually requires, but a
/// full cookie set keeps the session from looking freshly minted.
#[derive(Debug)]
pub struct AuthBackend {
    username: Option<String>,
    password: Option<String>,
    cookies: Vec<Cookie>,
}

impl AuthBackend {
    pub fn builder() -> AuthBackendBuilder {
        AuthBackendBuilder::new()
    }

    /// The cookies this backend will apply (empty until a credential login
    /// has run).
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Authenticate the given page.
    ///
    /// Cookies are applied individually: a single malformed cookie is logged
    /// and skipped, never aborting the rest. With no cookie material at all,
    /// an interactive login is performed first and its cookies adopted. The
    /// landing page is then checked so a dead session fails here rather than
    /// half-way through an upload.
    pub async fn authenticate(
        &mut self,
        page: &Page,
        config: &UploaderConfig,
        selectors: &Selectors,
    ) -> Result<()> {
        if self.cookies.is_empty() {
            let (Some(username), Some(password)) = (self.username.clone(), self.password.clone())
            else {
                return Err(Error::InsufficientAuth);
            };
            self.cookies = login(page, &username, &password, config, selectors).await?;
        }

        debug!(count = self.cookies.len(), "applying cookies to the browser context");
        for cookie in &self.cookies {
            let applied = match cookie.to_cookie_param() {
                Ok(param) => page.set_cookie(param).await,
                Err(e) => Err(e),
            };
            if let Err(error) = applied {
                warn!(cookie = %cookie.name, %error, "failed to apply cookie, skipping");
            }
        }

        page.goto(&config.paths.main).await?;

        let url = page.url().await?;
        let session_cookie = selectors.login.session_cookie.as_str();
        let has_session = page
            .get_cookies()
            .await?
            .iter()
            .any(|c| c.name == session_cookie);

        // an unauthenticated visitor gets bounced to the login page or to the
        // generic explore feed
        if url.contains("/login") || (url.contains("/explore") && !has_session) {
            return Err(Error::InsufficientAuth);
        }

        debug!("browser context authenticated");
        Ok(())
    }
}

/// Log in with username and password and return the resulting cookies.
///
/// The session cookie is polled for up to the explicit wait, which leaves
/// room for a captcha to be solved by hand in a headed browser.
async fn login(
    page: &Page,
    username: &str,
    password: &str,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<Vec<Cookie>> {
    info!(username, "logging in with credentials");

    let session_cookie = selectors.login.session_cookie.as_str();

    // a leftover session would short-circuit the login form
    if page
        .get_cookies()
        .await?
        .iter()
        .any(|c| c.name == session_cookie)
    {
        page.clear_cookies().await?;
    }

    page.goto(&config.paths.login).await?;

    let username_field = page
        .wait_for_selector(&selectors.login.username_field)
        .await?;
    username_field.click().await?;
    username_field.type_text(username).await?;

    let password_field = page.find_element(&selectors.login.password_field).await?;
    password_field.click().await?;
    password_field.type_text(password).await?;

    page.find_element(&selectors.login.submit_button)
        .await?
        .click()
        .await?;

    info!("waiting for login to finish; complete any captcha in the browser window");

    let deadline = Instant::now() + config.explicit_wait();
    loop {
        if page
            .get_cookies()
            .await?
            .iter()
            .any(|c| c.name == session_cookie)
        {
            break;
        }
        if Instant::now() >= deadline {
            return Err(Error::InsufficientAuth);
        }
        tokio::time::sleep(LOGIN_POLL_INTERVAL).await;
    }

    // the site redirects away from the login page once the session is live
    let deadline = Instant::now() + config.explicit_wait();
    while page.url().await?.starts_with(&config.paths.login) {
        if Instant::now() >= deadline {
            return Err(Error::Timeout("redirect away from the login page".into()));
        }
        tokio::time::sleep(LOGIN_POLL_INTERVAL).await;
    }

    Ok(page
        .get_cookies()
        .await?
        .iter()
        .map(Cookie::from_cdp)
        .collect())
}

/// Collects cookie material and credentials from any combination of sources.
#[derive(Default)]
pub struct AuthBackendBuilder {
    username: Option<String>,
    password: Option<String>,
    cookies_file: Option<PathBuf>,
    cookies_str: Option<String>,
    cookies_list: Vec<Cookie>,
    session_id: Option<String>,
}

impl AuthBackendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to a Netscape-format cookie file.
    pub fn cookies_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookies_file = Some(path.into());
        self
    }

    /// Raw Netscape-format cookie text.
    pub fn cookies_str(mut self, text: impl Into<String>) -> Self {
        self.cookies_str = Some(text.into());
        self
    }

    /// Explicit list of cookies.
    pub fn cookies(mut self, cookies: impl IntoIterator<Item = Cookie>) -> Self {
        self.cookies_list.extend(cookies);
        self
    }

    /// A bare `sessionid` value.
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn credentials(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username(username).password(password)
    }

    /// Resolve the sources into an [`AuthBackend`].
    ///
    /// Fails with [`Error::InsufficientAuth`] when no cookie material and no
    /// complete credential pair was supplied, or when exactly one of
    /// username/password is present.
    pub fn build(self) -> Result<AuthBackend> {
        if self.username.is_some() != self.password.is_some() {
            return Err(Error::InsufficientAuth);
        }

        let mut cookies = Vec::new();
        if let Some(path) = &self.cookies_file {
            cookies.extend(cookies::parse_file(path)?);
            debug!(path = %path.display(), "authenticating with a cookies file");
        }
        if let Some(text) = &self.cookies_str {
            cookies.extend(cookies::parse_str(text));
            debug!("authenticating with raw cookie text");
        }
        if !self.cookies_list.is_empty() {
            debug!(count = self.cookies_list.len(), "authenticating with a cookies list");
            cookies.extend(self.cookies_list);
        }
        if let Some(session_id) = self.session_id {
            debug!("authenticating with a bare sessionid");
            cookies.push(Cookie::new(
                "sessionid",
                session_id,
                SESSION_COOKIE_DOMAIN,
                "/",
            ));
        }

        if cookies.is_empty() && self.username.is_none() {
            return Err(Error::InsufficientAuth);
        }
        if cookies.is_empty() {
            debug!("authenticating with username and password");
        }

        Ok(AuthBackend {
            username: self.username,
            password: self.password,
            cookies,
        })
    }
}
