use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::network::{
    ClearBrowserCookiesParams, Cookie as CdpCookie, CookieParam, GetCookiesParams,
    SetCookiesParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::Page as CrPage;
use chromiumoxide::page::ScreenshotParams;

use crate::element::Element;
use crate::error::{Error, Result};

/// Wrapper around a chromiumoxide Page with the operations the upload flow
/// needs: navigation, bounded waits, cookies, file attachment and JS reads.
pub struct Page {
    inner: CrPage,
    default_timeout: Duration,
}

impl Page {
    pub(crate) fn new(inner: CrPage, default_timeout: Duration) -> Self {
        Self {
            inner,
            default_timeout,
        }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Navigate to the given URL and wait for the page to load.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Reload the current page.
    pub async fn reload(&self) -> Result<()> {
        self.inner
            .reload()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Wait for a navigation to complete.
    pub async fn wait_for_navigation(&self) -> Result<()> {
        self.inner
            .wait_for_navigation()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Get the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.inner
            .url()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .ok_or_else(|| Error::NavigationError("No URL found".into()))
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(result.into_value::<String>().unwrap_or_default())
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Click on an element matching the given CSS selector.
    pub async fn click(&self, selector: &str) -> Result<()> {
        let el = self.find_element(selector).await?;
        el.click().await
    }

    /// Click the first element under `selector` whose trimmed inner text
    /// equals `text`. Returns whether a match was found.
    pub async fn click_by_text(&self, selector: &str, text: &str) -> Result<bool> {
        let selector_js =
            serde_json::to_string(selector).map_err(|e| Error::JsError(e.to_string()))?;
        let text_js = serde_json::to_string(text).map_err(|e| Error::JsError(e.to_string()))?;
        let js = format!(
            r#"
            (() => {{
                const items = document.querySelectorAll({selector_js});
                for (const el of items) {{
                    if ((el.innerText || '').trim() === {text_js}) {{
                        el.click();
                        return true;
                    }}
                }}
                return false;
            }})()
            "#,
        );
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        result
            .into_value::<bool>()
            .map_err(|e| Error::JsError(e.to_string()))
    }

    /// Attach local files to the file input matching the given CSS selector.
    pub async fn set_input_files(&self, selector: &str, files: &[String]) -> Result<()> {
        let el = self.find_element(selector).await?;
        let mut params = SetFileInputFilesParams::new(files.to_vec());
        params.backend_node_id = Some(el.inner().backend_node_id.clone());
        self.inner.execute(params).await.map_err(Error::CdpError)?;
        Ok(())
    }

    // ── Waits ───────────────────────────────────────────────────────

    /// Wait for an element matching the given CSS selector to appear in the
    /// DOM. Polls every 100ms up to the page's default timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<Element> {
        self.wait_for_selector_within(selector, self.default_timeout)
            .await
    }

    /// Wait for an element with an explicit timeout.
    pub async fn wait_for_selector_within(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element> {
        let interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            match self.find_element(selector).await {
                Ok(el) => return Ok(el),
                Err(_) if start.elapsed() < timeout => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    return Err(Error::Timeout(format!(
                        "Timed out waiting for selector: {selector}"
                    )));
                }
            }
        }
    }

    // ── Cookies ─────────────────────────────────────────────────────

    /// Apply a single cookie to the browser context.
    pub async fn set_cookie(&self, cookie: CookieParam) -> Result<()> {
        self.inner
            .execute(SetCookiesParams::new(vec![cookie]))
            .await
            .map_err(Error::CdpError)?;
        Ok(())
    }

    /// Read all cookies visible to this page.
    pub async fn get_cookies(&self) -> Result<Vec<CdpCookie>> {
        let response = self
            .inner
            .execute(GetCookiesParams::default())
            .await
            .map_err(Error::CdpError)?;
        Ok(response.result.cookies)
    }

    /// Delete all browser cookies.
    pub async fn clear_cookies(&self) -> Result<()> {
        self.inner
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(Error::CdpError)?;
        Ok(())
    }

    // ── Observations ────────────────────────────────────────────────

    /// Whether the checkbox/switch matching the selector is currently on.
    pub async fn is_checked(&self, selector: &str) -> Result<bool> {
        let selector_js =
            serde_json::to_string(selector).map_err(|e| Error::JsError(e.to_string()))?;
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector_js});
                if (!el) throw new Error('Element not found: ' + {selector_js});
                return !!(el.checked || el.getAttribute('aria-checked') === 'true');
            }})()
            "#,
        );
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        result
            .into_value::<bool>()
            .map_err(|e| Error::JsError(e.to_string()))
    }

    /// Evaluate a JavaScript expression that yields a string.
    pub async fn evaluate_string(&self, expression: &str) -> Result<String> {
        let result = self
            .inner
            .evaluate(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        result
            .into_value::<String>()
            .map_err(|e| Error::JsError(e.to_string()))
    }

    /// Evaluate a JavaScript expression without caring about the return value.
    pub async fn evaluate_void(&self, expression: &str) -> Result<()> {
        self.inner
            .evaluate(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(())
    }

    /// Take a screenshot of the visible viewport and save it to a file (PNG).
    pub async fn screenshot_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.inner
            .save_screenshot(params, path)
            .await
            .map_err(|e| Error::ScreenshotError(e.to_string()))?;
        Ok(())
    }

    // ── Element Queries ─────────────────────────────────────────────

    /// Find an element matching the given CSS selector.
    pub async fn find_element(&self, selector: &str) -> Result<Element> {
        let el = self
            .inner
            .find_element(selector)
            .await
            .map_err(|e| Error::ElementNotFound(e.to_string()))?;
        Ok(Element::new(el))
    }

    /// Find all elements matching the given CSS selector.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        let els = self
            .inner
            .find_elements(selector)
            .await
            .map_err(|e| Error::ElementNotFound(e.to_string()))?;
        Ok(els.into_iter().map(Element::new).collect())
    }
}
