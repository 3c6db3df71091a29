//! Keeps the automated browser from being flagged as automated.
//!
//! TikTok rejects uploads from sessions it identifies as bots, so disguise is
//! on by default: launch flags plus a script injected before any site JS runs.

use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page as CrPage;

use crate::error::{Error, Result};

/// The user-agent string presented in disguise mode (Chrome on Windows).
pub const DISGUISE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Chrome launch arguments for disguise mode.
/// Note: chromiumoxide adds the `--` prefix automatically, so keys must NOT include `--`.
pub fn disguise_key_args() -> Vec<&'static str> {
    vec![
        "disable-infobars",
        "no-first-run",
        "no-default-browser-check",
    ]
}

/// Key-value disguise args as tuples.
pub fn disguise_kv_args() -> Vec<(&'static str, &'static str)> {
    vec![
        ("disable-blink-features", "AutomationControlled"),
        ("user-agent", DISGUISE_USER_AGENT),
        // avoids the site switching to a translated layout mid-flow
        ("lang", "en"),
    ]
}

/// Inject the evasion script into a page so it runs before any site JS.
pub async fn apply_disguise(page: &CrPage) -> Result<()> {
    let params = AddScriptToEvaluateOnNewDocumentParams::new(DISGUISE_JS);
    page.execute(params)
        .await
        .map_err(|e| Error::JsError(format!("Failed to inject disguise script: {e}")))?;
    Ok(())
}

/// Evasions applied on every new document.
static DISGUISE_JS: &str = r#"
// navigator.webdriver: automated Chrome reports true; a real browser has
// false on the prototype.
Object.defineProperty(Navigator.prototype, 'webdriver', {
    get: () => false,
    configurable: true,
    enumerable: true,
});

// window.chrome is absent in headless mode.
if (!window.chrome) {
    window.chrome = {
        runtime: {
            onConnect: undefined,
            onMessage: undefined,
            connect: function() {},
            sendMessage: function() {},
        },
    };
}

// Headless Chrome ships an empty language list.
Object.defineProperty(navigator, 'languages', {
    get: () => ['en-US', 'en'],
    configurable: true,
});

// outerWidth/outerHeight are 0 in headless mode.
if (window.outerWidth === 0) {
    Object.defineProperty(window, 'outerWidth', {
        get: () => window.innerWidth,
        configurable: true,
    });
}
if (window.outerHeight === 0) {
    Object.defineProperty(window, 'outerHeight', {
        get: () => window.innerHeight + 85,
        configurable: true,
    });
}
"#;
