//! Browser-backed tests. These need a local Chrome/Chromium install and
//! network access, so they are ignored by default:
//! `cargo test -- --ignored` runs them.

use tiktok_uploader::{Cookie, UploaderBrowser, UploaderConfig};

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn launch_and_navigate() {
    let config = UploaderConfig::builder().headless(true).build();
    let browser = UploaderBrowser::launch(&config)
        .await
        .expect("Failed to launch browser");

    let page = browser
        .new_page("https://example.com")
        .await
        .expect("Failed to open page");

    let title = page.title().await.expect("Failed to get title");
    assert!(title.contains("Example"), "Title was: {title}");

    let url = page.url().await.expect("Failed to get url");
    assert!(url.contains("example.com"));
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn wait_for_selector_finds_existing_element() {
    let config = UploaderConfig::builder().headless(true).build();
    let browser = UploaderBrowser::launch(&config)
        .await
        .expect("Failed to launch browser");

    let page = browser
        .new_page("https://example.com")
        .await
        .expect("Failed to open page");

    let el = page
        .wait_for_selector("h1")
        .await
        .expect("Failed to wait for h1");
    let text = el.inner_text().await.expect("Failed to get text");
    assert_eq!(text, "Example Domain");
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn cookies_survive_a_context_round_trip() {
    let config = UploaderConfig::builder().headless(true).build();
    let browser = UploaderBrowser::launch(&config)
        .await
        .expect("Failed to launch browser");

    let page = browser
        .new_page("https://example.com")
        .await
        .expect("Failed to open page");

    let cookie = Cookie::new("probe", "value", ".example.com", "/");
    page.set_cookie(cookie.to_cookie_param().expect("param"))
        .await
        .expect("Failed to set cookie");

    let names: Vec<String> = page
        .get_cookies()
        .await
        .expect("Failed to get cookies")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(names.contains(&"probe".to_string()), "cookies: {names:?}");
}
