//! Log in with username and password (headed, so a captcha can be solved by
//! hand) and save the resulting cookies for later runs.
//!
//! ```sh
//! TIKTOK_USERNAME=... TIKTOK_PASSWORD=... cargo run --example save_login_cookies -- cookies.txt
//! ```

use tiktok_uploader::{cookies, AuthBackend, Selectors, UploaderBrowser, UploaderConfig};

#[tokio::main]
async fn main() -> tiktok_uploader::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiktok_uploader=debug".into()),
        )
        .init();

    let username = std::env::var("TIKTOK_USERNAME").expect("Set TIKTOK_USERNAME");
    let password = std::env::var("TIKTOK_PASSWORD").expect("Set TIKTOK_PASSWORD");
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cookies.txt".into());

    // headed so the user can answer any captcha challenge
    let config = UploaderConfig::builder().headless(false).build();
    let selectors = Selectors::default();

    let mut auth = AuthBackend::builder()
        .credentials(username, password)
        .build()?;
    let browser = UploaderBrowser::launch(&config).await?;

    let page = browser.new_page(&config.paths.main).await?;
    auth.authenticate(&page, &config, &selectors).await?;

    cookies::save_file(&output, auth.cookies())?;
    browser.close().await?;
    println!("Cookies saved to {output}.");
    Ok(())
}
