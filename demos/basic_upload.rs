//! Upload a single video using an exported cookies file.
//!
//! ```sh
//! TIKTOK_COOKIES=cookies.txt cargo run --example basic_upload -- video.mp4
//! ```

use tiktok_uploader::{upload_video, AuthBackend, Selectors, UploaderBrowser, UploaderConfig, Video};

#[tokio::main]
async fn main() -> tiktok_uploader::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiktok_uploader=debug".into()),
        )
        .init();

    let cookies = std::env::var("TIKTOK_COOKIES")
        .expect("Set TIKTOK_COOKIES to the path of a Netscape cookies file");
    let video_path = std::env::args()
        .nth(1)
        .expect("Usage: basic_upload <video.mp4>");

    let config = UploaderConfig::builder().headless(true).build();
    let selectors = Selectors::default();

    let mut auth = AuthBackend::builder().cookies_file(cookies).build()?;
    let browser = UploaderBrowser::launch(&config).await?;

    let video = Video::new(video_path).description("Uploaded from Rust #fyp");
    upload_video(&browser, &mut auth, video, &config, &selectors).await?;

    browser.close().await?;
    println!("Video posted.");
    Ok(())
}
