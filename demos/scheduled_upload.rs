//! Schedule a video for tomorrow at the next valid slot.
//!
//! ```sh
//! TIKTOK_SESSIONID=... cargo run --example scheduled_upload -- video.mp4
//! ```

use chrono::{Duration, Utc};
use tiktok_uploader::schedule::{round_to_multiple, MINUTE_MULTIPLE};
use tiktok_uploader::{
    upload_videos, AuthBackend, Selectors, UploaderBrowser, UploaderConfig, Video, Visibility,
};

#[tokio::main]
async fn main() -> tiktok_uploader::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiktok_uploader=debug".into()),
        )
        .init();

    let session_id = std::env::var("TIKTOK_SESSIONID")
        .expect("Set TIKTOK_SESSIONID to the sessionid cookie value");
    let video_path = std::env::args()
        .nth(1)
        .expect("Usage: scheduled_upload <video.mp4>");

    let config = UploaderConfig::builder()
        .headless(true)
        .error_screenshot_dir(std::env::temp_dir())
        .build();
    let selectors = Selectors::default();

    let mut auth = AuthBackend::builder().session_id(session_id).build()?;
    let browser = UploaderBrowser::launch(&config).await?;

    let publish_at = round_to_multiple(Utc::now() + Duration::days(1), MINUTE_MULTIPLE);
    let video = Video::new(video_path)
        .description("Scheduled from Rust #fyp")
        .visibility(Visibility::Public)
        .schedule(publish_at);

    let failed = upload_videos(&browser, &mut auth, vec![video], &config, &selectors).await?;
    browser.close().await?;

    if let Some(failure) = failed.first() {
        eprintln!("Upload failed: {}", failure.error);
        std::process::exit(1);
    }
    println!("Video scheduled for {publish_at}.");
    Ok(())
}
