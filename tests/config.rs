use std::io::Write;

use tiktok_uploader::{Selectors, UploaderConfig, Video, Visibility};

#[test]
fn defaults_are_complete() {
    let config = UploaderConfig::default();
    assert!(config.headless);
    assert!(config.disguise);
    assert!(config.supported_file_types.contains(&"mp4".to_string()));
    assert!(config.paths.upload.starts_with("https://www.tiktok.com"));
}

#[test]
fn toml_overrides_merge_onto_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        r#"
headless = false
explicit_wait_secs = 60

[paths]
upload = "https://www.tiktok.com/creator/upload"
"#
    )
    .expect("write");

    let config = UploaderConfig::from_toml_file(file.path()).expect("load");
    assert!(!config.headless);
    assert_eq!(config.explicit_wait_secs, 60);
    assert_eq!(config.paths.upload, "https://www.tiktok.com/creator/upload");
    // untouched fields keep their defaults
    assert!(config.disguise);
    assert_eq!(config.paths.main, "https://www.tiktok.com");
}

#[test]
fn selector_overrides_merge_onto_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        r#"
[upload]
file_input = "input.upload-field"
"#
    )
    .expect("write");

    let selectors = Selectors::from_toml_file(file.path()).expect("load");
    assert_eq!(selectors.upload.file_input, "input.upload-field");
    assert_eq!(selectors.login.session_cookie, "sessionid");
}

#[test]
fn video_builder_defaults() {
    let video = Video::new("clip.mp4")
        .description("hello #fyp")
        .visibility(Visibility::Friends)
        .allow_stitch(false);

    assert_eq!(video.path.to_str(), Some("clip.mp4"));
    assert_eq!(video.description, "hello #fyp");
    assert_eq!(video.visibility, Visibility::Friends);
    assert!(video.allow_comments);
    assert!(video.allow_duet);
    assert!(!video.allow_stitch);
    assert!(video.schedule.is_none());
    assert!(video.cover.is_none());
    assert!(video.product_id.is_none());
}
