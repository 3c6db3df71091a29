//! Drives TikTok's web upload form: attach file, describe, configure,
//! optionally schedule, post.
//!
//! Each step returns a `Result` so the flow can tell "skipped, non-fatal"
//! apart from "failed, abort this video". A failing video is reported and
//! the batch moves on to the next one.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::auth::AuthBackend;
use crate::browser::UploaderBrowser;
use crate::config::UploaderConfig;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::page::Page;
use crate::schedule;
use crate::selectors::Selectors;

/// Who can see the posted video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Friends,
    Private,
}

impl Visibility {
    /// The label the upload form shows for this option.
    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Friends => "Friends",
            Self::Private => "Private",
        }
    }
}

/// One video to post, with everything the form can be told about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub path: PathBuf,
    pub description: String,
    /// Desired publish time (UTC); validated and coerced onto the site's
    /// minute granularity before the form is driven.
    pub schedule: Option<DateTime<Utc>>,
    pub visibility: Visibility,
    pub allow_comments: bool,
    pub allow_duet: bool,
    pub allow_stitch: bool,
    /// Custom cover image to replace the auto-picked frame.
    pub cover: Option<PathBuf>,
    /// Product to link on the post.
    pub product_id: Option<String>,
}

impl Video {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            description: String::new(),
            schedule: None,
            visibility: Visibility::Public,
            allow_comments: true,
            allow_duet: true,
            allow_stitch: true,
            cover: None,
            product_id: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn schedule(mut self, when: DateTime<Utc>) -> Self {
        self.schedule = Some(when);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn allow_comments(mut self, allow: bool) -> Self {
        self.allow_comments = allow;
        self
    }

    pub fn allow_duet(mut self, allow: bool) -> Self {
        self.allow_duet = allow;
        self
    }

    pub fn allow_stitch(mut self, allow: bool) -> Self {
        self.allow_stitch = allow;
        self
    }

    pub fn cover(mut self, path: impl Into<PathBuf>) -> Self {
        self.cover = Some(path.into());
        self
    }

    pub fn product_id(mut self, id: impl Into<String>) -> Self {
        self.product_id = Some(id.into());
        self
    }
}

/// A video that could not be posted, with the error that stopped it.
#[derive(Debug)]
pub struct FailedVideo {
    pub video: Video,
    pub error: Error,
}

/// Upload a single video. Errors if the video could not be posted.
pub async fn upload_video(
    browser: &UploaderBrowser,
    auth: &mut AuthBackend,
    video: Video,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    let mut failed = upload_videos(browser, auth, vec![video], config, selectors).await?;
    match failed.pop() {
        None => Ok(()),
        Some(failure) => Err(failure.error),
    }
}

/// Upload a batch of videos through one authenticated page.
///
/// Returns the videos that failed, each with its error. One bad video never
/// aborts the batch; authentication failure does, since nothing can be
/// posted without a session.
pub async fn upload_videos(
    browser: &UploaderBrowser,
    auth: &mut AuthBackend,
    videos: Vec<Video>,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<Vec<FailedVideo>> {
    if videos.is_empty() {
        return Err(Error::FailedToUpload("no videos to upload".into()));
    }
    if videos.len() > 1 {
        debug!(count = videos.len(), "uploading videos");
    }

    let page = browser.new_page(&config.paths.main).await?;
    auth.authenticate(&page, config, selectors).await?;

    let mut failed = Vec::new();
    for (index, mut video) in videos.into_iter().enumerate() {
        info!(path = %video.path.display(), "posting video");
        let result = match validate_video(&mut video, config) {
            Ok(()) => complete_upload_form(&page, &video, config, selectors).await,
            Err(error) => Err(error),
        };
        if let Err(err) = result {
            error!(path = %video.path.display(), error = %err, "failed to upload");
            if let Some(dir) = &config.error_screenshot_dir {
                let shot = dir.join(format!("failed-upload-{index}.png"));
                match page.screenshot_to_file(&shot).await {
                    Ok(()) => debug!(path = %shot.display(), "failure screenshot saved"),
                    Err(error) => warn!(%error, "could not capture failure screenshot"),
                }
            }
            failed.push(FailedVideo { video, error: err });
        }
    }
    Ok(failed)
}

/// Checks that cost nothing compared to driving the form just to find out.
fn validate_video(video: &mut Video, config: &UploaderConfig) -> Result<()> {
    if !video.path.exists() {
        return Err(Error::FailedToUpload(format!(
            "{} does not exist",
            video.path.display()
        )));
    }
    let extension = video
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !config.supported_file_types.contains(&extension) {
        return Err(Error::FailedToUpload(format!(
            "unsupported file type: {}",
            video.path.display()
        )));
    }
    if video.description.chars().count() > config.max_description_length {
        return Err(Error::FailedToUpload(format!(
            "description longer than {} characters",
            config.max_description_length
        )));
    }
    if let Some(when) = video.schedule {
        video.schedule = Some(schedule::validate(Utc::now(), when)?);
    }
    Ok(())
}

/// Walk the form top to bottom for one video.
async fn complete_upload_form(
    page: &Page,
    video: &Video,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    go_to_upload(page, config).await?;
    set_video(page, &video.path, config, selectors).await?;
    dismiss_split_window(page, config, selectors).await;
    set_interactivity(page, video, selectors).await;
    set_description(page, &video.description, config, selectors).await?;
    set_visibility(page, video.visibility, selectors).await?;
    if let Some(cover) = &video.cover {
        set_cover(page, cover, config, selectors).await?;
    }
    if let Some(when) = video.schedule {
        set_schedule(page, when, config, selectors).await?;
    }
    if let Some(product_id) = &video.product_id {
        set_product_link(page, product_id, config, selectors).await?;
    }
    post_video(page, selectors).await
}

async fn go_to_upload(page: &Page, config: &UploaderConfig) -> Result<()> {
    debug!("navigating to the upload page");
    if page.url().await?.starts_with(&config.paths.upload) {
        // a fresh form for every video
        page.reload().await?;
    } else {
        page.goto(&config.paths.upload).await?;
    }
    page.wait_for_navigation().await?;
    Ok(())
}

/// Attach the video file and wait until the site has accepted it for
/// processing. The attach occasionally times out, so it is retried a fixed
/// number of times; any other failure aborts immediately.
async fn set_video(
    page: &Page,
    path: &Path,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    debug!(path = %path.display(), "attaching video file");
    let absolute = path.canonicalize()?;
    let file = absolute.to_string_lossy().into_owned();

    let mut last_error = Error::Timeout("file attach".into());
    for attempt in 1..=config.num_retries.max(1) {
        let result: Result<()> = async {
            page.wait_for_selector(&selectors.upload.file_input).await?;
            page.set_input_files(&selectors.upload.file_input, &[file.clone()])
                .await?;
            page.wait_for_selector(&selectors.upload.process_confirmation)
                .await?;
            Ok(())
        }
        .await;
        match result {
            Ok(()) => return Ok(()),
            Err(error @ Error::Timeout(_)) => {
                warn!(attempt, %error, "file attach timed out, retrying");
                last_error = error;
            }
            Err(error) => return Err(Error::FailedToUpload(error.to_string())),
        }
    }
    Err(Error::FailedToUpload(last_error.to_string()))
}

/// The editor sometimes opens a "split into multiple parts?" dialog.
/// Closing it is best-effort; the dialog is frequently absent.
async fn dismiss_split_window(page: &Page, config: &UploaderConfig, selectors: &Selectors) {
    match page
        .wait_for_selector_within(&selectors.upload.split_window_close, config.implicit_wait())
        .await
    {
        Ok(close) => {
            if let Err(error) = close.click().await {
                debug!(%error, "could not close the split window");
            }
        }
        Err(_) => debug!("split window not shown"),
    }
}

/// Flip the comment/duet/stitch switches to the requested state.
/// Best-effort: the switches move around a lot and a miss is not worth
/// failing the video over.
async fn set_interactivity(page: &Page, video: &Video, selectors: &Selectors) {
    debug!("setting interactivity settings");
    let switches = [
        (&selectors.upload.comment_switch, video.allow_comments),
        (&selectors.upload.duet_switch, video.allow_duet),
        (&selectors.upload.stitch_switch, video.allow_stitch),
    ];
    for (selector, desired) in switches {
        let result: Result<()> = async {
            if page.is_checked(selector).await? != desired {
                page.click(selector).await?;
            }
            Ok(())
        }
        .await;
        if let Err(error) = result {
            warn!(selector = selector.as_str(), %error, "failed to set interactivity switch");
        }
    }
}

/// Type the description, engaging the form's inline autocompletion for
/// hashtags and mentions. Falls back to plain text if the rich entry breaks.
async fn set_description(
    page: &Page,
    description: &str,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    if description.is_empty() {
        return Ok(());
    }
    debug!("setting description");

    // keystroke injection cannot carry characters outside the BMP (emoji)
    let description: String = description
        .chars()
        .filter(|c| (*c as u32) <= 0xFFFF)
        .collect();

    let field = page
        .wait_for_selector(&selectors.upload.description)
        .await?;
    field.click().await?;

    // the field auto-populates with the file name; wait for that, then clear
    let _ = wait_for_text(&field, false, config.explicit_wait()).await;
    field.press_key("End").await?;
    clear_field(page, &field).await?;
    let _ = wait_for_text(&field, true, config.implicit_wait()).await;

    field.click().await?;
    tokio::time::sleep(Duration::from_secs(1)).await;

    if let Err(error) =
        type_rich_description(page, &field, &description, config, selectors).await
    {
        warn!(%error, "rich description entry failed, falling back to plain text");
        clear_field(page, &field).await?;
        field.type_text(&description).await?;
    }
    Ok(())
}

async fn type_rich_description(
    page: &Page,
    field: &Element,
    description: &str,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    for word in description.split_whitespace() {
        if let Some(tag) = word.strip_prefix('#') {
            debug!(tag, "adding hashtag");
            field.type_text(word).await?;
            // a space opens the suggestion box; remove it again before
            // accepting the top suggestion
            field.type_text(" ").await?;
            field.press_key("Backspace").await?;
            page.wait_for_selector_within(&selectors.upload.mention_box, config.implicit_wait())
                .await?;
            field.press_key("Enter").await?;
        } else if let Some(handle) = word.strip_prefix('@') {
            debug!(handle, "adding mention");
            field.type_text(word).await?;
            field.type_text(" ").await?;
            tokio::time::sleep(Duration::from_secs(1)).await;
            field.press_key("Backspace").await?;
            page.wait_for_selector_within(
                &selectors.upload.mention_box_user_id,
                config.explicit_wait(),
            )
            .await?;
            select_mention(page, field, handle, selectors).await?;
        } else {
            field.type_text(word).await?;
            field.type_text(" ").await?;
        }
    }
    Ok(())
}

/// Pick the suggestion whose handle matches exactly. Suggestions stream in
/// and reorder, so the list is re-read until the handle shows up.
async fn select_mention(
    page: &Page,
    field: &Element,
    handle: &str,
    selectors: &Selectors,
) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let entries = page
            .find_elements(&selectors.upload.mention_box_user_id)
            .await?;
        for (index, entry) in entries.iter().enumerate() {
            let text = entry.inner_text().await?;
            let candidate = text.split_whitespace().next().unwrap_or_default();
            if candidate.eq_ignore_ascii_case(handle) {
                debug!(handle, index, "matching user found");
                for _ in 0..index {
                    field.press_key("ArrowDown").await?;
                }
                field.press_key("Enter").await?;
                return Ok(());
            }
        }
        if Instant::now() >= deadline {
            return Err(Error::Timeout(format!("mention suggestion for @{handle}")));
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

async fn set_visibility(page: &Page, visibility: Visibility, selectors: &Selectors) -> Result<()> {
    if visibility == Visibility::Public {
        // the form's default
        return Ok(());
    }
    debug!(option = visibility.label(), "setting visibility");
    page.wait_for_selector(&selectors.upload.visibility)
        .await?
        .click()
        .await?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    if !page
        .click_by_text(&selectors.upload.visibility_option, visibility.label())
        .await?
    {
        return Err(Error::FailedToUpload(format!(
            "visibility option {} not found",
            visibility.label()
        )));
    }
    Ok(())
}

/// Replace the auto-picked cover frame with a custom image.
async fn set_cover(
    page: &Page,
    cover: &Path,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    debug!(cover = %cover.display(), "setting custom cover");
    let extension = cover
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !config.supported_image_file_types.contains(&extension) {
        return Err(Error::FailedToUpload(format!(
            "unsupported cover image type: {}",
            cover.display()
        )));
    }
    let absolute = cover.canonicalize()?;

    page.wait_for_selector(&selectors.upload.edit_cover_button)
        .await?
        .click()
        .await?;
    page.wait_for_selector(&selectors.upload.cover_container)
        .await?;
    page.wait_for_selector(&selectors.upload.upload_cover_tab)
        .await?
        .click()
        .await?;
    page.wait_for_selector(&selectors.upload.cover_file_input)
        .await?;
    page.set_input_files(
        &selectors.upload.cover_file_input,
        &[absolute.to_string_lossy().into_owned()],
    )
    .await?;
    page.wait_for_selector(&selectors.upload.cover_confirm)
        .await?
        .click()
        .await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    Ok(())
}

/// Turn on scheduling and drive the calendar and time-picker widgets.
/// The widgets work in the browser's local timezone, so the UTC schedule is
/// converted before any value is picked.
async fn set_schedule(
    page: &Page,
    when: DateTime<Utc>,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    debug!(%when, "setting schedule");

    let tz = page_timezone(page).await?;
    let local = when.with_timezone(&tz);

    let switch = page.wait_for_selector(&selectors.schedule.switch).await?;
    let already_on = switch.get_attribute("aria-checked").await?.as_deref() == Some("true");
    if !already_on {
        switch.click().await?;
    }

    pick_date(page, local.month(), local.day(), config, selectors).await?;
    pick_time(page, local.hour(), local.minute(), config, selectors).await?;
    Ok(())
}

async fn page_timezone(page: &Page) -> Result<Tz> {
    let name = page
        .evaluate_string("Intl.DateTimeFormat().resolvedOptions().timeZone")
        .await?;
    name.parse()
        .map_err(|_| Error::JsError(format!("unknown browser timezone: {name}")))
}

async fn pick_date(
    page: &Page,
    month: u32,
    day: u32,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    debug!("picking date");
    page.wait_for_selector_within(&selectors.schedule.date_picker, config.implicit_wait())
        .await?
        .click()
        .await?;
    page.wait_for_selector_within(&selectors.schedule.calendar, config.implicit_wait())
        .await?;

    let shown = page
        .find_element(&selectors.schedule.calendar_month)
        .await?
        .inner_text()
        .await?;
    let shown_month = month_from_name(shown.trim())
        .ok_or_else(|| Error::FailedToUpload(format!("unrecognized calendar month: {shown}")))?;
    if shown_month != month {
        // the 10-day window means the target is at most one month away
        let arrows = page
            .find_elements(&selectors.schedule.calendar_arrows)
            .await?;
        let arrow = if shown_month < month {
            arrows.last()
        } else {
            arrows.first()
        };
        arrow
            .ok_or_else(|| Error::ElementNotFound("calendar arrows".into()))?
            .click()
            .await?;
    }

    let mut clicked = false;
    for option in page
        .find_elements(&selectors.schedule.calendar_valid_days)
        .await?
    {
        let text = option.inner_text().await?;
        if text.trim().parse::<u32>().map_or(false, |d| d == day) {
            option.click().await?;
            clicked = true;
            break;
        }
    }
    if !clicked {
        return Err(Error::FailedToUpload(format!(
            "day {day} not selectable in the calendar"
        )));
    }

    verify_date_picked(page, month, day, selectors).await
}

/// Read the picker back to make sure the calendar click landed.
async fn verify_date_picked(
    page: &Page,
    month: u32,
    day: u32,
    selectors: &Selectors,
) -> Result<()> {
    let text = page
        .find_element(&selectors.schedule.date_picker)
        .await?
        .inner_text()
        .await?;
    // shown as YYYY-MM-DD
    let mut parts = text.trim().split('-').skip(1);
    let picked_month = parts.next().and_then(|p| p.parse::<u32>().ok());
    let picked_day = parts.next().and_then(|p| p.parse::<u32>().ok());
    if picked_month == Some(month) && picked_day == Some(day) {
        debug!("date picked correctly");
        Ok(())
    } else {
        Err(Error::FailedToUpload(format!(
            "date picker shows {text:?}, expected month {month} day {day}"
        )))
    }
}

async fn pick_time(
    page: &Page,
    hour: u32,
    minute: u32,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    debug!("picking time");
    let picker = page
        .wait_for_selector_within(&selectors.schedule.time_picker, config.implicit_wait())
        .await?;
    picker.click().await?;
    page.wait_for_selector_within(
        &selectors.schedule.time_picker_container,
        config.implicit_wait(),
    )
    .await?;

    // hour options are 00..23; minute options 00, 05, .., 55
    let hours = page
        .find_elements(&selectors.schedule.timepicker_hours)
        .await?;
    let minutes = page
        .find_elements(&selectors.schedule.timepicker_minutes)
        .await?;
    let hour_option = hours
        .get(hour as usize)
        .ok_or_else(|| Error::FailedToUpload(format!("hour option {hour} not present")))?;
    let minute_option = minutes
        .get((minute / 5) as usize)
        .ok_or_else(|| Error::FailedToUpload(format!("minute option {minute} not present")))?;

    // the lists animate while scrolling; give them a moment before clicking
    hour_option.scroll_into_view().await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    hour_option.click().await?;

    minute_option.scroll_into_view().await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    minute_option.click().await?;

    // click the input again to fold the picker away
    picker.click().await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    verify_time_picked(page, hour, minute, selectors).await
}

/// Read the picker back to make sure both clicks landed.
async fn verify_time_picked(
    page: &Page,
    hour: u32,
    minute: u32,
    selectors: &Selectors,
) -> Result<()> {
    let text = page
        .find_element(&selectors.schedule.time_picker_text)
        .await?
        .inner_text()
        .await?;
    let mut parts = text.trim().split(':');
    let picked_hour = parts.next().and_then(|p| p.parse::<u32>().ok());
    let picked_minute = parts.next().and_then(|p| p.parse::<u32>().ok());
    if picked_hour == Some(hour) && picked_minute == Some(minute) {
        debug!("time picked correctly");
        Ok(())
    } else {
        Err(Error::FailedToUpload(format!(
            "time picker shows {text:?}, expected {hour:02}:{minute:02}"
        )))
    }
}

/// Attach a product link to the post.
async fn set_product_link(
    page: &Page,
    product_id: &str,
    config: &UploaderConfig,
    selectors: &Selectors,
) -> Result<()> {
    debug!(product_id, "attaching product link");
    page.wait_for_selector_within(&selectors.upload.product_switch, config.implicit_wait())
        .await?
        .click()
        .await?;
    let search = page
        .wait_for_selector_within(&selectors.upload.product_search, config.implicit_wait())
        .await?;
    search.click().await?;
    search.type_text(product_id).await?;
    search.press_key("Enter").await?;
    page.wait_for_selector(&selectors.upload.product_first_result)
        .await?
        .click()
        .await?;
    page.find_element(&selectors.upload.product_confirm)
        .await?
        .click()
        .await?;
    Ok(())
}

/// Click post and wait for the site to confirm the video went through.
async fn post_video(page: &Page, selectors: &Selectors) -> Result<()> {
    debug!("clicking the post button");
    let clicked: Result<()> = async {
        let post = page.wait_for_selector(&selectors.upload.post_button).await?;
        post.scroll_into_view().await?;
        post.click().await?;
        Ok(())
    }
    .await;
    if let Err(error) = clicked {
        // overlays sometimes intercept the click; fall back to a JS click
        debug!(%error, "post click intercepted, trying the fallback button");
        let fallback = serde_json::to_string(&selectors.upload.post_button_fallback)
            .map_err(|e| Error::JsError(e.to_string()))?;
        page.evaluate_void(&format!("document.querySelector({fallback}).click()"))
            .await?;
    }

    page.wait_for_selector(&selectors.upload.post_confirmation)
        .await?;
    info!("video posted");
    Ok(())
}

/// Wait until the element's trimmed text is (or stops being) empty.
async fn wait_for_text(field: &Element, want_empty: bool, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    loop {
        let text = field.inner_text().await.unwrap_or_default();
        if text.trim().is_empty() == want_empty {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(Error::Timeout("description field text".into()));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Select everything in the focused field and delete it. The site's editor
/// ignores a plain value reset, so this goes through real editing commands.
async fn clear_field(page: &Page, field: &Element) -> Result<()> {
    field.focus().await?;
    page.evaluate_void("document.execCommand('selectAll', false, null)")
        .await?;
    field.press_key("Backspace").await?;
    Ok(())
}

fn month_from_name(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    MONTHS
        .iter()
        .position(|m| name.eq_ignore_ascii_case(m))
        .map(|i| i as u32 + 1)
}
