//! Element locators for the TikTok pages the uploader drives.
//!
//! The site ships DOM changes without notice, so every locator lives here
//! rather than in the flow code, and the whole table can be reloaded from a
//! TOML file. The flow only assumes a selector resolves to zero-or-one
//! interactable element.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub login: LoginSelectors,
    pub upload: UploadSelectors,
    pub schedule: ScheduleSelectors,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoginSelectors {
    pub username_field: String,
    pub password_field: String,
    pub submit_button: String,
    /// Name of the cookie whose presence marks a live session.
    pub session_cookie: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UploadSelectors {
    pub file_input: String,
    /// Appears once the uploaded file has been accepted for processing.
    pub process_confirmation: String,
    pub split_window_close: String,

    pub description: String,
    pub mention_box: String,
    pub mention_box_user_id: String,

    pub visibility: String,
    pub visibility_option: String,

    pub comment_switch: String,
    pub duet_switch: String,
    pub stitch_switch: String,

    pub edit_cover_button: String,
    pub cover_container: String,
    pub upload_cover_tab: String,
    pub cover_file_input: String,
    pub cover_confirm: String,

    pub product_switch: String,
    pub product_search: String,
    pub product_first_result: String,
    pub product_confirm: String,

    pub post_button: String,
    pub post_button_fallback: String,
    pub post_confirmation: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleSelectors {
    pub switch: String,

    pub date_picker: String,
    pub calendar: String,
    pub calendar_month: String,
    pub calendar_arrows: String,
    pub calendar_valid_days: String,

    pub time_picker: String,
    pub time_picker_text: String,
    pub time_picker_container: String,
    pub timepicker_hours: String,
    pub timepicker_minutes: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            login: LoginSelectors::default(),
            upload: UploadSelectors::default(),
            schedule: ScheduleSelectors::default(),
        }
    }
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            username_field: "input[name='username']".into(),
            password_field: "input[type='password']".into(),
            submit_button: "button[type='submit']".into(),
            session_cookie: "sessionid".into(),
        }
    }
}

impl Default for UploadSelectors {
    fn default() -> Self {
        Self {
            file_input: "input[type='file']".into(),
            process_confirmation: "div[class*='uploading-info'] [class*='success']".into(),
            split_window_close: "div[class*='switch-mode'] button".into(),
            description: "div[contenteditable='true']".into(),
            mention_box: "div[class*='mention-list-popover']".into(),
            mention_box_user_id: "div[class*='mention-list-popover'] [class*='user-id']".into(),
            visibility: "div[class*='Select__root'] button".into(),
            visibility_option: "div[class*='Select__item']".into(),
            comment_switch: "input[data-e2e='comment-switch']".into(),
            duet_switch: "input[data-e2e='duet-switch']".into(),
            stitch_switch: "input[data-e2e='stitch-switch']".into(),
            edit_cover_button: "div[class*='cover-container'] [class*='edit']".into(),
            cover_container: "div[class*='cover-edit-container']".into(),
            upload_cover_tab: "div[class*='cover-edit-tab']:nth-child(2)".into(),
            cover_file_input: "div[class*='cover-edit-container'] input[type='file']".into(),
            cover_confirm: "div[class*='cover-edit-footer'] button[class*='primary']".into(),
            product_switch: "div[class*='product-anchor'] input[type='checkbox']".into(),
            product_search: "div[class*='product-modal'] input[type='text']".into(),
            product_first_result: "div[class*='product-modal'] [class*='product-item']".into(),
            product_confirm: "div[class*='product-modal'] button[class*='primary']".into(),
            post_button: "button[data-e2e='post_video_button']".into(),
            post_button_fallback: ".TUXButton--primary".into(),
            post_confirmation: "div[class*='common-modal-confirm-modal']".into(),
        }
    }
}

impl Default for ScheduleSelectors {
    fn default() -> Self {
        Self {
            switch: "input[data-e2e='schedule-switch']".into(),
            date_picker: "div[class*='scheduled-picker'] div[class*='date-picker-input']".into(),
            calendar: "div[class*='calendar-wrapper']".into(),
            calendar_month: "div[class*='calendar-wrapper'] span[class*='month-title']".into(),
            calendar_arrows: "div[class*='calendar-wrapper'] span[class*='arrow']".into(),
            calendar_valid_days:
                "div[class*='calendar-wrapper'] span[class*='day'][class*='valid']".into(),
            time_picker: "div[class*='scheduled-picker'] div[class*='time-picker-input']".into(),
            time_picker_text: "div[class*='scheduled-picker'] div[class*='time-picker-input'] span"
                .into(),
            time_picker_container: "div[class*='tiktok-timepicker-time-picker-container']".into(),
            timepicker_hours: "span[class*='tiktok-timepicker-left']".into(),
            timepicker_minutes: "span[class*='tiktok-timepicker-right']".into(),
        }
    }
}

impl Selectors {
    /// Load a selector table from a TOML file; unset groups keep the defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))
    }
}
