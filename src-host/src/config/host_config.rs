//! Runtime host configuration loaded from environment variables.

use std::path::PathBuf;

use notify_stack::{Corner, DisplayInfo, NotifyConfig, Rect};

use super::validation::validate_setting;

/// How the headless dialog presenter answers load-failure prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogAnswer {
    #[default]
    Reload,
    Ignore,
}

/// Runtime configuration of the headless host.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub notify: NotifyConfig,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Height reserved at the bottom of the screen, outside the work area.
    pub taskbar_height: u32,
    pub dialog_answer: DialogAnswer,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            notify: NotifyConfig::default(),
            screen_width: 1920,
            screen_height: 1080,
            taskbar_height: 40,
            dialog_answer: DialogAnswer::Reload,
        }
    }
}

impl HostConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Invalid values are logged and
    /// the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(e) => {
                    tracing::warn!(key, value = %value, "Invalid setting ignored: {e}");
                    None
                }
            }
        };

        let defaults = Self::default();
        let d = &defaults.notify;

        let notify = NotifyConfig {
            corner: g("NOTIFY_CORNER")
                .and_then(|v| Corner::from_str_setting(&v))
                .unwrap_or(d.corner),
            width: parse_or(g("NOTIFY_WIDTH"), d.width),
            height: parse_or(g("NOTIFY_HEIGHT"), d.height),
            padding: parse_or(g("NOTIFY_PADDING"), d.padding),
            border_radius: parse_or(g("NOTIFY_BORDER_RADIUS"), d.border_radius),
            display_time_ms: parse_or(g("NOTIFY_DISPLAY_TIME_MS"), d.display_time_ms),
            animation_steps: parse_or(g("NOTIFY_ANIMATION_STEPS"), d.animation_steps),
            animation_step_ms: parse_or(g("NOTIFY_ANIMATION_STEP_MS"), d.animation_step_ms),
            animate_in_parallel: g("NOTIFY_ANIMATE_IN_PARALLEL")
                .map(|v| v == "true")
                .unwrap_or(d.animate_in_parallel),
            template_path: g("NOTIFY_TEMPLATE_PATH")
                .map(PathBuf::from)
                .or_else(|| d.template_path.clone()),
            logging: g("NOTIFY_LOGGING")
                .map(|v| v == "true")
                .unwrap_or(d.logging),
            idle_sweep_secs: parse_or(g("NOTIFY_SWEEP_INTERVAL_SECS"), d.idle_sweep_secs),
            max_queue_size: d.max_queue_size,
        };

        Self {
            notify,
            screen_width: parse_or(g("NOTIFY_SCREEN_WIDTH"), defaults.screen_width),
            screen_height: parse_or(g("NOTIFY_SCREEN_HEIGHT"), defaults.screen_height),
            taskbar_height: parse_or(g("NOTIFY_TASKBAR_HEIGHT"), defaults.taskbar_height),
            dialog_answer: match g("NOTIFY_DIALOG_ANSWER").as_deref() {
                Some("ignore") => DialogAnswer::Ignore,
                Some(_) => DialogAnswer::Reload,
                None => defaults.dialog_answer,
            },
        }
    }

    /// Primary display simulated by the headless backend.
    pub fn display(&self) -> DisplayInfo {
        display_for(self.screen_width, self.screen_height, self.taskbar_height)
    }
}

/// Screen of the given size with a task bar along the bottom edge.
pub fn display_for(width: u32, height: u32, taskbar_height: u32) -> DisplayInfo {
    let work_height = height.saturating_sub(taskbar_height);
    DisplayInfo::new(
        Rect::new(0, 0, width, height),
        Rect::new(0, 0, width, work_height),
    )
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Whether logging is enabled, read before the tracing subscriber exists.
pub fn logging_enabled() -> bool {
    std::env::var("NOTIFY_LOGGING")
        .map(|v| v != "false")
        .unwrap_or(true)
}
