//! Notification stack configuration.
//!
//! Settings are fixed once the engine starts. Geometry derived from them
//! lives in [`crate::geometry::Layout`] and is rebuilt on display changes.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MAX_QUEUE_SIZE;

/// Template loaded into every freshly created notification window.
pub const DEFAULT_TEMPLATE: &str = "notification.html";

/// Screen corner the notification stack grows from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    UpperRight,
    UpperLeft,
    LowerRight,
    LowerLeft,
}

impl Corner {
    pub fn from_str_setting(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upper-right" => Some(Self::UpperRight),
            "upper-left" => Some(Self::UpperLeft),
            "lower-right" => Some(Self::LowerRight),
            "lower-left" => Some(Self::LowerLeft),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpperRight => "upper-right",
            Self::UpperLeft => "upper-left",
            Self::LowerRight => "lower-right",
            Self::LowerLeft => "lower-left",
        }
    }

    /// Whether the stack grows downwards from the top edge.
    pub fn is_upper(self) -> bool {
        matches!(self, Self::UpperRight | Self::UpperLeft)
    }

    pub fn is_right(self) -> bool {
        matches!(self, Self::UpperRight | Self::LowerRight)
    }
}

/// Runtime settings for the notification stack.
///
/// Serialized (camelCase) and pushed to every surface once its template has
/// loaded, so the surface can size and round its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifyConfig {
    pub corner: Corner,
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub border_radius: u32,
    /// Default auto-dismiss delay when a request does not carry its own.
    pub display_time_ms: u64,
    pub animation_steps: u32,
    pub animation_step_ms: u64,
    /// Move all shifted windows at once instead of one after another.
    pub animate_in_parallel: bool,
    pub template_path: Option<PathBuf>,
    pub logging: bool,
    /// Inactive pooled windows are destroyed on this period.
    pub idle_sweep_secs: u64,
    pub max_queue_size: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            corner: Corner::UpperRight,
            width: 300,
            height: 80,
            padding: 4,
            border_radius: 5,
            display_time_ms: 5000,
            animation_steps: 5,
            animation_step_ms: 5,
            animate_in_parallel: true,
            template_path: None,
            logging: true,
            idle_sweep_secs: 60,
            max_queue_size: MAX_QUEUE_SIZE,
        }
    }
}

/// Animation parameters handed to the position animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    pub steps: u32,
    pub step_interval: Duration,
    pub parallel: bool,
}

impl NotifyConfig {
    pub fn display_time(&self) -> Duration {
        Duration::from_millis(self.display_time_ms)
    }

    pub fn idle_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.idle_sweep_secs.max(1))
    }

    pub fn animation(&self) -> AnimationSettings {
        AnimationSettings {
            steps: self.animation_steps.max(1),
            step_interval: Duration::from_millis(self.animation_step_ms),
            parallel: self.animate_in_parallel,
        }
    }

    /// `file://` URL of the notification template.
    ///
    /// A missing template is only logged: the window backend decides whether
    /// the load actually fails.
    pub fn template_url(&self) -> String {
        let path = self
            .template_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE));
        if self.logging && !path.is_file() {
            tracing::warn!(path = %path.display(), "Notification template not found");
        }
        format!("file://{}", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_from_setting() {
        assert_eq!(Corner::from_str_setting("Lower-Left"), Some(Corner::LowerLeft));
        assert_eq!(Corner::from_str_setting("upper-right"), Some(Corner::UpperRight));
        assert_eq!(Corner::from_str_setting("middle"), None);
    }

    #[test]
    fn test_config_serializes_camel_case() {
        let value = serde_json::to_value(NotifyConfig::default()).unwrap();
        assert_eq!(value["corner"], "upper-right");
        assert_eq!(value["displayTimeMs"], 5000);
        assert_eq!(value["animateInParallel"], true);
        assert_eq!(value["maxQueueSize"], 30);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: NotifyConfig =
            serde_json::from_str(r#"{"corner":"lower-left","width":200}"#).unwrap();
        assert_eq!(config.corner, Corner::LowerLeft);
        assert_eq!(config.width, 200);
        assert_eq!(config.height, 80);
    }

    #[test]
    fn test_animation_never_zero_steps() {
        let config = NotifyConfig {
            animation_steps: 0,
            ..NotifyConfig::default()
        };
        assert_eq!(config.animation().steps, 1);
    }

    #[test]
    fn test_template_url_uses_configured_path() {
        let config = NotifyConfig {
            template_path: Some(PathBuf::from("/opt/app/notify.html")),
            logging: false,
            ..NotifyConfig::default()
        };
        assert_eq!(config.template_url(), "file:///opt/app/notify.html");
    }
}
