//! Setting value validation.

use notify_stack::Corner;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "NOTIFY_CORNER" => {
            if Corner::from_str_setting(value).is_none() {
                return Err(
                    "must be 'upper-right', 'upper-left', 'lower-right' or 'lower-left'".into(),
                );
            }
        }
        "NOTIFY_WIDTH" | "NOTIFY_HEIGHT" => validate_int_range(value, 20, 2000)?,
        "NOTIFY_PADDING" => validate_int_range(value, 0, 200)?,
        "NOTIFY_BORDER_RADIUS" => validate_int_range(value, 0, 100)?,
        "NOTIFY_DISPLAY_TIME_MS" => validate_int_range(value, 500, 600_000)?,
        "NOTIFY_ANIMATION_STEPS" => validate_int_range(value, 1, 60)?,
        "NOTIFY_ANIMATION_STEP_MS" => validate_int_range(value, 1, 1000)?,
        "NOTIFY_SWEEP_INTERVAL_SECS" => validate_int_range(value, 1, 86_400)?,
        "NOTIFY_SCREEN_WIDTH" | "NOTIFY_SCREEN_HEIGHT" => validate_int_range(value, 100, 16_384)?,
        "NOTIFY_TASKBAR_HEIGHT" => validate_int_range(value, 0, 1000)?,
        "NOTIFY_TEMPLATE_PATH" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        "NOTIFY_DIALOG_ANSWER" => {
            if value != "reload" && value != "ignore" {
                return Err("must be 'reload' or 'ignore'".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "NOTIFY_ANIMATE_IN_PARALLEL" | "NOTIFY_LOGGING")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("NOTIFY_LOGGING", "true").is_ok());
        assert!(validate_setting("NOTIFY_ANIMATE_IN_PARALLEL", "false").is_ok());
        assert!(validate_setting("NOTIFY_LOGGING", "yes").is_err());
    }

    #[test]
    fn test_valid_corner() {
        assert!(validate_setting("NOTIFY_CORNER", "lower-left").is_ok());
        assert!(validate_setting("NOTIFY_CORNER", "center").is_err());
    }

    #[test]
    fn test_int_ranges() {
        assert!(validate_setting("NOTIFY_DISPLAY_TIME_MS", "5000").is_ok());
        assert!(validate_setting("NOTIFY_DISPLAY_TIME_MS", "100").is_err());
        assert!(validate_setting("NOTIFY_ANIMATION_STEPS", "0").is_err());
        assert_eq!(
            validate_setting("NOTIFY_WIDTH", "wide"),
            Err("must be an integer".to_string())
        );
        assert_eq!(
            validate_setting("NOTIFY_PADDING", "500"),
            Err("must be between 0 and 200".to_string())
        );
    }

    #[test]
    fn test_unknown_keys_pass() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
