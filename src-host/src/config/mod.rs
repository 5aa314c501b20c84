//! Host configuration: defaults, validation, loading from `.env` + environment.

pub mod host_config;
pub mod validation;

pub use host_config::{DialogAnswer, HostConfig};

/// Load `.env` from the first candidate path that exists.
///
/// Runs before tracing is installed, so the chosen path is returned for
/// logging instead of being logged here.
pub fn load_dotenv() -> Option<&'static str> {
    let candidates = [".env", "../.env", "../../.env"];
    candidates
        .into_iter()
        .find(|path| dotenvy::from_filename(path).is_ok())
}
