// range-api
//
// Fire-and-forget control of the range controller over REST, plus the small
// settings file that remembers which controller to talk to. Nothing here
// touches run state: responses go back to the caller only.

pub mod client;
pub mod error;
pub mod settings;

pub use client::RangeClient;
pub use error::{ApiError, ConfigError, Result};
pub use settings::{Settings, DEFAULT_SERVER_URL, SERVER_URL_KEY};
