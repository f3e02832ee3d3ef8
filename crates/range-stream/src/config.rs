use std::time::Duration;

/// Fixed pause between a transport failure and the next subscription attempt
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
	/// Base address of the controller, e.g. `http://10.0.0.12:8080`
	pub base_url: String,
	/// Path of the event feed relative to `base_url`
	pub events_path: String,
	pub reconnect_delay: Duration,
}

impl StreamConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			..Self::default()
		}
	}

	pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
		self.reconnect_delay = delay;
		self
	}

	/// Full feed address for a given base
	pub fn stream_url(&self, base_url: &str) -> String {
		format!("{}/{}", base_url.trim_end_matches('/'), self.events_path.trim_start_matches('/'))
	}
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:8080".to_string(),
			events_path: "/events".to_string(),
			reconnect_delay: DEFAULT_RECONNECT_DELAY,
		}
	}
}
