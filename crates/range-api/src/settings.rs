use crate::error::ConfigError;
use reqwest::Url;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SERVER_URL_KEY: &str = "server_url";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

const HOME_OVERRIDE_VAR: &str = "RANGE_CONSOLE_HOME";
const FILE_NAME: &str = "settings.json";

/// Key-value settings persisted as a flat JSON object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	path: PathBuf,
	values: BTreeMap<String, String>,
}

impl Settings {
	/// `$RANGE_CONSOLE_HOME/settings.json`, else `$HOME/.config/range-console/settings.json`
	pub fn default_path() -> Result<PathBuf, ConfigError> {
		if let Some(dir) = env::var_os(HOME_OVERRIDE_VAR).filter(|v| !v.is_empty()) {
			return Ok(PathBuf::from(dir).join(FILE_NAME));
		}
		let home = env::var_os("HOME").filter(|v| !v.is_empty()).ok_or(ConfigError::NoHome)?;
		Ok(PathBuf::from(home).join(".config").join("range-console").join(FILE_NAME))
	}

	/// Read the settings at `path`; a missing file is an empty store
	pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let path = path.into();
		let values = match fs::read_to_string(&path) {
			Ok(text) if text.trim().is_empty() => BTreeMap::new(),
			Ok(text) => serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %path.display(), "no settings file yet");
				BTreeMap::new()
			}
			Err(source) => return Err(ConfigError::Io { path, source }),
		};

		Ok(Self { path, values })
	}

	pub fn load_default() -> Result<Self, ConfigError> {
		Self::load(Self::default_path()?)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str)
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.insert(key.into(), value.into());
	}

	pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Persisted controller address, falling back to the local default
	pub fn server_url(&self) -> &str {
		self.get(SERVER_URL_KEY).unwrap_or(DEFAULT_SERVER_URL)
	}

	pub fn set_server_url(&mut self, url: &str) -> Result<(), ConfigError> {
		let parsed = Url::parse(url.trim()).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ConfigError::InvalidUrl(url.to_string()));
		}
		self.set(SERVER_URL_KEY, url.trim());
		Ok(())
	}

	pub fn save(&self) -> Result<(), ConfigError> {
		let io = |source| ConfigError::Io {
			path: self.path.clone(),
			source,
		};

		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(io)?;
		}
		let text = serde_json::to_string_pretty(&self.values).map_err(|source| ConfigError::Parse {
			path: self.path.clone(),
			source,
		})?;
		fs::write(&self.path, text).map_err(io)?;

		info!(path = %self.path.display(), "settings saved");
		Ok(())
	}
}
