use range_events::DefinitionError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
	#[error("Request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("Controller rejected the request ({status}): {body}")]
	Rejected { status: u16, body: String },

	#[error("Invalid program definition: {0}")]
	Definition(#[from] DefinitionError),

	#[error("Invalid server url {url}: {reason}")]
	InvalidUrl { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Failed to access settings at {path}: {source}")]
	Io { path: PathBuf, source: std::io::Error },

	#[error("Settings file {path} is not valid JSON: {source}")]
	Parse { path: PathBuf, source: serde_json::Error },

	#[error("Cannot locate the settings file: neither RANGE_CONSOLE_HOME nor HOME is set")]
	NoHome,

	#[error("Invalid server url {0}")]
	InvalidUrl(String),
}
