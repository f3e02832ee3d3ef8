use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Controller API error: {0}")]
	Api(#[from] range_api::ApiError),

	#[error("Settings error: {0}")]
	Config(#[from] range_api::ConfigError),

	#[error("Timeline error: {0}")]
	Timeline(#[from] range_timeline::TimelineError),

	#[error("Terminal I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("{0}")]
	Command(String),
}
