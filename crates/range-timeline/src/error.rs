use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimelineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
	#[error("No program loaded")]
	NoProgram,

	#[error("Series {index} out of range (program has {len})")]
	SeriesOutOfRange { index: usize, len: usize },

	#[error("Event {index} out of range in series {series} (series has {len})")]
	EventOutOfRange { series: usize, index: usize, len: usize },

	#[error("Unknown timeline mode: {0}")]
	UnknownMode(String),
}
