use crate::event::EventKind;
use thiserror::Error;

/// Errors raised while decoding a single stream frame into a domain event
#[derive(Debug, Error)]
pub enum EventParseError {
	#[error("Unknown event type: {0}")]
	UnknownEventType(String),

	#[error("Malformed {kind} payload: {source}")]
	Payload {
		kind: EventKind,
		#[source]
		source: serde_json::Error,
	},
}

/// Errors raised at the boundary where a program definition is parsed
#[derive(Debug, Error)]
pub enum DefinitionError {
	#[error("Program definition is not valid JSON: {0}")]
	InvalidJson(#[source] serde_json::Error),

	#[error("Program definition has an invalid shape: {0}")]
	InvalidShape(#[source] serde_json::Error),
}

impl From<serde_json::Error> for DefinitionError {
	fn from(e: serde_json::Error) -> Self {
		use serde_json::error::Category;

		match e.classify() {
			Category::Data => Self::InvalidShape(e),
			Category::Io | Category::Syntax | Category::Eof => Self::InvalidJson(e),
		}
	}
}
