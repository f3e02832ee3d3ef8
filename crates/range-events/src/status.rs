use crate::program::ProgramId;
use serde::{Deserialize, Serialize};

/// One-shot snapshot returned by `GET /status`.
///
/// Only used to paint the first frame; the event stream supersedes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusSnapshot {
	pub program_id: Option<ProgramId>,
	pub series_index: Option<usize>,
	pub event_index: Option<usize>,
	pub series_running: bool,
	pub target_shown: bool,
}
