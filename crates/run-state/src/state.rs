use chrono::{DateTime, Utc};
use range_events::ProgramId;
use serde::Serialize;

/// Highlighted slot in the running program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
	pub series_index: usize,
	pub event_index: usize,
}

impl Position {
	pub const fn new(series_index: usize, event_index: usize) -> Self {
		Self { series_index, event_index }
	}
}

/// Last known execution state of the controller.
///
/// Fields are only writable from inside this crate: the state machine is the
/// single writer, everyone else reads snapshots.
///
/// Invariants:
/// - a running series (`series_run_start`) always has a series index
/// - without a program, no series, event or start time is set
///
/// `target_shown` is exempt from the second rule: it mirrors the target
/// hardware whether or not a program is loaded, and is cleared by every reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
	pub(crate) program_id: Option<ProgramId>,
	pub(crate) series_run_start: Option<DateTime<Utc>>,
	pub(crate) current_series_index: Option<usize>,
	pub(crate) current_event_index: Option<usize>,
	pub(crate) target_shown: bool,
}

impl RunState {
	pub fn idle() -> Self {
		Self::default()
	}

	pub const fn program_id(&self) -> Option<ProgramId> {
		self.program_id
	}

	pub const fn series_run_start(&self) -> Option<DateTime<Utc>> {
		self.series_run_start
	}

	pub const fn current_series_index(&self) -> Option<usize> {
		self.current_series_index
	}

	pub const fn current_event_index(&self) -> Option<usize> {
		self.current_event_index
	}

	pub const fn target_shown(&self) -> bool {
		self.target_shown
	}

	pub fn is_idle(&self) -> bool {
		*self == Self::idle()
	}

	pub const fn is_series_running(&self) -> bool {
		self.series_run_start.is_some()
	}

	pub const fn position(&self) -> Option<Position> {
		match (self.current_series_index, self.current_event_index) {
			(Some(series_index), Some(event_index)) => Some(Position::new(series_index, event_index)),
			_ => None,
		}
	}

	pub const fn is_consistent(&self) -> bool {
		let running_has_series = self.series_run_start.is_none() || self.current_series_index.is_some();
		let idle_is_empty =
			self.program_id.is_some() || (self.series_run_start.is_none() && self.current_series_index.is_none() && self.current_event_index.is_none());

		running_has_series && idle_is_empty
	}

	pub(crate) fn reset(&mut self) {
		*self = Self::idle();
	}
}
