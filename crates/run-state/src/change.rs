use crate::state::Position;
use chrono::{DateTime, Utc};
use range_events::ProgramId;

/// What a transition changed, for renderers to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
	/// Loaded program changed, `None` once it completed or the stream reset
	ProgramChanged(Option<ProgramId>),
	/// Highlighted slot moved, `None` clears the highlight
	PositionChanged(Option<Position>),
	TargetChanged(bool),
	ChronometerStarted { series_index: usize, started_at: DateTime<Utc> },
	ChronometerStopped { series_index: Option<usize> },
	/// Stream was lost: whatever the chronometer shows is stale
	ChronometerReset,
	/// Live elapsed time of the running series
	Elapsed { series_index: usize, elapsed_ms: u64 },
	/// Drop any live cursor drawn over this series
	CursorCleanup { series_index: usize },
	/// Program catalog must be fetched again
	CatalogRefresh,
	/// Audio catalog must be fetched again
	AudioRefresh,
	AdminMode(bool),
	BackendIssue(String),
}

impl StateChange {
	/// Changes that alter what a timeline cursor should show
	pub const fn affects_cursor(&self) -> bool {
		matches!(
			self,
			Self::PositionChanged(_) | Self::Elapsed { .. } | Self::CursorCleanup { .. } | Self::ChronometerReset | Self::ProgramChanged(_)
		)
	}
}
