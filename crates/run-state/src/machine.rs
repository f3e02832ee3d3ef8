use crate::change::StateChange;
use crate::state::RunState;
use chrono::{DateTime, Utc};
use range_events::{DomainEvent, ProgramId, StatusSnapshot};
use tracing::{debug, error, trace};

/// Folds stream events into [`RunState`].
///
/// `apply` is total: every `(state, event)` pair yields a new state plus the
/// list of changes it caused. Events are applied in arrival order exactly as
/// delivered; out-of-order delivery is mirrored, not corrected.
#[derive(Debug, Clone, Default)]
pub struct RunStateMachine {
	state: RunState,
}

impl RunStateMachine {
	pub fn new() -> Self {
		Self::default()
	}

	pub const fn state(&self) -> &RunState {
		&self.state
	}

	pub fn apply(&mut self, event: &DomainEvent) -> Vec<StateChange> {
		self.apply_at(event, Utc::now())
	}

	/// Apply one event, stamping any series start with `now`
	pub fn apply_at(&mut self, event: &DomainEvent, now: DateTime<Utc>) -> Vec<StateChange> {
		debug!(kind = %event.kind(), "applying stream event");

		let before = self.state.clone();
		let mut changes = Vec::new();

		match event {
			DomainEvent::ProgramCompleted(_) => {
				if before.series_run_start.is_some() {
					changes.push(StateChange::ChronometerStopped {
						series_index: before.current_series_index,
					});
				}
				self.state.reset();
			}
			DomainEvent::ProgramStarted(r) => {
				if let Some(program_id) = r.program_id {
					self.adopt(program_id);
				}
			}
			DomainEvent::SeriesStarted(r) => {
				self.adopt(r.program_id);
				self.state.series_run_start = Some(now);
				self.state.current_series_index = Some(r.series_index);
				self.state.current_event_index = Some(0);
				changes.push(StateChange::ChronometerStarted {
					series_index: r.series_index,
					started_at: now,
				});
			}
			DomainEvent::SeriesCompleted(r) => {
				self.adopt(r.program_id);
				self.state.series_run_start = None;
				changes.push(StateChange::ChronometerStopped {
					series_index: Some(r.series_index),
				});
				changes.push(StateChange::CursorCleanup { series_index: r.series_index });
			}
			DomainEvent::SeriesStopped(r) => {
				self.adopt(r.program_id);
				self.state.series_run_start = None;
				self.state.current_series_index = Some(r.series_index);
				self.state.current_event_index = Some(r.event_index);
				changes.push(StateChange::ChronometerStopped {
					series_index: Some(r.series_index),
				});
			}
			DomainEvent::SeriesNext(r) => {
				self.adopt(r.program_id);
				self.state.current_series_index = Some(r.series_index);
				self.state.current_event_index = Some(0);
			}
			DomainEvent::EventStarted(r) => {
				self.adopt(r.program_id);
				self.state.current_series_index = Some(r.series_index);
				self.state.current_event_index = Some(r.event_index);
			}
			DomainEvent::TargetStatus(status) => {
				self.state.target_shown = status.is_shown();
			}
			DomainEvent::Chrono(tick) => match self.state.current_series_index {
				Some(series_index) => changes.push(StateChange::Elapsed {
					series_index,
					elapsed_ms: tick.elapsed,
				}),
				None => trace!(elapsed = tick.elapsed, "chrono tick without an active series"),
			},
			DomainEvent::ProgramAdded(_) | DomainEvent::ProgramDeleted(_) | DomainEvent::ProgramUpdated(_) => {
				changes.push(StateChange::CatalogRefresh);
			}
			DomainEvent::AudioAdded(_) | DomainEvent::AudioDeleted(_) => {
				changes.push(StateChange::AudioRefresh);
			}
			DomainEvent::AdminModeStatus(admin) => {
				changes.push(StateChange::AdminMode(admin.enabled));
			}
			DomainEvent::BackendIssue(issue) => {
				error!(message = %issue.message, "controller reported a backend issue");
				changes.push(StateChange::BackendIssue(issue.message.clone()));
			}
			DomainEvent::HeartBeat(_) if event.is_reset() => {
				self.state.reset();
				changes.push(StateChange::ChronometerReset);
			}
			DomainEvent::HeartBeat(beat) => {
				trace!(id = %beat.id, "heartbeat");
			}
		}

		Self::diff(&before, &self.state, &mut changes);
		debug_assert!(self.state.is_consistent(), "inconsistent run state after {event:?}: {:?}", self.state);

		changes
	}

	/// Paint the first frame from a `GET /status` snapshot
	pub fn seed(&mut self, snapshot: &StatusSnapshot, now: DateTime<Utc>) -> Vec<StateChange> {
		let before = self.state.clone();
		let mut changes = Vec::new();

		self.state.reset();
		if let Some(program_id) = snapshot.program_id {
			self.state.program_id = Some(program_id);
			self.state.current_series_index = snapshot.series_index;
			self.state.current_event_index = snapshot.event_index;
			self.state.target_shown = snapshot.target_shown;

			if let (true, Some(series_index)) = (snapshot.series_running, snapshot.series_index) {
				self.state.series_run_start = Some(now);
				changes.push(StateChange::ChronometerStarted { series_index, started_at: now });
			}
		}

		Self::diff(&before, &self.state, &mut changes);
		changes
	}

	/// Events that name a program also establish it as the loaded one
	fn adopt(&mut self, program_id: ProgramId) {
		self.state.program_id = Some(program_id);
	}

	fn diff(before: &RunState, after: &RunState, changes: &mut Vec<StateChange>) {
		if before.program_id != after.program_id {
			changes.push(StateChange::ProgramChanged(after.program_id));
		}
		if before.position() != after.position() {
			changes.push(StateChange::PositionChanged(after.position()));
		}
		if before.target_shown != after.target_shown {
			changes.push(StateChange::TargetChanged(after.target_shown));
		}
	}
}
