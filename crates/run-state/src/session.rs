use crate::change::StateChange;
use crate::machine::RunStateMachine;
use crate::state::{Position, RunState};
use async_broadcast::{InactiveReceiver, Receiver, Sender};
use chrono::Utc;
use range_events::{DomainEvent, StatusSnapshot};
use tokio::sync::watch;
use tracing::{debug, trace};

const CHANGE_CAPACITY: usize = 256;

/// Owns the run state for one console and publishes it.
///
/// The session is the only writer: events go in through [`Session::handle`],
/// readers get the latest state from the watch channels or follow each
/// change through the broadcast.
pub struct Session {
	machine: RunStateMachine,
	state: watch::Sender<RunState>,
	position: watch::Sender<Option<Position>>,
	changes: Sender<StateChange>,
	_idle: InactiveReceiver<StateChange>,
}

impl Session {
	pub fn new() -> Self {
		let (state, _) = watch::channel(RunState::idle());
		let (position, _) = watch::channel(None);
		let (mut changes, idle) = async_broadcast::broadcast(CHANGE_CAPACITY);
		changes.set_overflow(true);
		changes.set_await_active(false);

		Self {
			machine: RunStateMachine::new(),
			state,
			position,
			changes,
			_idle: idle.deactivate(),
		}
	}

	/// Apply one stream event and publish what it changed
	pub fn handle(&mut self, event: &DomainEvent) -> Vec<StateChange> {
		let changes = self.machine.apply(event);
		self.publish(&changes);
		changes
	}

	/// Replace the mirrored state with a status snapshot
	pub fn seed(&mut self, snapshot: &StatusSnapshot) -> Vec<StateChange> {
		let changes = self.machine.seed(snapshot, Utc::now());
		self.publish(&changes);
		changes
	}

	pub fn snapshot(&self) -> RunState {
		self.machine.state().clone()
	}

	pub fn state(&self) -> watch::Receiver<RunState> {
		self.state.subscribe()
	}

	pub fn position(&self) -> watch::Receiver<Option<Position>> {
		self.position.subscribe()
	}

	pub fn changes(&self) -> Receiver<StateChange> {
		self.changes.new_receiver()
	}

	fn publish(&self, changes: &[StateChange]) {
		if changes.is_empty() {
			return;
		}

		let current = self.machine.state();
		self.state.send_if_modified(|published| {
			if published == current {
				return false;
			}
			*published = current.clone();
			true
		});
		self.position.send_if_modified(|published| {
			let position = current.position();
			if *published == position {
				return false;
			}
			*published = position;
			true
		});

		for change in changes {
			debug!(?change, "state change");
			self.broadcast(change.clone());
		}
	}

	/// Returns `false` when a change record was lost, this one or the oldest queued
	fn broadcast(&self, change: StateChange) -> bool {
		match self.changes.try_broadcast(change) {
			Ok(None) => true,
			Ok(Some(dropped)) => {
				trace!(?dropped, "change listener lagging, oldest change dropped");
				false
			}
			Err(e) => {
				trace!(error = %e, "state change not broadcast");
				false
			}
		}
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use range_events::{ChronoData, EventRef, ProgramRef, SeriesRef};

	#[tokio::test]
	async fn test_handle_publishes_state_and_changes() {
		let mut session = Session::new();
		let mut state = session.state();
		let mut changes = session.changes();

		session.handle(&DomainEvent::SeriesStarted(SeriesRef { program_id: 3, series_index: 0 }));

		assert!(state.has_changed().unwrap());
		assert_eq!(state.borrow_and_update().program_id(), Some(3));
		assert_eq!(*session.position().borrow(), Some(Position::new(0, 0)));

		assert!(matches!(changes.recv().await.unwrap(), StateChange::ChronometerStarted { series_index: 0, .. }));
		assert_eq!(changes.recv().await.unwrap(), StateChange::ProgramChanged(Some(3)));
	}

	#[tokio::test]
	async fn test_position_watch_ignores_elapsed_ticks() {
		let mut session = Session::new();
		session.handle(&DomainEvent::EventStarted(EventRef {
			program_id: 3,
			series_index: 1,
			event_index: 2,
		}));
		let mut position = session.position();
		position.borrow_and_update();

		session.handle(&DomainEvent::Chrono(ChronoData { elapsed: 900 }));

		assert!(!position.has_changed().unwrap());
	}

	#[test]
	fn test_program_completed_clears_published_state() {
		let mut session = Session::new();
		session.handle(&DomainEvent::SeriesStarted(SeriesRef { program_id: 3, series_index: 0 }));

		session.handle(&DomainEvent::ProgramCompleted(ProgramRef { program_id: Some(3) }));

		assert!(session.snapshot().is_idle());
		assert!(session.state().borrow().is_idle());
		assert_eq!(*session.position().borrow(), None);
	}

	#[test]
	fn test_lost_changes_are_reported() {
		let session = Session::new();
		assert!(!session.broadcast(StateChange::CatalogRefresh));

		let mut changes = session.changes();
		for _ in 0..CHANGE_CAPACITY {
			assert!(session.broadcast(StateChange::AudioRefresh));
		}
		assert!(!session.broadcast(StateChange::CatalogRefresh));

		assert!(matches!(changes.try_recv(), Err(async_broadcast::TryRecvError::Overflowed(1))));
		assert_eq!(changes.try_recv().unwrap(), StateChange::AudioRefresh);
	}
}
