// Event sequences folded through the run-state machine.

use range_events::{
	AdminModeData, AudioRef, BackendIssueData, ChronoData, DomainEvent, EventRef, HeartBeatData, ProgramRef, SeriesRef, TargetStatusData,
};
use run_state::{Position, RunState, RunStateMachine, StateChange};

fn series_started(program_id: u64, series_index: usize) -> DomainEvent {
	DomainEvent::SeriesStarted(SeriesRef { program_id, series_index })
}

fn event_started(program_id: u64, series_index: usize, event_index: usize) -> DomainEvent {
	DomainEvent::EventStarted(EventRef {
		program_id,
		series_index,
		event_index,
	})
}

fn series_stopped(program_id: u64, series_index: usize, event_index: usize) -> DomainEvent {
	DomainEvent::SeriesStopped(EventRef {
		program_id,
		series_index,
		event_index,
	})
}

fn program_completed(program_id: u64) -> DomainEvent {
	DomainEvent::ProgramCompleted(ProgramRef { program_id: Some(program_id) })
}

fn target(status: &str) -> DomainEvent {
	DomainEvent::TargetStatus(TargetStatusData { status: status.to_string() })
}

/// A bit of every event shape the machine handles
fn alphabet() -> Vec<DomainEvent> {
	vec![
		DomainEvent::ProgramStarted(ProgramRef { program_id: Some(7) }),
		program_completed(7),
		series_started(7, 0),
		series_started(7, 1),
		DomainEvent::SeriesCompleted(SeriesRef { program_id: 7, series_index: 0 }),
		series_stopped(7, 1, 3),
		DomainEvent::SeriesNext(SeriesRef { program_id: 7, series_index: 2 }),
		event_started(7, 0, 2),
		target("shown"),
		target("hidden"),
		DomainEvent::Chrono(ChronoData { elapsed: 1200 }),
		DomainEvent::ProgramUpdated(ProgramRef { program_id: Some(7) }),
		DomainEvent::AudioAdded(AudioRef { audio_id: 4 }),
		DomainEvent::AdminModeStatus(AdminModeData { enabled: true }),
		DomainEvent::BackendIssue(BackendIssueData { message: "relay offline".into() }),
		DomainEvent::HeartBeat(HeartBeatData { id: "tick".into() }),
		DomainEvent::reset(),
	]
}

fn fold(events: &[DomainEvent]) -> RunStateMachine {
	let mut machine = RunStateMachine::new();
	for event in events {
		machine.apply(event);
	}
	machine
}

#[test]
fn test_stop_mid_series_keeps_position() {
	let machine = fold(&[series_started(5, 0), event_started(5, 0, 2), series_stopped(5, 0, 2)]);
	let state = machine.state();

	assert_eq!(state.program_id(), Some(5));
	assert_eq!(state.series_run_start(), None);
	assert_eq!(state.current_series_index(), Some(0));
	assert_eq!(state.current_event_index(), Some(2));
}

#[test]
fn test_program_completed_resets_from_any_state() {
	let alphabet = alphabet();

	for first in &alphabet {
		for second in &alphabet {
			let mut machine = fold(&[first.clone(), second.clone(), target("shown")]);
			machine.apply(&program_completed(7));

			assert_eq!(machine.state(), &RunState::idle(), "after {first:?}, {second:?}");
		}
	}
}

#[test]
fn test_every_short_sequence_stays_consistent() {
	let alphabet = alphabet();

	for a in &alphabet {
		for b in &alphabet {
			for c in &alphabet {
				let machine = fold(&[a.clone(), b.clone(), c.clone()]);
				assert!(machine.state().is_consistent(), "{a:?}, {b:?}, {c:?} left {:?}", machine.state());
			}
		}
	}
}

#[test]
fn test_program_completed_stops_a_running_chronometer() {
	let mut machine = fold(&[series_started(2, 1), target("shown")]);

	let changes = machine.apply(&program_completed(2));

	assert_eq!(
		changes,
		vec![
			StateChange::ChronometerStopped { series_index: Some(1) },
			StateChange::ProgramChanged(None),
			StateChange::PositionChanged(None),
			StateChange::TargetChanged(false),
		]
	);
}

#[test]
fn test_reset_heartbeat_clears_everything() {
	let mut machine = fold(&[series_started(2, 1), event_started(2, 1, 4), target("shown")]);

	let changes = machine.apply(&DomainEvent::reset());

	assert!(machine.state().is_idle());
	assert_eq!(changes[0], StateChange::ChronometerReset);
	assert!(changes.contains(&StateChange::PositionChanged(None)));
}

#[test]
fn test_keepalive_heartbeat_changes_nothing() {
	let mut machine = fold(&[series_started(2, 1)]);
	let before = machine.state().clone();

	let changes = machine.apply(&DomainEvent::HeartBeat(HeartBeatData { id: "42".into() }));

	assert!(changes.is_empty());
	assert_eq!(machine.state(), &before);
}

#[test]
fn test_mid_series_join_adopts_program() {
	// console connected while series 3 was already running
	let mut machine = RunStateMachine::new();

	let changes = machine.apply(&event_started(11, 3, 1));

	assert_eq!(machine.state().program_id(), Some(11));
	assert_eq!(
		changes,
		vec![StateChange::ProgramChanged(Some(11)), StateChange::PositionChanged(Some(Position::new(3, 1)))]
	);
}

#[test]
fn test_catalog_events_only_request_refresh() {
	let mut machine = fold(&[series_started(2, 0)]);
	let before = machine.state().clone();

	for event in [
		DomainEvent::ProgramAdded(ProgramRef { program_id: Some(9) }),
		DomainEvent::ProgramDeleted(ProgramRef { program_id: Some(9) }),
		DomainEvent::ProgramUpdated(ProgramRef { program_id: Some(2) }),
	] {
		assert_eq!(machine.apply(&event), vec![StateChange::CatalogRefresh]);
	}
	assert_eq!(machine.state(), &before);
}
