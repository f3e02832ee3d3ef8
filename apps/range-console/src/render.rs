use range_events::{ProgramSummary, StatusSnapshot};
use range_stream::ConnectionStatus;
use range_timeline::{CursorProjection, Geometry, TimelineView};
use run_state::{RunState, StateChange};
use std::fmt::Write;

#[allow(clippy::cast_precision_loss)]
pub fn seconds(ms: u64) -> String {
	format!("{:.3}s", ms as f64 / 1000.0)
}

pub fn status_line(status: ConnectionStatus) -> String {
	format!("[stream] {status}")
}

pub fn catalog(programs: &[ProgramSummary]) -> String {
	if programs.is_empty() {
		return "no programs".to_string();
	}

	let width = programs.iter().map(|p| p.id.to_string().len()).max().unwrap_or(1);
	programs.iter().map(|p| format!("{:>width$}  {}", p.id, p.title)).collect::<Vec<_>>().join("\n")
}

pub fn snapshot(status: &StatusSnapshot) -> String {
	match status.program_id {
		None => "idle".to_string(),
		Some(program_id) => format!(
			"program {program_id} | series {} | event {} | {} | target {}",
			optional(status.series_index),
			optional(status.event_index),
			if status.series_running { "running" } else { "stopped" },
			if status.target_shown { "shown" } else { "hidden" },
		),
	}
}

pub fn run_state(state: &RunState) -> String {
	match state.program_id() {
		None => "idle".to_string(),
		Some(program_id) => format!(
			"program {program_id} | series {} | event {} | {} | target {}",
			optional(state.current_series_index()),
			optional(state.current_event_index()),
			state
				.series_run_start()
				.map_or_else(|| "stopped".to_string(), |start| format!("running since {}", start.format("%H:%M:%S"))),
			if state.target_shown() { "shown" } else { "hidden" },
		),
	}
}

/// One line per change worth showing, `None` for changes drawn elsewhere
pub fn change_line(change: &StateChange) -> Option<String> {
	let line = match change {
		StateChange::ProgramChanged(Some(id)) => format!("[program] {id} loaded"),
		StateChange::ProgramChanged(None) => "[program] none".to_string(),
		StateChange::TargetChanged(shown) => format!("[target] {}", if *shown { "shown" } else { "hidden" }),
		StateChange::ChronometerStarted { series_index, started_at } => {
			format!("[chrono] series {series_index} started at {}", started_at.format("%H:%M:%S%.3f"))
		}
		StateChange::ChronometerStopped { series_index } => format!("[chrono] series {} stopped", optional(*series_index)),
		StateChange::ChronometerReset => "[chrono] reset".to_string(),
		StateChange::Elapsed { series_index, elapsed_ms } => format!("[chrono] series {series_index} {}", seconds(*elapsed_ms)),
		StateChange::AdminMode(enabled) => format!("[admin] {}", if *enabled { "on" } else { "off" }),
		StateChange::BackendIssue(message) => format!("[backend] {message}"),
		StateChange::AudioRefresh => "[audio] catalog changed".to_string(),
		StateChange::PositionChanged(_) | StateChange::CursorCleanup { .. } | StateChange::CatalogRefresh => return None,
	};
	Some(line)
}

pub fn cursor_line(cursor: Option<&CursorProjection>) -> String {
	match cursor {
		None => "[cursor] -".to_string(),
		Some(CursorProjection::Slot { series, event }) => format!("[cursor] series {series} slot {event}"),
		Some(CursorProjection::Continuous { series, x }) => format!("[cursor] series {series} x={x:.1}px"),
	}
}

/// Full derived timeline: one header per series, one row per event
pub fn timeline(view: &TimelineView) -> String {
	let (Some(program), Some(mode)) = (view.program(), view.mode()) else {
		return "no program loaded".to_string();
	};

	let mut out = format!("{} (#{}) | {mode} mode ({})\n", program.title, program.id, view.selection());
	for (index, series) in view.series().iter().enumerate() {
		let _ = writeln!(
			out,
			"series {index} {}{} | {} events | {}",
			series.name,
			if series.optional { " (optional)" } else { "" },
			series.len(),
			seconds(series.total_duration),
		);

		let boxes = view.layout(index).unwrap_or_default();
		for (event, Geometry { x, width }) in series.events.iter().zip(boxes) {
			let audio = if event.event.audio_ids.is_empty() {
				String::new()
			} else {
				format!(" audio {:?}", event.event.audio_ids)
			};
			let _ = writeln!(
				out,
				"  #{:<3} +{:>9} {:>9} {:<10} x={x:.1} w={width:.1}{audio}",
				event.index,
				seconds(event.cumulative_offset),
				seconds(event.duration()),
				event.symbol.as_str(),
			);
		}
	}
	out.trim_end().to_string()
}

fn optional(value: Option<usize>) -> String {
	value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use range_events::{DomainEvent, EventDefinition, EventRef, ProgramDefinition, SeriesDefinition, TargetCommand, TargetStatusData};
	use range_timeline::{ModeSelection, ScaleConfig, TimelineMode};
	use run_state::RunStateMachine;

	#[test]
	fn test_seconds() {
		assert_eq!(seconds(0), "0.000s");
		assert_eq!(seconds(3250), "3.250s");
	}

	#[test]
	fn test_catalog_aligns_ids() {
		let programs = vec![
			ProgramSummary { id: 7, title: "Duel".into() },
			ProgramSummary { id: 112, title: "Rapid".into() },
		];
		assert_eq!(catalog(&programs), "  7  Duel\n112  Rapid");
		assert_eq!(catalog(&[]), "no programs");
	}

	#[test]
	fn test_snapshot_line() {
		let status = StatusSnapshot {
			program_id: Some(7),
			series_index: Some(1),
			event_index: None,
			series_running: true,
			target_shown: false,
		};
		assert_eq!(snapshot(&status), "program 7 | series 1 | event - | running | target hidden");
		assert_eq!(snapshot(&StatusSnapshot::default()), "idle");
	}

	#[test]
	fn test_run_state_line() {
		let mut machine = RunStateMachine::new();
		assert_eq!(run_state(machine.state()), "idle");

		machine.apply(&DomainEvent::EventStarted(EventRef {
			program_id: 7,
			series_index: 1,
			event_index: 2,
		}));
		machine.apply(&DomainEvent::TargetStatus(TargetStatusData { status: "shown".into() }));

		assert_eq!(run_state(machine.state()), "program 7 | series 1 | event 2 | stopped | target shown");
	}

	#[test]
	fn test_position_changes_are_drawn_as_cursor() {
		assert_eq!(change_line(&StateChange::PositionChanged(None)), None);
		assert_eq!(change_line(&StateChange::ChronometerReset).as_deref(), Some("[chrono] reset"));
		assert_eq!(
			change_line(&StateChange::Elapsed {
				series_index: 2,
				elapsed_ms: 1500
			})
			.as_deref(),
			Some("[chrono] series 2 1.500s")
		);
	}

	#[test]
	fn test_cursor_line() {
		assert_eq!(cursor_line(Some(&CursorProjection::Slot { series: 1, event: 4 })), "[cursor] series 1 slot 4");
		assert_eq!(cursor_line(Some(&CursorProjection::Continuous { series: 0, x: 12.34 })), "[cursor] series 0 x=12.3px");
		assert_eq!(cursor_line(None), "[cursor] -");
	}

	#[test]
	fn test_timeline_rows() {
		let mut view = TimelineView::new(ScaleConfig::new(10.0, 40.0)).with_selection(ModeSelection::Pinned(TimelineMode::EventIndexed));
		view.load(ProgramDefinition {
			id: 3,
			title: "Duel".into(),
			series: vec![SeriesDefinition::new(
				"Warmup",
				vec![EventDefinition::new(3000, TargetCommand::Show).with_audio(2), EventDefinition::new(1000, TargetCommand::None)],
			)
			.optional()],
		});

		let text = timeline(&view);
		let lines: Vec<&str> = text.lines().collect();

		assert_eq!(lines[0], "Duel (#3) | event mode (event)");
		assert_eq!(lines[1], "series 0 Warmup (optional) | 2 events | 4.000s");
		assert!(lines[2].contains("show+audio"));
		assert!(lines[2].ends_with("x=0.0 w=40.0 audio [2]"));
		assert!(lines[3].contains("none"));
		assert!(lines[3].contains("x=40.0 w=40.0"));
	}
}
