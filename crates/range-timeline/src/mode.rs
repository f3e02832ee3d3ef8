use crate::error::TimelineError;
use range_events::ProgramDefinition;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Programs whose longest event fits under this are drawn to scale
pub const TIME_SCALE_THRESHOLD_MS: u64 = 30_000;

/// Coordinate system a series is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelineMode {
	/// One fixed-width slot per event
	EventIndexed,
	/// Continuous axis, pixels per second
	TimeScaled,
}

impl TimelineMode {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::EventIndexed => "event",
			Self::TimeScaled => "time",
		}
	}
}

impl fmt::Display for TimelineMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Pick the mode for a program from its longest event.
///
/// A single very long event would squash every other event to a sliver on a
/// continuous axis, so those programs fall back to slots. A program without
/// any event is time-scaled.
pub fn detect_mode(program: &ProgramDefinition) -> TimelineMode {
	match program.max_event_duration() {
		Some(longest) if longest > TIME_SCALE_THRESHOLD_MS => TimelineMode::EventIndexed,
		_ => TimelineMode::TimeScaled,
	}
}

/// Caller's choice of mode; a pinned mode always wins over detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModeSelection {
	#[default]
	Auto,
	Pinned(TimelineMode),
}

impl ModeSelection {
	pub fn resolve(self, program: &ProgramDefinition) -> TimelineMode {
		match self {
			Self::Auto => detect_mode(program),
			Self::Pinned(mode) => mode,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Auto => "auto",
			Self::Pinned(mode) => mode.as_str(),
		}
	}
}

impl fmt::Display for ModeSelection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ModeSelection {
	type Err = TimelineError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"auto" => Ok(Self::Auto),
			"event" | "event-indexed" => Ok(Self::Pinned(TimelineMode::EventIndexed)),
			"time" | "time-scaled" => Ok(Self::Pinned(TimelineMode::TimeScaled)),
			_ => Err(TimelineError::UnknownMode(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use range_events::{EventDefinition, SeriesDefinition, TargetCommand};

	fn program(durations: &[u64]) -> ProgramDefinition {
		ProgramDefinition {
			id: 1,
			title: "Drill".into(),
			series: vec![SeriesDefinition::new(
				"Only",
				durations.iter().map(|&d| EventDefinition::new(d, TargetCommand::Show)).collect(),
			)],
		}
	}

	#[test]
	fn test_threshold_is_inclusive() {
		assert_eq!(detect_mode(&program(&[TIME_SCALE_THRESHOLD_MS])), TimelineMode::TimeScaled);
		assert_eq!(detect_mode(&program(&[TIME_SCALE_THRESHOLD_MS + 1])), TimelineMode::EventIndexed);
	}

	#[test]
	fn test_empty_program_is_time_scaled() {
		assert_eq!(detect_mode(&program(&[])), TimelineMode::TimeScaled);
	}

	#[test]
	fn test_pinned_mode_wins() {
		let long = program(&[120_000]);
		assert_eq!(ModeSelection::Pinned(TimelineMode::TimeScaled).resolve(&long), TimelineMode::TimeScaled);
		assert_eq!(ModeSelection::Auto.resolve(&long), TimelineMode::EventIndexed);
	}

	#[test]
	fn test_parse_selection() {
		assert_eq!("auto".parse::<ModeSelection>().unwrap(), ModeSelection::Auto);
		assert_eq!("Event".parse::<ModeSelection>().unwrap(), ModeSelection::Pinned(TimelineMode::EventIndexed));
		assert_eq!("time".parse::<ModeSelection>().unwrap(), ModeSelection::Pinned(TimelineMode::TimeScaled));
		assert!("sideways".parse::<ModeSelection>().is_err());
	}
}
