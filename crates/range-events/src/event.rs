use crate::error::EventParseError;
use crate::program::ProgramId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// `HeartBeat` id the stream client synthesizes after a transport failure
pub const RESET_HEARTBEAT_ID: &str = "reset";

/// Tag of every event the controller can push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	ProgramAdded,
	ProgramDeleted,
	ProgramUpdated,
	ProgramStarted,
	ProgramCompleted,
	SeriesStarted,
	SeriesCompleted,
	SeriesStopped,
	SeriesNext,
	EventStarted,
	TargetStatus,
	AudioAdded,
	AudioDeleted,
	Chrono,
	AdminModeStatus,
	BackendIssue,
	HeartBeat,
}

impl EventKind {
	pub const ALL: [Self; 17] = [
		Self::ProgramAdded,
		Self::ProgramDeleted,
		Self::ProgramUpdated,
		Self::ProgramStarted,
		Self::ProgramCompleted,
		Self::SeriesStarted,
		Self::SeriesCompleted,
		Self::SeriesStopped,
		Self::SeriesNext,
		Self::EventStarted,
		Self::TargetStatus,
		Self::AudioAdded,
		Self::AudioDeleted,
		Self::Chrono,
		Self::AdminModeStatus,
		Self::BackendIssue,
		Self::HeartBeat,
	];

	/// Name used on the wire (the SSE `event:` field)
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ProgramAdded => "ProgramAdded",
			Self::ProgramDeleted => "ProgramDeleted",
			Self::ProgramUpdated => "ProgramUpdated",
			Self::ProgramStarted => "ProgramStarted",
			Self::ProgramCompleted => "ProgramCompleted",
			Self::SeriesStarted => "SeriesStarted",
			Self::SeriesCompleted => "SeriesCompleted",
			Self::SeriesStopped => "SeriesStopped",
			Self::SeriesNext => "SeriesNext",
			Self::EventStarted => "EventStarted",
			Self::TargetStatus => "TargetStatus",
			Self::AudioAdded => "AudioAdded",
			Self::AudioDeleted => "AudioDeleted",
			Self::Chrono => "Chrono",
			Self::AdminModeStatus => "AdminModeStatus",
			Self::BackendIssue => "BackendIssue",
			Self::HeartBeat => "HeartBeat",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EventKind {
	type Err = EventParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.iter()
			.copied()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| EventParseError::UnknownEventType(s.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRef {
	#[serde(default)]
	pub program_id: Option<ProgramId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRef {
	pub program_id: ProgramId,
	pub series_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRef {
	pub program_id: ProgramId,
	pub series_index: usize,
	pub event_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatusData {
	pub status: String,
}

impl TargetStatusData {
	pub fn is_shown(&self) -> bool {
		self.status == "shown"
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronoData {
	/// Milliseconds since the running series started
	pub elapsed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRef {
	pub audio_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminModeData {
	pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendIssueData {
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartBeatData {
	#[serde(default)]
	pub id: String,
}

/// A server-pushed notification about a change in execution state.
///
/// Closed over the controller vocabulary: adding a kind is a compile error in
/// every exhaustive match rather than a silently ignored string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
	ProgramAdded(ProgramRef),
	ProgramDeleted(ProgramRef),
	ProgramUpdated(ProgramRef),
	ProgramStarted(ProgramRef),
	ProgramCompleted(ProgramRef),
	SeriesStarted(SeriesRef),
	SeriesCompleted(SeriesRef),
	SeriesStopped(EventRef),
	SeriesNext(SeriesRef),
	EventStarted(EventRef),
	TargetStatus(TargetStatusData),
	AudioAdded(AudioRef),
	AudioDeleted(AudioRef),
	Chrono(ChronoData),
	AdminModeStatus(AdminModeData),
	BackendIssue(BackendIssueData),
	HeartBeat(HeartBeatData),
}

impl DomainEvent {
	/// Decode one stream frame: `name` is the event tag, `data` its JSON payload
	pub fn from_wire(name: &str, data: &str) -> Result<Self, EventParseError> {
		let kind: EventKind = name.parse()?;
		let data = if data.trim().is_empty() { "{}" } else { data };

		let event = match kind {
			EventKind::ProgramAdded => Self::ProgramAdded(payload(kind, data)?),
			EventKind::ProgramDeleted => Self::ProgramDeleted(payload(kind, data)?),
			EventKind::ProgramUpdated => Self::ProgramUpdated(payload(kind, data)?),
			EventKind::ProgramStarted => Self::ProgramStarted(payload(kind, data)?),
			EventKind::ProgramCompleted => Self::ProgramCompleted(payload(kind, data)?),
			EventKind::SeriesStarted => Self::SeriesStarted(payload(kind, data)?),
			EventKind::SeriesCompleted => Self::SeriesCompleted(payload(kind, data)?),
			EventKind::SeriesStopped => Self::SeriesStopped(payload(kind, data)?),
			EventKind::SeriesNext => Self::SeriesNext(payload(kind, data)?),
			EventKind::EventStarted => Self::EventStarted(payload(kind, data)?),
			EventKind::TargetStatus => Self::TargetStatus(payload(kind, data)?),
			EventKind::AudioAdded => Self::AudioAdded(payload(kind, data)?),
			EventKind::AudioDeleted => Self::AudioDeleted(payload(kind, data)?),
			EventKind::Chrono => Self::Chrono(payload(kind, data)?),
			EventKind::AdminModeStatus => Self::AdminModeStatus(payload(kind, data)?),
			EventKind::BackendIssue => Self::BackendIssue(payload(kind, data)?),
			EventKind::HeartBeat => Self::HeartBeat(payload(kind, data)?),
		};

		trace!("Decoded {} event", kind);
		Ok(event)
	}

	/// Synthetic heartbeat dispatched when the stream is lost
	pub fn reset() -> Self {
		Self::HeartBeat(HeartBeatData {
			id: RESET_HEARTBEAT_ID.to_string(),
		})
	}

	pub fn is_reset(&self) -> bool {
		matches!(self, Self::HeartBeat(HeartBeatData { id }) if id == RESET_HEARTBEAT_ID)
	}

	pub const fn kind(&self) -> EventKind {
		match self {
			Self::ProgramAdded(_) => EventKind::ProgramAdded,
			Self::ProgramDeleted(_) => EventKind::ProgramDeleted,
			Self::ProgramUpdated(_) => EventKind::ProgramUpdated,
			Self::ProgramStarted(_) => EventKind::ProgramStarted,
			Self::ProgramCompleted(_) => EventKind::ProgramCompleted,
			Self::SeriesStarted(_) => EventKind::SeriesStarted,
			Self::SeriesCompleted(_) => EventKind::SeriesCompleted,
			Self::SeriesStopped(_) => EventKind::SeriesStopped,
			Self::SeriesNext(_) => EventKind::SeriesNext,
			Self::EventStarted(_) => EventKind::EventStarted,
			Self::TargetStatus(_) => EventKind::TargetStatus,
			Self::AudioAdded(_) => EventKind::AudioAdded,
			Self::AudioDeleted(_) => EventKind::AudioDeleted,
			Self::Chrono(_) => EventKind::Chrono,
			Self::AdminModeStatus(_) => EventKind::AdminModeStatus,
			Self::BackendIssue(_) => EventKind::BackendIssue,
			Self::HeartBeat(_) => EventKind::HeartBeat,
		}
	}

	/// Program the event refers to, when it carries one
	pub const fn program_id(&self) -> Option<ProgramId> {
		match self {
			Self::ProgramAdded(r) | Self::ProgramDeleted(r) | Self::ProgramUpdated(r) | Self::ProgramStarted(r) | Self::ProgramCompleted(r) => r.program_id,
			Self::SeriesStarted(r) | Self::SeriesCompleted(r) | Self::SeriesNext(r) => Some(r.program_id),
			Self::SeriesStopped(r) | Self::EventStarted(r) => Some(r.program_id),
			_ => None,
		}
	}
}

fn payload<T: DeserializeOwned>(kind: EventKind, data: &str) -> Result<T, EventParseError> {
	serde_json::from_str(data).map_err(|source| EventParseError::Payload { kind, source })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_every_kind_round_trips_through_its_name() {
		for kind in EventKind::ALL {
			assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
		}
	}

	#[test]
	fn test_decodes_series_stopped() {
		let event = DomainEvent::from_wire("SeriesStopped", r#"{"programId": 3, "seriesIndex": 1, "eventIndex": 4}"#).unwrap();
		assert_eq!(
			event,
			DomainEvent::SeriesStopped(EventRef {
				program_id: 3,
				series_index: 1,
				event_index: 4,
			})
		);
		assert_eq!(event.program_id(), Some(3));
		assert_eq!(event.kind(), EventKind::SeriesStopped);
	}

	#[test]
	fn test_empty_payload_is_accepted_where_nothing_is_required() {
		let event = DomainEvent::from_wire("ProgramCompleted", "").unwrap();
		assert_eq!(event, DomainEvent::ProgramCompleted(ProgramRef { program_id: None }));
	}

	#[test]
	fn test_rejects_unknown_kind() {
		let err = DomainEvent::from_wire("ProgramExploded", "{}").unwrap_err();
		assert!(matches!(err, EventParseError::UnknownEventType(name) if name == "ProgramExploded"));
	}

	#[test]
	fn test_rejects_malformed_payload() {
		let err = DomainEvent::from_wire("Chrono", "{\"elapsed\": \"soon\"}").unwrap_err();
		assert!(matches!(err, EventParseError::Payload { kind: EventKind::Chrono, .. }));

		let err = DomainEvent::from_wire("SeriesStarted", "not json").unwrap_err();
		assert!(matches!(err, EventParseError::Payload { kind: EventKind::SeriesStarted, .. }));
	}

	#[test]
	fn test_reset_heartbeat() {
		let reset = DomainEvent::reset();
		assert!(reset.is_reset());
		assert_eq!(reset.kind(), EventKind::HeartBeat);

		let keepalive = DomainEvent::from_wire("HeartBeat", r#"{"id": "42"}"#).unwrap();
		assert!(!keepalive.is_reset());
	}

	#[test]
	fn test_target_status_only_shown_counts() {
		let shown = TargetStatusData { status: "shown".into() };
		let hidden = TargetStatusData { status: "hidden".into() };
		let garbage = TargetStatusData { status: "SHOWN".into() };
		assert!(shown.is_shown());
		assert!(!hidden.is_shown());
		assert!(!garbage.is_shown());
	}
}
