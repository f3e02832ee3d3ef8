use crate::error::DefinitionError;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a program in the controller catalog
pub type ProgramId = u64;

/// What the mechanical target does when an event begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetCommand {
	Show,
	Hide,
	#[default]
	None,
}

impl TargetCommand {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Show => "show",
			Self::Hide => "hide",
			Self::None => "none",
		}
	}
}

/// A single timed instruction inside a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
	/// Duration in milliseconds
	pub duration: u64,
	#[serde(default, deserialize_with = "command_or_none")]
	pub command: TargetCommand,
	/// Audio clips played when the event starts. Order matters and ids may repeat.
	#[serde(default)]
	pub audio_ids: Vec<u32>,
}

impl EventDefinition {
	pub fn new(duration: u64, command: TargetCommand) -> Self {
		Self {
			duration,
			command,
			audio_ids: Vec::new(),
		}
	}

	pub fn with_audio(mut self, audio_id: u32) -> Self {
		self.audio_ids.push(audio_id);
		self
	}

	pub fn has_audio(&self) -> bool {
		!self.audio_ids.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDefinition {
	pub name: String,
	#[serde(default)]
	pub optional: bool,
	pub events: Vec<EventDefinition>,
}

impl SeriesDefinition {
	pub fn new(name: impl Into<String>, events: Vec<EventDefinition>) -> Self {
		Self {
			name: name.into(),
			optional: false,
			events,
		}
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	/// Sum of every event duration in milliseconds
	pub fn total_duration(&self) -> u64 {
		self.events.iter().map(|e| e.duration).sum()
	}
}

/// Full definition of a program as served by `GET /programs/{id}`
///
/// Immutable once fetched. Consumers only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDefinition {
	pub id: ProgramId,
	pub title: String,
	pub series: Vec<SeriesDefinition>,
}

impl ProgramDefinition {
	/// Parse a definition received from the controller.
	///
	/// Invalid JSON and missing required fields are rejected here so nothing
	/// downstream ever sees a partially built program.
	pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
		let program: Self = serde_json::from_str(text)?;
		Ok(program)
	}

	pub fn series(&self, index: usize) -> Option<&SeriesDefinition> {
		self.series.get(index)
	}

	/// Longest single event across every series, `None` for a program without events
	pub fn max_event_duration(&self) -> Option<u64> {
		self.series.iter().flat_map(|s| s.events.iter()).map(|e| e.duration).max()
	}
}

/// Catalog entry returned by `GET /programs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
	pub id: ProgramId,
	pub title: String,
}

fn command_or_none<'de, D>(deserializer: D) -> Result<TargetCommand, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<TargetCommand>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parses_full_definition() {
		let text = r#"{
			"id": 7,
			"title": "Duel 25m",
			"series": [
				{ "name": "Warmup", "optional": true, "events": [
					{ "duration": 3000, "command": "show", "audioIds": [3, 3] },
					{ "duration": 7000, "command": null },
					{ "duration": 500 }
				]}
			]
		}"#;

		let program = ProgramDefinition::from_json(text).unwrap();
		assert_eq!(program.id, 7);
		assert_eq!(program.series.len(), 1);

		let series = &program.series[0];
		assert!(series.optional);
		assert_eq!(series.events[0].command, TargetCommand::Show);
		assert_eq!(series.events[0].audio_ids, vec![3, 3]);
		assert_eq!(series.events[1].command, TargetCommand::None);
		assert!(series.events[2].audio_ids.is_empty());
		assert_eq!(series.total_duration(), 10_500);
		assert_eq!(program.max_event_duration(), Some(7000));
	}

	#[test]
	fn test_rejects_invalid_json() {
		let err = ProgramDefinition::from_json("{ \"id\": 1, ").unwrap_err();
		assert!(matches!(err, DefinitionError::InvalidJson(_)));
	}

	#[test]
	fn test_rejects_missing_required_fields() {
		let err = ProgramDefinition::from_json(r#"{ "id": 1, "series": [] }"#).unwrap_err();
		assert!(matches!(err, DefinitionError::InvalidShape(_)));

		let err = ProgramDefinition::from_json(r#"{ "id": 1, "title": "t", "series": [{ "name": "a", "events": [{ "command": "show" }] }] }"#).unwrap_err();
		assert!(matches!(err, DefinitionError::InvalidShape(_)));
	}

	#[test]
	fn test_rejects_negative_duration() {
		let err = ProgramDefinition::from_json(r#"{ "id": 1, "title": "t", "series": [{ "name": "a", "events": [{ "duration": -5 }] }] }"#).unwrap_err();
		assert!(matches!(err, DefinitionError::InvalidShape(_)));
	}

	#[test]
	fn test_empty_program_has_no_max_duration() {
		let program = ProgramDefinition {
			id: 1,
			title: "empty".into(),
			series: vec![SeriesDefinition::new("a", vec![])],
		};
		assert_eq!(program.max_event_duration(), None);
	}
}
