// range-events
//
// Shared vocabulary between the range controller and its consoles: the
// static program definitions served over REST and the typed domain events
// pushed over the live stream.

pub mod error;
pub mod event;
pub mod program;
pub mod status;

pub use error::{DefinitionError, EventParseError};
pub use event::{
	AdminModeData, AudioRef, BackendIssueData, ChronoData, DomainEvent, EventKind, EventRef, HeartBeatData, ProgramRef, SeriesRef, TargetStatusData, RESET_HEARTBEAT_ID,
};
pub use program::{EventDefinition, ProgramDefinition, ProgramId, ProgramSummary, SeriesDefinition, TargetCommand};
pub use status::StatusSnapshot;
