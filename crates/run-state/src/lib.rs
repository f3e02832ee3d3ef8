// run-state
//
// Mirror of "what is happening now" on the range controller. State moves only
// in response to events received from the stream; control requests sent over
// REST never touch it. Every transition yields `StateChange` records that
// renderers subscribe to, so nothing here knows how state is displayed.

pub mod change;
pub mod machine;
pub mod session;
pub mod state;

pub use change::StateChange;
pub use machine::RunStateMachine;
pub use session::Session;
pub use state::{Position, RunState};
