// range-timeline
//
// Pure derivation from a static program definition to something a renderer
// can draw: per-event offsets and symbols, the coordinate system to draw them
// in, and where the live cursor sits in that system.

pub mod cursor;
pub mod error;
pub mod mode;
pub mod model;
pub mod view;

pub use cursor::{CursorProjection, Geometry, ScaleConfig};
pub use error::{Result, TimelineError};
pub use mode::{detect_mode, ModeSelection, TimelineMode, TIME_SCALE_THRESHOLD_MS};
pub use model::{preprocess, DerivedEvent, DerivedSeries, SymbolClass};
pub use view::TimelineView;
