// range-stream
//
// Keeps exactly one live subscription to the controller's server-sent event
// feed. Transport failures never escape: they flip the connection status to
// `Error`, push a synthetic reset heartbeat to the consumer and schedule a
// reconnect after a fixed delay.

mod config;
mod connection;
mod sse;
mod status;
mod transport;

pub use config::StreamConfig;
pub use connection::{StreamConnection, StreamHandle};
pub use sse::{SseDecoder, SseFrame};
pub use status::{ConnectionStatus, StatusPublisher};
pub use transport::{decode_frames, EventTransport, FrameStream, HttpEventTransport, TransportError};
