use crate::sse::{SseDecoder, SseFrame};
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::collections::VecDeque;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

pub type FrameStream = BoxStream<'static, Result<SseFrame, TransportError>>;

/// Transport-level failures. All of them are recovered by reconnecting.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("Failed to reach event stream: {0}")]
	Request(#[from] reqwest::Error),

	#[error("Event stream rejected with HTTP {0}")]
	Status(u16),

	#[error("Event stream read failed: {0}")]
	Read(String),

	#[error("Event stream closed by server")]
	Closed,
}

/// Opens a raw frame subscription. One call, one subscription.
#[async_trait]
pub trait EventTransport: Send + Sync + 'static {
	async fn subscribe(&self, url: &str) -> Result<FrameStream, TransportError>;
}

/// Server-sent events over plain HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpEventTransport {
	client: reqwest::Client,
}

impl HttpEventTransport {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl EventTransport for HttpEventTransport {
	async fn subscribe(&self, url: &str) -> Result<FrameStream, TransportError> {
		debug!(%url, "opening event stream");

		let response = self.client.get(url).header(ACCEPT, "text/event-stream").header(CACHE_CONTROL, "no-cache").send().await?;

		let status = response.status();
		if !status.is_success() {
			return Err(TransportError::Status(status.as_u16()));
		}

		Ok(decode_frames(Box::pin(response.bytes_stream())).boxed())
	}
}

/// Turn a stream of byte chunks into decoded frames.
///
/// A chunk error is yielded once and ends the stream.
pub fn decode_frames<S, B, E>(chunks: S) -> impl Stream<Item = Result<SseFrame, TransportError>> + Send + 'static
where
	S: Stream<Item = Result<B, E>> + Send + Unpin + 'static,
	B: AsRef<[u8]> + Send + 'static,
	E: Display + Send + 'static,
{
	let state = (chunks, SseDecoder::new(), VecDeque::new(), false);

	stream::unfold(state, |(mut chunks, mut decoder, mut pending, mut failed)| async move {
		loop {
			if let Some(frame) = pending.pop_front() {
				return Some((Ok(frame), (chunks, decoder, pending, failed)));
			}
			if failed {
				return None;
			}

			match chunks.next().await {
				Some(Ok(chunk)) => pending.extend(decoder.feed(chunk.as_ref())),
				Some(Err(e)) => {
					failed = true;
					return Some((Err(TransportError::Read(e.to_string())), (chunks, decoder, pending, failed)));
				}
				None => return None,
			}
		}
	})
}
