use tracing::trace;

/// One dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
	/// Value of the `event:` field, `message` when the server omitted it
	pub event: String,
	/// `data:` lines joined with `\n`
	pub data: String,
	/// Last event id seen on the stream
	pub id: Option<String>,
}

impl SseFrame {
	pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
		Self {
			event: event.into(),
			data: data.into(),
			id: None,
		}
	}
}

/// Incremental `text/event-stream` decoder.
///
/// Chunks may split lines, CRLF pairs and multi-byte characters anywhere;
/// bytes are buffered until a full line is available.
#[derive(Debug, Default)]
pub struct SseDecoder {
	line: Vec<u8>,
	event: Option<String>,
	data: Vec<String>,
	last_id: Option<String>,
	after_cr: bool,
}

impl SseDecoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Feed raw bytes, returning every frame completed by them
	pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
		let mut frames = Vec::new();

		for &byte in chunk {
			match byte {
				b'\n' if self.after_cr => {
					self.after_cr = false;
				}
				b'\n' | b'\r' => {
					self.after_cr = byte == b'\r';
					let line = std::mem::take(&mut self.line);
					if let Some(frame) = self.process_line(&String::from_utf8_lossy(&line)) {
						frames.push(frame);
					}
				}
				_ => {
					self.after_cr = false;
					self.line.push(byte);
				}
			}
		}

		frames
	}

	fn process_line(&mut self, line: &str) -> Option<SseFrame> {
		if line.is_empty() {
			return self.dispatch();
		}

		// comment / keep-alive
		if line.starts_with(':') {
			return None;
		}

		let (field, value) = match line.split_once(':') {
			Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
			None => (line, ""),
		};

		match field {
			"event" => self.event = Some(value.to_string()),
			"data" => self.data.push(value.to_string()),
			"id" => self.last_id = Some(value.to_string()),
			// server reconnection hint, the client keeps its own fixed delay
			"retry" => {}
			other => trace!(field = other, "ignoring unknown event-stream field"),
		}

		None
	}

	fn dispatch(&mut self) -> Option<SseFrame> {
		let event = self.event.take();
		if self.data.is_empty() {
			return None;
		}

		let data = self.data.join("\n");
		self.data.clear();

		Some(SseFrame {
			event: event.unwrap_or_else(|| "message".to_string()),
			data,
			id: self.last_id.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decodes_named_event() {
		let mut decoder = SseDecoder::new();
		let frames = decoder.feed(b"event: SeriesStarted\ndata: {\"programId\":1,\"seriesIndex\":0}\n\n");

		assert_eq!(frames, vec![SseFrame::new("SeriesStarted", "{\"programId\":1,\"seriesIndex\":0}")]);
	}

	#[test]
	fn test_chunk_boundaries_anywhere() {
		let payload = "event: Chrono\r\ndata: {\"elapsed\": 1500}\r\n\r\nevent: HeartBeat\r\ndata: {\"id\":\"é\"}\r\n\r\n";
		let bytes = payload.as_bytes();

		for split in 1..bytes.len() {
			let mut decoder = SseDecoder::new();
			let mut frames = decoder.feed(&bytes[..split]);
			frames.extend(decoder.feed(&bytes[split..]));

			assert_eq!(frames.len(), 2, "split at {split}");
			assert_eq!(frames[0].event, "Chrono");
			assert_eq!(frames[1].data, "{\"id\":\"é\"}");
		}
	}

	#[test]
	fn test_multiline_data_and_comments() {
		let mut decoder = SseDecoder::new();
		let frames = decoder.feed(b": keep-alive\nid: 9\ndata: first\ndata:second\n\n");

		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].event, "message");
		assert_eq!(frames[0].data, "first\nsecond");
		assert_eq!(frames[0].id.as_deref(), Some("9"));
	}

	#[test]
	fn test_event_without_data_is_not_dispatched() {
		let mut decoder = SseDecoder::new();
		assert!(decoder.feed(b"event: ProgramCompleted\n\n").is_empty());

		// the dangling event name must not leak into the next frame
		let frames = decoder.feed(b"data: {}\n\n");
		assert_eq!(frames[0].event, "message");
	}
}
