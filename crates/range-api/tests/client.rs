// RangeClient against a canned single-shot HTTP responder on localhost.

use range_api::{ApiError, RangeClient};
use range_events::DefinitionError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer exactly one request with `status` and `body`, returning the request line
async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let base = format!("http://{}", listener.local_addr().unwrap());

	let task = tokio::spawn(async move {
		let (mut socket, _) = listener.accept().await.unwrap();
		let mut buf = vec![0u8; 4096];
		let mut request = Vec::new();
		loop {
			let n = socket.read(&mut buf).await.unwrap();
			request.extend_from_slice(&buf[..n]);
			if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
				break;
			}
		}

		let response = format!(
			"HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
			body.len()
		);
		socket.write_all(response.as_bytes()).await.unwrap();
		socket.shutdown().await.unwrap();

		String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string()
	});

	(base, task)
}

#[tokio::test]
async fn test_programs_lists_catalog() {
	let (base, server) = respond_once("200 OK", r#"[{"id":1,"title":"Duel"},{"id":2,"title":"Rapid"}]"#).await;
	let client = RangeClient::new(&base).unwrap();

	let programs = client.programs().await.unwrap();

	assert_eq!(programs.len(), 2);
	assert_eq!(programs[1].title, "Rapid");
	assert_eq!(server.await.unwrap(), "GET /programs HTTP/1.1");
}

#[tokio::test]
async fn test_program_parses_definition() {
	let (base, server) = respond_once(
		"200 OK",
		r#"{"id":7,"title":"Duel 25m","series":[{"name":"Warmup","events":[{"duration":3000,"command":"show","audioIds":[3]}]}]}"#,
	)
	.await;
	let client = RangeClient::new(&base).unwrap();

	let program = client.program(7).await.unwrap();

	assert_eq!(program.series[0].events[0].audio_ids, vec![3]);
	assert_eq!(server.await.unwrap(), "GET /programs/7 HTTP/1.1");
}

#[tokio::test]
async fn test_malformed_definition_is_rejected_at_the_boundary() {
	let (base, _server) = respond_once("200 OK", r#"{"id":7,"title":"No series"}"#).await;
	let client = RangeClient::new(&base).unwrap();

	let err = client.program(7).await.unwrap_err();

	assert!(matches!(err, ApiError::Definition(DefinitionError::InvalidShape(_))), "{err:?}");
}

#[tokio::test]
async fn test_skip_to_posts_series_index() {
	let (base, server) = respond_once("204 No Content", "").await;
	let client = RangeClient::new(&base).unwrap();

	client.skip_to(3).await.unwrap();

	assert_eq!(server.await.unwrap(), "POST /programs/series/3/skip_to HTTP/1.1");
}

#[tokio::test]
async fn test_rejection_carries_status_and_body() {
	let (base, _server) = respond_once("409 Conflict", r#"{"error":"no program loaded"}"#).await;
	let client = RangeClient::new(&base).unwrap();

	let err = client.start().await.unwrap_err();

	match err {
		ApiError::Rejected { status, body } => {
			assert_eq!(status, 409);
			assert!(body.contains("no program loaded"));
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn test_status_snapshot() {
	let (base, _server) = respond_once("200 OK", r#"{"programId":7,"seriesIndex":1,"eventIndex":0,"seriesRunning":true}"#).await;
	let client = RangeClient::new(&base).unwrap();

	let snapshot = client.status().await.unwrap();

	assert_eq!(snapshot.program_id, Some(7));
	assert!(snapshot.series_running);
	assert!(!snapshot.target_shown);
}
