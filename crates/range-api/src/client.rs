use crate::error::{ApiError, Result};
use range_events::{ProgramDefinition, ProgramId, ProgramSummary, StatusSnapshot};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the range controller.
///
/// Control calls are fire-and-forget: a success only means the controller
/// accepted the request, the resulting state arrives on the event stream.
#[derive(Debug, Clone)]
pub struct RangeClient {
	client: Client,
	base_url: String,
}

impl RangeClient {
	pub fn new(base_url: &str) -> Result<Self> {
		let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
		Ok(Self {
			client,
			base_url: normalize(base_url)?,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Point every further request at another controller
	pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
		self.base_url = normalize(base_url)?;
		info!(base_url = %self.base_url, "controller address changed");
		Ok(())
	}

	pub async fn programs(&self) -> Result<Vec<ProgramSummary>> {
		self.get_json("/programs").await
	}

	/// Fetch one definition, rejecting malformed ones at this boundary
	pub async fn program(&self, id: ProgramId) -> Result<ProgramDefinition> {
		let response = self.send(self.client.get(self.url(&format!("/programs/{id}")))).await?;
		let body = response.text().await?;
		Ok(ProgramDefinition::from_json(&body)?)
	}

	pub async fn status(&self) -> Result<StatusSnapshot> {
		self.get_json("/status").await
	}

	pub async fn load(&self, id: ProgramId) -> Result<()> {
		self.post(&format!("/programs/{id}/load")).await
	}

	pub async fn start(&self) -> Result<()> {
		self.post("/programs/start").await
	}

	pub async fn stop(&self) -> Result<()> {
		self.post("/programs/stop").await
	}

	pub async fn skip_to(&self, series_index: usize) -> Result<()> {
		self.post(&format!("/programs/series/{series_index}/skip_to")).await
	}

	fn url(&self, path: &str) -> String {
		format!("{}{path}", self.base_url)
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		let response = self.send(self.client.get(self.url(path))).await?;
		Ok(response.json::<T>().await?)
	}

	async fn post(&self, path: &str) -> Result<()> {
		self.send(self.client.post(self.url(path))).await?;
		Ok(())
	}

	async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
		let response = request.send().await?;
		let status = response.status();
		debug!(url = %response.url(), %status, "controller responded");

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			warn!(status = status.as_u16(), %body, "controller rejected request");
			return Err(ApiError::Rejected { status: status.as_u16(), body });
		}
		Ok(response)
	}
}

/// Accept `http(s)://host[:port][/prefix]`, drop any trailing slash
fn normalize(base_url: &str) -> Result<String> {
	let invalid = |reason: String| ApiError::InvalidUrl {
		url: base_url.to_string(),
		reason,
	};

	let url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(invalid(format!("unsupported scheme {}", url.scheme())));
	}

	Ok(url.as_str().trim_end_matches('/').to_string())
}
