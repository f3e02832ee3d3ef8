use crate::cli::{Cli, Command, ConfigCommand};
use crate::console::Console;
use crate::error::Result;
use crate::render;
use range_api::{RangeClient, Settings, SERVER_URL_KEY};
use range_timeline::{ScaleConfig, TimelineView};
use std::time::Duration;
use tracing::{debug, info};

pub async fn run(cli: Cli) -> Result<()> {
	let Cli { server, command } = cli;

	match command {
		Command::Watch { mode, reconnect_ms } => {
			let client = connect(server)?;
			Console::new(client, Duration::from_millis(reconnect_ms), mode).run().await?;
		}
		Command::Programs => {
			let programs = connect(server)?.programs().await?;
			println!("{}", render::catalog(&programs));
		}
		Command::Show { id, mode } => {
			let program = connect(server)?.program(id).await?;
			let mut view = TimelineView::new(ScaleConfig::default()).with_selection(mode);
			view.load(program);
			println!("{}", render::timeline(&view));
		}
		Command::Load { id } => {
			connect(server)?.load(id).await?;
			println!("load {id} requested");
		}
		Command::Start => {
			connect(server)?.start().await?;
			println!("start requested");
		}
		Command::Stop => {
			connect(server)?.stop().await?;
			println!("stop requested");
		}
		Command::Skip { series } => {
			connect(server)?.skip_to(series).await?;
			println!("skip to series {series} requested");
		}
		Command::Status => {
			let snapshot = connect(server)?.status().await?;
			println!("{}", render::snapshot(&snapshot));
		}
		Command::Config { action } => configure(action)?,
	}

	Ok(())
}

/// Client for the `--server` address, else the saved one
fn connect(server: Option<String>) -> Result<RangeClient> {
	let url = match server {
		Some(url) => url,
		None => Settings::load_default()?.server_url().to_string(),
	};
	debug!(%url, "using controller");
	Ok(RangeClient::new(&url)?)
}

fn configure(action: ConfigCommand) -> Result<()> {
	let mut settings = Settings::load_default()?;

	match action {
		ConfigCommand::Show => {
			println!("# {}", settings.path().display());
			if settings.get(SERVER_URL_KEY).is_none() {
				println!("{SERVER_URL_KEY} = {} (default)", settings.server_url());
			}
			for (key, value) in settings.entries() {
				println!("{key} = {value}");
			}
		}
		ConfigCommand::SetServer { url } => {
			settings.set_server_url(&url)?;
			settings.save()?;
			info!(%url, "saved controller address");
			println!("{SERVER_URL_KEY} = {}", settings.server_url());
		}
	}

	Ok(())
}
