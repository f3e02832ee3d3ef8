use clap::{Parser, Subcommand};
use range_events::ProgramId;
use range_timeline::ModeSelection;

/// Terminal console for the range controller
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Controller address for this run, overrides the saved setting
	#[arg(long, global = true, env = "RANGE_SERVER_URL")]
	pub server: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Follow the live run state and accept control commands on stdin
	Watch {
		/// Timeline coordinates: auto, event or time
		#[arg(long, default_value = "auto")]
		mode: ModeSelection,

		/// Pause before reconnecting a lost event stream
		#[arg(long, env = "RANGE_RECONNECT_MS", default_value_t = 5000)]
		reconnect_ms: u64,
	},

	/// List the program catalog
	Programs,

	/// Print the derived timeline of a program
	Show {
		id: ProgramId,

		/// Timeline coordinates: auto, event or time
		#[arg(long, default_value = "auto")]
		mode: ModeSelection,
	},

	/// Load a program on the controller
	Load { id: ProgramId },

	/// Start the loaded program
	Start,

	/// Stop the running series
	Stop,

	/// Jump to a series of the loaded program
	Skip { series: usize },

	/// Print the controller's current status
	Status,

	/// Inspect or change saved settings
	Config {
		#[command(subcommand)]
		action: ConfigCommand,
	},
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
	/// Print the settings file and its values
	Show,

	/// Remember a controller address
	SetServer { url: String },
}
