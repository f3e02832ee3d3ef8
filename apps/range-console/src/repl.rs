use crate::error::Error;
use range_events::ProgramId;
use range_timeline::ModeSelection;
use std::str::FromStr;

pub const HELP: &str = "commands: server <url> | mode <auto|event|time> | state | load <id> | start | stop | skip <series> | help | quit";

/// One line typed into the watch console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
	Server(String),
	Mode(ModeSelection),
	/// Print the mirrored run state
	State,
	Load(ProgramId),
	Start,
	Stop,
	Skip(usize),
	Help,
	Quit,
}

impl FromStr for ConsoleCommand {
	type Err = Error;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let mut words = line.split_whitespace();
		let verb = words.next().unwrap_or_default().to_ascii_lowercase();
		let arg = words.next();

		if words.next().is_some() {
			return Err(Error::Command(format!("too many arguments in `{}`", line.trim())));
		}

		let command = match (verb.as_str(), arg) {
			("server", Some(url)) => Self::Server(url.to_string()),
			("mode", Some(mode)) => Self::Mode(mode.parse()?),
			("load", Some(id)) => Self::Load(number(id)?),
			("skip", Some(series)) => Self::Skip(number(series)?),
			("state", None) => Self::State,
			("start", None) => Self::Start,
			("stop", None) => Self::Stop,
			("help" | "?", None) => Self::Help,
			("quit" | "exit" | "q", None) => Self::Quit,
			("server" | "mode" | "load" | "skip", None) => return Err(Error::Command(format!("`{verb}` needs an argument"))),
			_ => return Err(Error::Command(format!("unknown command `{}`", line.trim()))),
		};
		Ok(command)
	}
}

fn number<T: FromStr>(word: &str) -> Result<T, Error> {
	word.parse().map_err(|_| Error::Command(format!("`{word}` is not a number")))
}
