pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod mirror;
pub mod render;
pub mod repl;

pub use cli::Cli;
pub use error::{Error, Result};
