//! flagline CLI library
//!
//! Command definitions and handlers, exported for the binary and for tests.

mod cli;
mod commands;
mod error;
mod handlers;

pub mod logger;


pub use cli::Cli;
pub use commands::{CacheCommands, Commands};
pub use error::{CliError, CliResult};
pub use handlers::{Context, execute};
