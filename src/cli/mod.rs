//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod logging;
mod version;

pub use commands::{handle_config_command, run_graph, ConfigSubcommand, GraphArgs};
pub use logging::init_logging;
pub use version::display_version;
