//! CLI command handlers.

mod config;
mod submit;

pub use config::run_config_show_command;
pub use submit::{run_form_command, run_tsg_command};
