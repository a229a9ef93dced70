//! Command implementations for pomotrack.
//!
//! This module contains the implementation of all CLI commands.

mod completions;
mod config;
mod pref;
mod run;

pub use completions::{
    completion_install_instructions, completions, generate_completions, shell_from_str,
};
pub use config::config;
pub use pref::pref;
pub use run::{cycle, run};
