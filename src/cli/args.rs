use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pomotrack")]
#[command(about = "A Pomodoro focus timer with session analytics")]
#[command(long_about = "pomotrack - a Pomodoro focus timer

Runs focus sessions and breaks in the foreground, counting down once per
second, and aggregates finished sessions into daily statistics and a
productivity score.

QUICK START:
  pomotrack run                     25 minute work session
  pomotrack run -k short            5 minute break
  pomotrack run -d 50m -t \"Report\"  50 minutes on a named task
  pomotrack cycle -r 4              Four work sessions with breaks

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

LOGGING:
  Set POMOTRACK_LOG (e.g. POMOTRACK_LOG=debug) or pass --verbose.

For more information on a specific command, run:
  pomotrack <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    /// Falls back to general.default_output from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log state transitions and session events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single timed session
    ///
    /// Counts down in the foreground, printing the remaining time every
    /// second, then prints the finalized session and the analytics summary.
    ///
    /// # Examples
    ///
    ///   pomotrack run                        25 minute work session
    ///   pomotrack run -k long                Long break
    ///   pomotrack run -d 1h30m -t "Thesis"   Custom length on a task
    ///   pomotrack run -o json                Session record as JSON
    #[command(alias = "r")]
    Run(RunArgs),

    /// Run several work sessions with breaks in between
    ///
    /// Follows the pomodoro cycle: a short break after each work session
    /// and a long break after every N-th one (timer.sessions_until_long_break).
    ///
    /// # Examples
    ///
    ///   pomotrack cycle              Four rounds
    ///   pomotrack cycle -r 2         Two rounds
    #[command(alias = "c")]
    Cycle(CycleArgs),

    /// Read and write preferences
    ///
    /// Preferences are key/value pairs stored in ~/.pomotrack/preferences.yaml.
    /// Timer lengths set here override the config file.
    ///
    /// # Examples
    ///
    ///   pomotrack pref set timer.work_minutes 50
    ///   pomotrack pref get timer.work_minutes --default 25
    ///   pomotrack pref list
    Pref(PrefArgs),

    /// Show or create the config file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Outputs completion script for the specified shell.
    /// Redirect to a file or source directly.
    ///
    /// Example: pomotrack completions bash > ~/.bash_completion.d/pomotrack
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for a single session.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Timer kind (work, short, long, break, custom)
    #[arg(long, short = 'k', default_value = "work")]
    pub kind: String,

    /// Session length (e.g., 25, 25m, 1h30m, 90s). Overrides the kind's default
    #[arg(long, short = 'd')]
    pub duration: Option<String>,

    /// Name of the task worked on
    #[arg(long, short = 't')]
    pub task: Option<String>,

    /// Mark the task complete when the session finishes
    #[arg(long, requires = "task")]
    pub complete_task: bool,

    /// Milliseconds per tick (each tick counts one second)
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

/// Arguments for a work/break cycle.
#[derive(Args, Debug, Clone)]
pub struct CycleArgs {
    /// Number of work sessions
    #[arg(long, short = 'r', default_value = "4")]
    pub rounds: u32,

    /// Milliseconds per tick (each tick counts one second)
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

/// Arguments for preferences.
#[derive(Args)]
pub struct PrefArgs {
    #[command(subcommand)]
    pub command: PrefCommands,
}

/// Preference subcommands.
#[derive(Subcommand)]
pub enum PrefCommands {
    /// Print the value stored under KEY
    Get {
        /// Preference key
        key: String,

        /// Value printed when KEY is not set
        #[arg(long, default_value = "")]
        default: String,
    },

    /// Store VALUE under KEY
    Set {
        /// Preference key
        key: String,

        /// Value to store
        value: String,
    },

    /// List all stored preferences
    List,
}

/// Arguments for config management.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration to ~/.pomotrack/config.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}
