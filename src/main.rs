use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use pomotrack::cli::args::{Cli, Commands};
use pomotrack::cli::commands;
use pomotrack::config::{ColorSetting, Config, FilePreferences, Paths};

const LOG_ENV: &str = "POMOTRACK_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }
    let format = cli.output.unwrap_or(config.general.default_output);
    let mut prefs = FilePreferences::open(&paths.preferences_file)?;

    let output = match cli.command {
        Commands::Run(args) => commands::run(args, &config, &prefs, format)?,
        Commands::Cycle(args) => commands::cycle(args, &config, &prefs, format)?,
        Commands::Pref(args) => commands::pref(&mut prefs, args.command, format)
            .with_context(|| format!("preferences at {}", paths.preferences_file.display()))?,
        Commands::Config(args) => commands::config(&paths, &config, args.command, format)?,
        Commands::Completions { shell, install } => commands::completions(&shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
