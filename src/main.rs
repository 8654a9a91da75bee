use std::path::PathBuf;
use std::{fs, process};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use trackside::{config::TracksideConfig, player::Player};

/// Drive a train along a track and read up on the stops it passes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Write logs to this file (the ride owns the terminal while running)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace).
    /// A ride only logs above warn with --log, since it owns the terminal
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scene in the terminal (default)
    Ride {
        /// Configuration file (default: ~/.config/trackside/config.json)
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration as JSON
    Config {
        /// Configuration file (default: ~/.config/trackside/config.json)
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    debug!("Command-line args: {:?}", args);

    match args.command {
        None => ride(None),
        Some(Command::Ride { config }) => ride(config),
        Some(Command::Config { config }) => print_config(config),
    }
}

fn log_level(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Default stderr filter when no log file is given. Console output would land
/// on the alternate screen during a ride, so rides stay at warn.
fn console_level(args: &Args) -> log::LevelFilter {
    match args.command {
        Some(Command::Config { .. }) => log_level(args.verbosity),
        None | Some(Command::Ride { .. }) => log::LevelFilter::Warn,
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let file_level = log_level(args.verbosity);

    if let Some(log_path) = &args.log_file {
        let file = fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
        env_logger::Builder::new()
            .filter_level(file_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        info!("Logging to file: {} (level: {:?})", log_path.display(), file_level);
    } else {
        let level = console_level(args).as_str();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

fn ride(config_path: Option<PathBuf>) -> Result<()> {
    let config = TracksideConfig::load(config_path.as_deref())?;
    let mut player = Player::new(config);
    player.play()
}

fn print_config(config_path: Option<PathBuf>) -> Result<()> {
    let config = TracksideConfig::load(config_path.as_deref())?;
    let json = serde_json::to_string_pretty(&config)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(argv: &[&str]) -> log::LevelFilter {
        console_level(&Args::parse_from(argv))
    }

    #[test]
    fn verbosity_reaches_stderr_for_config_only() {
        assert_eq!(console(&["trackside", "config", "-vv"]), log::LevelFilter::Debug);
        assert_eq!(console(&["trackside", "-v", "config"]), log::LevelFilter::Info);
        assert_eq!(console(&["trackside", "config"]), log::LevelFilter::Warn);
        assert_eq!(console(&["trackside", "ride", "-vvv"]), log::LevelFilter::Warn);
        assert_eq!(console(&["trackside", "-v"]), log::LevelFilter::Warn);
    }

    #[test]
    fn log_file_keeps_full_verbosity() {
        let args = Args::parse_from(["trackside", "ride", "--log", "ride.log", "-vvv"]);
        assert_eq!(args.log_file.as_deref(), Some(std::path::Path::new("ride.log")));
        assert_eq!(log_level(args.verbosity), log::LevelFilter::Trace);
    }
}
