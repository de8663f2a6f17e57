//! pwswitch CLI - Command-line tool for a USB-serial power switch.
//!
//! ## Features
//!
//! - Find the switch by a fragment of its port name
//! - Query the power state, switch power off and on
//! - Run the status/off/on check cycle
//! - List serial ports (text or JSON)
//! - Shell completion generation
//! - Environment variable support

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use env_logger::Env;
use log::debug;
use pwswitch::{
    ChannelConfig, DEFAULT_BAUD_RATE, DEFAULT_PORT_PATTERN, DeviceConfig, SelectorConfig,
};
use std::env;
use std::time::Duration;

mod commands;
mod ui;

use commands::{cmd_completions, cmd_cycle, cmd_list_ports, cmd_single};

/// Default pause between the steps of `cycle`, in seconds.
const DEFAULT_PAUSE_SECS: &str = "2";

/// pwswitch - Control a USB-serial power switch.
///
/// Running without a subcommand performs the `cycle` check: query status,
/// switch off, switch on.
///
/// Environment variables:
///   PWSWITCH_PORT      - Serial port to use (skips auto-detection)
///   PWSWITCH_MATCH     - Port name fragment used for auto-detection
///   PWSWITCH_BAUD      - Baud rate (default: 115200)
///   PWSWITCH_TIMEOUT   - Reply timeout in seconds (default: 5)
#[derive(Parser)]
#[command(name = "pwswitch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Serial port to use (auto-detected if not specified).
    #[arg(short, long, global = true, env = "PWSWITCH_PORT")]
    port: Option<String>,

    /// Port name fragment identifying the switch.
    #[arg(
        short = 'm',
        long = "match",
        global = true,
        default_value = DEFAULT_PORT_PATTERN,
        env = "PWSWITCH_MATCH"
    )]
    pattern: String,

    /// Baud rate.
    #[arg(
        short,
        long,
        global = true,
        default_value_t = DEFAULT_BAUD_RATE,
        env = "PWSWITCH_BAUD"
    )]
    baud: u32,

    /// Seconds of silence after which a reply is considered complete.
    #[arg(
        short,
        long,
        global = true,
        default_value = "5",
        value_parser = parse_secs,
        env = "PWSWITCH_TIMEOUT"
    )]
    timeout: Duration,

    /// Print results as JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output level (-v, -vv for increasing detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Query status, switch off, then switch on again (default).
    Cycle {
        /// Seconds to wait between steps.
        #[arg(long, default_value = DEFAULT_PAUSE_SECS, value_parser = parse_secs)]
        pause: Duration,
    },

    /// Query the current power state.
    Status,

    /// Switch power on.
    On,

    /// Switch power off.
    Off,

    /// List available serial ports.
    ListPorts,

    /// Generate shell completions.
    Completions {
        /// Shell type.
        shell: Shell,
    },
}

/// Parse a non-negative number of seconds, fractions allowed.
fn parse_secs(s: &str) -> Result<Duration> {
    let secs: f64 = s
        .trim()
        .parse()?;
    if !secs.is_finite() || secs < 0.0 {
        bail!("expected a non-negative number of seconds, got {s:?}");
    }
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => Ok(duration),
        Err(_) => bail!("{s:?} seconds is too long"),
    }
}

impl Cli {
    fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            port: self
                .port
                .clone(),
            selector: SelectorConfig::new(&self.pattern),
            baud_rate: self.baud,
            channel: ChannelConfig {
                read_timeout: self.timeout,
            },
        }
    }
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let stderr_is_tty = console::Term::stderr().is_term();
    if env::var("NO_COLOR").is_ok() || !stderr_is_tty {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    ui::set_fancy(stderr_is_tty && !cli.quiet && !cli.json);

    init_logging(&cli);
    debug!(
        "pwswitch v{} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        cli.verbose
    );

    let config = cli.device_config();
    match &cli.command {
        None => cmd_cycle(
            &config,
            parse_secs(DEFAULT_PAUSE_SECS)?,
            cli.json,
        )?,
        Some(Commands::Cycle { pause }) => cmd_cycle(&config, *pause, cli.json)?,
        Some(Commands::Status) => cmd_single(&config, pwswitch::Command::Inquire, cli.json)?,
        Some(Commands::On) => cmd_single(&config, pwswitch::Command::TurnOn, cli.json)?,
        Some(Commands::Off) => cmd_single(&config, pwswitch::Command::TurnOff, cli.json)?,
        Some(Commands::ListPorts) => cmd_list_ports(&config.selector, cli.json)?,
        Some(Commands::Completions { shell }) => cmd_completions(*shell),
    }

    Ok(())
}
