//! usb-watchguard
//!
//! Operator tool for the USB device denylist. Lists, checks and edits the
//! vendor/product pairs a host should refuse, and switches the guard between
//! normal and lockdown mode.

mod commands;
mod config;
mod editor;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::{ConfigFolder, setup_logging};
use config::{GuardConfig, GuardMode};
use denylist::DenylistStore;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "usb-watchguard")]
#[command(
    author,
    version,
    about = "USB Watchguard - manage the USB device denylist"
)]
#[command(long_about = "
Manage the list of USB vendor/product id pairs that this host refuses.

EXAMPLES:
    # Show the denylist
    usb-watchguard list

    # Deny a Logitech receiver
    usb-watchguard add 046d c52b

    # Bulk edit in $EDITOR
    usb-watchguard edit

    # Replace the denylist from a file (one vid:pid per line)
    usb-watchguard import blocked.txt

    # Refuse all denylist changes until switched back
    usb-watchguard mode lockdown

CONFIGURATION:
    Settings and the denylist snapshot live in the config folder:
    1. $APPDATA/filter-usb
    2. $XDG_CONFIG_HOME/filter-usb
    3. ~/.config/filter-usb

EXIT STATUS:
    0  success (for `check`: the pair is allowed)
    1  `check` found the pair denylisted
    2  refused by lockdown mode, or invalid arguments
    3  any other error (configuration, storage, editor)
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to the denylist snapshot (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Save default configuration to the config path and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every denylisted pair as vid:pid
    List,
    /// Check a pair; exits with status 1 if it is denylisted
    Check { vendor_id: String, product_id: String },
    /// Denylist a pair
    Add { vendor_id: String, product_id: String },
    /// Remove a pair from the denylist
    Remove { vendor_id: String, product_id: String },
    /// Remove every pair
    Clear,
    /// Replace the denylist with vid:pid lines from a file (or stdin)
    Import {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Write the denylist as vid:pid lines to a file (or stdout)
    Export {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Edit the denylist in $VISUAL / $EDITOR
    Edit,
    /// Show or set the guard mode
    Mode {
        #[arg(value_enum)]
        mode: Option<GuardMode>,
    },
    /// Add random entries (development aid)
    Populate {
        /// Number of entries (default: random 5-15)
        #[arg(long)]
        count: Option<usize>,
    },
}

impl Command {
    /// Commands refused while in lockdown
    fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Remove { .. }
                | Command::Clear
                | Command::Import { .. }
                | Command::Edit
                | Command::Populate { .. }
        )
    }
}

/// Exit status for errors, distinct from a denylisted `check`
const EXIT_FAILURE: u8 = 3;

fn main() -> ExitCode {
    let args = Args::parse();
    match try_main(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn try_main(args: Args) -> Result<ExitCode> {

    let folder = ConfigFolder::resolve().context("Failed to locate config folder")?;
    let config_path = match &args.config {
        Some(path) => config::expand_path(path),
        None => {
            folder.ensure().context("Failed to prepare config folder")?;
            folder.config_file()
        }
    };

    if args.save_config {
        GuardConfig::default()
            .save(&config_path)
            .context("Failed to save configuration")?;
        println!("Configuration saved to: {}", config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = GuardConfig::load(&config_path).context("Failed to load configuration")?;

    // CLI log level wins over the config value
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.guard.log_level);
    setup_logging(log_level).context("Failed to setup logging")?;
    debug!("usb-watchguard v{}", env!("CARGO_PKG_VERSION"));

    let command = args.command.unwrap_or(Command::List);

    if let Command::Mode { mode } = &command {
        return set_mode(&mut config, *mode, &config_path);
    }

    if command.is_mutating() && config.guard.mode == GuardMode::Lockdown {
        warn!("Currently in lockdown mode, refusing to change the denylist");
        eprintln!("Lockdown mode is active. Run `usb-watchguard mode normal` first.");
        return Ok(ExitCode::from(2));
    }

    let snapshot_path = match &args.storage {
        Some(path) => config::expand_path(path),
        None => config.snapshot_path(&folder),
    };
    let mut store = DenylistStore::open(&snapshot_path)
        .with_context(|| format!("Failed to open denylist at {}", snapshot_path.display()))?;

    run(command, &mut store)
}

fn run(command: Command, store: &mut DenylistStore) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    match command {
        Command::List => commands::list(store, &mut stdout)?,
        Command::Check {
            vendor_id,
            product_id,
        } => {
            if commands::check(store, &vendor_id, &product_id, &mut stdout)? {
                return Ok(ExitCode::from(1));
            }
        }
        Command::Add {
            vendor_id,
            product_id,
        } => commands::add(store, &vendor_id, &product_id)?,
        Command::Remove {
            vendor_id,
            product_id,
        } => commands::remove(store, &vendor_id, &product_id)?,
        Command::Clear => commands::clear(store)?,
        Command::Import { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    io::stdin()
                        .read_to_string(&mut text)
                        .context("Failed to read stdin")?;
                    text
                }
            };
            commands::import(store, &text, &mut stdout)?;
        }
        Command::Export { file } => {
            let text = commands::export(store);
            match file {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Exported denylist to {}", path.display());
                }
                None => stdout.write_all(text.as_bytes())?,
            }
        }
        Command::Edit => {
            let original = commands::export(store);
            match editor::edit_text(&editor::editor_command(), &original)? {
                Some(edited) if edited == original => writeln!(stdout, "No changes")?,
                Some(edited) => {
                    commands::import(store, &edited, &mut stdout)?;
                }
                None => writeln!(stdout, "Edit cancelled")?,
            }
        }
        Command::Populate { count } => {
            let mut rng = rand::rng();
            let count = count.unwrap_or_else(|| commands::random_count(&mut rng));
            let added = commands::populate(store, count, &mut rng)?;
            writeln!(stdout, "Added {} random entries", added)?;
        }
        Command::Mode { .. } => unreachable!("handled before opening the store"),
    }

    Ok(ExitCode::SUCCESS)
}

fn set_mode(
    config: &mut GuardConfig,
    mode: Option<GuardMode>,
    config_path: &std::path::Path,
) -> Result<ExitCode> {
    match mode {
        None => println!("{}", config.guard.mode),
        Some(mode) if mode == config.guard.mode => println!("Already in {} mode", mode),
        Some(mode) => {
            config.guard.mode = mode;
            config
                .save(config_path)
                .context("Failed to save configuration")?;
            info!("Switched to {} mode", mode);
            println!("Switched to {} mode", mode);
        }
    }
    Ok(ExitCode::SUCCESS)
}
