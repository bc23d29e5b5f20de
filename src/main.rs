//! Tablib CLI application entry point
//!
//! Drives the tab manager core against a JSON inventory snapshot. Each
//! command loads the snapshot, runs one operation through
//! [`TabManager`], and writes the resulting inventory back when the
//! operation changed it.
//!
//! # Usage
//!
//! ```bash
//! # List every window and tab (default command)
//! tablib
//! tablib list
//!
//! # Fuzzy search, or plain substring search
//! tablib list gh issues
//! tablib list --substring github
//!
//! # Preview and apply window optimization
//! tablib plan --min 3 --max 12
//! tablib optimize --yes
//!
//! # Copy matching tabs as markdown links
//! tablib copy rust --format markdown
//!
//! # Open links from a file, or from stdin
//! tablib open links.txt
//! pbpaste | tablib open --current-window
//! ```
//!
//! # Configuration
//!
//! Preferences live in the user's config directory
//! (`~/.config/tablib/config.toml` on Linux) and are created with defaults
//! on first run. `RUST_LOG` controls diagnostic logging.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;
use tablib::{
    TablibError,
    app::{ActionOutcome, OpenMode, TabManager},
    cli::{Cli, Commands, ConfigCommands, ThresholdArgs},
    config::TablibConfig,
    inventory::{MemoryProvider, ProviderError},
    keybinds::{KeyDispatcher, help::generate_help_text},
    links::{Clipboard, LinkFormat, MemoryClipboard, SystemClipboard, parse_links},
    output::{RowStyle, render_view},
    search::{SearchMode, summary_label},
    ui::StdoutWriter,
};

type Result<T> = std::result::Result<T, TablibError>;
type Manager = TabManager<MemoryProvider>;

/// Load the snapshot and build a manager around it
fn open_manager(snapshot: &Path, config: &TablibConfig, clipboard: Box<dyn Clipboard>, quiet: bool) -> Result<Manager> {
    let provider = MemoryProvider::from_file(snapshot)?;
    let writer = if quiet { StdoutWriter::quiet() } else { StdoutWriter::new() };

    let mut manager = TabManager::new(provider, clipboard, Box::new(writer))?;
    manager.apply_config(config)?;
    manager.refresh()?;
    Ok(manager)
}

/// Write the provider's windows back to the snapshot file
fn save_manager(manager: Manager, snapshot: &Path) -> Result<()> {
    manager.into_provider().save(snapshot)?;
    log::debug!("saved snapshot to {}", snapshot.display());
    Ok(())
}

/// Turn a rejected or failed outcome into an error for the exit status
fn check_outcome(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Success { .. } | ActionOutcome::Noop => Ok(()),
        ActionOutcome::Rejected(reason) => Err(TablibError::InvalidInput(reason)),
        ActionOutcome::Failed(reason) => Err(ProviderError::Host(reason).into()),
    }
}

/// Read FILE, or all of stdin when no file is given
fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => Ok(io::read_to_string(io::stdin())?),
    }
}

/// Threshold fields from the command line, else the configured ones
fn threshold_fields(args: &ThresholdArgs, config: &TablibConfig) -> (String, String) {
    if args.is_set() {
        let (min, max) = args.fields();
        (min.to_string(), max.to_string())
    } else {
        (config.optimize.min_tabs().to_string(), config.optimize.max_tabs().to_string())
    }
}

fn handle_list_command(cli: &Cli, config: &TablibConfig, query: Option<&str>, substring: bool) -> Result<()> {
    let mut manager = open_manager(&cli.snapshot, config, Box::new(MemoryClipboard::new()), cli.quiet)?;
    if substring && manager.state().mode != SearchMode::Substring {
        manager.toggle_search_mode();
    }
    manager.set_query(query.unwrap_or_default());

    let state = manager.state();
    let view = manager.view();
    let style = RowStyle {
        view_mode: state.view_mode,
        show_urls: state.shows_urls(),
        quiet: cli.quiet,
    };

    if !cli.quiet {
        println!("{}", summary_label(&view, &state.snapshot).bold());
        if view.is_empty() && view.is_filtered() {
            println!("{}", "No tabs match your search".dimmed());
        }
    }
    for line in render_view(&view, &state.selection, style) {
        println!("{line}");
    }
    Ok(())
}

fn handle_plan_command(cli: &Cli, config: &TablibConfig, thresholds: &ThresholdArgs) -> Result<()> {
    let mut manager = open_manager(&cli.snapshot, config, Box::new(MemoryClipboard::new()), cli.quiet)?;
    let (min, max) = threshold_fields(thresholds, config);
    let plan = manager.preview_optimization(&min, &max)?;

    if plan.is_noop() {
        if !cli.quiet {
            println!("All windows already hold between {} and {} tabs", plan.thresholds.min_tabs(), plan.thresholds.max_tabs());
        }
        return Ok(());
    }
    for description in plan.descriptions() {
        println!("{description}");
    }
    Ok(())
}

fn handle_optimize_command(cli: &Cli, config: &TablibConfig, thresholds: &ThresholdArgs, yes: bool) -> Result<()> {
    let mut manager = open_manager(&cli.snapshot, config, Box::new(MemoryClipboard::new()), cli.quiet)?;
    let (min, max) = threshold_fields(thresholds, config);
    let descriptions = manager.preview_optimization(&min, &max)?.descriptions();

    if descriptions.is_empty() {
        if !cli.quiet {
            println!("Nothing to optimize");
        }
        return Ok(());
    }

    if !cli.quiet {
        println!("{}", "Planned actions:".bold());
        for description in &descriptions {
            println!("  {description}");
        }
    }

    let confirmed = yes
        || cli.quiet
        || dialoguer::Confirm::new()
            .with_prompt("Apply these changes?")
            .default(false)
            .interact()?;
    if !confirmed {
        manager.cancel_optimization();
        println!("Cancelled");
        return Ok(());
    }

    let outcome = manager.apply_optimization()?;
    save_manager(manager, &cli.snapshot)?;
    check_outcome(outcome)
}

fn handle_copy_command(
    cli: &Cli,
    config: &TablibConfig,
    query: Option<&str>,
    format: Option<LinkFormat>,
    stdout: bool,
) -> Result<()> {
    let buffer = MemoryClipboard::new();
    let clipboard: Box<dyn Clipboard> = if stdout {
        Box::new(buffer.clone())
    } else {
        Box::new(SystemClipboard)
    };
    let quiet = cli.quiet || stdout;

    let mut manager = open_manager(&cli.snapshot, config, clipboard, quiet)?;
    manager.set_query(query.unwrap_or_default());
    manager.select_all_visible();

    let format = format.unwrap_or(manager.state().copy_format);
    let outcome = manager.copy_links(format);
    if outcome == ActionOutcome::Noop && !quiet {
        println!("No tabs to copy");
    }
    if let Some(text) = buffer.contents() {
        println!("{text}");
    }
    check_outcome(outcome)
}

fn handle_open_command(cli: &Cli, config: &TablibConfig, file: Option<&PathBuf>, current_window: bool) -> Result<()> {
    let text = read_input(file)?;
    let mut manager = open_manager(&cli.snapshot, config, Box::new(MemoryClipboard::new()), cli.quiet)?;
    let mode = if current_window {
        OpenMode::CurrentWindow
    } else {
        manager.state().open_mode
    };

    let outcome = manager.open_links(&text, mode)?;
    save_manager(manager, &cli.snapshot)?;
    check_outcome(outcome)
}

fn handle_parse_links_command(file: Option<&PathBuf>) -> Result<()> {
    let text = read_input(file)?;
    for url in parse_links(&text) {
        println!("{url}");
    }
    Ok(())
}

fn handle_keys_command(config: &TablibConfig) -> Result<()> {
    let dispatcher = KeyDispatcher::from_config(&config.keybinds)?;
    print!("{}", generate_help_text(&config.keybinds, &dispatcher));
    Ok(())
}

fn handle_config_command(config: &TablibConfig, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => print!("{}", config.to_toml()?),
        ConfigCommands::Path => println!("{}", TablibConfig::config_path()?.display()),
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = TablibConfig::load()?;

    match &cli.get_command() {
        Commands::List { query, substring } => handle_list_command(cli, &config, query.as_deref(), *substring),
        Commands::Plan { thresholds } => handle_plan_command(cli, &config, thresholds),
        Commands::Optimize { thresholds, yes } => handle_optimize_command(cli, &config, thresholds, *yes),
        Commands::Copy { query, format, stdout } => {
            handle_copy_command(cli, &config, query.as_deref(), *format, *stdout)
        }
        Commands::Open { file, current_window } => handle_open_command(cli, &config, file.as_ref(), *current_window),
        Commands::ParseLinks { file } => handle_parse_links_command(file.as_ref()),
        Commands::Keys => handle_keys_command(&config),
        Commands::Config { command } => handle_config_command(&config, command),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_args();
    if let Err(e) = run(&cli) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}
