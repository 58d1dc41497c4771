//! padgrid player - browse a device library on a console pad grid
//!
//! Loads the surface config and a YAML library, wires the grid browser to a
//! console surface and runs until `q` or end of input. Loads go to an
//! in-memory browser; track buttons are logged.
//!
//! ## Command line flags
//!
//! - `--config <path>`: surface config (default `~/.config/padgrid/surface.yaml`)
//! - `--library <path>`: YAML library of top-level categories (required)
//! - `--write-default-config`: save the default config and exit

mod console;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context};
use console::{AppCommand, ConsoleButton, ConsoleGrid, ConsoleRouter, GridSubscriber, HELP};
use padgrid_surface::{
    default_config_path, load_surface_config, save_surface_config, GridBrowser, LogDiagnostics,
    LogStatus, MemoryBrowser, SongHost, SurfaceConfig, TrackController,
};

const TICK: Duration = Duration::from_millis(10);

/// Song host that only reports what it was asked to do
struct LogSongHost;

impl SongHost for LogSongHost {
    fn select_previous_track(&mut self) {
        log::info!("Song: previous track");
    }

    fn select_next_track(&mut self) {
        log::info!("Song: next track");
    }

    fn undo(&mut self) {
        log::info!("Song: undo");
    }
}

struct Args {
    config: PathBuf,
    library: Option<PathBuf>,
    write_default_config: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: default_config_path(),
        library: None,
        write_default_config: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config = iter.next().map(PathBuf::from).context("--config needs a path")?;
            }
            "--library" => {
                args.library = Some(iter.next().map(PathBuf::from).context("--library needs a path")?);
            }
            "--write-default-config" => args.write_default_config = true,
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn print_surface(grid: &ConsoleGrid, previous: &ConsoleButton, next: &ConsoleButton) {
    println!("{}", grid.draw());
    println!("   page [{}] [{}]", previous.glyph(), next.glyph());
}

fn print_legend(grid: &ConsoleGrid) {
    for line in grid.legend() {
        println!("{}", line);
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;

    if args.write_default_config {
        save_surface_config(&SurfaceConfig::default(), &args.config)?;
        println!("Wrote default config to {:?}", args.config);
        return Ok(());
    }

    log::info!("padgrid-player starting up");

    let config = load_surface_config(&args.config);
    let library = args
        .library
        .context("No library given (use --library <path>)")?;
    let browser = MemoryBrowser::from_file(&library)?;
    let geometry = config.grid;

    let mut engine = GridBrowser::new(config, Box::new(browser))
        .with_status_display(Box::new(LogStatus))
        .with_diagnostics(Box::new(LogDiagnostics))
        .with_track_navigation(Box::new(TrackController::new(Box::new(LogSongHost))));

    let subscriber: GridSubscriber = Arc::new(Mutex::new(None));
    let grid = Rc::new(RefCell::new(ConsoleGrid::new(
        geometry.width,
        geometry.height,
        subscriber.clone(),
    )));
    let previous = Rc::new(RefCell::new(ConsoleButton::default()));
    let next = Rc::new(RefCell::new(ConsoleButton::default()));

    let (app_tx, app_rx) = flume::unbounded();
    let _reader = ConsoleRouter::new(subscriber, engine.event_sender(), app_tx).spawn_stdin_reader();

    engine.attach_grid(Some(Box::new(grid.clone())));
    engine.set_page_buttons(Some(Box::new(previous.clone())), Some(Box::new(next.clone())));
    engine.set_enabled(true);

    println!("{}", HELP);
    loop {
        if let Err(e) = engine.process_events() {
            log::warn!("{}", e);
        }

        let page_changed = previous.borrow_mut().take_changed() | next.borrow_mut().take_changed();
        if grid.borrow_mut().take_changed() | page_changed {
            print_surface(&grid.borrow(), &previous.borrow(), &next.borrow());
        }

        match app_rx.try_recv() {
            Ok(AppCommand::Show) => {
                print_surface(&grid.borrow(), &previous.borrow(), &next.borrow());
                print_legend(&grid.borrow());
                log::info!("{:?}", engine.snapshot());
            }
            Ok(AppCommand::Quit) => break,
            Err(_) => std::thread::sleep(TICK),
        }
    }

    engine.set_enabled(false);
    log::info!("padgrid-player shutting down");
    Ok(())
}
