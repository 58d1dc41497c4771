//! Console surface
//!
//! Stands in for a pad controller. Commands typed on stdin are turned into
//! surface events on a reader thread and sent through flume; the grid is
//! redrawn as text whenever a render changed any pad.
//!
//! ```text
//! stdin → reader thread → grid subscriber / engine sender → process_events()
//! ```

use anyhow::{bail, Context};
use flume::Sender;
use padgrid_surface::{
    Button, ButtonGrid, GridCell, PageDirection, SurfaceEvent, TrackCommand, VisualStyle,
};
use std::io::BufRead;
use std::sync::{Arc, Mutex};

/// Subscriber slot shared between `ConsoleGrid` and the reader thread
pub type GridSubscriber = Arc<Mutex<Option<Sender<SurfaceEvent>>>>;

/// One parsed console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput {
    Pad { x: usize, y: usize },
    Page(PageDirection),
    Track(TrackCommand),
    Show,
    Quit,
}

/// Commands handled by the main loop rather than the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Show,
    Quit,
}

pub const HELP: &str = "\
commands:
  <x> <y>     press pad (column, row; row 0 is the category row)
  n / p       next / previous page
  ] / [       next / previous track
  u           undo
  s           show grid
  q           quit";

/// Parse a console line; blank lines yield None
pub fn parse_line(line: &str) -> anyhow::Result<Option<ConsoleInput>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let input = match words.as_slice() {
        [] => return Ok(None),
        ["n"] => ConsoleInput::Page(PageDirection::Next),
        ["p"] => ConsoleInput::Page(PageDirection::Previous),
        ["]"] => ConsoleInput::Track(TrackCommand::NextTrack),
        ["["] => ConsoleInput::Track(TrackCommand::PreviousTrack),
        ["u"] => ConsoleInput::Track(TrackCommand::Undo),
        ["s"] => ConsoleInput::Show,
        ["q"] => ConsoleInput::Quit,
        [x, y] => ConsoleInput::Pad {
            x: x.parse().with_context(|| format!("Bad column: {}", x))?,
            y: y.parse().with_context(|| format!("Bad row: {}", y))?,
        },
        _ => bail!("Unknown command: {}", line.trim()),
    };
    Ok(Some(input))
}

/// Routes parsed input the way a controller driver would
pub struct ConsoleRouter {
    grid_subscriber: GridSubscriber,
    control_tx: Sender<SurfaceEvent>,
    app_tx: Sender<AppCommand>,
}

impl ConsoleRouter {
    pub fn new(
        grid_subscriber: GridSubscriber,
        control_tx: Sender<SurfaceEvent>,
        app_tx: Sender<AppCommand>,
    ) -> Self {
        Self {
            grid_subscriber,
            control_tx,
            app_tx,
        }
    }

    /// Deliver one input as a press followed by a release
    ///
    /// Pad events are dropped while no one subscribes to the grid.
    pub fn dispatch(&self, input: ConsoleInput) {
        match input {
            ConsoleInput::Pad { x, y } => {
                let Ok(subscriber) = self.grid_subscriber.lock() else {
                    log::warn!("Console: Grid subscriber lock poisoned");
                    return;
                };
                match subscriber.as_ref() {
                    Some(tx) => {
                        for value in [127, 0] {
                            let _ = tx.send(SurfaceEvent::Grid { x, y, value });
                        }
                    }
                    None => log::trace!("Console: Grid not subscribed, dropping pad ({}, {})", x, y),
                }
            }
            ConsoleInput::Page(direction) => {
                for value in [127, 0] {
                    let _ = self.control_tx.send(SurfaceEvent::Page { direction, value });
                }
            }
            ConsoleInput::Track(command) => {
                for value in [127, 0] {
                    let _ = self.control_tx.send(SurfaceEvent::Track { command, value });
                }
            }
            ConsoleInput::Show => {
                let _ = self.app_tx.send(AppCommand::Show);
            }
            ConsoleInput::Quit => {
                let _ = self.app_tx.send(AppCommand::Quit);
            }
        }
    }

    /// Read stdin on a background thread until EOF or `q`
    pub fn spawn_stdin_reader(self) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Some(input)) => {
                        self.dispatch(input);
                        if input == ConsoleInput::Quit {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        println!("{}", e);
                        println!("{}", HELP);
                    }
                }
            }
            let _ = self.app_tx.send(AppCommand::Quit);
        })
    }
}

/// Text-backed button
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleButton {
    pub enabled: bool,
    pub lit: bool,
    pub style: Option<VisualStyle>,
    changed: bool,
}

impl ConsoleButton {
    /// Character for the current state (`#` lit, `o` enabled, `.` disabled)
    pub fn glyph(&self) -> char {
        match (self.enabled, self.lit) {
            (true, true) => '#',
            (true, false) => 'o',
            _ => '.',
        }
    }

    /// Skin name for the current state, None while disabled
    pub fn skin_name(&self) -> Option<String> {
        let style = self.style.as_ref().filter(|_| self.enabled)?;
        Some(if self.lit {
            style.on_name()
        } else {
            style.off_name()
        })
    }

    /// True if anything changed since the last call
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl Button for ConsoleButton {
    fn set_enabled(&mut self, enabled: bool) {
        self.changed |= self.enabled != enabled;
        self.enabled = enabled;
    }

    fn set_lit(&mut self, lit: bool) {
        self.changed |= self.lit != lit;
        self.lit = lit;
    }

    fn set_visual_style(&mut self, style: &VisualStyle) {
        self.changed |= self.style.as_ref() != Some(style);
        self.style = Some(style.clone());
    }
}

/// Text-backed pad grid
pub struct ConsoleGrid {
    width: usize,
    height: usize,
    buttons: Vec<ConsoleButton>,
    subscriber: GridSubscriber,
}

impl ConsoleGrid {
    pub fn new(width: usize, height: usize, subscriber: GridSubscriber) -> Self {
        Self {
            width,
            height,
            buttons: vec![ConsoleButton::default(); width * height],
            subscriber,
        }
    }

    /// True if any pad changed since the last call
    pub fn take_changed(&mut self) -> bool {
        self.buttons
            .iter_mut()
            .fold(false, |changed, button| button.take_changed() | changed)
    }

    /// One line per row, with the row number in front
    pub fn draw(&self) -> String {
        let mut out = String::new();
        out.push_str("   ");
        out.extend((0..self.width).map(|x| char::from_digit((x % 10) as u32, 10).unwrap_or(' ')));
        for (y, row) in self.buttons.chunks(self.width.max(1)).enumerate() {
            out.push('\n');
            out.push_str(&format!("{:>2} ", y));
            out.extend(row.iter().map(ConsoleButton::glyph));
        }
        out
    }

    /// Distinct skin names per row, for rows with any enabled pad
    pub fn legend(&self) -> Vec<String> {
        self.buttons
            .chunks(self.width.max(1))
            .enumerate()
            .filter_map(|(y, row)| {
                let mut skins: Vec<String> = row.iter().filter_map(ConsoleButton::skin_name).collect();
                skins.sort();
                skins.dedup();
                (!skins.is_empty()).then(|| format!("{:>2} {}", y, skins.join(" ")))
            })
            .collect()
    }

    fn set_subscriber(&self, sender: Option<Sender<SurfaceEvent>>) {
        match self.subscriber.lock() {
            Ok(mut slot) => *slot = sender,
            Err(e) => log::warn!("ConsoleGrid: Subscriber lock poisoned: {}", e),
        }
    }
}

impl ButtonGrid for ConsoleGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn subscribe(&mut self, sender: Sender<SurfaceEvent>) {
        self.set_subscriber(Some(sender));
    }

    fn unsubscribe(&mut self) {
        self.set_subscriber(None);
    }

    fn reset(&mut self) {
        for button in &mut self.buttons {
            let changed = button.enabled || button.lit;
            *button = ConsoleButton::default();
            button.changed = changed;
        }
    }

    fn for_each_button(&mut self, f: &mut dyn FnMut(GridCell, &mut dyn Button)) {
        let width = self.width;
        for (i, button) in self.buttons.iter_mut().enumerate() {
            f(GridCell::new(i % width, i / width), button);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> GridSubscriber {
        Arc::new(Mutex::new(None))
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("  ").unwrap(), None);
        assert_eq!(
            parse_line("3 5").unwrap(),
            Some(ConsoleInput::Pad { x: 3, y: 5 })
        );
        assert_eq!(
            parse_line("n").unwrap(),
            Some(ConsoleInput::Page(PageDirection::Next))
        );
        assert_eq!(
            parse_line("[").unwrap(),
            Some(ConsoleInput::Track(TrackCommand::PreviousTrack))
        );
        assert_eq!(parse_line("q").unwrap(), Some(ConsoleInput::Quit));
        assert!(parse_line("3 x").is_err());
        assert!(parse_line("load everything").is_err());
    }

    #[test]
    fn test_pad_needs_subscription() {
        let subscriber = slot();
        let (control_tx, control_rx) = flume::unbounded();
        let (app_tx, app_rx) = flume::unbounded();
        let router = ConsoleRouter::new(subscriber.clone(), control_tx, app_tx);

        router.dispatch(ConsoleInput::Pad { x: 1, y: 2 });

        let (grid_tx, grid_rx) = flume::unbounded();
        let mut grid = ConsoleGrid::new(8, 8, subscriber);
        grid.subscribe(grid_tx);
        router.dispatch(ConsoleInput::Pad { x: 1, y: 2 });

        let events: Vec<SurfaceEvent> = grid_rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SurfaceEvent::Grid { x: 1, y: 2, value: 127 },
                SurfaceEvent::Grid { x: 1, y: 2, value: 0 },
            ]
        );
        assert!(control_rx.is_empty());

        grid.unsubscribe();
        router.dispatch(ConsoleInput::Pad { x: 1, y: 2 });
        assert!(grid_rx.is_empty());

        router.dispatch(ConsoleInput::Show);
        assert_eq!(app_rx.try_recv().unwrap(), AppCommand::Show);
    }

    #[test]
    fn test_controls_go_to_engine() {
        let (control_tx, control_rx) = flume::unbounded();
        let (app_tx, _app_rx) = flume::unbounded();
        let router = ConsoleRouter::new(slot(), control_tx, app_tx);

        router.dispatch(ConsoleInput::Track(TrackCommand::Undo));
        assert_eq!(
            control_rx.try_recv().unwrap(),
            SurfaceEvent::Track {
                command: TrackCommand::Undo,
                value: 127
            }
        );
        assert!(!control_rx.try_recv().unwrap().is_press());
    }

    #[test]
    fn test_grid_change_tracking() {
        let mut grid = ConsoleGrid::new(4, 2, slot());
        assert!(!grid.take_changed());

        let style = VisualStyle::new("Mode.Drum");
        grid.for_each_button(&mut |cell, button| {
            if cell == GridCell::new(1, 1) {
                button.set_visual_style(&style);
                button.set_enabled(true);
                button.set_lit(true);
            }
        });
        assert!(grid.take_changed());
        assert_eq!(grid.draw(), "   0123\n 0 ....\n 1 .#..");

        // Same state again
        grid.for_each_button(&mut |cell, button| {
            if cell == GridCell::new(1, 1) {
                button.set_visual_style(&style);
                button.set_enabled(true);
                button.set_lit(true);
            }
        });
        assert!(!grid.take_changed());

        grid.reset();
        assert!(grid.take_changed());
        assert!(!grid.buttons[5].enabled);
    }

    #[test]
    fn test_legend_uses_skin_names() {
        let mut grid = ConsoleGrid::new(4, 2, slot());
        assert!(grid.legend().is_empty());

        let header = VisualStyle::new("QuickScale.Quant");
        grid.for_each_button(&mut |cell, button| {
            if cell.y == 0 && cell.x < 2 {
                button.set_visual_style(&header);
                button.set_enabled(true);
                button.set_lit(cell.x == 1);
            }
        });

        assert_eq!(
            grid.legend(),
            vec![" 0 QuickScale.Quant.Off QuickScale.Quant.On".to_string()]
        );
        assert_eq!(grid.buttons[4].skin_name(), None);
    }
}
