//! Track navigation delegate
//!
//! Previous/next track and undo live on fixed buttons next to the grid. The
//! engine only toggles the delegate with its own enabled state and forwards
//! the button commands to it.

use crate::types::TrackCommand;
use std::cell::RefCell;
use std::rc::Rc;

/// Sub-component driven alongside the grid browser
pub trait TrackNavigation {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;

    /// Handle a button press; ignored while disabled
    fn handle(&mut self, command: TrackCommand);
}

impl<T: TrackNavigation> TrackNavigation for Rc<RefCell<T>> {
    fn set_enabled(&mut self, enabled: bool) {
        self.borrow_mut().set_enabled(enabled)
    }

    fn is_enabled(&self) -> bool {
        self.borrow().is_enabled()
    }

    fn handle(&mut self, command: TrackCommand) {
        self.borrow_mut().handle(command)
    }
}

/// Song-level operations of the host
pub trait SongHost {
    fn select_previous_track(&mut self);
    fn select_next_track(&mut self);
    fn undo(&mut self);
}

/// Routes track commands to the host while enabled
pub struct TrackController {
    host: Box<dyn SongHost>,
    enabled: bool,
}

impl TrackController {
    /// Created disabled; the engine enables it together with itself
    pub fn new(host: Box<dyn SongHost>) -> Self {
        Self {
            host,
            enabled: false,
        }
    }
}

impl TrackNavigation for TrackController {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn handle(&mut self, command: TrackCommand) {
        if !self.enabled {
            log::trace!("TrackController: Ignoring {:?} while disabled", command);
            return;
        }
        log::debug!("TrackController: {:?}", command);
        match command {
            TrackCommand::PreviousTrack => self.host.select_previous_track(),
            TrackCommand::NextTrack => self.host.select_next_track(),
            TrackCommand::Undo => self.host.undo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSong {
        calls: Vec<&'static str>,
    }

    impl SongHost for Rc<RefCell<RecordingSong>> {
        fn select_previous_track(&mut self) {
            self.borrow_mut().calls.push("previous");
        }

        fn select_next_track(&mut self) {
            self.borrow_mut().calls.push("next");
        }

        fn undo(&mut self) {
            self.borrow_mut().calls.push("undo");
        }
    }

    #[test]
    fn test_disabled_controller_ignores_commands() {
        let song = Rc::new(RefCell::new(RecordingSong::default()));
        let mut controller = TrackController::new(Box::new(song.clone()));

        controller.handle(TrackCommand::NextTrack);
        assert!(song.borrow().calls.is_empty());

        controller.set_enabled(true);
        controller.handle(TrackCommand::NextTrack);
        controller.handle(TrackCommand::PreviousTrack);
        controller.handle(TrackCommand::Undo);
        assert_eq!(song.borrow().calls, vec!["next", "previous", "undo"]);
    }
}
