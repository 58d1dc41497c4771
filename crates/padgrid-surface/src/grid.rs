//! Button and button-grid seams
//!
//! The engine never talks to hardware directly. It drives anything that
//! implements these traits: a controller binding, the console surface of
//! the player binary, or an in-memory double in tests.
//!
//! # Subscriptions
//!
//! ```text
//! pad press → grid driver → flume Sender → GridBrowser::process_events()
//! ```
//!
//! A grid holds at most one subscriber. `subscribe` replaces any previous
//! sender and `unsubscribe` drops it, so a detached grid can no longer reach
//! the engine.

use crate::types::{GridCell, SurfaceEvent, VisualStyle};
use flume::Sender;
use std::cell::RefCell;
use std::rc::Rc;

/// A single pad or button with an LED
pub trait Button {
    fn set_enabled(&mut self, enabled: bool);
    fn set_lit(&mut self, lit: bool);
    fn set_visual_style(&mut self, style: &VisualStyle);
}

/// A rectangular matrix of buttons
pub trait ButtonGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Deliver future press/release events to `sender`
    fn subscribe(&mut self, sender: Sender<SurfaceEvent>);

    /// Stop delivering events
    fn unsubscribe(&mut self);

    /// Turn every LED off and forget per-button state
    fn reset(&mut self);

    /// Visit every button with its position
    fn for_each_button(&mut self, f: &mut dyn FnMut(GridCell, &mut dyn Button));
}

// Shared handles let a caller keep observing a button or grid after handing
// a clone to the engine.

impl<B: Button> Button for Rc<RefCell<B>> {
    fn set_enabled(&mut self, enabled: bool) {
        self.borrow_mut().set_enabled(enabled)
    }

    fn set_lit(&mut self, lit: bool) {
        self.borrow_mut().set_lit(lit)
    }

    fn set_visual_style(&mut self, style: &VisualStyle) {
        self.borrow_mut().set_visual_style(style)
    }
}

impl<G: ButtonGrid> ButtonGrid for Rc<RefCell<G>> {
    fn width(&self) -> usize {
        self.borrow().width()
    }

    fn height(&self) -> usize {
        self.borrow().height()
    }

    fn subscribe(&mut self, sender: Sender<SurfaceEvent>) {
        self.borrow_mut().subscribe(sender)
    }

    fn unsubscribe(&mut self) {
        self.borrow_mut().unsubscribe()
    }

    fn reset(&mut self) {
        self.borrow_mut().reset()
    }

    fn for_each_button(&mut self, f: &mut dyn FnMut(GridCell, &mut dyn Button)) {
        self.borrow_mut().for_each_button(f)
    }
}

/// Previous/next page buttons
///
/// Either button may be unbound. The pair is only enabled when both are
/// bound.
#[derive(Default)]
pub struct PageButtons {
    previous: Option<Box<dyn Button>>,
    next: Option<Box<dyn Button>>,
}

impl PageButtons {
    pub fn new(previous: Option<Box<dyn Button>>, next: Option<Box<dyn Button>>) -> Self {
        Self { previous, next }
    }

    pub fn is_complete(&self) -> bool {
        self.previous.is_some() && self.next.is_some()
    }

    /// Push lit state to the bound buttons
    pub fn apply(&mut self, previous_lit: bool, next_lit: bool) {
        let enabled = self.is_complete();
        for (button, lit) in [
            (self.previous.as_mut(), previous_lit),
            (self.next.as_mut(), next_lit),
        ] {
            if let Some(button) = button {
                button.set_enabled(enabled);
                button.set_lit(enabled && lit);
            }
        }
    }
}
