//! # Handlers and their addresses
//!
//! A handler is a closure invoked with the event by mutable reference. It
//! captures whatever state it needs (use `Cell`/`RefCell` for mutation) and
//! returns [`HandlerResult`]; an `Err` aborts the rest of the pass.
//!
//! Inside a listener each handler has an **address**:
//! - a [`Token`] handed out by [`EventListener::attach`](crate::EventListener::attach),
//!   unique and never reused while the listener lives (until `clear`);
//! - or a caller-chosen key implementing [`HandlerKey`], used with
//!   [`EventListener::attach_keyed`](crate::EventListener::attach_keyed).
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use evdispatch::{Event, EventListener, EventType, HandlerResult};
//!
//! let seen = Rc::new(Cell::new(0));
//! let listener = EventListener::new();
//!
//! let counter = Rc::clone(&seen);
//! let token = listener.attach(move |_ev: &mut Event| -> HandlerResult {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//!
//! listener.notify_with(EventType::new(1), None).unwrap();
//! assert_eq!(seen.get(), 1);
//! assert!(listener.detach(&token));
//! assert!(listener.is_empty());
//! ```

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::HandlerError;
use crate::events::Event;

/// Outcome of a single handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Shared handle to a handler closure.
pub type EventHandler = Rc<dyn Fn(&mut Event) -> HandlerResult>;

/// Subscription token: addresses one handler inside one listener.
///
/// Tokens are handed out in increasing order starting at 1, so token order is
/// subscription order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub(crate) u64);

impl Token {
    /// Returns the raw token value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Caller-chosen handler address for keyed listeners.
///
/// Attaching twice under the same key replaces the first handler. Implement it
/// for any small comparable handle your application already has.
pub trait HandlerKey: Hash + Eq + Clone + fmt::Debug + 'static {}
