//! # LogWriter: tracing handler
//!
//! A minimal handler that records every [`Event`] it receives through
//! `tracing` and lets the pass continue. Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO evdispatch::listeners::log: event listener="ui" event_type=1 data=Some("demo::Moved") handled=false
//! ```

use std::borrow::Cow;
use std::rc::Rc;

use tracing::info;

use super::handler::{EventHandler, HandlerResult};
use crate::events::Event;

/// Event writer handler.
#[derive(Clone, Debug)]
pub struct LogWriter {
    name: Cow<'static, str>,
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new("LogWriter")
    }
}

impl LogWriter {
    /// Construct a new [`LogWriter`] labelled `name`.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Records one event. Never marks it handled.
    pub fn on_event(&self, e: &mut Event) -> HandlerResult {
        info!(
            listener = %self.name,
            event_type = %e.event_type(),
            data = ?e.data_type_name(),
            handled = e.is_handled(),
            "event"
        );
        Ok(())
    }

    /// Wraps the writer into a shareable handler.
    #[must_use]
    pub fn into_handler(self) -> EventHandler {
        Rc::new(move |e: &mut Event| self.on_event(e))
    }
}
