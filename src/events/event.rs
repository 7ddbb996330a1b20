//! # The notification envelope.
//!
//! An [`Event`] is built once per notification and handed to each handler by
//! mutable reference. Its type and payload never change; only the `handled`
//! flag does. Once a handler marks the event handled, no further handler of
//! that pass is invoked.
//!
//! ## Example
//! ```rust
//! use evdispatch::{Event, EventType};
//!
//! #[derive(Debug)]
//! struct Clicked { x: i32, y: i32 }
//!
//! const CLICK: EventType = EventType::new(1);
//!
//! let mut ev = Event::new(CLICK).with_data(Clicked { x: 3, y: 4 });
//!
//! assert_eq!(ev.event_type(), CLICK);
//! assert_eq!(ev.data_as::<Clicked>().map(|c| c.x + c.y), Some(7));
//! assert!(ev.data_as::<String>().is_none());
//!
//! ev.mark_handled();
//! assert!(ev.is_handled());
//! ```

use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

use super::data::{EventData, Payload};
use crate::error::HandlerError;

/// Category discriminator for events.
///
/// Uniqueness of values across unrelated concerns is the producer's
/// responsibility. Ordered, so it can serve as (part of) a routing key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventType(i32);

impl EventType {
    /// Wraps a raw event type value.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for EventType {
    #[inline]
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One notification: type, optional payload and the handled flag.
///
/// - `event_type`: category used for routing
/// - `data`: shared read-only payload, may be absent
/// - `handled`: starts `false`; once `true`, the rest of the pass is skipped
#[derive(Clone, Debug)]
pub struct Event {
    event_type: EventType,
    data: Option<Payload>,
    handled: bool,
}

impl Event {
    /// Creates an event without payload.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            data: None,
            handled: false,
        }
    }

    /// Creates an event from its parts.
    pub fn from_parts(event_type: EventType, data: Option<Payload>) -> Self {
        Self {
            event_type,
            data,
            handled: false,
        }
    }

    /// Attaches a payload value.
    ///
    /// A [`Payload`] passed here is attached as is, not wrapped a second
    /// time. [`Event::with_payload`] states that intent explicitly.
    pub fn with_data<T: EventData>(mut self, data: T) -> Self {
        let mut slot = Some(data);
        let shared = (&mut slot as &mut dyn Any)
            .downcast_mut::<Option<Payload>>()
            .and_then(Option::take);
        self.data = shared.or_else(|| slot.map(|data| Arc::new(data) as Payload));
        self
    }

    /// Attaches an already shared payload.
    #[inline]
    pub fn with_payload(mut self, data: Payload) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the event type.
    #[inline]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Returns the shared payload, if any.
    #[inline]
    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    /// True if a payload is attached.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Borrows the payload as `T`.
    ///
    /// Returns `None` when there is no payload or when it is of another type.
    pub fn data_as<T: Any>(&self) -> Option<&T> {
        self.data
            .as_deref()
            .and_then(|data| data.downcast_ref::<T>())
    }

    /// Returns a shared handle to the payload as `T`.
    ///
    /// Like [`Event::data_as`], but the result may outlive the event.
    pub fn shared_data_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let data = self.data.clone()?;
        data.downcast::<T>().ok()
    }

    /// Borrows the payload as `T`, or explains why it cannot.
    ///
    /// Meant for handlers that cannot do anything useful without the payload:
    /// `let moved = event.require_data::<Moved>()?;`
    pub fn require_data<T: Any>(&self) -> Result<&T, HandlerError> {
        let data = self.data.as_deref().ok_or(HandlerError::MissingPayload {
            expected: any::type_name::<T>(),
        })?;
        data.downcast_ref::<T>().ok_or(HandlerError::PayloadMismatch {
            expected: any::type_name::<T>(),
        })
    }

    /// Name of the concrete payload type, if any.
    pub fn data_type_name(&self) -> Option<&'static str> {
        self.data.as_deref().map(|data| data.type_name())
    }

    /// True once a handler marked the event handled.
    #[inline]
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Sets the handled flag.
    #[inline]
    pub fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }

    /// Marks the event handled: no further handler of this pass runs.
    #[inline]
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}
