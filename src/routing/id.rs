//! # Routing identities.
//!
//! A dispatcher selects a listener by a **routing id**:
//! - [`EventType`] alone: one listener per type (handlers inside addressed by [`Key`]);
//! - [`EventId`]: `(EventType, TargetId)`, one listener per type and target.
//!
//! Both are totally ordered, event type first, so dispatcher storage iterates
//! deterministically.
//!
//! [`TargetId`] and [`Key`] are plain comparable handles. They never own the
//! subscriber they stand for, so being a routing key never extends anybody's
//! lifetime.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::events::EventType;
use crate::listeners::HandlerKey;

/// Process-wide counter backing [`TargetId::next`].
static TARGET_SEQ: AtomicU64 = AtomicU64::new(1);

/// Routing key of a dispatcher slot.
///
/// Every routing id knows the event type it routes, which lets
/// [`EventDispatcher::notify`](crate::EventDispatcher::notify) build the event.
pub trait RoutingId: Ord + Clone + fmt::Debug + 'static {
    /// Event type routed through this id.
    fn event_type(&self) -> EventType;
}

impl RoutingId for EventType {
    #[inline]
    fn event_type(&self) -> EventType {
        *self
    }
}

/// Stable identity of a subscriber object.
///
/// Only compared and ordered, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(u64);

impl TargetId {
    /// Wraps a host-supplied id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Draws a fresh, process-unique id.
    pub fn next() -> Self {
        Self(TARGET_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target:{}", self.0)
    }
}

impl HandlerKey for TargetId {}

/// Opaque handler key without ownership semantics.
///
/// Typically the address of the subscriber ([`Key::of`]) or a caller token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(u64);

impl Key {
    /// Wraps a caller-supplied value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Key derived from the address of `value`.
    ///
    /// Only meaningful while `value` stays where it is (e.g. behind an `Rc`).
    /// The address is widened from `usize` to `u64`, which is lossless on
    /// every target with pointers of 64 bits or less.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        let addr: usize = (value as *const T).cast::<()>().addr();
        Self(addr as u64)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{:#x}", self.0)
    }
}

impl HandlerKey for Key {}

/// Routing id of the target+type scheme: `(EventType, TargetId)`.
///
/// Ordered by event type, then by target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId {
    event_type: EventType,
    target: TargetId,
}

impl EventId {
    /// Builds the routing id for `event_type` raised at `target`.
    #[inline]
    pub const fn new(event_type: EventType, target: TargetId) -> Self {
        Self { event_type, target }
    }

    /// Returns the event type.
    #[inline]
    pub const fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Returns the target.
    #[inline]
    pub const fn target(&self) -> TargetId {
        self.target
    }
}

impl RoutingId for EventId {
    #[inline]
    fn event_type(&self) -> EventType {
        EventId::event_type(self)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.event_type, self.target)
    }
}
