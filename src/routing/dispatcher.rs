//! # EventDispatcher: routing id → listener.
//!
//! [`EventDispatcher`] maps a routing id to the [`EventListener`] of that slot
//! and forwards notifications to it.
//!
//! ## Architecture
//! ```text
//! notify(id, data) ──► Event::from_parts(id.event_type(), data)
//!                          │
//!                          ▼
//!                  notify_event(&id, &mut Event)
//!                          │  depth check (config.max_depth)
//!                          │  lookup id ──► none: Ok(Delivery { invoked: 0, .. })
//!                          ▼
//!                  EventListener::notify(&mut Event)
//! ```
//!
//! ## Rules
//! - Lookups never create listeners; only [`EventDispatcher::listener_or_insert`] does.
//! - Notifying an id without listener is a silent no-op.
//! - The dispatcher does not watch listeners become empty: whoever detaches
//!   handlers (normally a registry) unregisters the empty listener. Hosts that
//!   detach directly can call [`EventDispatcher::prune`].
//! - No borrow of the routing table is held while handlers run, so handlers
//!   may subscribe, unsubscribe or raise nested events.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::{trace, warn};

use super::id::RoutingId;
use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::events::{Event, Payload};
use crate::listeners::{Delivery, EventListener, HandlerKey, Token};

/// Registry of listeners keyed by routing id.
///
/// - `R`: routing id ([`EventId`](crate::EventId) or [`EventType`](crate::EventType))
/// - `A`: handler address inside each listener ([`Token`] or a [`HandlerKey`])
pub struct EventDispatcher<R, A = Token> {
    listeners: RefCell<BTreeMap<R, Rc<EventListener<A>>>>,
    config: DispatcherConfig,
    depth: Cell<usize>,
}

/// Decrements the nesting counter when a notification returns.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl<R: RoutingId> EventDispatcher<R, Token> {
    /// Creates a dispatcher of token listeners with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(DispatcherConfig::default())
    }

    /// Creates a dispatcher of token listeners.
    #[must_use]
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self::from_config(config)
    }
}

impl<R: RoutingId> Default for EventDispatcher<R, Token> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RoutingId, K: HandlerKey> EventDispatcher<R, K> {
    /// Creates a dispatcher of keyed listeners with the default configuration.
    #[must_use]
    pub fn keyed() -> Self {
        Self::from_config(DispatcherConfig::default())
    }

    /// Creates a dispatcher of keyed listeners.
    #[must_use]
    pub fn keyed_with_config(config: DispatcherConfig) -> Self {
        Self::from_config(config)
    }

    /// Detaches `key` from every listener and drops the listeners left empty.
    ///
    /// Returns the number of handlers removed. Unknown keys are a no-op.
    pub fn unregister_event_handler(&self, key: &K) -> usize {
        let mut removed = 0;
        for (id, listener) in self.entries() {
            if listener.detach(key) {
                removed += 1;
            }
            if listener.is_empty() {
                self.unregister_event_listener(&id);
            }
        }
        trace!(
            dispatcher = %self.config.name,
            key = ?key,
            removed,
            "keyed handlers unregistered"
        );
        removed
    }
}

impl<R, A> EventDispatcher<R, A>
where
    R: RoutingId,
    A: Hash + Eq + Clone + fmt::Debug,
{
    fn from_config(config: DispatcherConfig) -> Self {
        Self {
            listeners: RefCell::new(BTreeMap::new()),
            config,
            depth: Cell::new(0),
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Installs `listener` for `id`, returning the listener it replaced.
    pub fn register_event_listener(
        &self,
        id: R,
        listener: Rc<EventListener<A>>,
    ) -> Option<Rc<EventListener<A>>> {
        trace!(dispatcher = %self.config.name, routing_id = ?id, "listener registered");
        self.listeners.borrow_mut().insert(id, listener)
    }

    /// Removes the listener for `id` together with all its handlers.
    ///
    /// Returns the removed listener; `None` if there was none.
    pub fn unregister_event_listener(&self, id: &R) -> Option<Rc<EventListener<A>>> {
        let removed = self.listeners.borrow_mut().remove(id);
        if removed.is_some() {
            trace!(dispatcher = %self.config.name, routing_id = ?id, "listener unregistered");
        }
        removed
    }

    /// Returns the listener for `id`, if any. Never creates one.
    pub fn get_event_listener(&self, id: &R) -> Option<Rc<EventListener<A>>> {
        self.listeners.borrow().get(id).cloned()
    }

    /// True if a listener is installed for `id`.
    ///
    /// When the dispatcher is driven by a registry this is equivalent to "at
    /// least one handler is subscribed for `id`".
    pub fn has_listener(&self, id: &R) -> bool {
        self.listeners.borrow().contains_key(id)
    }

    /// Returns the listener for `id`, creating and installing an empty one first
    /// if needed.
    pub fn listener_or_insert(&self, id: R) -> Rc<EventListener<A>> {
        if let Some(listener) = self.get_event_listener(&id) {
            return listener;
        }
        let listener = Rc::new(EventListener::default());
        self.register_event_listener(id, Rc::clone(&listener));
        listener
    }

    /// Delivers `event` to the listener of `id`.
    ///
    /// No listener: nothing happens; the delivery reports zero handlers and
    /// the event's own handled flag, as an empty listener would.
    ///
    /// # Errors
    /// - [`DispatchError::DepthExceeded`] if called from handlers nested deeper
    ///   than [`DispatcherConfig::max_depth`]; no handler runs.
    /// - [`DispatchError::Handler`] if a handler fails.
    pub fn notify_event(&self, id: &R, event: &mut Event) -> Result<Delivery, DispatchError> {
        let _guard = self.enter()?;

        let Some(listener) = self.get_event_listener(id) else {
            if self.config.trace_unrouted {
                trace!(
                    dispatcher = %self.config.name,
                    routing_id = ?id,
                    event_type = %event.event_type(),
                    "no listener; event dropped"
                );
            }
            return Ok(Delivery {
                invoked: 0,
                handled: event.is_handled(),
            });
        };

        listener.notify(event)
    }

    /// Builds an event for `id` (its type comes from the id) carrying `data`
    /// and delivers it.
    ///
    /// # Errors
    /// See [`EventDispatcher::notify_event`].
    pub fn notify(&self, id: R, data: Option<Payload>) -> Result<Delivery, DispatchError> {
        let mut event = Event::from_parts(id.event_type(), data);
        self.notify_event(&id, &mut event)
    }

    /// Number of installed listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// True if no listener is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Routing ids with an installed listener, in order.
    #[must_use]
    pub fn routing_ids(&self) -> Vec<R> {
        self.listeners.borrow().keys().cloned().collect()
    }

    /// Current nesting of notifications through this dispatcher.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Drops listeners that have no handler left. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let empty: Vec<R> = self
            .entries()
            .into_iter()
            .filter(|(_, listener)| listener.is_empty())
            .map(|(id, _)| id)
            .collect();
        for id in &empty {
            self.unregister_event_listener(id);
        }
        empty.len()
    }

    /// Removes every listener.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *self.listeners.borrow_mut());
        trace!(
            dispatcher = %self.config.name,
            listeners = drained.len(),
            "dispatcher cleared"
        );
        drop(drained);
    }

    fn entries(&self) -> Vec<(R, Rc<EventListener<A>>)> {
        self.listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (id.clone(), Rc::clone(listener)))
            .collect()
    }

    fn enter(&self) -> Result<DepthGuard<'_>, DispatchError> {
        let next = self.depth.get() + 1;
        if let Some(limit) = self.config.depth_limit() {
            if next > limit {
                warn!(
                    dispatcher = %self.config.name,
                    limit,
                    "notification depth limit exceeded"
                );
                return Err(DispatchError::DepthExceeded { limit });
            }
        }
        self.depth.set(next);
        Ok(DepthGuard { depth: &self.depth })
    }
}

impl<R: fmt::Debug, A> fmt::Debug for EventDispatcher<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("name", &self.config.name)
            .field("routing_ids", &self.listeners.borrow().keys().collect::<Vec<_>>())
            .field("depth", &self.depth.get())
            .finish()
    }
}
