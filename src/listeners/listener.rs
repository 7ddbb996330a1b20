//! # EventListener: ordered fan-out for one routing slot
//!
//! [`EventListener`] keeps the handlers of a single routing slot and invokes
//! them synchronously, in order, on the caller's thread.
//!
//! ## What it guarantees
//! - Delivery order is **insertion order**: token order for token listeners,
//!   first-attach order for keyed listeners (replacing a key keeps its place).
//! - Once a handler marks the event handled, no later handler of the pass runs.
//! - A handler error aborts the pass and is returned to the caller.
//! - Handlers may attach/detach on this listener (or notify it again) while a
//!   pass is running.
//!
//! ## Re-entrancy
//! `notify` snapshots the handlers before the first invocation and never holds
//! a borrow of its state while a handler runs:
//! - a handler detached or replaced earlier in the same pass is skipped;
//! - a handler attached during the pass runs from the next notification on.
//!
//! ## Diagram
//! ```text
//!    notify(&mut Event)
//!        │  snapshot [(addr1, h1), (addr2, h2), (addr3, h3)]
//!        ├──► h1(&mut Event) ── Ok ──► handled? no
//!        ├──► h2(&mut Event) ── Ok ──► handled? yes ──► stop
//!        └──x h3 not invoked
//! ```

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{trace, warn};

use super::handler::{EventHandler, HandlerKey, HandlerResult, Token};
use crate::error::DispatchError;
use crate::events::{Event, EventType, Payload};

/// Summary of one notification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Number of handlers that ran to completion.
    pub invoked: usize,
    /// Whether the event ended the pass marked handled.
    pub handled: bool,
}

impl Delivery {
    /// True if at least one handler ran.
    #[inline]
    pub fn is_delivered(&self) -> bool {
        self.invoked > 0
    }
}

struct Slots<A> {
    handlers: IndexMap<A, EventHandler>,
    last_token: u64,
}

impl<A> Default for Slots<A> {
    fn default() -> Self {
        Self {
            handlers: IndexMap::new(),
            last_token: 0,
        }
    }
}

/// Ordered set of handlers for one routing slot.
///
/// `A` is the handler address: [`Token`] (default) or a [`HandlerKey`].
/// All operations take `&self`; the listener is meant to be shared through an
/// `Rc` by a dispatcher, a registry or the subscriber that owns it.
pub struct EventListener<A = Token> {
    slots: RefCell<Slots<A>>,
}

impl<A> Default for EventListener<A> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(Slots::default()),
        }
    }
}

impl EventListener<Token> {
    /// Creates an empty token listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a handler and returns its token.
    ///
    /// Always creates a new, independent entry, even for an identical closure.
    pub fn attach<F>(&self, handler: F) -> Token
    where
        F: Fn(&mut Event) -> HandlerResult + 'static,
    {
        self.attach_handler(Rc::new(handler))
    }

    /// Attaches an already shared handler and returns its token.
    pub fn attach_handler(&self, handler: EventHandler) -> Token {
        let mut slots = self.slots.borrow_mut();
        slots.last_token += 1;
        let token = Token(slots.last_token);
        slots.handlers.insert(token, handler);
        token
    }
}

impl<K: HandlerKey> EventListener<K> {
    /// Creates an empty keyed listener.
    #[must_use]
    pub fn keyed() -> Self {
        Self::default()
    }

    /// Attaches a handler under `key`.
    ///
    /// Last write wins: an existing handler under the same key is replaced
    /// (it keeps its position in delivery order). Returns `true` on replace.
    pub fn attach_keyed<F>(&self, key: K, handler: F) -> bool
    where
        F: Fn(&mut Event) -> HandlerResult + 'static,
    {
        self.attach_keyed_handler(key, Rc::new(handler))
    }

    /// Attaches an already shared handler under `key`.
    pub fn attach_keyed_handler(&self, key: K, handler: EventHandler) -> bool {
        let previous = self.slots.borrow_mut().handlers.insert(key, handler);
        previous.is_some()
    }
}

impl<A> EventListener<A>
where
    A: Hash + Eq + Clone + fmt::Debug,
{
    /// Removes the handler at `addr`.
    ///
    /// Returns `false` (and does nothing) if there is none.
    pub fn detach(&self, addr: &A) -> bool {
        let removed = self.slots.borrow_mut().handlers.shift_remove(addr);
        removed.is_some()
    }

    /// Removes every handler and resets the token counter.
    pub fn clear(&self) {
        let drained = {
            let mut slots = self.slots.borrow_mut();
            slots.last_token = 0;
            std::mem::take(&mut slots.handlers)
        };
        drop(drained);
    }

    /// True if no handler is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().handlers.is_empty()
    }

    /// Number of attached handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().handlers.len()
    }

    /// True if a handler is attached at `addr`.
    #[must_use]
    pub fn contains(&self, addr: &A) -> bool {
        self.slots.borrow().handlers.contains_key(addr)
    }

    /// Handler addresses in delivery order.
    #[must_use]
    pub fn addresses(&self) -> Vec<A> {
        self.slots.borrow().handlers.keys().cloned().collect()
    }

    /// Delivers `event` to the handlers in order.
    ///
    /// Stops as soon as the event is handled. An event that is already
    /// handled when the pass starts reaches nobody.
    ///
    /// # Errors
    /// [`DispatchError::Handler`] if a handler fails; the handlers after it
    /// are not invoked.
    pub fn notify(&self, event: &mut Event) -> Result<Delivery, DispatchError> {
        let snapshot = self.snapshot();
        let mut delivery = Delivery::default();

        for (addr, handler) in snapshot {
            if event.is_handled() {
                break;
            }
            if !self.is_attached(&addr, &handler) {
                continue;
            }
            if let Err(source) = (*handler)(event) {
                warn!(
                    event_type = %event.event_type(),
                    handler = ?addr,
                    invoked = delivery.invoked,
                    error = %source,
                    "handler failed; pass aborted"
                );
                return Err(DispatchError::Handler {
                    event_type: event.event_type(),
                    invoked: delivery.invoked,
                    source,
                });
            }
            delivery.invoked += 1;
        }

        delivery.handled = event.is_handled();
        trace!(
            event_type = %event.event_type(),
            invoked = delivery.invoked,
            handled = delivery.handled,
            "event delivered"
        );
        Ok(delivery)
    }

    /// Builds an event from `event_type` and `data` and delivers it.
    ///
    /// # Errors
    /// See [`EventListener::notify`].
    pub fn notify_with(
        &self,
        event_type: EventType,
        data: Option<Payload>,
    ) -> Result<Delivery, DispatchError> {
        let mut event = Event::from_parts(event_type, data);
        self.notify(&mut event)
    }

    fn snapshot(&self) -> Vec<(A, EventHandler)> {
        self.slots
            .borrow()
            .handlers
            .iter()
            .map(|(addr, handler)| (addr.clone(), Rc::clone(handler)))
            .collect()
    }

    fn is_attached(&self, addr: &A, handler: &EventHandler) -> bool {
        self.slots
            .borrow()
            .handlers
            .get(addr)
            .is_some_and(|current| Rc::ptr_eq(current, handler))
    }
}

impl<A: fmt::Debug> fmt::Debug for EventListener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("EventListener")
            .field("handlers", &slots.handlers.keys().collect::<Vec<_>>())
            .field("last_token", &slots.last_token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::routing::Key;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    const PING: EventType = EventType::new(1);

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
    ) -> impl Fn(&mut Event) -> HandlerResult + 'static {
        let log = Rc::clone(log);
        move |_ev: &mut Event| {
            log.borrow_mut().push(name);
            Ok(())
        }
    }

    #[test]
    fn test_tokens_are_monotonic_and_start_at_one() {
        let listener = EventListener::new();
        let a = listener.attach(|_| Ok(()));
        let b = listener.attach(|_| Ok(()));
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);

        listener.detach(&b);
        let c = listener.attach(|_| Ok(()));
        assert_eq!(c.get(), 3, "tokens are never reused after detach");
    }

    #[test]
    fn test_attach_then_detach_leaves_listener_empty() {
        let listener = EventListener::new();
        let token = listener.attach(|_| Ok(()));
        assert!(!listener.is_empty());
        assert!(listener.detach(&token));
        assert!(listener.is_empty());
        assert!(!listener.detach(&token), "second detach is a no-op");
    }

    #[test]
    fn test_notify_without_handlers_is_a_noop() {
        let listener = EventListener::new();
        let delivery = listener.notify_with(PING, None).unwrap();
        assert_eq!(delivery, Delivery::default());
        assert!(!delivery.is_delivered());
    }

    #[test]
    fn test_delivery_follows_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = EventListener::new();
        listener.attach(recorder(&log, "a"));
        listener.attach(recorder(&log, "b"));
        listener.attach(recorder(&log, "c"));

        let delivery = listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(delivery.invoked, 3);
        assert!(!delivery.handled);
    }

    #[test]
    fn test_handled_stops_the_pass() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = EventListener::new();
        listener.attach(recorder(&log, "a"));
        let stopper = Rc::clone(&log);
        listener.attach(move |ev: &mut Event| {
            stopper.borrow_mut().push("b");
            ev.mark_handled();
            Ok(())
        });
        listener.attach(recorder(&log, "c"));

        let delivery = listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(delivery, Delivery { invoked: 2, handled: true });
    }

    #[test]
    fn test_already_handled_event_reaches_nobody() {
        let hits = Rc::new(Cell::new(0));
        let listener = EventListener::new();
        let h = Rc::clone(&hits);
        listener.attach(move |_| {
            h.set(h.get() + 1);
            Ok(())
        });

        let mut event = Event::new(PING);
        event.mark_handled();
        let delivery = listener.notify(&mut event).unwrap();
        assert_eq!(hits.get(), 0);
        assert!(delivery.handled);
    }

    #[test]
    fn test_handler_error_aborts_and_propagates() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = EventListener::new();
        listener.attach(recorder(&log, "a"));
        listener.attach(|_| Err(HandlerError::fail("boom")));
        listener.attach(recorder(&log, "c"));

        let err = listener.notify_with(PING, None).unwrap_err();
        assert_eq!(*log.borrow(), vec!["a"]);
        match err {
            DispatchError::Handler {
                event_type,
                invoked,
                source,
            } => {
                assert_eq!(event_type, PING);
                assert_eq!(invoked, 1);
                assert_eq!(source, HandlerError::fail("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_payload_reaches_every_handler() {
        let sum = Rc::new(Cell::new(0));
        let listener = EventListener::new();
        for _ in 0..2 {
            let sum = Rc::clone(&sum);
            listener.attach(move |ev: &mut Event| {
                let value = ev.require_data::<i32>()?;
                sum.set(sum.get() + *value);
                Ok(())
            });
        }
        listener.notify_with(PING, Some(Arc::new(21_i32))).unwrap();
        assert_eq!(sum.get(), 42);
    }

    #[test]
    fn test_clear_resets_tokens() {
        let listener = EventListener::new();
        listener.attach(|_| Ok(()));
        listener.attach(|_| Ok(()));
        listener.clear();
        assert!(listener.is_empty());
        assert_eq!(listener.attach(|_| Ok(())).get(), 1);
    }

    #[test]
    fn test_keyed_attach_replaces_in_place() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = EventListener::<Key>::keyed();
        let first = Key::new(1);
        let second = Key::new(2);

        assert!(!listener.attach_keyed(first, recorder(&log, "first-old")));
        assert!(!listener.attach_keyed(second, recorder(&log, "second")));
        assert!(listener.attach_keyed(first, recorder(&log, "first-new")));
        assert_eq!(listener.len(), 2);

        listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["first-new", "second"]);
        assert_eq!(listener.addresses(), vec![first, second]);
    }

    #[test]
    fn test_keyed_detach_unknown_is_noop() {
        let listener = EventListener::<Key>::keyed();
        listener.attach_keyed(Key::new(1), |_| Ok(()));
        assert!(!listener.detach(&Key::new(2)));
        assert!(listener.contains(&Key::new(1)));
    }

    #[test]
    fn test_detach_during_pass_skips_later_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = Rc::new(EventListener::new());
        let victim = Rc::new(Cell::new(None));

        let l = Rc::clone(&listener);
        let v = Rc::clone(&victim);
        let lg = Rc::clone(&log);
        listener.attach(move |_| {
            lg.borrow_mut().push("killer");
            if let Some(token) = v.get() {
                l.detach(&token);
            }
            Ok(())
        });
        victim.set(Some(listener.attach(recorder(&log, "victim"))));

        let delivery = listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["killer"]);
        assert_eq!(delivery.invoked, 1);
        assert_eq!(listener.len(), 1);
    }

    #[test]
    fn test_attach_during_pass_runs_next_time() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = Rc::new(EventListener::new());
        let armed = Rc::new(Cell::new(true));

        let l = Rc::clone(&listener);
        let lg = Rc::clone(&log);
        let a = Rc::clone(&armed);
        listener.attach(move |_| {
            lg.borrow_mut().push("spawner");
            if a.replace(false) {
                l.attach(recorder(&lg, "late"));
            }
            Ok(())
        });

        listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["spawner"]);

        listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["spawner", "spawner", "late"]);
    }

    #[test]
    fn test_nested_notify_from_handler() {
        let depth = Rc::new(Cell::new(0));
        let listener = Rc::new(EventListener::new());

        let l = Rc::clone(&listener);
        let d = Rc::clone(&depth);
        listener.attach(move |_| {
            d.set(d.get() + 1);
            if d.get() < 3 {
                l.notify_with(PING, None)
                    .map_err(|err| HandlerError::fail(err.as_message()))?;
            }
            Ok(())
        });

        listener.notify_with(PING, None).unwrap();
        assert_eq!(depth.get(), 3);
    }

    #[test]
    fn test_clear_during_pass_stops_remaining_handlers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = Rc::new(EventListener::new());

        let l = Rc::clone(&listener);
        let lg = Rc::clone(&log);
        listener.attach(move |_| {
            lg.borrow_mut().push("clearer");
            l.clear();
            Ok(())
        });
        listener.attach(recorder(&log, "after"));

        listener.notify_with(PING, None).unwrap();
        assert_eq!(*log.borrow(), vec!["clearer"]);
        assert!(listener.is_empty());
    }
}
