//! # Type-only registry with keyed handlers.
//!
//! [`KeyedHandlerRegistry`] subscribes handlers to per-type listeners of an
//! [`EventDispatcher<EventType, K>`], addressing each handler by a caller key.
//! The key is the owner link, so there is no index to maintain: bulk removal
//! scans the dispatcher.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::events::{Event, EventType};
use crate::listeners::{EventHandler, HandlerKey, HandlerResult};
use crate::routing::{EventDispatcher, Key};

/// Keyed subscriptions routed by event type.
pub struct KeyedHandlerRegistry<K = Key> {
    dispatcher: Rc<EventDispatcher<EventType, K>>,
}

impl<K: HandlerKey> KeyedHandlerRegistry<K> {
    /// Creates a registry that subscribes through `dispatcher`.
    pub fn new(dispatcher: Rc<EventDispatcher<EventType, K>>) -> Self {
        Self { dispatcher }
    }

    /// Returns the dispatcher events are raised on.
    #[inline]
    pub fn dispatcher(&self) -> &Rc<EventDispatcher<EventType, K>> {
        &self.dispatcher
    }

    /// Subscribes `handler` under `key` to `event_type`.
    ///
    /// Re-registering the same key for the same type replaces the previous
    /// handler. Returns `true` on replace.
    pub fn register_event_handler<F>(&self, key: K, event_type: EventType, handler: F) -> bool
    where
        F: Fn(&mut Event) -> HandlerResult + 'static,
    {
        self.register_handler(key, event_type, Rc::new(handler))
    }

    /// Subscribes an already shared handler. See [`Self::register_event_handler`].
    pub fn register_handler(&self, key: K, event_type: EventType, handler: EventHandler) -> bool {
        trace!(key = ?key, event_type = %event_type, "keyed handler registered");
        self.dispatcher
            .listener_or_insert(event_type)
            .attach_keyed_handler(key, handler)
    }

    /// Removes every handler registered under `key`, for all event types.
    ///
    /// Returns the number of handlers removed.
    pub fn unregister_event_handler(&self, key: &K) -> usize {
        let removed = self.dispatcher.unregister_event_handler(key);
        debug!(key = ?key, removed, "key unregistered");
        removed
    }

    /// Removes the handler of `key` for one event type.
    ///
    /// Returns `false` if there was none.
    pub fn unregister_subscription(&self, key: &K, event_type: EventType) -> bool {
        let Some(listener) = self.dispatcher.get_event_listener(&event_type) else {
            return false;
        };
        let removed = listener.detach(key);
        if listener.is_empty() {
            self.dispatcher.unregister_event_listener(&event_type);
        }
        removed
    }

    /// Event types `key` is subscribed to, in order.
    #[must_use]
    pub fn event_types_of(&self, key: &K) -> Vec<EventType> {
        self.dispatcher
            .routing_ids()
            .into_iter()
            .filter(|event_type| {
                self.dispatcher
                    .get_event_listener(event_type)
                    .is_some_and(|listener| listener.contains(key))
            })
            .collect()
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for KeyedHandlerRegistry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedHandlerRegistry")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    const TYPE_A: EventType = EventType::new(1);
    const TYPE_B: EventType = EventType::new(2);
    const TYPE_C: EventType = EventType::new(3);

    fn setup() -> (Rc<EventDispatcher<EventType, Key>>, KeyedHandlerRegistry) {
        let dispatcher = Rc::new(EventDispatcher::keyed());
        let registry = KeyedHandlerRegistry::new(Rc::clone(&dispatcher));
        (dispatcher, registry)
    }

    fn record(
        log: &Rc<RefCell<Vec<String>>>,
        name: &'static str,
    ) -> impl Fn(&mut Event) -> HandlerResult + 'static {
        let log = Rc::clone(log);
        move |ev: &mut Event| {
            let value = ev.data_as::<i32>().copied();
            log.borrow_mut()
                .push(format!("{name}:{}:{value:?}", ev.event_type()));
            Ok(())
        }
    }

    #[test]
    fn test_type_fans_out_to_every_key() {
        let (dispatcher, registry) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        assert!(!registry.register_event_handler(Key::new(1), TYPE_A, record(&log, "k1")));
        assert!(!registry.register_event_handler(Key::new(2), TYPE_A, record(&log, "k2")));
        registry.register_event_handler(Key::new(1), TYPE_B, record(&log, "k1"));

        let delivery = dispatcher.notify(TYPE_A, Some(Arc::new(3_i32))).unwrap();
        assert_eq!(delivery.invoked, 2);
        assert_eq!(*log.borrow(), vec!["k1:1:Some(3)", "k2:1:Some(3)"]);
    }

    #[test]
    fn test_same_key_replaces_handler() {
        let (dispatcher, registry) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let key = Key::new(7);

        registry.register_event_handler(key, TYPE_A, record(&log, "old"));
        registry.register_event_handler(Key::new(8), TYPE_A, record(&log, "other"));
        assert!(registry.register_event_handler(key, TYPE_A, record(&log, "new")));

        dispatcher.notify(TYPE_A, None).unwrap();
        assert_eq!(*log.borrow(), vec!["new:1:None", "other:1:None"]);
    }

    #[test]
    fn test_unregister_key_removes_all_types() {
        let (dispatcher, registry) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let gone = Key::new(1);
        let kept = Key::new(2);

        registry.register_event_handler(gone, TYPE_A, record(&log, "gone"));
        registry.register_event_handler(gone, TYPE_B, record(&log, "gone"));
        registry.register_event_handler(kept, TYPE_B, record(&log, "kept"));
        assert_eq!(registry.event_types_of(&gone), vec![TYPE_A, TYPE_B]);

        assert_eq!(registry.unregister_event_handler(&gone), 2);
        assert!(registry.event_types_of(&gone).is_empty());
        assert!(!dispatcher.has_listener(&TYPE_A));
        assert!(dispatcher.has_listener(&TYPE_B));

        dispatcher.notify(TYPE_A, None).unwrap();
        dispatcher.notify(TYPE_B, None).unwrap();
        assert_eq!(*log.borrow(), vec!["kept:2:None"]);
    }

    #[test]
    fn test_unregister_unknown_key_is_noop() {
        let (dispatcher, registry) = setup();
        registry.register_event_handler(Key::new(1), TYPE_A, |_| Ok(()));
        assert_eq!(registry.unregister_event_handler(&Key::new(42)), 0);
        assert!(!registry.unregister_subscription(&Key::new(1), TYPE_C));
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn test_unregister_single_subscription() {
        let (dispatcher, registry) = setup();
        let key = Key::new(1);
        registry.register_event_handler(key, TYPE_A, |_| Ok(()));
        registry.register_event_handler(key, TYPE_B, |_| Ok(()));

        assert!(registry.unregister_subscription(&key, TYPE_A));
        assert!(!registry.unregister_subscription(&key, TYPE_A));
        assert_eq!(dispatcher.routing_ids(), vec![TYPE_B]);
    }

    #[test]
    fn test_key_of_object_address() {
        let (dispatcher, registry) = setup();
        let hits = Rc::new(Cell::new(0));
        let owner = Box::new(5_u32);
        let key = Key::of(&*owner);

        let h = Rc::clone(&hits);
        registry.register_event_handler(key, TYPE_C, move |_ev: &mut Event| {
            h.set(h.get() + 1);
            Ok(())
        });
        dispatcher.notify(TYPE_C, None).unwrap();
        assert_eq!(registry.unregister_event_handler(&Key::of(&*owner)), 1);
        dispatcher.notify(TYPE_C, None).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_handler_error_names_event_type() {
        let (dispatcher, registry) = setup();
        registry.register_event_handler(Key::new(1), TYPE_B, |_| {
            Err(HandlerError::fail("boom"))
        });
        let err = dispatcher.notify(TYPE_B, None).unwrap_err();
        assert_eq!(err.as_label(), "dispatch_handler_failed");
        assert_eq!(err.handler_error(), Some(&HandlerError::fail("boom")));
    }

    #[test]
    fn test_handled_event_skips_remaining_keys() {
        let (dispatcher, registry) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        registry.register_event_handler(Key::new(1), TYPE_A, record(&log, "k1"));
        let l = Rc::clone(&log);
        registry.register_event_handler(Key::new(2), TYPE_A, move |ev: &mut Event| {
            l.borrow_mut().push("k2".to_string());
            ev.mark_handled();
            Ok(())
        });
        registry.register_event_handler(Key::new(3), TYPE_A, record(&log, "k3"));

        let delivery = dispatcher.notify(TYPE_A, None).unwrap();
        assert!(delivery.handled);
        assert_eq!(delivery.invoked, 2);
        assert_eq!(*log.borrow(), vec!["k1:1:None", "k2"]);
    }
}
