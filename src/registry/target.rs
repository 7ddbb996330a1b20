//! # Target + type registry.
//!
//! [`EventHandlerRegistry`] subscribes handlers to `(EventType, TargetId)`
//! slots of an [`EventDispatcher<EventId>`] and remembers which tokens belong
//! to which target.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::events::{Event, EventType};
use crate::listeners::{EventHandler, HandlerResult, Token};
use crate::routing::{EventDispatcher, EventId, TargetId};

/// Bookkeeping of token subscriptions per target.
pub struct EventHandlerRegistry {
    dispatcher: Rc<EventDispatcher<EventId>>,
    subscriptions: RefCell<Vec<(EventId, Token)>>,
}

impl EventHandlerRegistry {
    /// Creates a registry that subscribes through `dispatcher`.
    pub fn new(dispatcher: Rc<EventDispatcher<EventId>>) -> Self {
        Self {
            dispatcher,
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Returns the dispatcher events are raised on.
    #[inline]
    pub fn dispatcher(&self) -> &Rc<EventDispatcher<EventId>> {
        &self.dispatcher
    }

    /// Subscribes `handler` to `event_type` raised at `target`.
    ///
    /// Creates the listener for the slot on first use. Returns the token of the
    /// new subscription.
    pub fn register_event_handler<F>(
        &self,
        target: TargetId,
        event_type: EventType,
        handler: F,
    ) -> Token
    where
        F: Fn(&mut Event) -> HandlerResult + 'static,
    {
        self.register_handler(target, event_type, Rc::new(handler))
    }

    /// Subscribes an already shared handler. See [`Self::register_event_handler`].
    pub fn register_handler(
        &self,
        target: TargetId,
        event_type: EventType,
        handler: EventHandler,
    ) -> Token {
        let id = EventId::new(event_type, target);
        let token = self.dispatcher.listener_or_insert(id).attach_handler(handler);
        self.subscriptions.borrow_mut().push((id, token));
        trace!(
            target_id = %target,
            event_type = %event_type,
            token = %token,
            "handler registered"
        );
        token
    }

    /// Removes every subscription of `target`.
    ///
    /// Listeners left without handlers are unregistered from the dispatcher.
    /// Returns the number of subscriptions removed; unknown targets are a no-op.
    pub fn unregister_event_handler(&self, target: TargetId) -> usize {
        let taken = self.take_where(|id, _| id.target() == target);
        for (id, token) in &taken {
            self.detach(id, *token);
        }
        debug!(target_id = %target, removed = taken.len(), "target unregistered");
        taken.len()
    }

    /// Removes one subscription.
    ///
    /// Returns `false` if this registry does not know `(id, token)`.
    pub fn unregister_subscription(&self, id: &EventId, token: Token) -> bool {
        let taken = self.take_where(|i, t| i == id && t == token);
        for (taken_id, taken_token) in &taken {
            self.detach(taken_id, *taken_token);
        }
        !taken.is_empty()
    }

    /// Subscriptions of `target`, in registration order.
    #[must_use]
    pub fn subscriptions_of(&self, target: TargetId) -> Vec<(EventId, Token)> {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|(id, _)| id.target() == target)
            .copied()
            .collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// True if nothing is subscribed through this registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.borrow().is_empty()
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Moves the matching entries out of the index in one step.
    fn take_where(&self, pred: impl Fn(&EventId, Token) -> bool) -> Vec<(EventId, Token)> {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *subscriptions)
            .into_iter()
            .partition(|(id, token)| pred(id, *token));
        *subscriptions = kept;
        taken
    }

    /// Detaches `token` and unregisters the listener once it is empty.
    fn detach(&self, id: &EventId, token: Token) -> bool {
        let Some(listener) = self.dispatcher.get_event_listener(id) else {
            return false;
        };
        let removed = listener.detach(&token);
        if listener.is_empty() {
            self.dispatcher.unregister_event_listener(id);
        }
        removed
    }
}

impl std::fmt::Debug for EventHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandlerRegistry")
            .field("dispatcher", &self.dispatcher)
            .field("subscriptions", &self.subscriptions.borrow())
            .finish()
    }
}
