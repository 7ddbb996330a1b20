//! # Handler registries: subscription bookkeeping above a dispatcher.
//!
//! A registry lets a subscriber tear down **all** of its interests with one
//! identity-keyed call, without remembering individual tokens.
//!
//! ## Architecture
//! ```text
//! register_event_handler(target, type, handler)
//!     ├─► dispatcher.listener_or_insert(EventId(type, target))   (lazy listener)
//!     ├─► listener.attach(handler) ──► Token
//!     └─► index.push((EventId, Token))
//!
//! unregister_event_handler(target)
//!     ├─► take every (EventId, Token) of target out of the index
//!     ├─► listener.detach(token)
//!     └─► listener empty? ──► dispatcher.unregister_event_listener(EventId)
//! ```
//!
//! ## Rules
//! - Registries own no handler logic, only bookkeeping.
//! - A listener stays installed exactly as long as it has a handler, so
//!   `dispatcher.has_listener(id)` means "someone is subscribed to `id`".
//! - In the keyed scheme the key already links a handler to its owner, so
//!   [`KeyedHandlerRegistry`] keeps no index and delegates bulk removal to the
//!   dispatcher.

mod keyed;
mod target;

pub use keyed::KeyedHandlerRegistry;
pub use target::EventHandlerRegistry;
