//! Routing: identities and the dispatcher that maps them to listeners.
//!
//! ## Contents
//! - [`RoutingId`] ordered key of a dispatcher slot (implemented by
//!   [`EventType`](crate::EventType) and [`EventId`])
//! - [`TargetId`], [`Key`] comparable, non-owning subscriber handles
//! - [`EventDispatcher`] routing table `RoutingId → EventListener`
//!
//! ## Addressing variants
//! | Variant                | Dispatcher                       | Handler address |
//! |------------------------|----------------------------------|-----------------|
//! | target + type          | `EventDispatcher<EventId>`       | [`Token`](crate::Token) |
//! | type only, keyed       | `EventDispatcher<EventType, Key>`| [`Key`]         |
//! | target-local listener  | none (`EventListener` on the subscriber) | token or key |

mod dispatcher;
mod id;

pub use dispatcher::EventDispatcher;
pub use id::{EventId, Key, RoutingId, TargetId};
