//! # evdispatch
//!
//! **evdispatch** is a small, synchronous, in-process event dispatch core.
//!
//! Producers raise typed [`Event`]s; subscribers register handlers and get
//! called back, in registration order, on the producer's own call stack. Any
//! handler may mark the event handled, which stops the rest of the pass.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   subscriber A        subscriber B           subscriber C
//!        │                   │                 (owns its own
//!        │ register          │ register         EventListener)
//!        ▼                   ▼                      │
//! ┌──────────────────────────────────────┐          │
//! │ EventHandlerRegistry / KeyedHandler- │          │
//! │ Registry (who subscribed to what)    │          │
//! └──────────────────┬───────────────────┘          │
//!                    ▼                              │
//! ┌──────────────────────────────────────┐          │
//! │ EventDispatcher<R, A>                │          │
//! │   R = EventId (type + target)        │          │
//! │     | EventType                      │          │
//! │   BTreeMap<R, Rc<EventListener<A>>>  │          │
//! └──────────────────┬───────────────────┘          │
//!                    ▼                              ▼
//!          ┌───────────────────┐          ┌───────────────────┐
//!          │ EventListener<A>  │          │ EventListener<A>  │
//!          │ handler #1 ─► #2  │          │ handler #1 ─► #2  │
//!          └───────────────────┘          └───────────────────┘
//!                    ▲                              ▲
//!                    │ notify(id, data)             │ notify(&mut Event)
//!               producer                       producer
//! ```
//!
//! ### Notification pass
//! ```text
//! notify(id, data)
//!   ├─► depth check (DispatcherConfig::max_depth) ─► DepthExceeded
//!   ├─► no listener for id ─► Ok(Delivery { invoked: 0, handled: event.is_handled() })
//!   └─► listener.notify(&mut Event)
//!         ├─ snapshot handlers
//!         └─ for each handler still attached:
//!              ├─ event handled?  ─► stop
//!              ├─ handler(&mut event)
//!              │    └─ Err ─► stop, DispatchError::Handler
//!              └─ next
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / traits                              |
//! |-----------------|--------------------------------------------------------------|-------------------------------------------------|
//! | **Events**      | Event type, shared read-only payload, handled flag.          | [`Event`], [`EventType`], [`EventData`]         |
//! | **Listeners**   | Ordered fan-out to the handlers of one slot.                 | [`EventListener`], [`Token`], [`HandlerKey`]    |
//! | **Routing**     | Map routing ids to listeners; raise events.                  | [`EventDispatcher`], [`EventId`], [`TargetId`]  |
//! | **Registries**  | Per-subscriber bookkeeping; bulk unsubscribe.                | [`EventHandlerRegistry`], [`KeyedHandlerRegistry`] |
//! | **Errors**      | Typed handler and dispatch errors.                           | [`HandlerError`], [`DispatchError`]             |
//! | **Configuration** | Dispatcher name, nesting limit, unrouted tracing.          | [`DispatcherConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] handler _(demo/reference only)_.
//!
//! ## Threading
//! Everything here is single-threaded: handlers are `Rc` closures and the
//! dispatch types are `!Send`. Payloads are `Send + Sync` so they can be
//! produced elsewhere and handed in.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use evdispatch::{Event, EventDispatcher, EventHandlerRegistry, EventId, EventType, TargetId};
//!
//! #[derive(Debug)]
//! struct Moved { dx: i32 }
//!
//! const MOVED: EventType = EventType::new(1);
//!
//! let dispatcher = Rc::new(EventDispatcher::new());
//! let registry = EventHandlerRegistry::new(Rc::clone(&dispatcher));
//! let window = TargetId::next();
//!
//! registry.register_event_handler(window, MOVED, |ev: &mut Event| {
//!     let moved = ev.require_data::<Moved>()?;
//!     println!("window moved by {}", moved.dx);
//!     ev.mark_handled();
//!     Ok(())
//! });
//!
//! let delivery = dispatcher.notify(EventId::new(MOVED, window), Some(Arc::new(Moved { dx: 4 })))?;
//! assert!(delivery.handled);
//!
//! registry.unregister_event_handler(window);
//! assert!(dispatcher.is_empty());
//! # Ok::<(), evdispatch::DispatchError>(())
//! ```
mod config;
mod error;
mod events;
mod listeners;
mod registry;
mod routing;

// ---- Public re-exports ----

pub use config::DispatcherConfig;
pub use error::{DispatchError, HandlerError};
pub use events::{Event, EventData, EventType, Payload};
pub use listeners::{Delivery, EventHandler, EventListener, HandlerKey, HandlerResult, Token};
pub use registry::{EventHandlerRegistry, KeyedHandlerRegistry};
pub use routing::{EventDispatcher, EventId, Key, RoutingId, TargetId};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
