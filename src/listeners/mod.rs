//! # Listeners: the handlers of one routing slot.
//!
//! This module provides [`EventListener`], the fan-out primitive shared by
//! every addressing scheme, and the handler vocabulary around it.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   producer ── notify(&mut Event) ──► EventListener
//!                                          │  (insertion order, snapshot)
//!                                          ├──► handler #1 (&mut Event)
//!                                          ├──► handler #2 (&mut Event) ── mark_handled() ──► stop
//!                                          └──x handler #3
//! ```
//!
//! ## Addressing
//! - **Token listeners** (`EventListener<Token>`): `attach` returns a fresh
//!   [`Token`]; detach with that token.
//! - **Keyed listeners** (`EventListener<K: HandlerKey>`): `attach_keyed` under a
//!   caller key; re-attaching a key replaces its handler.
//!
//! A listener can be used on its own (owned by the subscriber itself, routing
//! only by event type) or be installed in an
//! [`EventDispatcher`](crate::EventDispatcher).

mod handler;
mod listener;
#[cfg(feature = "logging")]
mod log;
#[cfg(test)]
mod proptests;

pub use handler::{EventHandler, HandlerKey, HandlerResult, Token};
pub use listener::{Delivery, EventListener};
#[cfg(feature = "logging")]
pub use log::LogWriter;
