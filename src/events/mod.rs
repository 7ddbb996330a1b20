//! Events: the notification envelope and its payload.
//!
//! This module groups the event **data model** passed to every handler.
//!
//! ## Contents
//! - [`EventType`] category discriminator chosen by producers
//! - [`EventData`], [`Payload`] opaque, shared, read-only payload
//! - [`Event`] one notification: type + optional payload + handled flag
//!
//! ## Quick reference
//! - **Producers** build an [`Event`] (or let `notify`/`notify_with` build one).
//! - **Handlers** receive `&mut Event`, read the payload with
//!   [`Event::data_as`] and may stop the pass with [`Event::mark_handled`].

mod data;
mod event;

pub use data::{EventData, Payload};
pub use event::{Event, EventType};
