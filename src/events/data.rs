//! # Opaque event payloads.
//!
//! Any `'static + Send + Sync + Debug` value is an [`EventData`]; producers
//! wrap it in a [`Payload`] (`Arc<dyn EventData>`) that is shared, read-only,
//! between the producer and every handler of one notification. Handlers
//! recover the concrete type with a checked downcast that yields `None` on
//! mismatch (see [`Event::data_as`](crate::Event::data_as)).
//!
//! ## Rules
//! - Casts always look at the value inside the payload, never at the `Arc`:
//!   `payload.downcast_ref::<T>()` and `payload.type_name()` resolve to the
//!   inherent methods of `dyn EventData`.
//! - The type-erasure hooks live in a sealed trait, so they cannot be called
//!   on a `Payload` by accident.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an event payload.
pub type Payload = Arc<dyn EventData>;

mod sealed {
    use std::any::Any;
    use std::sync::Arc;

    /// Type-erasure hooks behind [`super::EventData`].
    pub trait Erased {
        fn erased_ref(&self) -> &dyn Any;
        fn erased_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
        fn erased_type_name(&self) -> &'static str;
    }

    impl<T> Erased for T
    where
        T: Any + Send + Sync,
    {
        #[inline]
        fn erased_ref(&self) -> &dyn Any {
            self
        }

        #[inline]
        fn erased_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }

        #[inline]
        fn erased_type_name(&self) -> &'static str {
            std::any::type_name::<T>()
        }
    }
}

/// Opaque event payload.
///
/// Blanket-implemented; there is nothing to implement by hand.
pub trait EventData: sealed::Erased + Any + Send + Sync + fmt::Debug {}

impl<T> EventData for T where T: Any + Send + Sync + fmt::Debug {}

impl dyn EventData {
    /// True if the payload is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        sealed::Erased::erased_ref(self).is::<T>()
    }

    /// Borrows the payload as `T`, or `None` if it is of another type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        sealed::Erased::erased_ref(self).downcast_ref::<T>()
    }

    /// Converts a shared payload into a shared `T`.
    ///
    /// # Errors
    /// Returns the payload unchanged if it is of another type.
    pub fn downcast<T: Any + Send + Sync>(self: Arc<Self>) -> Result<Arc<T>, Payload> {
        sealed::Erased::erased_arc(Arc::clone(&self))
            .downcast::<T>()
            .map_err(|_| self)
    }

    /// Name of the concrete payload type (for logs).
    #[inline]
    pub fn type_name(&self) -> &'static str {
        sealed::Erased::erased_type_name(self)
    }
}
