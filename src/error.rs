//! Error types used by handlers and by the dispatch core.
//!
//! This module defines two main error enums:
//!
//! - [`DispatchError`]: errors raised while delivering a notification.
//! - [`HandlerError`]: errors raised by individual handlers.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//!
//! Not-found conditions (notifying a routing id nobody listens to, detaching an
//! unknown token or key) are **not** errors: they are silent no-ops.

use thiserror::Error;

use crate::events::EventType;

/// # Errors produced by a notification pass.
///
/// A pass stops at the first failing handler; handlers not yet reached in that
/// pass are not invoked. Whether to retry, continue or abort is up to the host.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler returned an error; delivery to the remaining handlers was aborted.
    #[error("handler failed for event type {event_type} after {invoked} handler(s): {source}")]
    Handler {
        /// Type of the event being delivered.
        event_type: EventType,
        /// Number of handlers that completed before the failing one.
        invoked: usize,
        /// The error returned by the handler.
        #[source]
        source: HandlerError,
    },

    /// Re-entrant notifications nested deeper than the dispatcher allows.
    #[error("notification depth limit {limit} exceeded")]
    DepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use evdispatch::DispatchError;
    ///
    /// let err = DispatchError::DepthExceeded { limit: 8 };
    /// assert_eq!(err.as_label(), "dispatch_depth_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Handler { .. } => "dispatch_handler_failed",
            DispatchError::DepthExceeded { .. } => "dispatch_depth_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Handler {
                event_type,
                invoked,
                source,
            } => format!(
                "event_type={event_type} invoked={invoked} cause={}",
                source.as_message()
            ),
            DispatchError::DepthExceeded { limit } => format!("depth limit {limit} exceeded"),
        }
    }

    /// Returns the handler error if this failure came from a handler.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            DispatchError::Handler { source, .. } => Some(source),
            DispatchError::DepthExceeded { .. } => None,
        }
    }
}

/// # Errors produced by handlers.
///
/// Handlers are fallible closures; returning one of these aborts the pass and
/// surfaces as [`DispatchError::Handler`] to whoever raised the event.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler needed a payload but the event carried none.
    #[error("missing payload (expected {expected})")]
    MissingPayload {
        /// Type name of the expected payload.
        expected: &'static str,
    },

    /// The event carried a payload of another concrete type.
    #[error("payload type mismatch (expected {expected})")]
    PayloadMismatch {
        /// Type name of the expected payload.
        expected: &'static str,
    },

    /// Handler-specific failure.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl HandlerError {
    /// Builds a [`HandlerError::Fail`] from anything displayable.
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use evdispatch::HandlerError;
    ///
    /// let err = HandlerError::fail("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::MissingPayload { .. } => "handler_missing_payload",
            HandlerError::PayloadMismatch { .. } => "handler_payload_mismatch",
            HandlerError::Fail { .. } => "handler_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::MissingPayload { expected } => format!("missing payload: {expected}"),
            HandlerError::PayloadMismatch { expected } => format!("payload mismatch: {expected}"),
            HandlerError::Fail { error } => format!("error: {error}"),
        }
    }

    /// Indicates whether the failure is about the payload shape rather than
    /// the handler's own logic.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            HandlerError::MissingPayload { .. } | HandlerError::PayloadMismatch { .. }
        )
    }
}
