//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the settings of one [`EventDispatcher`](crate::EventDispatcher).
//!
//! ## Sentinel values
//! - `max_depth = 0` → unlimited nesting of re-entrant notifications

use std::borrow::Cow;

/// Configuration for an [`EventDispatcher`](crate::EventDispatcher).
///
/// ## Field semantics
/// - `name`: label attached to every log record the dispatcher emits
/// - `max_depth`: re-entrant notification limit (`0` = unlimited)
/// - `trace_unrouted`: log notifications that found no listener
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to avoid sprinkling
/// sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Label recorded as the `dispatcher` field on log records.
    pub name: Cow<'static, str>,

    /// Maximum nesting of notifications raised from inside handlers.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = a notification at depth `n + 1` fails with
    ///   [`DispatchError::DepthExceeded`](crate::DispatchError::DepthExceeded)
    ///   before any handler runs.
    pub max_depth: usize,

    /// Emit a trace record when a notification finds no listener.
    ///
    /// Events without subscribers are a normal steady state, so this is off
    /// by default.
    pub trace_unrouted: bool,
}

impl DispatcherConfig {
    /// Creates the default configuration under a custom name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the nesting limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` nested notifications
    #[inline]
    pub fn depth_limit(&self) -> Option<usize> {
        if self.max_depth == 0 {
            None
        } else {
            Some(self.max_depth)
        }
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `name = "dispatcher"`
    /// - `max_depth = 32`
    /// - `trace_unrouted = false`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("dispatcher"),
            max_depth: 32,
            trace_unrouted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_depth_means_unlimited() {
        let cfg = DispatcherConfig {
            max_depth: 0,
            ..DispatcherConfig::default()
        };
        assert_eq!(cfg.depth_limit(), None);
        assert_eq!(DispatcherConfig::default().depth_limit(), Some(32));
    }

    #[test]
    fn test_named_keeps_defaults() {
        let cfg = DispatcherConfig::named("ui");
        assert_eq!(cfg.name, "ui");
        assert_eq!(cfg.max_depth, 32);
        assert!(!cfg.trace_unrouted);
    }
}
