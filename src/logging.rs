//! Structured logging helpers for mock declaration, resolution and verification.
//!
//! Events go through the `tracing` crate. Tests that want to see them call
//! [`init_test_logging`] once.

use crate::registration::RegistrationKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable switching test logging to JSON lines.
pub const LOG_JSON_ENV_VAR: &str = "PARROT_LOG_JSON";

/// Install a subscriber writing through the test harness. Safe to call from
/// every test; only the first call installs anything.
pub fn init_test_logging() {
    let fallback_filter = "parrot=info";
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    let result = if std::env::var_os(LOG_JSON_ENV_VAR).is_some() {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_test_writer()
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };
    if result.is_err() {
        tracing::trace!("Test logging already initialised");
    }
}

/// Log a new stub or expectation.
pub fn log_registration(mock: &str, kind: RegistrationKind, pattern: &str) {
    tracing::debug!(mock, kind = ?kind, pattern, "Registration declared");
}

/// Log a call entering the resolution engine.
pub fn log_call_recorded(mock: &str, operation: &str, sequence: usize, arity: usize) {
    tracing::debug!(mock, operation, sequence, arity, "Call recorded");
}

/// Log a call resolved by at least one stub.
pub fn log_stub_resolved(mock: &str, operation: &str, stubs: usize, returns: bool) {
    tracing::debug!(mock, operation, stubs, returns, "Call resolved by stub");
}

/// Log a call that matched no stub.
pub fn log_unstubbed_call(mock: &str, call: &str, warn: bool) {
    if warn {
        tracing::warn!(mock, call, "No stub matched call");
    } else {
        tracing::debug!(mock, call, "No stub matched call");
    }
}

/// Log one argument recorded by a captor.
pub fn log_capture(captor: &str, null: bool) {
    tracing::trace!(captor, null, "Argument captured");
}

/// Log the outcome of a verification pass.
pub fn log_verification(mock: &str, expectations: usize, failures: usize) {
    if failures == 0 {
        tracing::debug!(mock, expectations, "Expectations verified");
    } else {
        tracing::info!(mock, expectations, failures, "Unmet expectations");
    }
}
