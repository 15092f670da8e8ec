//! Process-wide logging setup shared by the KindaEbay binaries.

pub mod subscriber;

pub use subscriber::{LogFormat, LogSettings};

/// Initialize tracing with settings read from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init(&LogSettings::from_env());
}
