//! Logging abstraction
//!
//! Unified `log_*!` macros used throughout the crate. They forward to the
//! [`log`] facade so the binary (or a test harness) decides where records go;
//! `torchlight_sim` installs `env_logger`.
//!
//! Every record is tagged with the `torchlight` target so host applications
//! can filter arbiter output separately from their own.

/// Log target used by the crate macros
pub const TARGET: &str = "torchlight";

/// Log info message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        ::log::info!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        ::log::warn!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        ::log::error!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        ::log::debug!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        ::log::trace!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}
