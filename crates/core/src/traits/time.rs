//! Time abstraction for the cooperative timer queue.
//!
//! All scheduling in the arbiter is expressed in milliseconds since an
//! arbitrary monotonic origin. The host crate provides a system clock and a
//! shared mock clock that tests advance by hand.

/// Monotonic millisecond clock.
///
/// Implementations must never go backwards. Clones must observe the same
/// clock, so a test can keep one handle and advance it while the arbiter
/// holds another.
///
/// # Example
///
/// ```
/// use torchlight_core::traits::TimeSource;
///
/// #[derive(Clone)]
/// struct Fixed(u64);
///
/// impl TimeSource for Fixed {
///     fn now_ms(&self) -> u64 {
///         self.0
///     }
/// }
///
/// let clock = Fixed(1_500);
/// assert_eq!(clock.elapsed_since(1_000), 500);
/// assert_eq!(clock.elapsed_since(2_000), 0);
/// ```
pub trait TimeSource: Clone {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `reference_ms`, saturating at zero.
    fn elapsed_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}
