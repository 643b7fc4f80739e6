//! Desktop-backed platform pieces
//!
//! A monotonic clock and a file-backed settings store for running the
//! arbiter outside a phone.

mod clock;
mod storage;

pub use clock::SystemClock;
pub use storage::FileStorage;
