//! General-purpose reactors.
//!
//! - [`DepthTracker`]: Tracks nesting depth, optionally enforcing a limit
//! - [`LoggingReactor`]: Logs every event it sees
//! - [`Tee`]: Forwards every event to two reactors

mod depth;
mod logging;
mod tee;

pub use depth::DepthTracker;
pub use logging::LoggingReactor;
pub use tee::Tee;
