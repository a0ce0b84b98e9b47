//! External collaborators: best-effort sinks that never block a request.

pub mod drive_log;

pub use drive_log::{DriveLogger, SinkLevel};
