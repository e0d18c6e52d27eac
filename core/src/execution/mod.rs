//! Recorded execution history and playback

pub mod history;

pub use self::history::{Trace, TraceCursor, TraceMetrics};
