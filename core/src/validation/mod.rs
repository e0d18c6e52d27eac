//! Trace correctness verification

pub mod correctness;

pub use self::correctness::{verify_trace, InvariantViolation, MinCut};
