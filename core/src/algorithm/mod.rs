//! flowtrace algorithm framework
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;
pub mod state;
pub mod traits;

pub use self::graph::*;
pub use self::state::{EdgeSnapshot, Step, StepKind};
pub use self::traits::*;
