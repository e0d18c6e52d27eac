//! Trace engine configuration

use serde::{Deserialize, Serialize};

/// Settings for one max-flow trace run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Render node labels instead of ids in step descriptions
    pub describe_with_labels: bool,

    /// Verify capacity, conservation and min-cut invariants on the finished
    /// trace and fail the run on any violation. Off unless requested.
    pub verify_invariants: bool,
}

impl TraceConfig {
    /// Parses a configuration from JSON; missing keys take their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_labels(mut self, enabled: bool) -> Self {
        self.describe_with_labels = enabled;
        self
    }

    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }
}
