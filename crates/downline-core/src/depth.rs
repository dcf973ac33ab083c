//! Fetch depth normalization and advisories.

use std::fmt;
use std::num::IntErrorKind;

use downline_config::TreeConfig;

/// The shallowest depth a fetch may request (the root alone).
pub const MIN_DEPTH: u32 = 1;

/// Warning raised when a requested depth is large enough to be slow.
///
/// Advisory only: the depth is still applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthAdvisory {
    pub depth: u32,
    pub threshold: u32,
}

impl fmt::Display for DepthAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {} exceeds {}; large trees may load slowly",
            self.depth, self.threshold
        )
    }
}

/// Validates user-entered depths and knows the session defaults.
#[derive(Debug, Clone)]
pub struct DepthController {
    default_depth: u32,
    advisory_threshold: u32,
}

impl DepthController {
    pub fn new(default_depth: u32, advisory_threshold: u32) -> Self {
        Self {
            default_depth: default_depth.max(MIN_DEPTH),
            advisory_threshold,
        }
    }

    pub fn from_config(config: &TreeConfig) -> Self {
        Self::new(config.default_depth, config.advisory_depth_threshold)
    }

    /// Parse raw user input as a depth.
    ///
    /// Unparseable input and anything below 1 become 1; there is no upper
    /// clamp beyond `u32::MAX`.
    pub fn normalize(raw: &str) -> u32 {
        match raw.trim().parse::<i64>() {
            Ok(n) if n < i64::from(MIN_DEPTH) => MIN_DEPTH,
            Ok(n) => u32::try_from(n).unwrap_or(u32::MAX),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
            Err(_) => MIN_DEPTH,
        }
    }

    pub fn advisory(&self, depth: u32) -> Option<DepthAdvisory> {
        (depth > self.advisory_threshold).then_some(DepthAdvisory {
            depth,
            threshold: self.advisory_threshold,
        })
    }

    pub fn default_depth(&self) -> u32 {
        self.default_depth
    }
}

impl Default for DepthController {
    fn default() -> Self {
        Self::from_config(&TreeConfig::default())
    }
}
