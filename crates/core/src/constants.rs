//! Shared constants for the monitor

use std::time::Duration;

/// Delay between two sampling cycles when the config does not override it
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Percentage points a percent field must move before it is reported,
/// used when the field declares no explicit threshold.
pub const DEFAULT_PERCENT_THRESHOLD: f64 = 0.1;

/// Width the name column is padded to in the rendered report
pub const NAME_COLUMN_WIDTH: usize = 10;

/// Glyph for an engaged digital input
pub const ACTIVE_GLYPH: &str = "✅";

/// Glyph for a disengaged digital input, also used as the warning glyph
pub const INACTIVE_GLYPH: &str = "❌";

/// Fence line opening and closing the rendered report
pub const REPORT_FENCE: &str = "```";
