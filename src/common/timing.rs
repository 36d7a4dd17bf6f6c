// src/common/timing.rs

use core::time::Duration;

// The DT80 host port has no flow control: after a command is written the
// device starts responding on its own schedule. These values were tuned
// against a DT80 running at 57600 baud and may need adjustment for other
// configurations; `ClientTiming` makes them injectable.

// === Settle delays (command sent -> first drain attempt) ===

/// Wait after sending `listd` before draining the response.
pub const LISTD_SETTLE_DELAY: Duration = Duration::from_millis(1000);
/// Wait after sending `copyd`. Archive unloads take noticeably longer to
/// start than a job listing.
pub const COPYD_SETTLE_DELAY: Duration = Duration::from_millis(4000);

// === Drain pacing ===

/// Pause between consecutive lines of a `listd` response.
pub const LISTD_INTER_LINE_DELAY: Duration = Duration::from_millis(200);
/// Pause between consecutive lines of a `copyd` response.
pub const COPYD_INTER_LINE_DELAY: Duration = Duration::from_millis(400);

// === Idle detection ===

/// Poll interval while waiting for the next byte.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// A response is considered fully drained once no byte has arrived for this
/// long between lines.
pub const RESPONSE_IDLE_TIMEOUT: Duration = Duration::from_millis(500);
