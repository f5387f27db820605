//! Refresh cadences for polled views.
//!
//! Polling stands in for server push on views whose data changes
//! asynchronously on the backend.

use std::time::Duration;

/// Platform analytics dashboard.
pub const ANALYTICS_POLL_INTERVAL: Duration = Duration::from_millis(60_000);

/// Collaboration session state. Must stay within 5-10 seconds.
pub const COLLABORATION_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Gamification stats and leaderboard.
pub const GAMIFICATION_POLL_INTERVAL: Duration = Duration::from_millis(60_000);

/// Assessment runs while grading is in progress.
pub const ASSESSMENT_RUN_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Transcriptions while any job is still processing.
pub const TRANSCRIPTION_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Minimum re-use window for catalog-style lists that rarely change.
pub const CATALOG_STALE_TIME: Duration = Duration::from_secs(30);
