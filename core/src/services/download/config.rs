//! Configuration for the download engine.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

/// Maximum successful downloads per user per quota window
pub const DAILY_DOWNLOAD_LIMIT: u32 = 5;

/// Seconds between background token sweeps
pub const SWEEP_INTERVAL_SECONDS: u64 = 300;

/// How the quota window boundary is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaWindow {
    /// From the most recent server-local midnight
    CalendarDay,
    /// Rolling 24 hours before now
    Rolling24h,
}

impl QuotaWindow {
    /// Start of the window containing `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            QuotaWindow::CalendarDay => {
                let local_midnight = now
                    .with_timezone(&Local)
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is a valid time");
                Local
                    .from_local_datetime(&local_midnight)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    // DST gap at midnight: fall back to the rolling boundary
                    .unwrap_or(now - Duration::hours(24))
            }
            QuotaWindow::Rolling24h => now - Duration::hours(24),
        }
    }
}

/// Download engine configuration
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Downloads allowed per user per window
    pub daily_limit: u32,
    /// Window boundary policy
    pub quota_window: QuotaWindow,
    /// Whether a failed quota read degrades to "no downloads yet"
    /// instead of failing the request (availability over strictness)
    pub fail_open: bool,
    /// Seconds between background token sweeps
    pub sweep_interval_seconds: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            daily_limit: DAILY_DOWNLOAD_LIMIT,
            quota_window: QuotaWindow::CalendarDay,
            fail_open: true,
            sweep_interval_seconds: SWEEP_INTERVAL_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window_start() {
        let now = Utc::now();
        assert_eq!(QuotaWindow::Rolling24h.start(now), now - Duration::hours(24));
    }

    #[test]
    fn test_calendar_day_start_not_after_now() {
        let now = Utc::now();
        let start = QuotaWindow::CalendarDay.start(now);
        assert!(start <= now);
        // Midnight is at most 24h (plus DST slack) in the past
        assert!(now - start < Duration::hours(25));
    }
}
