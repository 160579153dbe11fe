//! Wall-clock timestamps and the minimum-interval rate limiter

use core::fmt;
use core::ops::{Add, Sub};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Wall-clock time split into whole seconds and microseconds.
///
/// After `+` or `-` the microsecond field is brought back into
/// `[0, 1_000_000)` with a single carry or borrow, so a negative span keeps a
/// positive `usec` and a negative `sec`:
///
/// ```
/// use berry_imu::Timestamp;
///
/// let span = Timestamp::new(1, 900_000) - Timestamp::new(1, 950_000);
/// assert_eq!(span, Timestamp::new(-1, 950_000));
/// assert!((span.total_seconds() + 0.05).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub sec: i64,
    pub usec: i64,
}

impl Timestamp {
    /// Build a timestamp from whole seconds and microseconds.
    pub fn new(sec: i64, usec: i64) -> Self {
        Self { sec, usec }
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        // A clock set before 1970 reads as the epoch.
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            sec: since_epoch.as_secs() as i64,
            usec: since_epoch.subsec_micros() as i64,
        }
    }

    /// The whole span in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.sec as f64 + self.usec as f64 / MICROS_PER_SECOND as f64
    }
}

impl Add for Timestamp {
    type Output = Timestamp;

    fn add(self, other: Timestamp) -> Timestamp {
        let mut sec = self.sec + other.sec;
        let mut usec = self.usec + other.usec;
        if usec >= MICROS_PER_SECOND {
            sec += 1;
            usec -= MICROS_PER_SECOND;
        }
        Timestamp { sec, usec }
    }
}

impl Sub for Timestamp {
    type Output = Timestamp;

    fn sub(self, other: Timestamp) -> Timestamp {
        let mut sec = self.sec - other.sec;
        let mut usec = self.usec - other.usec;
        if usec < 0 {
            sec -= 1;
            usec += MICROS_PER_SECOND;
        }
        Timestamp { sec, usec }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time<sec={}, usec={}>", self.sec, self.usec)
    }
}

/// Caps how often a filter may sample.
///
/// Each [`tick`](RateLimiter::tick) measures the time since the previous one
/// and, when that is shorter than the minimum interval, sleeps the calling
/// thread for the remainder. It never shortens an interval.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_dt: f32,
    last: Timestamp,
}

impl RateLimiter {
    /// Start measuring from now.
    pub fn new(min_dt: f32) -> Self {
        Self {
            min_dt,
            last: Timestamp::now(),
        }
    }

    /// Minimum interval in seconds.
    pub fn min_dt(&self) -> f32 {
        self.min_dt
    }

    /// Time of the most recent tick (or of construction).
    pub fn last_sample(&self) -> Timestamp {
        self.last
    }

    /// Wait out the minimum interval if needed and return the elapsed seconds.
    pub fn tick(&mut self) -> f32 {
        let mut now = Timestamp::now();
        let mut dt = (now - self.last).total_seconds() as f32;

        // Loops only when microsecond truncation leaves dt a hair short.
        while dt < self.min_dt {
            let remaining = self.min_dt - dt;
            log::trace!("rate limit: sleeping {remaining:.6}s");
            thread::sleep(Duration::from_secs_f32(remaining));
            now = Timestamp::now();
            dt = (now - self.last).total_seconds() as f32;
        }

        self.last = now;
        dt
    }
}
