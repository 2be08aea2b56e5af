use std::cell::Cell;

use time::{Duration, OffsetDateTime};

/// Source of creation timestamps, injected into the task store.
pub trait Clock {
    /// Current instant in UTC.
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
///
/// Each call to [`Clock::now`] returns the current instant and then advances by
/// the configured step, so consecutive adds get strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<OffsetDateTime>,
    step: Duration,
}

impl ManualClock {
    /// Frozen clock starting at `start`.
    #[must_use]
    pub const fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Cell::new(start),
            step: Duration::ZERO,
        }
    }

    /// Clock starting at `start` that ticks `step` after every read.
    #[must_use]
    pub const fn ticking(start: OffsetDateTime, step: Duration) -> Self {
        Self {
            now: Cell::new(start),
            step,
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Peek at the current instant without ticking.
    #[must_use]
    pub fn current(&self) -> OffsetDateTime {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

impl<C> Clock for Box<C>
where
    C: Clock + ?Sized,
{
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}
