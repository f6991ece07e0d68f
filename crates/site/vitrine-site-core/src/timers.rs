//! Interval timers on a virtual clock advanced by the frame loop.

use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-9;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Fired<T> {
    pub handle: TimerHandle,
    pub tag: T,
}

#[derive(Debug)]
struct Interval<T> {
    handle: TimerHandle,
    period: f64,
    due: f64,
    tag: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now: f64,
    next_handle: u32,
    intervals: Vec<Interval<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_handle: 0,
            intervals: Vec::new(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the queue was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire `tag` every `period` seconds, first one full period from now.
    pub fn set_interval(&mut self, period: f64, tag: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.intervals.push(Interval {
            handle,
            period: period.max(EPS),
            due: self.now + period.max(EPS),
            tag,
        });
        handle
    }

    /// Cancel an interval. Unknown or already-cleared handles are ignored.
    pub fn clear(&mut self, handle: TimerHandle) {
        self.intervals.retain(|i| i.handle != handle);
    }

    pub fn live_count(&self) -> usize {
        self.intervals.len()
    }

    /// Move the clock forward and return every firing in due order. An
    /// interval that fell behind fires once per elapsed period.
    pub fn advance(&mut self, dt: f64) -> Vec<Fired<T>> {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
        let now = self.now;
        let mut fired = Vec::new();
        loop {
            let next = self
                .intervals
                .iter_mut()
                .filter(|i| i.due <= now + EPS)
                .min_by(|a, b| a.due.total_cmp(&b.due));
            let Some(interval) = next else {
                break;
            };
            interval.due += interval.period;
            fired.push(Fired {
                handle: interval.handle,
                tag: interval.tag.clone(),
            });
        }
        fired
    }
}
