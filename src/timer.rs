//! Periodic timers for interval animations.
//!
//! [`Timer`] is the scheduling seam: anything that can run a task every
//! `period` and cancel it again. [`TickTimer`] is the implementation driven by
//! the host's frame loop, either with explicit deltas ([`TickTimer::advance`])
//! or with the wall clock ([`TickTimer::poll`]).

use instant::{Duration, Instant};

/// Opaque cancellation token for a scheduled interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalHandle(u64);

pub type Task = Box<dyn FnMut()>;

pub trait Timer {
    /// Runs `task` every `period` until cancelled and returns its handle.
    fn schedule(&mut self, period: Duration, task: Task) -> IntervalHandle;

    /// Cancels an interval. Returns `false` if it was not (or no longer) scheduled.
    fn cancel(&mut self, handle: IntervalHandle) -> bool;

    /// Number of scheduled intervals.
    fn active(&self) -> usize;
}

/// Shortest period an interval may have; shorter ones are clamped.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

struct Entry {
    handle: IntervalHandle,
    period: Duration,
    due: Duration,
    task: Task,
}

pub struct TickTimer {
    entries: Vec<Entry>,
    next_id: u64,
    now: Duration,
    last_poll: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            now: Duration::ZERO,
            last_poll: None,
        }
    }

    /// Time advanced so far.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    pub fn is_scheduled(&self, handle: IntervalHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Moves time forward by `dt` and runs every task that came due, in
    /// deadline order. A task whose period elapsed several times runs several
    /// times. Returns the number of task runs.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let target = self.now + dt;
        let mut runs = 0;
        loop {
            let next = self
                .entries
                .iter_mut()
                .enumerate()
                .filter(|(_, e)| e.due <= target)
                .min_by_key(|(idx, e)| (e.due, *idx))
                .map(|(_, e)| e);
            let Some(entry) = next else {
                break;
            };
            self.now = entry.due;
            entry.due += entry.period;
            (entry.task)();
            runs += 1;
        }
        self.now = target;
        runs
    }

    /// Advances by the wall-clock time since the previous poll.
    ///
    /// The first poll only starts the clock.
    pub fn poll(&mut self) -> usize {
        let now = Instant::now();
        let runs = match self.last_poll {
            Some(last) => self.advance(now.duration_since(last)),
            None => 0,
        };
        self.last_poll = Some(now);
        runs
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for TickTimer {
    fn schedule(&mut self, period: Duration, task: Task) -> IntervalHandle {
        let period = period.max(MIN_PERIOD);
        let handle = IntervalHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            period,
            due: self.now + period,
            task,
        });
        log::trace!("scheduled interval {handle:?} every {period:?}");
        handle
    }

    fn cancel(&mut self, handle: IntervalHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    fn active(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn counter(timer: &mut TickTimer, period_ms: u64) -> (IntervalHandle, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = timer.schedule(Duration::from_millis(period_ms), Box::new(move || c.set(c.get() + 1)));
        (handle, count)
    }

    #[test]
    fn fires_once_per_elapsed_period() {
        let mut timer = TickTimer::new();
        let (_, count) = counter(&mut timer, 10);
        assert_eq!(timer.advance(Duration::from_millis(9)), 0);
        assert_eq!(timer.advance(Duration::from_millis(1)), 1);
        assert_eq!(timer.advance(Duration::from_millis(35)), 3);
        assert_eq!(count.get(), 4);
        assert_eq!(timer.elapsed(), Duration::from_millis(45));
    }

    #[test]
    fn cancelled_intervals_stop() {
        let mut timer = TickTimer::new();
        let (handle, count) = counter(&mut timer, 5);
        timer.advance(Duration::from_millis(5));
        assert!(timer.is_scheduled(handle));
        assert!(timer.cancel(handle));
        assert!(!timer.is_scheduled(handle));
        assert!(!timer.cancel(handle));
        timer.advance(Duration::from_millis(50));
        assert_eq!(count.get(), 1);
        assert_eq!(timer.active(), 0);
    }

    #[test]
    fn runs_in_deadline_order() {
        let mut timer = TickTimer::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        for (name, period) in [("slow", 30), ("fast", 20)] {
            let order = order.clone();
            timer.schedule(Duration::from_millis(period), Box::new(move || order.borrow_mut().push(name)));
        }
        timer.advance(Duration::from_millis(60));
        assert_eq!(*order.borrow(), ["fast", "slow", "fast", "slow", "fast"]);
    }

    #[test]
    fn poll_follows_the_wall_clock() {
        let mut timer = TickTimer::new();
        let (_, count) = counter(&mut timer, 1);
        assert_eq!(timer.poll(), 0);
        std::thread::sleep(Duration::from_millis(5));
        let runs = timer.poll();
        assert!(runs >= 1);
        assert_eq!(count.get() as usize, runs);
        assert!(timer.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut timer = TickTimer::new();
        let (_, count) = counter(&mut timer, 0);
        timer.advance(Duration::from_millis(3));
        assert_eq!(count.get(), 3);
    }
}
