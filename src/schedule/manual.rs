use super::{Scheduler, Task};

/// Default display refresh interval (60 Hz)
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: f64,
    seq: u64,
    task: Task,
}

/// Deterministic scheduler over a virtual clock
///
/// Frames fall on fixed boundaries (`n * frame_interval`); a frame request
/// runs at the first boundary strictly after the request time. Timers run at
/// `now + delay`. Ties run in request order.
#[derive(Debug)]
pub struct ManualScheduler {
    now: f64,
    frame_interval: f64,
    pending: Vec<Pending>,
    seq: u64,
    frame_requests: usize,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL_MS)
    }
}

impl ManualScheduler {
    pub fn new(frame_interval: f64) -> Self {
        Self {
            now: 0.0,
            frame_interval,
            pending: Vec::new(),
            seq: 0,
            frame_requests: 0,
        }
    }

    /// Total `request_frame` calls so far
    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest task due at or before `until`, moving the clock to it
    pub fn take_due(&mut self, until: f64) -> Option<Task> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;

        let next = self.pending.remove(index);
        self.now = self.now.max(next.due);
        Some(next.task)
    }

    /// Move the clock forward without running anything
    pub fn set_now(&mut self, now: f64) {
        self.now = self.now.max(now);
    }

    fn push(&mut self, due: f64, task: Task) {
        self.pending.push(Pending { due, seq: self.seq, task });
        self.seq += 1;
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self, task: Task) {
        self.frame_requests += 1;
        let mut due = ((self.now / self.frame_interval).floor() + 1.0) * self.frame_interval;
        if due <= self.now {
            due += self.frame_interval;
        }
        self.push(due, task);
    }

    fn set_timeout(&mut self, delay_ms: f64, task: Task) {
        self.push(self.now + delay_ms.max(0.0), task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementId;

    #[test]
    fn test_timers_run_in_due_order() {
        let mut scheduler = ManualScheduler::default();
        scheduler.set_timeout(100.0, Task::TypeNext(ElementId(1)));
        scheduler.set_timeout(50.0, Task::TypeNext(ElementId(2)));
        scheduler.set_timeout(50.0, Task::TypeNext(ElementId(3)));

        assert_eq!(scheduler.take_due(40.0), None);
        assert_eq!(scheduler.take_due(200.0), Some(Task::TypeNext(ElementId(2))));
        assert_eq!(scheduler.now(), 50.0);
        assert_eq!(scheduler.take_due(200.0), Some(Task::TypeNext(ElementId(3))));
        assert_eq!(scheduler.take_due(200.0), Some(Task::TypeNext(ElementId(1))));
        assert_eq!(scheduler.now(), 100.0);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_frames_land_on_boundaries() {
        let mut scheduler = ManualScheduler::new(10.0);
        scheduler.set_now(3.0);
        scheduler.request_frame(Task::ParallaxFrame);
        assert_eq!(scheduler.take_due(9.9), None);
        assert_eq!(scheduler.take_due(10.0), Some(Task::ParallaxFrame));

        // A request made during a frame runs on the following one
        scheduler.request_frame(Task::ParallaxFrame);
        assert_eq!(scheduler.take_due(19.0), None);
        assert_eq!(scheduler.take_due(20.0), Some(Task::ParallaxFrame));
        assert_eq!(scheduler.frame_requests(), 2);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut scheduler = ManualScheduler::default();
        scheduler.set_now(100.0);
        scheduler.set_now(20.0);
        assert_eq!(scheduler.now(), 100.0);
    }
}
