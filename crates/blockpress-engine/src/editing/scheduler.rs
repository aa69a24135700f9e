/// Outcome of [`CoalescingScheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// Nothing was pending; the host should request a frame
    Requested,
    /// Replaced a task that was already waiting for the frame
    Coalesced,
}

/// Holds at most one deferred task, keeping only the most recent
///
/// The host drives it: request a frame when `schedule` returns
/// `Scheduled::Requested`, call `run` from that frame callback, and `cancel`
/// to drop whatever is waiting.
#[derive(Debug)]
pub struct CoalescingScheduler<T> {
    pending: Option<T>,
}

impl<T> Default for CoalescingScheduler<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> CoalescingScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: T) -> Scheduled {
        match self.pending.replace(task) {
            Some(_) => Scheduled::Coalesced,
            None => Scheduled::Requested,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The frame arrived: hand over the pending task
    pub fn run(&mut self) -> Option<T> {
        self.pending.take()
    }
}

impl<R, F: FnOnce() -> R> CoalescingScheduler<F> {
    /// Run a pending closure
    pub fn fire(&mut self) -> Option<R> {
        self.run().map(|task| task())
    }
}
