use std::time::Duration;

/// Handle returned by `schedule_after`, used to cancel a pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TimerId(u64);

struct Entry<T> {
    id: TimerId,
    deadline: Duration,
    timer: T,
}

/// Fire-once timers keyed on a caller-supplied clock (time since the game epoch).
/// Nothing fires on its own; the owner polls `pop_due` from its loop.
pub(crate) struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn schedule_after(&mut self, now: Duration, delay: Duration, timer: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: now.saturating_add(delay),
            timer,
        });
        id
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancels every pending timer matching `pred`, returning how many were dropped.
    pub(crate) fn cancel_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.timer));
        before - self.entries.len()
    }

    /// Removes and returns the earliest timer due at `now`. Ties go to the one
    /// scheduled first.
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<T> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id.0))
            .map(|(i, _)| i)?;
        Some(self.entries.remove(idx).timer)
    }

    pub(crate) fn deadline_of<F>(&self, mut pred: F) -> Option<Duration>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| pred(&e.timer))
            .map(|e| e.deadline)
            .min()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule_after(ms(0), ms(700), "respawn");
        assert_eq!(q.pop_due(ms(699)), None);
        assert_eq!(q.pop_due(ms(700)), Some("respawn"));
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn pops_in_deadline_order_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule_after(ms(0), ms(300), 'c');
        q.schedule_after(ms(0), ms(100), 'a');
        q.schedule_after(ms(50), ms(50), 'b');

        let fired: Vec<char> = std::iter::from_fn(|| q.pop_due(ms(1000))).collect();
        assert_eq!(fired, vec!['a', 'b', 'c']);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut q = TimerQueue::new();
        let a = q.schedule_after(ms(0), ms(10), 1);
        q.schedule_after(ms(0), ms(20), 2);

        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.pop_due(ms(100)), Some(2));
        assert_eq!(q.pop_due(ms(100)), None);
    }

    #[test]
    fn cancel_where_and_deadlines() {
        let mut q = TimerQueue::new();
        q.schedule_after(ms(0), ms(500), 1);
        q.schedule_after(ms(0), ms(200), 2);
        q.schedule_after(ms(0), ms(900), 3);

        assert_eq!(q.deadline_of(|_| true), Some(ms(200)));
        assert_eq!(q.deadline_of(|t| *t == 3), Some(ms(900)));
        assert_eq!(q.cancel_where(|t| *t < 3), 2);
        assert_eq!(q.len(), 1);
        assert_eq!(q.deadline_of(|_| true), Some(ms(900)));

        q.clear();
        assert_eq!(q.deadline_of(|_| true), None);
    }
}
