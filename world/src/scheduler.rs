//! Timer registry backing the world's [`Scheduler`](basecamp_defence_core::Scheduler).

use std::{collections::BTreeMap, time::Duration};

use basecamp_defence_core::{Task, TimerHandle};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Armed timer stored inside the registry.
#[derive(Clone, Debug)]
pub(crate) struct Timer {
    due: Duration,
    interval: Option<Duration>,
    task: Task,
}

/// Registry that stores timers and manages handle allocation.
#[derive(Debug)]
pub(crate) struct TimerRegistry {
    entries: BTreeMap<TimerHandle, Timer>,
    next_handle: u32,
}

impl TimerRegistry {
    /// Creates an empty registry with a reset handle counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_handle: 0,
        }
    }

    pub(crate) fn arm(
        &mut self,
        due: Duration,
        interval: Option<Duration>,
        task: Task,
    ) -> TimerHandle {
        let handle = TimerHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let interval = interval.map(|interval| interval.max(MIN_INTERVAL));
        let _ = self.entries.insert(handle, Timer { due, interval, task });
        handle
    }

    pub(crate) fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.entries.remove(&handle).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Pops the earliest timer due at or before `now`.
    ///
    /// Repeating timers are re-armed one interval later and stay registered.
    /// Ties on the due time resolve in arming order.
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<Task> {
        let (handle, _) = self
            .entries
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(handle, timer)| (timer.due, **handle))?;
        let handle = *handle;

        let timer = self.entries.get_mut(&handle)?;
        let task = timer.task;
        match timer.interval {
            Some(interval) => timer.due += interval,
            None => {
                let _ = self.entries.remove(&handle);
            }
        }
        Some(task)
    }
}
