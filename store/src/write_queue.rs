use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex},
};

/// Named writer lanes. Serializes writers so that cementation, block
/// processing and rollback never interleave destructively.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Writer {
    ConfirmationHeight,
    ProcessBatch,
    Rollback,
    Pruning,
    Generic,
    Testing,
}

struct QueueState {
    queue: VecDeque<(u64, Writer)>,
    next_ticket: u64,
}

/// FIFO multiplexer for exclusive write access. `wait` blocks until the
/// caller is at the front of the queue; the returned guard releases the
/// slot on drop.
pub struct WriteQueue {
    state: Mutex<QueueState>,
    condition: Condvar,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                queue: VecDeque::new(),
                next_ticket: 0,
            }),
            condition: Condvar::new(),
        }
    }

    pub fn wait(&self, writer: Writer) -> WriteGuard<'_> {
        let mut state = self.state.lock().unwrap();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.queue.push_back((ticket, writer));

        while state.queue.front().map(|(t, _)| *t) != Some(ticket) {
            state = self.condition.wait(state).unwrap();
        }

        WriteGuard { queue: self }
    }

    /// True while any writer holds or awaits the queue
    pub fn is_busy(&self) -> bool {
        !self.state.lock().unwrap().queue.is_empty()
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.queue.pop_front();
        drop(state);
        self.condition.notify_all();
    }
}

impl Default for WriteQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WriteGuard<'a> {
    queue: &'a WriteQueue,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.queue.release();
    }
}
