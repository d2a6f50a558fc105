use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};

/// One directory awaiting expansion.
pub struct Task {
    pub path: PathBuf,
}

struct QueueState {
    tasks: VecDeque<Task>,
    active_workers: usize,
    done: bool,
}

impl QueueState {
    // The termination contract: no queued work and nobody mid-expansion.
    // Only valid to evaluate while holding the queue lock, because a worker
    // that is still active may yet push more tasks.
    fn is_quiescent(&self) -> bool {
        self.tasks.is_empty() && self.active_workers == 0
    }
}

/// An unbounded FIFO of pending directory expansions, shared by all workers.
///
/// The task list, the count of workers currently expanding a task, and the
/// `done` flag form one logically-atomic unit behind a single lock; the
/// termination invariant spans all three, so none of them is ever touched
/// independently.
pub struct TaskQueue {
    state: Mutex<QueueState>,
    state_change: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                active_workers: 0,
                done: false,
            }),
            state_change: Condvar::new(),
        }
    }

    /// Appends a task at the tail and wakes one blocked consumer.
    ///
    /// Pushes only happen before workers start (the root seed) or from a
    /// worker that has not yet called `complete` for its current task, so
    /// the queue can never have terminated underneath a push.
    pub fn push(&self, task: Task) {
        let mut state = self.state.lock().unwrap();
        if state.done {
            panic!("attempted to push a task after the queue terminated");
        }
        state.tasks.push_back(task);
        self.state_change.notify_one();
    }

    /// Removes and returns the head task, counting the caller as active
    /// until it calls `complete`. Blocks while the queue is empty but work
    /// may still appear; returns `None` once the queue has terminated.
    pub fn pop(&self) -> Option<Task> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(task) = state.tasks.pop_front() {
                state.active_workers += 1;
                return Some(task);
            }
            if state.done {
                return None;
            }
            state = self.state_change.wait(state).unwrap();
        }
    }

    /// Marks the task handed out by the matching `pop` as finished,
    /// regardless of whether its directory could be opened.
    ///
    /// If that leaves the queue quiescent, termination is declared and every
    /// blocked worker is woken. The broadcast is required: several workers
    /// may be parked in `pop` at once, and a single wake would strand the
    /// rest forever.
    pub fn complete(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.active_workers > 0, "complete without matching pop");
        state.active_workers -= 1;
        if state.is_quiescent() {
            state.done = true;
            self.state_change.notify_all();
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    pub fn active_workers(&self) -> usize {
        self.state.lock().unwrap().active_workers
    }

    pub fn is_done(&self) -> bool {
        self.state.lock().unwrap().done
    }
}
