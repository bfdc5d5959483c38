//! Cancellable deferred tasks on the host's single-threaded event loop.
//!
//! The driver never owns a clock. Hosts hand it a [`Scheduler`]; tests and
//! headless hosts use [`ManualScheduler`], whose time only moves when told to.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Work deferred by [`Scheduler::schedule`].
pub type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Pending,
    Cancelled,
    Fired,
}

/// Owner side of a scheduled task. Cancels the task when dropped.
#[derive(Debug)]
pub struct TaskHandle {
    state: Rc<Cell<TaskState>>,
}

/// Scheduler side of a scheduled task: decides whether the task may still run.
#[derive(Debug)]
pub struct TaskToken {
    state: Rc<Cell<TaskState>>,
}

/// A linked handle/token pair for one task.
pub fn task_pair() -> (TaskHandle, TaskToken) {
    let state = Rc::new(Cell::new(TaskState::Pending));
    (
        TaskHandle {
            state: state.clone(),
        },
        TaskToken { state },
    )
}

impl TaskHandle {
    /// Invalidate the task. Once this returns the task can never run.
    pub fn cancel(&self) {
        if self.state.get() == TaskState::Pending {
            self.state.set(TaskState::Cancelled);
        }
    }

    /// True until the task has fired or been cancelled.
    pub fn is_pending(&self) -> bool {
        self.state.get() == TaskState::Pending
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl TaskToken {
    pub fn is_live(&self) -> bool {
        self.state.get() == TaskState::Pending
    }

    /// Run `task` unless it was cancelled. Returns whether it ran.
    pub fn run(self, task: Task) -> bool {
        if !self.is_live() {
            return false;
        }
        self.state.set(TaskState::Fired);
        task();
        true
    }
}

/// Schedules one-shot tasks after a delay on the caller's thread.
pub trait Scheduler {
    /// Queue `task` to run once `delay_ms` has elapsed.
    ///
    /// Implementations must not run the task from inside `schedule`, and must
    /// route execution through the returned pair's [`TaskToken::run`].
    fn schedule(&self, delay_ms: f64, task: Task) -> TaskHandle;
}

struct Scheduled {
    due_ms: f64,
    seq: u64,
    token: TaskToken,
    task: Task,
}

#[derive(Default)]
struct ManualInner {
    now_ms: f64,
    next_seq: u64,
    queue: Vec<Scheduled>,
}

/// Synthetic clock: tasks fire only from [`ManualScheduler::advance_to`].
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualScheduler")
            .field("now_ms", &inner.now_ms)
            .field("queued", &inner.queue.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Tasks still waiting to fire (cancelled ones excluded).
    pub fn pending(&self) -> usize {
        self.inner
            .borrow()
            .queue
            .iter()
            .filter(|s| s.token.is_live())
            .count()
    }

    /// Due time of the earliest live task.
    pub fn next_due(&self) -> Option<f64> {
        self.inner
            .borrow()
            .queue
            .iter()
            .filter(|s| s.token.is_live())
            .map(|s| s.due_ms)
            .min_by(f64::total_cmp)
    }

    /// Move the clock to `t_ms`, running every live task due at or before it in
    /// due order. Returns how many tasks ran.
    pub fn advance_to(&self, t_ms: f64) -> usize {
        let mut fired = 0;
        loop {
            // Pop outside of the task call so tasks can schedule more work.
            let next = {
                let mut inner = self.inner.borrow_mut();
                inner.queue.retain(|s| s.token.is_live());
                let earliest = inner
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due_ms <= t_ms)
                    .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
                    .map(|(i, _)| i);
                earliest.map(|i| {
                    let scheduled = inner.queue.swap_remove(i);
                    inner.now_ms = inner.now_ms.max(scheduled.due_ms);
                    scheduled
                })
            };
            let Some(scheduled) = next else { break };
            if scheduled.token.run(scheduled.task) {
                fired += 1;
            }
        }
        let mut inner = self.inner.borrow_mut();
        inner.now_ms = inner.now_ms.max(t_ms);
        fired
    }

    pub fn advance_by(&self, dt_ms: f64) -> usize {
        let target = self.now() + dt_ms;
        self.advance_to(target)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: f64, task: Task) -> TaskHandle {
        let (handle, token) = task_pair();
        let mut inner = self.inner.borrow_mut();
        let due_ms = inner.now_ms + delay_ms.max(0.0);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.queue.push(Scheduled {
            due_ms,
            seq,
            token,
            task,
        });
        handle
    }
}
