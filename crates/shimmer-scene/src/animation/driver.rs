//! Progress-over-time state machine for the shimmer sweep.
//!
//! ```text
//! Idle ──start──▶ Running ──progress hits 1.0──▶ Completing
//!                    ▲                               │
//!                    └──── restart after delay ◀─ Delaying   (more loops left)
//!                                                    │
//!                                                 Stopped    (finite loop done)
//! ```
//!
//! Disabling while `Running` or `Delaying` drops back to `Idle`, keeping
//! progress and the iteration count, and cancels any pending restart.
//! Re-enabling only resumes a sequence begun with `start`; a driver that was
//! never started or was halted with `stop` stays `Idle`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::events::{DriverEvent, EventQueue};
use super::scheduler::{Scheduler, TaskHandle};
use crate::config::{LoopCount, ShimmerConfig};

/// Where the driver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Not consuming ticks: never started, stopped, or disabled.
    Idle,
    /// Advancing progress on every tick.
    Running,
    /// A sweep just reached 1.0; resolved within the same tick.
    Completing,
    /// Waiting for the delayed restart to fire.
    Delaying,
    /// A finite loop finished. Terminal until `start` is called again.
    Stopped,
}

/// Mutable animation state. Shared only with the driver's own restart task,
/// which holds a weak reference.
#[derive(Debug)]
struct AnimationState {
    progress: f64,
    iteration_count: u32,
    phase: DriverPhase,
    /// Host time at which the current run would have had progress 0.
    run_origin_ms: Option<f64>,
    last_reported: Option<f64>,
    /// Paused while `Delaying`; resuming re-arms the restart.
    resume_into_delay: bool,
    events: EventQueue,
}

impl AnimationState {
    fn new() -> Self {
        Self {
            progress: 0.0,
            iteration_count: 0,
            phase: DriverPhase::Idle,
            run_origin_ms: None,
            last_reported: None,
            resume_into_delay: false,
            events: EventQueue::new(),
        }
    }

    fn set_phase(&mut self, phase: DriverPhase) {
        if self.phase != phase {
            log::debug!("shimmer driver: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn restart(&mut self) {
        debug_assert_eq!(self.phase, DriverPhase::Delaying, "restart fired outside Delaying");
        self.progress = 0.0;
        self.run_origin_ms = None;
        self.set_phase(DriverPhase::Running);
        self.events.push(DriverEvent::Restarted {
            iteration: self.iteration_count,
        });
    }
}

/// Drives `progress` from 0 to 1 once per period, looping with an optional
/// delay between sweeps.
///
/// Single-threaded: `tick` is called from the host's frame callback and the
/// restart runs on the same thread through the injected [`Scheduler`].
pub struct AnimationDriver {
    period_ms: f64,
    delay_ms: f64,
    loop_count: LoopCount,
    enabled: bool,
    disposed: bool,
    /// Set until `start`, and again by `stop`.
    halted: bool,
    state: Rc<RefCell<AnimationState>>,
    scheduler: Rc<dyn Scheduler>,
    pending_restart: Option<TaskHandle>,
}

static_assertions::assert_not_impl_any!(AnimationDriver: Send, Sync);

impl AnimationDriver {
    /// Create an idle driver for `config`'s timing. Call [`Self::start`] to run.
    pub fn new(config: &ShimmerConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            period_ms: config.period_ms(),
            delay_ms: config.delay_ms(),
            loop_count: config.loop_count(),
            enabled: config.enabled(),
            disposed: false,
            halted: true,
            state: Rc::new(RefCell::new(AnimationState::new())),
            scheduler,
            pending_restart: None,
        }
    }

    /// Begin a fresh sequence: progress and iteration count reset to 0.
    ///
    /// When disabled the driver waits in `Idle` and runs once enabled.
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_pending();
        self.halted = false;
        let mut state = self.state.borrow_mut();
        state.progress = 0.0;
        state.iteration_count = 0;
        state.run_origin_ms = None;
        state.resume_into_delay = false;
        if self.enabled {
            state.set_phase(DriverPhase::Running);
            state.events.push(DriverEvent::Started);
        } else {
            state.set_phase(DriverPhase::Idle);
        }
    }

    /// Halt ticking and cancel any pending restart. Progress is kept.
    pub fn stop(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_pending();
        self.halted = true;
        let mut state = self.state.borrow_mut();
        if matches!(
            state.phase,
            DriverPhase::Running | DriverPhase::Completing | DriverPhase::Delaying
        ) {
            state.run_origin_ms = None;
            state.resume_into_delay = false;
            state.set_phase(DriverPhase::Idle);
            state.events.push(DriverEvent::Halted);
        }
    }

    /// Pause (`false`) or resume (`true`). A finished finite loop stays finished.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.disposed || self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn pause(&mut self) {
        self.cancel_pending();
        let mut state = self.state.borrow_mut();
        state.resume_into_delay = match state.phase {
            DriverPhase::Running | DriverPhase::Completing => false,
            DriverPhase::Delaying => true,
            DriverPhase::Idle | DriverPhase::Stopped => return,
        };
        state.run_origin_ms = None;
        state.set_phase(DriverPhase::Idle);
        state.events.push(DriverEvent::Paused);
    }

    fn resume(&mut self) {
        if self.halted {
            return;
        }
        let into_delay = {
            let mut state = self.state.borrow_mut();
            if state.phase != DriverPhase::Idle {
                return;
            }
            state.events.push(DriverEvent::Resumed);
            state.run_origin_ms = None;
            let into_delay = std::mem::take(&mut state.resume_into_delay);
            if !into_delay {
                state.set_phase(DriverPhase::Running);
            }
            into_delay
        };
        if into_delay {
            self.schedule_restart();
        }
    }

    /// Advance to host time `now_ms` and return the current progress.
    ///
    /// Only consumes the tick while enabled and `Running`; otherwise the
    /// progress is returned unchanged.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        if self.disposed || !self.enabled {
            return self.progress();
        }

        let completed = {
            let mut state = self.state.borrow_mut();
            if state.phase != DriverPhase::Running {
                return state.progress;
            }
            let resume_from = state.progress * self.period_ms;
            let origin = *state.run_origin_ms.get_or_insert(now_ms - resume_from);
            let raw = ((now_ms - origin) / self.period_ms).clamp(0.0, 1.0);
            // Never move backwards within a run, even if the host clock does.
            let progress = raw.max(state.progress);
            state.progress = progress;

            if state.last_reported != Some(progress) {
                state.last_reported = Some(progress);
                state.events.push(DriverEvent::Progress(progress));
            }

            if progress >= 1.0 {
                state.iteration_count += 1;
                state.run_origin_ms = None;
                state.set_phase(DriverPhase::Completing);
                let iteration = state.iteration_count;
                state.events.push(DriverEvent::RunCompleted { iteration });
                Some(iteration)
            } else {
                None
            }
        };

        if let Some(iteration) = completed {
            self.finish_run(iteration);
        }
        self.progress()
    }

    fn finish_run(&mut self, iteration: u32) {
        if self.loop_count.allows_another(iteration) {
            self.schedule_restart();
        } else {
            let mut state = self.state.borrow_mut();
            state.set_phase(DriverPhase::Stopped);
            state.events.push(DriverEvent::Finished);
        }
    }

    fn schedule_restart(&mut self) {
        self.cancel_pending();
        {
            let mut state = self.state.borrow_mut();
            state.set_phase(DriverPhase::Delaying);
            state.events.push(DriverEvent::RestartScheduled {
                delay_ms: self.delay_ms,
            });
        }
        // The state borrow is released before handing work to the scheduler.
        let weak: Weak<RefCell<AnimationState>> = Rc::downgrade(&self.state);
        let handle = self.scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.borrow_mut().restart();
                }
            }),
        );
        self.pending_restart = Some(handle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_restart.take() {
            handle.cancel();
        }
    }

    /// Cancel pending work and stop reacting to anything. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_pending();
        self.disposed = true;
        let mut state = self.state.borrow_mut();
        state.events.push(DriverEvent::Disposed);
        log::debug!(
            "shimmer driver disposed at progress {} after {} runs",
            state.progress,
            state.iteration_count
        );
    }

    pub fn progress(&self) -> f64 {
        self.state.borrow().progress
    }

    pub fn iteration_count(&self) -> u32 {
        self.state.borrow().iteration_count
    }

    pub fn phase(&self) -> DriverPhase {
        self.state.borrow().phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether the host should keep delivering frame ticks.
    pub fn is_ticking(&self) -> bool {
        !self.disposed && self.enabled && self.phase() == DriverPhase::Running
    }

    pub fn has_pending_restart(&self) -> bool {
        self.pending_restart.as_ref().is_some_and(TaskHandle::is_pending)
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<DriverEvent> {
        self.state.borrow_mut().events.drain()
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        self.dispose();
    }
}
