//! Animation timing for the shimmer sweep.
//!
//! - **Driver**: progress/loop/delay state machine, one per effect
//! - **Scheduler**: host-injected, cancellable deferred tasks
//! - **Events**: lifecycle notifications polled after each tick

pub mod driver;
pub mod events;
pub mod scheduler;

pub use driver::{AnimationDriver, DriverPhase};
pub use events::{DriverEvent, EventQueue};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle, TaskToken, task_pair};
