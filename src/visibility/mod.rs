mod scheduler;
mod watch;

pub use scheduler::VisibilityScheduler;
pub use watch::{ObservationHandle, VisibilityCallback, WatchMode};
