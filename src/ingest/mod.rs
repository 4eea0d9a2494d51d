//! Periodic ingestion of synthetic readings.

pub mod clock;
pub mod scheduler;
pub mod worker;

pub use clock::{Clock, SystemClock};
pub use scheduler::Scheduler;
pub use worker::TickError;
