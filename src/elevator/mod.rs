pub mod controller;
pub mod motion;
pub mod request_queue;
pub mod scheduler;

mod controller_tests;
mod scheduler_tests;

pub use controller::{CarCommand, ElevatorController};
pub use motion::{CarSignal, MotionCommand, MotionDriver, SimulatedDriver};
pub use request_queue::RequestQueue;
pub use scheduler::{Decision, ScanScheduler};
