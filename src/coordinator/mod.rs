pub mod coordinator;
pub mod dispatch_policy;


pub use coordinator::{Coordinator, CoordinatorCommand};
pub use dispatch_policy::DispatchPolicy;
