pub mod error;
pub mod macros;
pub mod structs;

pub use error::ConfigError;
pub use error::DispatchError;
pub use error::DispatchResult;
pub use structs::Behaviour;
pub use structs::CallDirection;
pub use structs::CarEvent;
pub use structs::CarId;
pub use structs::CarState;
pub use structs::Direction;
pub use structs::FloorRequest;
pub use structs::HallCall;
pub use structs::Origin;
