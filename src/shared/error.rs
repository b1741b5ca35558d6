/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use super::CarId;

/***************************************/
/*               Errors                */
/***************************************/
/// Errors returned to whoever submitted a request. None of them stop a control loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("floor {floor} is outside the building range [{min}, {max}]")]
    InvalidFloor { floor: i32, min: i32, max: i32 },

    #[error("no car is available to serve floor {floor}")]
    NoAvailableCar { floor: i32 },

    #[error("car {0} does not exist")]
    UnknownCar(CarId),

    #[error("the elevator system is shut down")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
