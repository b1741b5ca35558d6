/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type CarId = usize;

/// Direction of travel of a car.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    /// Direction a car at `from` has to travel to reach `to`.
    pub fn towards(from: i32, to: i32) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Idle
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Idle => write!(f, "idle"),
        }
    }
}

/// Direction the passenger asked for. Cab buttons carry `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Up,
    Down,
    None,
}

impl CallDirection {
    pub fn matches(self, direction: Direction) -> bool {
        match self {
            CallDirection::Up => direction == Direction::Up,
            CallDirection::Down => direction == Direction::Down,
            CallDirection::None => true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    // Pressed inside the given car
    Internal(CarId),
    // Pressed on a landing
    External,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloorRequest {
    pub floor: i32,
    #[serde(rename = "requestedDirection")]
    pub requested_direction: CallDirection,
    pub origin: Origin,
}

impl FloorRequest {
    pub fn internal(car_id: CarId, floor: i32) -> FloorRequest {
        FloorRequest {
            floor,
            requested_direction: CallDirection::None,
            origin: Origin::Internal(car_id),
        }
    }

    pub fn external(floor: i32, requested_direction: CallDirection) -> FloorRequest {
        FloorRequest {
            floor,
            requested_direction,
            origin: Origin::External,
        }
    }

    pub fn is_external(&self) -> bool {
        self.origin == Origin::External
    }
}

/// Key of a landing call in the assignment map.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HallCall {
    pub floor: i32,
    pub up: bool,
}

impl HallCall {
    pub fn from_request(request: &FloorRequest) -> HallCall {
        HallCall {
            floor: request.floor,
            up: request.requested_direction != CallDirection::Down,
        }
    }

    pub fn to_request(self) -> FloorRequest {
        let direction = if self.up {
            CallDirection::Up
        } else {
            CallDirection::Down
        };
        FloorRequest::external(self.floor, direction)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "arriving")]
    Arriving,
    #[serde(rename = "outOfService")]
    OutOfService,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CarState {
    #[serde(rename = "carId")]
    pub car_id: CarId,
    pub floor: i32,
    pub direction: Direction,
    #[serde(rename = "doorOpen")]
    pub door_open: bool,
    pub behaviour: Behaviour,
}

impl CarState {
    pub fn new(car_id: CarId, floor: i32) -> CarState {
        CarState {
            car_id,
            floor,
            direction: Direction::Idle,
            door_open: false,
            behaviour: Behaviour::Idle,
        }
    }

    pub fn in_service(&self) -> bool {
        self.behaviour != Behaviour::OutOfService
    }
}

/// Events a car control loop reports to the coordinator and the display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum CarEvent {
    State(CarState),
    Served {
        #[serde(rename = "carId")]
        car_id: CarId,
        floor: i32,
        /// Landing calls the car held for this floor.
        calls: Vec<HallCall>,
    },
}
