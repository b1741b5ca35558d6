/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, trace};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{CarId, Direction};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionCommand {
    pub direction: Direction,
    pub target: i32,
}

/// Reports from the motion driver back to the car control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarSignal {
    Passing(i32),
    Arrived(i32),
}

/// Commands physical movement of one car. Progress is reported asynchronously as `CarSignal`s.
pub trait MotionDriver: Send {
    fn move_to(&mut self, direction: Direction, target: i32);
}

impl MotionDriver for cbc::Sender<MotionCommand> {
    fn move_to(&mut self, direction: Direction, target: i32) {
        let _ = self.send(MotionCommand { direction, target });
    }
}

/**
 * Stand-in for the car hardware.
 *
 * Moves one floor per `travel_time` towards the last commanded target and reports every floor
 * it reaches. A new command replaces the current target. The thread stops once the command
 * channel is closed.
 *
 * # Fields
 * - `car_id`:       Car this driver belongs to, used for logging.
 * - `floor`:        Floor the car is currently at.
 * - `target`:       Floor the car is travelling to, if any.
 * - `travel_time`:  Time between two adjacent floors.
 * - `command_rx`:   Receives move commands from the controller.
 * - `signal_tx`:    Sends passing/arrival reports to the controller.
 */
pub struct SimulatedDriver {
    car_id: CarId,
    floor: i32,
    target: Option<i32>,
    travel_time: Duration,
    command_rx: cbc::Receiver<MotionCommand>,
    signal_tx: cbc::Sender<CarSignal>,
}

impl SimulatedDriver {
    pub fn new(
        car_id: CarId,
        start_floor: i32,
        travel_time: Duration,
        command_rx: cbc::Receiver<MotionCommand>,
        signal_tx: cbc::Sender<CarSignal>,
    ) -> SimulatedDriver {
        SimulatedDriver {
            car_id,
            floor: start_floor,
            target: None,
            travel_time,
            command_rx,
            signal_tx,
        }
    }

    pub fn run(mut self) {
        loop {
            cbc::select! {
                recv(self.command_rx) -> command => {
                    match command {
                        Ok(command) => {
                            if !self.accept(command) {
                                return;
                            }
                        }
                        Err(_) => {
                            debug!("Car {}: motion driver stopped", self.car_id);
                            return;
                        }
                    }
                }
                default(self.travel_time) => {
                    if !self.step() {
                        return;
                    }
                }
            }
        }
    }

    fn accept(&mut self, command: MotionCommand) -> bool {
        trace!("Car {}: move {} to floor {}", self.car_id, command.direction, command.target);
        if command.target == self.floor {
            self.target = None;
            return self.signal_tx.send(CarSignal::Arrived(self.floor)).is_ok();
        }
        self.target = Some(command.target);
        true
    }

    // Returns false once the controller is gone
    fn step(&mut self) -> bool {
        let Some(target) = self.target else {
            return true;
        };

        self.floor += (target - self.floor).signum();
        let signal = if self.floor == target {
            self.target = None;
            CarSignal::Arrived(self.floor)
        } else {
            CarSignal::Passing(self.floor)
        };
        self.signal_tx.send(signal).is_ok()
    }
}
