/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::collections::BTreeSet;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::BuildingConfig;
use crate::elevator::{CarSignal, Decision, MotionDriver, RequestQueue, ScanScheduler};
use crate::shared::{
    Behaviour, CarEvent, CarId, CarState, DispatchError, DispatchResult, FloorRequest, HallCall,
    Origin,
};

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarCommand {
    Request(FloorRequest),
    OutOfService,
    Resume,
    Terminate,
}

enum Event {
    Command(CarCommand),
    Signal(CarSignal),
    Disconnected,
}

/**
 * Control loop of one elevator car.
 *
 * The controller owns the car's `CarState` and `RequestQueue`; nothing else mutates them.
 * Requests arrive as `CarCommand`s, motion progress as `CarSignal`s from the motion driver,
 * and every transition is reported as a `CarEvent`.
 *
 * # Fields
 * - `building`:         Valid floor range.
 * - `state`:            Floor, direction, door and behaviour of the car.
 * - `queue`:            Pending stops.
 * - `scheduler`:        SCAN stop selection.
 * - `driver`:           Motion driver commanded with `move_to`.
 * - `active_target`:    Floor the car is currently travelling to.
 * - `internal_floors`:  Queued floors requested from inside the car.
 * - `hall_calls`:       Landing calls this car was assigned and has not answered yet.
 * - `command_rx`:       Requests and service commands from the coordinator.
 * - `signal_rx`:        Passing/arrival reports from the motion driver.
 * - `event_tx`:         State transitions and served stops.
 */
pub struct ElevatorController<D: MotionDriver> {
    building: BuildingConfig,
    state: CarState,
    queue: RequestQueue,
    scheduler: ScanScheduler,
    driver: D,
    active_target: Option<i32>,
    internal_floors: BTreeSet<i32>,
    hall_calls: BTreeSet<HallCall>,

    command_rx: cbc::Receiver<CarCommand>,
    signal_rx: cbc::Receiver<CarSignal>,
    event_tx: cbc::Sender<CarEvent>,
}

impl<D: MotionDriver> ElevatorController<D> {
    pub fn new(
        car_id: CarId,
        building: &BuildingConfig,
        start_floor: i32,
        driver: D,
        command_rx: cbc::Receiver<CarCommand>,
        signal_rx: cbc::Receiver<CarSignal>,
        event_tx: cbc::Sender<CarEvent>,
    ) -> ElevatorController<D> {
        ElevatorController {
            building: building.clone(),
            state: CarState::new(car_id, start_floor),
            queue: RequestQueue::new(),
            scheduler: ScanScheduler,
            driver,
            active_target: None,
            internal_floors: BTreeSet::new(),
            hall_calls: BTreeSet::new(),
            command_rx,
            signal_rx,
            event_tx,
        }
    }

    pub fn run(mut self) {
        self.emit_state();

        loop {
            match self.wait_for_event() {
                Event::Command(CarCommand::Request(request)) => {
                    if let Err(e) = self.submit_request(request) {
                        warn!("Car {}: rejected request: {}", self.state.car_id, e);
                    }
                }
                Event::Command(CarCommand::OutOfService) => self.take_out_of_service(),
                Event::Command(CarCommand::Resume) => self.resume(),
                Event::Signal(CarSignal::Passing(floor)) => self.on_passing(floor),
                Event::Signal(CarSignal::Arrived(floor)) => self.on_arrival(floor),
                Event::Command(CarCommand::Terminate) | Event::Disconnected => {
                    debug!("Car {}: control loop terminated", self.state.car_id);
                    return;
                }
            }
        }
    }

    fn wait_for_event(&self) -> Event {
        cbc::select! {
            recv(self.command_rx) -> command => match command {
                Ok(command) => Event::Command(command),
                Err(_) => Event::Disconnected,
            },
            recv(self.signal_rx) -> signal => match signal {
                Ok(signal) => Event::Signal(signal),
                Err(_) => Event::Disconnected,
            },
        }
    }

    /// Queues a request for this car and merges it into the current route.
    ///
    /// Returns `Ok(false)` when the floor was already queued.
    pub fn submit_request(&mut self, request: FloorRequest) -> DispatchResult<bool> {
        if !self.building.contains(request.floor) {
            return Err(DispatchError::InvalidFloor {
                floor: request.floor,
                min: self.building.min_floor,
                max: self.building.max_floor,
            });
        }

        let out_of_service = self.state.behaviour == Behaviour::OutOfService;
        if out_of_service && request.is_external() {
            return Err(DispatchError::NoAvailableCar { floor: request.floor });
        }

        match request.origin {
            Origin::Internal(_) => self.internal_floors.insert(request.floor),
            Origin::External => self.hall_calls.insert(HallCall::from_request(&request)),
        };

        let inserted = self
            .queue
            .insert(request.floor, self.state.floor, self.state.direction);
        if !inserted {
            debug!("Car {}: floor {} already queued", self.state.car_id, request.floor);
            return Ok(false);
        }
        debug!(
            "Car {}: queued floor {}, {} stop(s) pending (up {:?}, down {:?})",
            self.state.car_id,
            request.floor,
            self.queue.len(),
            self.queue.up_stops(),
            self.queue.down_stops()
        );

        match self.state.behaviour {
            Behaviour::Idle | Behaviour::Arriving => self.advance(),
            Behaviour::Moving => self.merge_into_route(),
            Behaviour::OutOfService => {}
        }
        Ok(true)
    }

    /// The car reached the floor it was sent to.
    pub fn on_arrival(&mut self, floor: i32) {
        self.state.floor = floor;
        self.active_target = None;

        // Out of service: let passengers out but take no further decisions
        if self.state.behaviour == Behaviour::OutOfService {
            self.state.door_open = true;
            if self.queue.contains(floor) {
                self.serve(floor);
            } else {
                self.emit_state();
            }
            return;
        }

        self.state.behaviour = Behaviour::Arriving;
        if self.queue.contains(floor) {
            self.serve(floor);
        } else {
            self.log_transition();
            self.emit_state();
        }
        self.advance();
    }

    pub fn on_passing(&mut self, floor: i32) {
        self.state.floor = floor;
        debug!(
            "Car {}: passing floor {} heading {}",
            self.state.car_id, floor, self.state.direction
        );
        self.emit_state();
    }

    /// Stops taking landing calls. Cab stops stay queued and are served after `resume`.
    pub fn take_out_of_service(&mut self) {
        let landing_stops: Vec<i32> = self
            .queue
            .iter()
            .filter(|floor| !self.internal_floors.contains(floor))
            .collect();
        for floor in landing_stops {
            self.queue.remove(floor);
        }
        // The coordinator hands these calls to other cars
        self.hall_calls.clear();

        self.state.behaviour = Behaviour::OutOfService;
        self.log_transition();
        self.emit_state();
    }

    pub fn resume(&mut self) {
        if self.state.behaviour != Behaviour::OutOfService {
            return;
        }

        if self.active_target.is_some() {
            self.state.behaviour = Behaviour::Moving;
            self.log_transition();
            self.emit_state();
            self.merge_into_route();
        } else {
            self.state.behaviour = Behaviour::Idle;
            self.advance();
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &CarState {
        &self.state
    }

    #[cfg(test)]
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    #[cfg(test)]
    pub fn active_target(&self) -> Option<i32> {
        self.active_target
    }

    // Serves stops at the current floor until a move is issued or the car goes idle
    fn advance(&mut self) {
        loop {
            match self.scheduler.decide(&mut self.state, &mut self.queue) {
                Decision::Arrived(floor) => self.serve(floor),
                Decision::Move { direction, target } => {
                    self.state.door_open = false;
                    self.state.behaviour = Behaviour::Moving;
                    self.active_target = Some(target);
                    self.driver.move_to(direction, target);
                    self.log_transition();
                    self.emit_state();
                    return;
                }
                Decision::Idle => {
                    self.state.behaviour = Behaviour::Idle;
                    self.active_target = None;
                    self.log_transition();
                    self.emit_state();
                    return;
                }
            }
        }
    }

    fn merge_into_route(&mut self) {
        let Some(active_target) = self.active_target else {
            return;
        };
        if let Some(target) = self.scheduler.retarget(&self.state, &self.queue, active_target) {
            debug!(
                "Car {}: new stop at floor {} before floor {}",
                self.state.car_id, target, active_target
            );
            self.active_target = Some(target);
            self.driver.move_to(self.state.direction, target);
        }
    }

    fn serve(&mut self, floor: i32) {
        self.queue.remove(floor);
        self.internal_floors.remove(&floor);
        let calls: Vec<HallCall> = self
            .hall_calls
            .iter()
            .filter(|call| call.floor == floor)
            .copied()
            .collect();
        for call in &calls {
            self.hall_calls.remove(call);
        }
        self.state.door_open = true;
        if self.state.behaviour != Behaviour::OutOfService {
            self.state.behaviour = Behaviour::Arriving;
        }

        info!(
            "Car {}: serving floor {} heading {}",
            self.state.car_id, floor, self.state.direction
        );
        let _ = self.event_tx.send(CarEvent::Served {
            car_id: self.state.car_id,
            floor,
            calls,
        });
        self.emit_state();
    }

    fn log_transition(&self) {
        info!(
            "Car {}: {:?} at floor {} heading {}",
            self.state.car_id, self.state.behaviour, self.state.floor, self.state.direction
        );
    }

    fn emit_state(&self) {
        let _ = self.event_tx.send(CarEvent::State(self.state));
    }
}
