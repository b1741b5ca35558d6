/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::BuildingConfig;
use crate::coordinator::DispatchPolicy;
use crate::elevator::CarCommand;
use crate::shared::{CarEvent, CarId, DispatchError, DispatchResult, FloorRequest, Origin};

/***************************************/
/*               Enums                 */
/***************************************/
pub enum CoordinatorCommand {
    Submit {
        request: FloorRequest,
        reply: cbc::Sender<DispatchResult<CarId>>,
    },
    CarOffline {
        car_id: CarId,
        reply: cbc::Sender<DispatchResult<()>>,
    },
    CarOnline {
        car_id: CarId,
        reply: cbc::Sender<DispatchResult<()>>,
    },
    Terminate,
}

enum Event {
    Command(CoordinatorCommand),
    CarReport(CarEvent),
    Terminate,
}

/***************************************/
/*             Public API              */
/***************************************/
/**
 * Single writer of the dispatch state.
 *
 * Every request passes through this loop: cab requests go straight to their car, landing calls
 * are assigned by the `DispatchPolicy` and then forwarded. Handling one command at a time makes
 * each assignment atomic. Car reports update the policy and are passed on to the observer.
 *
 * # Fields
 * - `building`:       Valid floor range.
 * - `policy`:         Car states and landing call assignments.
 * - `command_rx`:     Requests and car service reports from the outside.
 * - `car_event_rx`:   State transitions and served stops from every car.
 * - `car_txs`:        Command channel of each car, indexed by car id.
 * - `observer_tx`:    Display/logging collaborator, if any.
 */
pub struct Coordinator {
    building: BuildingConfig,
    policy: DispatchPolicy,

    command_rx: cbc::Receiver<CoordinatorCommand>,
    car_event_rx: cbc::Receiver<CarEvent>,
    car_txs: Vec<cbc::Sender<CarCommand>>,
    observer_tx: Option<cbc::Sender<CarEvent>>,
}

impl Coordinator {
    pub fn new(
        building: &BuildingConfig,
        policy: DispatchPolicy,
        command_rx: cbc::Receiver<CoordinatorCommand>,
        car_event_rx: cbc::Receiver<CarEvent>,
        car_txs: Vec<cbc::Sender<CarCommand>>,
        observer_tx: Option<cbc::Sender<CarEvent>>,
    ) -> Coordinator {
        Coordinator {
            building: building.clone(),
            policy,
            command_rx,
            car_event_rx,
            car_txs,
            observer_tx,
        }
    }

    pub fn run(mut self) {
        loop {
            match self.wait_for_event() {
                Event::Command(command) => self.handle_command(command),
                Event::CarReport(event) => self.handle_car_event(event),
                Event::Terminate => {
                    for car_tx in &self.car_txs {
                        let _ = car_tx.send(CarCommand::Terminate);
                    }
                    info!("Coordinator terminated");
                    return;
                }
            }
        }
    }

    fn wait_for_event(&self) -> Event {
        cbc::select! {
            recv(self.command_rx) -> command => match command {
                Ok(CoordinatorCommand::Terminate) | Err(_) => Event::Terminate,
                Ok(command) => Event::Command(command),
            },
            recv(self.car_event_rx) -> event => match event {
                Ok(event) => Event::CarReport(event),
                // Every car is gone
                Err(_) => Event::Terminate,
            },
        }
    }

    fn handle_command(&mut self, command: CoordinatorCommand) {
        match command {
            CoordinatorCommand::Submit { request, reply } => {
                let result = self.submit_request(request);
                if let Err(e) = &result {
                    warn!("Rejected request for floor {}: {}", request.floor, e);
                }
                let _ = reply.send(result);
            }
            CoordinatorCommand::CarOffline { car_id, reply } => {
                let _ = reply.send(self.car_offline(car_id));
            }
            CoordinatorCommand::CarOnline { car_id, reply } => {
                let _ = reply.send(self.car_online(car_id));
            }
            CoordinatorCommand::Terminate => {}
        }
    }

    fn handle_car_event(&mut self, event: CarEvent) {
        match &event {
            CarEvent::State(state) => {
                if let Err(e) = self.policy.update_car(*state) {
                    warn!("Ignoring car report: {}", e);
                }
            }
            CarEvent::Served { car_id, floor, calls } => {
                let released = self.policy.complete(*car_id, calls);
                if !released.is_empty() {
                    debug!("Car {} answered {} landing call(s) at floor {}", car_id, released.len(), floor);
                }
            }
        }

        if let Some(observer_tx) = &self.observer_tx {
            let _ = observer_tx.send(event);
        }
    }

    pub fn submit_request(&mut self, request: FloorRequest) -> DispatchResult<CarId> {
        if !self.building.contains(request.floor) {
            return Err(DispatchError::InvalidFloor {
                floor: request.floor,
                min: self.building.min_floor,
                max: self.building.max_floor,
            });
        }

        match request.origin {
            // Cab requests never go through dispatch
            Origin::Internal(car_id) => {
                self.forward(car_id, request)?;
                Ok(car_id)
            }
            Origin::External => {
                let (car_id, new) = self.policy.assign(&request)?;
                if new {
                    info!(
                        "Landing call at floor {} ({:?}) assigned to car {}",
                        request.floor, request.requested_direction, car_id
                    );
                    self.forward(car_id, request)?;
                }
                Ok(car_id)
            }
        }
    }

    fn car_offline(&mut self, car_id: CarId) -> DispatchResult<()> {
        let moved = self.policy.mark_offline(car_id)?;
        warn!("Car {} offline, moving {} landing call(s)", car_id, moved.len());
        if !self.policy.orphaned().is_empty() {
            warn!("{} landing call(s) wait for a car to come back", self.policy.orphaned().len());
        }

        self.send(car_id, CarCommand::OutOfService)?;
        for (request, new_owner) in moved {
            self.forward(new_owner, request)?;
        }
        Ok(())
    }

    fn car_online(&mut self, car_id: CarId) -> DispatchResult<()> {
        let moved = self.policy.mark_online(car_id)?;
        info!("Car {} back online", car_id);

        self.send(car_id, CarCommand::Resume)?;
        for (request, new_owner) in moved {
            self.forward(new_owner, request)?;
        }
        Ok(())
    }

    fn forward(&self, car_id: CarId, request: FloorRequest) -> DispatchResult<()> {
        self.send(car_id, CarCommand::Request(request))
    }

    fn send(&self, car_id: CarId, command: CarCommand) -> DispatchResult<()> {
        self.car_txs
            .get(car_id)
            .ok_or(DispatchError::UnknownCar(car_id))?
            .send(command)
            .map_err(|_| DispatchError::Disconnected)
    }
}
