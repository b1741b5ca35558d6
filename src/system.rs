/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::info;
use std::io;
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Config;
use crate::coordinator::{Coordinator, CoordinatorCommand, DispatchPolicy};
use crate::elevator::{CarCommand, CarSignal, ElevatorController, MotionCommand, SimulatedDriver};
use crate::shared::{CallDirection, CarEvent, CarId, DispatchError, DispatchResult, FloorRequest};

/**
 * Handle to a running building.
 *
 * Starts one coordinator thread, and a control loop plus a simulated motion driver per car.
 * Requests are handed to the coordinator, which answers as soon as the request is queued;
 * the car moves afterwards.
 *
 * # Fields
 * - `command_tx`:  Channel into the coordinator.
 * - `threads`:     Every spawned thread, joined on shutdown.
 */
pub struct ElevatorSystem {
    command_tx: cbc::Sender<CoordinatorCommand>,
    threads: Vec<JoinHandle<()>>,
}

impl ElevatorSystem {
    /// Spawns every thread of the building. `observer_tx` receives all car events.
    pub fn start(config: &Config, observer_tx: Option<cbc::Sender<CarEvent>>) -> io::Result<ElevatorSystem> {
        let building = &config.building;
        let travel_time = Duration::from_millis(config.elevator.travel_time);
        let start_floor = config.elevator.start_floor;

        let (command_tx, command_rx) = cbc::unbounded::<CoordinatorCommand>();
        let (car_event_tx, car_event_rx) = cbc::unbounded::<CarEvent>();

        let mut threads = Vec::new();
        let mut car_txs = Vec::new();

        for car_id in 0..building.car_count {
            let (car_tx, car_rx) = cbc::unbounded::<CarCommand>();
            let (motion_tx, motion_rx) = cbc::unbounded::<MotionCommand>();
            let (signal_tx, signal_rx) = cbc::unbounded::<CarSignal>();

            let driver = SimulatedDriver::new(car_id, start_floor, travel_time, motion_rx, signal_tx);
            let controller = ElevatorController::new(
                car_id,
                building,
                start_floor,
                motion_tx,
                car_rx,
                signal_rx,
                car_event_tx.clone(),
            );

            threads.push(
                Builder::new()
                    .name(format!("motion_driver_{}", car_id))
                    .spawn(move || driver.run())?,
            );
            threads.push(
                Builder::new()
                    .name(format!("elevator_controller_{}", car_id))
                    .spawn(move || controller.run())?,
            );
            car_txs.push(car_tx);
        }
        // Only the controllers keep event senders, so the coordinator sees them all leave
        drop(car_event_tx);

        let coordinator = Coordinator::new(
            building,
            DispatchPolicy::new(building, start_floor),
            command_rx,
            car_event_rx,
            car_txs,
            observer_tx,
        );
        threads.push(
            Builder::new()
                .name("coordinator".into())
                .spawn(move || coordinator.run())?,
        );

        info!(
            "Started {} car(s) serving floors {} to {}",
            building.car_count, building.min_floor, building.max_floor
        );
        Ok(ElevatorSystem { command_tx, threads })
    }

    /// Landing call: the coordinator picks the car.
    pub fn call(&self, floor: i32, direction: CallDirection) -> DispatchResult<CarId> {
        self.submit_request(FloorRequest::external(floor, direction))
    }

    /// Cab request from inside `car_id`.
    pub fn cab(&self, car_id: CarId, floor: i32) -> DispatchResult<CarId> {
        self.submit_request(FloorRequest::internal(car_id, floor))
    }

    pub fn submit_request(&self, request: FloorRequest) -> DispatchResult<CarId> {
        let (reply, reply_rx) = cbc::bounded(1);
        self.command_tx
            .send(CoordinatorCommand::Submit { request, reply })
            .map_err(|_| DispatchError::Disconnected)?;
        reply_rx.recv().map_err(|_| DispatchError::Disconnected)?
    }

    /// A watchdog found `car_id` stuck. Its landing calls move to other cars.
    pub fn report_offline(&self, car_id: CarId) -> DispatchResult<()> {
        let (reply, reply_rx) = cbc::bounded(1);
        self.command_tx
            .send(CoordinatorCommand::CarOffline { car_id, reply })
            .map_err(|_| DispatchError::Disconnected)?;
        reply_rx.recv().map_err(|_| DispatchError::Disconnected)?
    }

    pub fn report_online(&self, car_id: CarId) -> DispatchResult<()> {
        let (reply, reply_rx) = cbc::bounded(1);
        self.command_tx
            .send(CoordinatorCommand::CarOnline { car_id, reply })
            .map_err(|_| DispatchError::Disconnected)?;
        reply_rx.recv().map_err(|_| DispatchError::Disconnected)?
    }

    pub fn shutdown(self) {
        let _ = self.command_tx.send(CoordinatorCommand::Terminate);
        for thread in self.threads {
            let _ = thread.join();
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
