/*
 * Unit tests for the elevator controller
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 * The motion driver is replaced by a channel that records every move command.
 *
 * Tests:
 *  - test_controller_init
 *  - test_controller_request_at_current_floor
 *  - test_controller_rejects_invalid_floor
 *  - test_controller_duplicate_request
 *  - test_controller_scan_reversal
 *  - test_controller_merges_stop_into_route
 *  - test_controller_out_of_service_keeps_cab_stops
 *  - test_controller_reports_answered_landing_calls
 *  - test_controller_thread_with_simulated_driver
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod controller_tests {
    use crate::config::BuildingConfig;
    use crate::elevator::{
        CarCommand, CarSignal, ElevatorController, MotionCommand, SimulatedDriver,
    };
    use crate::shared::Behaviour::{Idle, Moving, OutOfService};
    use crate::shared::Direction::{Down, Up};
    use crate::shared::{CallDirection, CarEvent, DispatchError, FloorRequest, HallCall};
    use crossbeam_channel::{unbounded, Receiver, Sender};
    use std::thread::Builder;
    use std::time::Duration;

    fn building() -> BuildingConfig {
        BuildingConfig {
            min_floor: 1,
            max_floor: 10,
            car_count: 1,
        }
    }

    fn setup_controller(
        start_floor: i32,
    ) -> (
        ElevatorController<Sender<MotionCommand>>,
        Receiver<MotionCommand>, // driver_rx
        Sender<CarCommand>,      // command_tx
        Sender<CarSignal>,       // signal_tx
        Receiver<CarEvent>,      // event_rx
    ) {
        // Arrange mock channels
        let (driver_tx, driver_rx) = unbounded::<MotionCommand>();
        let (command_tx, command_rx) = unbounded::<CarCommand>();
        let (signal_tx, signal_rx) = unbounded::<CarSignal>();
        let (event_tx, event_rx) = unbounded::<CarEvent>();

        (
            ElevatorController::new(
                0,
                &building(),
                start_floor,
                driver_tx,
                command_rx,
                signal_rx,
                event_tx,
            ),
            driver_rx,
            command_tx,
            signal_tx,
            event_rx,
        )
    }

    fn served(event_rx: &Receiver<CarEvent>) -> Vec<i32> {
        event_rx
            .try_iter()
            .filter_map(|event| match event {
                CarEvent::Served { floor, .. } => Some(floor),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_controller_reports_answered_landing_calls() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, event_rx) = setup_controller(3);
        controller.submit_request(FloorRequest::internal(0, 5)).unwrap();
        driver_rx.try_recv().unwrap();

        // Act
        // Same floor as the cab stop: not queued twice, but still owed to the landing
        let landing = controller.submit_request(FloorRequest::external(5, CallDirection::Up));
        controller.on_arrival(5);
        controller.submit_request(FloorRequest::internal(0, 7)).unwrap();
        controller.on_arrival(7);

        // Assert
        assert_eq!(landing, Ok(false));
        let answered: Vec<(i32, Vec<HallCall>)> = event_rx
            .try_iter()
            .filter_map(|event| match event {
                CarEvent::Served { floor, calls, .. } => Some((floor, calls)),
                _ => None,
            })
            .collect();
        assert_eq!(
            answered,
            vec![(5, vec![HallCall { floor: 5, up: true }]), (7, vec![])]
        );
    }

    #[test]
    fn test_controller_init() {
        // Arrange
        let (controller, driver_rx, _command_tx, _signal_tx, _event_rx) = setup_controller(1);

        // Assert
        assert_eq!(controller.state().floor, 1);
        assert_eq!(controller.state().behaviour, Idle);
        assert!(!controller.state().door_open);
        assert!(controller.queue().is_empty());
        assert!(driver_rx.try_recv().is_err());
    }

    #[test]
    fn test_controller_request_at_current_floor() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, event_rx) = setup_controller(3);

        // Act
        let result = controller.submit_request(FloorRequest::internal(0, 3));

        // Assert
        assert_eq!(result, Ok(true));
        assert_eq!(served(&event_rx), vec![3]);
        assert!(driver_rx.try_recv().is_err(), "no move may be issued");
        assert_eq!(controller.state().behaviour, Idle);
        assert!(controller.state().door_open);
        assert!(controller.queue().is_empty());
    }

    #[test]
    fn test_controller_rejects_invalid_floor() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, _event_rx) = setup_controller(1);

        // Act
        let result = controller.submit_request(FloorRequest::external(15, CallDirection::Down));

        // Assert
        assert_eq!(
            result,
            Err(DispatchError::InvalidFloor {
                floor: 15,
                min: 1,
                max: 10
            })
        );
        assert!(controller.queue().is_empty());
        assert!(driver_rx.try_recv().is_err());
    }

    #[test]
    fn test_controller_duplicate_request() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, _event_rx) = setup_controller(1);

        // Act
        let first = controller.submit_request(FloorRequest::internal(0, 6));
        let queue_after_first = controller.queue().clone();
        let second = controller.submit_request(FloorRequest::external(6, CallDirection::Up));

        // Assert
        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        assert_eq!(*controller.queue(), queue_after_first);
        assert_eq!(driver_rx.try_iter().count(), 1);
    }

    #[test]
    fn test_controller_scan_reversal() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, event_rx) = setup_controller(4);

        // Act
        controller.submit_request(FloorRequest::internal(0, 6)).unwrap();
        controller.submit_request(FloorRequest::internal(0, 9)).unwrap();
        controller.submit_request(FloorRequest::internal(0, 2)).unwrap();

        // Assert
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Up, target: 6 });
        assert!(driver_rx.try_recv().is_err());

        controller.on_passing(5);
        controller.on_arrival(6);
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Up, target: 9 });

        controller.on_arrival(9);
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Down, target: 2 });
        assert_eq!(controller.state().direction, Down);

        controller.on_arrival(2);
        assert!(driver_rx.try_recv().is_err());
        assert_eq!(controller.state().behaviour, Idle);
        assert_eq!(served(&event_rx), vec![6, 9, 2]);
    }

    #[test]
    fn test_controller_merges_stop_into_route() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, event_rx) = setup_controller(1);
        controller.submit_request(FloorRequest::internal(0, 8)).unwrap();
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Up, target: 8 });
        controller.on_passing(2);
        controller.on_passing(3);

        // Act
        // Floor 3 is already behind the car, floor 5 is on the way
        controller.submit_request(FloorRequest::external(3, CallDirection::Up)).unwrap();
        controller.submit_request(FloorRequest::external(5, CallDirection::Up)).unwrap();

        // Assert
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Up, target: 5 });
        assert_eq!(controller.active_target(), Some(5));

        controller.on_arrival(5);
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Up, target: 8 });
        controller.on_arrival(8);
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Down, target: 3 });
        controller.on_arrival(3);
        assert_eq!(served(&event_rx), vec![5, 8, 3]);
    }

    #[test]
    fn test_controller_out_of_service_keeps_cab_stops() {
        // Arrange
        let (mut controller, driver_rx, _command_tx, _signal_tx, _event_rx) = setup_controller(1);
        controller.submit_request(FloorRequest::internal(0, 4)).unwrap();
        controller.submit_request(FloorRequest::external(7, CallDirection::Down)).unwrap();
        let _ = driver_rx.try_iter().count();

        // Act
        controller.take_out_of_service();
        let rejected = controller.submit_request(FloorRequest::external(9, CallDirection::Down));
        controller.on_arrival(4);

        // Assert
        assert_eq!(rejected, Err(DispatchError::NoAvailableCar { floor: 9 }));
        assert_eq!(controller.state().behaviour, OutOfService);
        assert!(controller.queue().is_empty());
        assert!(driver_rx.try_recv().is_err());

        // Back in service with a new cab stop
        controller.submit_request(FloorRequest::internal(0, 2)).unwrap();
        controller.resume();
        assert_eq!(controller.state().behaviour, Moving);
        assert_eq!(driver_rx.try_recv().unwrap(), MotionCommand { direction: Down, target: 2 });
    }

    #[test]
    fn test_controller_thread_with_simulated_driver() {
        // Arrange
        let (driver_tx, driver_rx) = unbounded::<MotionCommand>();
        let (command_tx, command_rx) = unbounded::<CarCommand>();
        let (signal_tx, signal_rx) = unbounded::<CarSignal>();
        let (event_tx, event_rx) = unbounded::<CarEvent>();

        let driver = SimulatedDriver::new(0, 1, Duration::from_millis(1), driver_rx, signal_tx);
        let controller =
            ElevatorController::new(0, &building(), 1, driver_tx, command_rx, signal_rx, event_tx);

        let driver_thread = Builder::new()
            .name("test_driver".into())
            .spawn(move || driver.run())
            .unwrap();
        let controller_thread = Builder::new()
            .name("test_controller".into())
            .spawn(move || controller.run())
            .unwrap();

        // Act
        command_tx.send(CarCommand::Request(FloorRequest::internal(0, 5))).unwrap();

        // Assert
        loop {
            match event_rx.recv_timeout(Duration::from_secs(3)) {
                Ok(CarEvent::Served { floor, .. }) => {
                    assert_eq!(floor, 5);
                    break;
                }
                Ok(_) => {}
                Err(e) => panic!("Error receiving from event_rx: {:?}", e),
            }
        }

        // Cleanup
        command_tx.send(CarCommand::Terminate).unwrap();
        controller_thread.join().unwrap();
        driver_thread.join().unwrap();
    }
}
