/*
 * Unit tests for the SCAN scheduler
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 *  - test_decide_serves_current_floor_first
 *  - test_decide_idle_when_empty
 *  - test_decide_idle_car_heads_for_nearest
 *  - test_decide_reverses_after_ahead_stops
 *  - test_decide_never_reverses_with_stops_ahead
 *  - test_decide_serves_every_floor_once
 *  - test_retarget_only_closer_floors_ahead
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod scheduler_tests {
    use crate::elevator::{Decision, RequestQueue, ScanScheduler};
    use crate::shared::CarState;
    use crate::shared::Direction::{self, Down, Idle, Up};

    fn setup(floor: i32, direction: Direction, stops: &[i32]) -> (CarState, RequestQueue) {
        let mut state = CarState::new(0, floor);
        state.direction = direction;
        let mut queue = RequestQueue::new();
        for stop in stops {
            queue.insert(*stop, floor, direction);
        }
        (state, queue)
    }

    // Drives the car through every decision, returning the served floors in order
    fn run_to_idle(state: &mut CarState, queue: &mut RequestQueue) -> Vec<i32> {
        let scheduler = ScanScheduler;
        let mut served = Vec::new();
        loop {
            match scheduler.decide(state, queue) {
                Decision::Arrived(floor) => {
                    queue.remove(floor);
                    served.push(floor);
                }
                Decision::Move { target, .. } => state.floor = target,
                Decision::Idle => return served,
            }
        }
    }

    #[test]
    fn test_decide_serves_current_floor_first() {
        // Arrange
        let (mut state, mut queue) = setup(3, Idle, &[3, 7]);

        // Act
        let decision = ScanScheduler.decide(&mut state, &mut queue);

        // Assert
        assert_eq!(decision, Decision::Arrived(3));
        assert_eq!(state.direction, Idle);
    }

    #[test]
    fn test_decide_idle_when_empty() {
        // Arrange
        let (mut state, mut queue) = setup(4, Up, &[]);

        // Act
        let decision = ScanScheduler.decide(&mut state, &mut queue);

        // Assert
        assert_eq!(decision, Decision::Idle);
        assert_eq!(state.direction, Idle);
    }

    #[test]
    fn test_decide_idle_car_heads_for_nearest() {
        // Arrange
        let (mut state, mut queue) = setup(5, Idle, &[9, 3]);

        // Act
        let decision = ScanScheduler.decide(&mut state, &mut queue);

        // Assert
        assert_eq!(decision, Decision::Move { direction: Down, target: 3 });
        assert_eq!(state.direction, Down);
    }

    #[test]
    fn test_decide_reverses_after_ahead_stops() {
        // Arrange
        // Moving up with ahead stops 6 and 9, and floor 2 behind the car
        let (mut state, mut queue) = setup(4, Up, &[6, 9, 2]);

        // Act
        let served = run_to_idle(&mut state, &mut queue);

        // Assert
        assert_eq!(served, vec![6, 9, 2]);
        assert!(queue.is_empty());
        assert_eq!(state.direction, Idle);
    }

    #[test]
    fn test_decide_never_reverses_with_stops_ahead() {
        // Arrange
        let (mut state, mut queue) = setup(5, Down, &[4, 1, 8, 10, 3]);
        let scheduler = ScanScheduler;
        let mut reversals = 0;
        let mut direction = state.direction;

        // Act & Assert
        loop {
            let ahead = queue.has_ahead(state.floor, state.direction);
            match scheduler.decide(&mut state, &mut queue) {
                Decision::Arrived(floor) => {
                    queue.remove(floor);
                }
                Decision::Move { direction: next, target } => {
                    if next != direction {
                        assert!(!ahead, "reversed with stops still ahead at floor {}", state.floor);
                        reversals += 1;
                        direction = next;
                    }
                    state.floor = target;
                }
                Decision::Idle => break,
            }
        }
        assert_eq!(reversals, 1);
    }

    #[test]
    fn test_decide_serves_every_floor_once() {
        // Arrange
        let stops = [1, 10, 4, 7, 2, 9, 5];
        let (mut state, mut queue) = setup(6, Idle, &stops);

        // Act
        let served = run_to_idle(&mut state, &mut queue);

        // Assert
        let mut sorted = served.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 4, 5, 7, 9, 10]);
        // Nearest first (5), down to 1, then back up
        assert_eq!(served, vec![5, 4, 2, 1, 7, 9, 10]);
    }

    #[test]
    fn test_retarget_only_closer_floors_ahead() {
        // Arrange
        // Left floor 4 heading for 9
        let (mut state, mut queue) = setup(4, Up, &[9]);
        let scheduler = ScanScheduler;

        // Act & Assert
        queue.insert(4, state.floor, state.direction);
        assert_eq!(scheduler.retarget(&state, &queue, 9), None);

        queue.insert(7, state.floor, state.direction);
        assert_eq!(scheduler.retarget(&state, &queue, 9), Some(7));

        queue.insert(2, state.floor, state.direction);
        assert_eq!(scheduler.retarget(&state, &queue, 7), None);

        state.direction = Down;
        state.floor = 6;
        assert_eq!(scheduler.retarget(&state, &queue, 1), Some(2));
        assert_eq!(scheduler.retarget(&state, &queue, 2), None);
    }
}
