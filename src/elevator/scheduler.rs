/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::RequestQueue;
use crate::shared::{CarState, Direction};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    // The current floor is pending and is served without moving
    Arrived(i32),
    Move { direction: Direction, target: i32 },
    Idle,
}

/**
 * SCAN stop selection for one car.
 *
 * The scheduler keeps the car heading in its direction while stops remain ahead of it, then
 * reverses once and serves the nearest stop on the other side. It holds no state of its own;
 * the car's direction lives in `CarState` and the stops in the car's `RequestQueue`.
 */
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanScheduler;

impl ScanScheduler {
    /// Next action for a car standing at `state.floor`. May flip `state.direction`.
    pub fn decide(&self, state: &mut CarState, queue: &mut RequestQueue) -> Decision {
        let floor = state.floor;

        // A pending stop at the current floor must win before any movement is considered
        if queue.contains(floor) {
            return Decision::Arrived(floor);
        }

        if queue.is_empty() {
            state.direction = Direction::Idle;
            return Decision::Idle;
        }

        let preferred = match state.direction {
            Direction::Idle => match queue.peek_next(floor, Direction::Idle) {
                Some(target) => Direction::towards(floor, target),
                None => Direction::Idle,
            },
            direction => direction,
        };

        for direction in [preferred, preferred.reversed()] {
            if direction != state.direction {
                queue.rebalance(floor, direction);
                state.direction = direction;
            }
            if let Some(target) = queue.peek_next(floor, direction) {
                return Decision::Move { direction, target };
            }
        }

        state.direction = Direction::Idle;
        Decision::Idle
    }

    /// Closer ahead stop for a car already travelling towards `active_target`.
    ///
    /// Only floors strictly past `state.floor` qualify, since the car has left its last
    /// reported floor.
    pub fn retarget(&self, state: &CarState, queue: &RequestQueue, active_target: i32) -> Option<i32> {
        let candidate = match state.direction {
            Direction::Up => queue.peek_next(state.floor + 1, Direction::Up)?,
            Direction::Down => queue.peek_next(state.floor - 1, Direction::Down)?,
            Direction::Idle => return None,
        };

        let closer = match state.direction {
            Direction::Up => candidate < active_target,
            _ => candidate > active_target,
        };
        if closer {
            Some(candidate)
        } else {
            None
        }
    }
}
