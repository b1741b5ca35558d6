/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::BTreeSet;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Direction;

/**
 * Pending stops of a single car.
 *
 * Stops are split in two ordered sets: `up_stops` is served in ascending order while the car
 * travels up, `down_stops` in descending order while it travels down. A floor lives in at most
 * one of the sets and is dropped from both once served.
 *
 * # Fields
 * - `up_stops`:    Floors to be served on the way up.
 * - `down_stops`:  Floors to be served on the way down.
 */
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestQueue {
    up_stops: BTreeSet<i32>,
    down_stops: BTreeSet<i32>,
}

impl RequestQueue {
    pub fn new() -> RequestQueue {
        RequestQueue::default()
    }

    /// Queues `floor` relative to the car position. Returns `false` if it was already queued.
    pub fn insert(&mut self, floor: i32, current_floor: i32, direction: Direction) -> bool {
        if self.contains(floor) {
            return false;
        }

        let goes_up = match direction {
            Direction::Up | Direction::Idle => floor >= current_floor,
            Direction::Down => floor > current_floor,
        };

        if goes_up {
            self.up_stops.insert(floor)
        } else {
            self.down_stops.insert(floor)
        }
    }

    /// Nearest stop in scan order, without removing it.
    pub fn peek_next(&self, current_floor: i32, direction: Direction) -> Option<i32> {
        match direction {
            Direction::Up => self.up_stops.range(current_floor..).next().copied(),
            Direction::Down => self.down_stops.range(..=current_floor).next_back().copied(),
            Direction::Idle => self
                .iter()
                .min_by_key(|floor| ((floor - current_floor).abs(), *floor)),
        }
    }

    pub fn remove(&mut self, floor: i32) -> bool {
        // Both sets are checked even though the invariant keeps a floor in only one
        let up = self.up_stops.remove(&floor);
        let down = self.down_stops.remove(&floor);
        up || down
    }

    /// Re-partitions every pending stop for a car at `current_floor` heading `direction`.
    pub fn rebalance(&mut self, current_floor: i32, direction: Direction) {
        let stops: Vec<i32> = self.iter().collect();
        self.up_stops.clear();
        self.down_stops.clear();
        for floor in stops {
            self.insert(floor, current_floor, direction);
        }
    }

    pub fn contains(&self, floor: i32) -> bool {
        self.up_stops.contains(&floor) || self.down_stops.contains(&floor)
    }

    pub fn is_empty(&self) -> bool {
        self.up_stops.is_empty() && self.down_stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.up_stops.len() + self.down_stops.len()
    }

    #[cfg(test)]
    /// Stops still ahead of a car at `current_floor` travelling `direction`.
    pub fn has_ahead(&self, current_floor: i32, direction: Direction) -> bool {
        match direction {
            Direction::Idle => false,
            _ => self.peek_next(current_floor, direction).is_some(),
        }
    }

    /// Every pending floor, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        let mut floors: Vec<i32> = self.up_stops.iter().chain(self.down_stops.iter()).copied().collect();
        floors.sort_unstable();
        floors.into_iter()
    }

    pub fn up_stops(&self) -> Vec<i32> {
        self.up_stops.iter().copied().collect()
    }

    pub fn down_stops(&self) -> Vec<i32> {
        self.down_stops.iter().rev().copied().collect()
    }
}
