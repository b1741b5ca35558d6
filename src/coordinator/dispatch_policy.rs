/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::BuildingConfig;
use crate::shared::{
    Behaviour, CarId, CarState, Direction, DispatchError, DispatchResult, FloorRequest, HallCall,
};

// Extra cost of starting an idle car compared to one already heading the right way
const IDLE_PENALTY: u32 = 1;
// Extra cost of a car that has to turn around before reaching the call
const TURN_PENALTY: u32 = 2;

/**
 * Picks the car serving each landing call.
 *
 * Holds the last reported state of every car and the assignment map. A landing call is owned
 * by at most one car at a time; the owner is recorded in the same call that picks it.
 *
 * # Fields
 * - `building`:     Floor range used by the travel estimates.
 * - `cars`:         Last known state per car, indexed by car id.
 * - `assignments`:  Owning car of every unserved landing call.
 * - `offline`:      Cars reported offline. Authoritative over the reported car states.
 * - `orphaned`:     Landing calls that lost their car while no other car was available.
 */
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    building: BuildingConfig,
    cars: Vec<CarState>,
    assignments: BTreeMap<HallCall, CarId>,
    offline: BTreeSet<CarId>,
    orphaned: Vec<HallCall>,
}

impl DispatchPolicy {
    pub fn new(building: &BuildingConfig, start_floor: i32) -> DispatchPolicy {
        DispatchPolicy {
            building: building.clone(),
            cars: (0..building.car_count)
                .map(|car_id| CarState::new(car_id, start_floor))
                .collect(),
            assignments: BTreeMap::new(),
            offline: BTreeSet::new(),
            orphaned: Vec::new(),
        }
    }

    /// Estimated cost for `car` to serve `request`, or `None` if the car is offline.
    pub fn score(&self, car: &CarState, request: &FloorRequest) -> Option<u32> {
        if self.offline.contains(&car.car_id) {
            return None;
        }

        let distance = car.floor.abs_diff(request.floor);
        let towards = Direction::towards(car.floor, request.floor);

        let cost = match car.direction {
            Direction::Idle => distance + IDLE_PENALTY,
            // A moving car reported at the call floor has already left it
            direction
                if (towards == direction
                    || (towards == Direction::Idle && car.behaviour != Behaviour::Moving))
                    && request.requested_direction.matches(direction) =>
            {
                distance
            }
            direction => self.turnaround_distance(car.floor, request.floor, direction) + TURN_PENALTY,
        };
        Some(cost)
    }

    /// Cheapest in-service car for `request`, lowest car id on ties. Does not record anything.
    pub fn choose(&self, request: &FloorRequest) -> DispatchResult<CarId> {
        self.cars
            .iter()
            .filter_map(|car| self.score(car, request).map(|cost| (cost, car.car_id)))
            .min()
            .map(|(_, car_id)| car_id)
            .ok_or(DispatchError::NoAvailableCar { floor: request.floor })
    }

    /// Picks and records the owner of a landing call.
    ///
    /// A call that is already owned keeps its car; the second return value tells whether the
    /// assignment is new.
    pub fn assign(&mut self, request: &FloorRequest) -> DispatchResult<(CarId, bool)> {
        if !self.building.contains(request.floor) {
            return Err(DispatchError::InvalidFloor {
                floor: request.floor,
                min: self.building.min_floor,
                max: self.building.max_floor,
            });
        }

        let call = HallCall::from_request(request);
        if let Some(car_id) = self.assignments.get(&call) {
            return Ok((*car_id, false));
        }

        let car_id = self.choose(request)?;
        self.assignments.insert(call, car_id);
        debug!("Landing call {:?} assigned to car {}", call, car_id);
        Ok((car_id, true))
    }

    pub fn update_car(&mut self, state: CarState) -> DispatchResult<()> {
        let car = self
            .cars
            .get_mut(state.car_id)
            .ok_or(DispatchError::UnknownCar(state.car_id))?;
        *car = state;
        Ok(())
    }

    /// Releases the landing calls `car_id` reports as answered.
    ///
    /// Only calls the car still owns are released; a call that moved to another car, or was
    /// assigned again after the report was sent, keeps its current owner.
    pub fn complete(&mut self, car_id: CarId, calls: &[HallCall]) -> Vec<HallCall> {
        let served: Vec<HallCall> = calls
            .iter()
            .filter(|call| self.assignments.get(call) == Some(&car_id))
            .copied()
            .collect();
        for call in &served {
            self.assignments.remove(call);
        }
        served
    }

    /// Takes a car out of dispatch and moves its landing calls to other cars.
    ///
    /// Returns the new owner of every moved call. Calls no car can take are kept as orphans
    /// until a car comes back.
    pub fn mark_offline(&mut self, car_id: CarId) -> DispatchResult<Vec<(FloorRequest, CarId)>> {
        let car = self
            .cars
            .get_mut(car_id)
            .ok_or(DispatchError::UnknownCar(car_id))?;
        car.behaviour = Behaviour::OutOfService;
        self.offline.insert(car_id);

        let lost: Vec<HallCall> = self
            .assignments
            .iter()
            .filter(|(_, owner)| **owner == car_id)
            .map(|(call, _)| *call)
            .collect();
        for call in &lost {
            self.assignments.remove(call);
        }

        Ok(self.reassign(lost))
    }

    /// Puts a car back into dispatch and hands out the orphaned calls.
    pub fn mark_online(&mut self, car_id: CarId) -> DispatchResult<Vec<(FloorRequest, CarId)>> {
        let car = self
            .cars
            .get_mut(car_id)
            .ok_or(DispatchError::UnknownCar(car_id))?;
        if !car.in_service() {
            car.behaviour = Behaviour::Idle;
        }
        self.offline.remove(&car_id);

        let orphaned = std::mem::take(&mut self.orphaned);
        Ok(self.reassign(orphaned))
    }

    #[cfg(test)]
    pub fn owner(&self, call: &HallCall) -> Option<CarId> {
        self.assignments.get(call).copied()
    }

    pub fn orphaned(&self) -> &[HallCall] {
        &self.orphaned
    }

    #[cfg(test)]
    pub fn car(&self, car_id: CarId) -> Option<&CarState> {
        self.cars.get(car_id)
    }

    fn reassign(&mut self, calls: Vec<HallCall>) -> Vec<(FloorRequest, CarId)> {
        let mut moved = Vec::new();
        for call in calls {
            let request = call.to_request();
            match self.assign(&request) {
                Ok((car_id, _)) => moved.push((request, car_id)),
                Err(e) => {
                    warn!("Landing call at floor {} left unassigned: {}", call.floor, e);
                    self.orphaned.push(call);
                }
            }
        }
        moved
    }

    // Travel to the end of the current sweep and back to `floor`
    fn turnaround_distance(&self, car_floor: i32, floor: i32, direction: Direction) -> u32 {
        match direction {
            Direction::Up => {
                self.building.max_floor.abs_diff(car_floor) + self.building.max_floor.abs_diff(floor)
            }
            _ => car_floor.abs_diff(self.building.min_floor) + floor.abs_diff(self.building.min_floor),
        }
    }
}
