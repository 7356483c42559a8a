//! Elevator car state machine and cost estimation

use super::error::{check_floor, SimError, SimResult};
use super::events::EventSink;
use super::jobs::JobQueues;
use super::types::{distance, travel_glyph, CarId, Direction, Floor, BOARDING_TIME};

/// Read-only view of a car for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarStatus {
    pub id: CarId,
    pub floor: Floor,
    pub direction: Option<Direction>,
}

impl std::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}{}", self.id, self.floor, travel_glyph(self.direction))
    }
}

/// A single elevator car
#[derive(Debug, Clone)]
pub struct SimCar {
    id: CarId,
    floor_count: Floor,
    floor: Floor,
    jobs: JobQueues,
    /// `None` while idle
    direction: Option<Direction>,
    /// Ticks left before the car may move again
    boarding_countdown: u32,
}

/// `floor` can be served while travelling from `from` to `to`
fn is_on_the_way(floor: Floor, from: Floor, to: Floor) -> bool {
    from.min(to) <= floor && floor <= from.max(to)
}

impl SimCar {
    /// Create an idle car with no jobs
    pub fn new(id: CarId, floor_count: Floor, floor: Floor) -> SimResult<Self> {
        if floor_count == 0 {
            return Err(SimError::NoFloors);
        }
        if id.0 == 0 {
            return Err(SimError::InvalidCarId(id));
        }
        check_floor(floor, floor_count)?;

        Ok(Self {
            id,
            floor_count,
            floor,
            jobs: JobQueues::new(),
            direction: None,
            boarding_countdown: 0,
        })
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn floor_count(&self) -> Floor {
        self.floor_count
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn boarding_countdown(&self) -> u32 {
        self.boarding_countdown
    }

    pub fn is_idle(&self) -> bool {
        self.direction.is_none()
    }

    /// Queued stops for one direction, in the order they will be served
    pub fn jobs(&self, direction: Direction) -> Vec<Floor> {
        self.jobs.stops(direction)
    }

    pub fn status(&self) -> CarStatus {
        CarStatus {
            id: self.id,
            floor: self.floor,
            direction: self.direction,
        }
    }

    /// Estimate how many ticks this car needs before it can pick up a
    /// passenger at `to_floor` who wants to travel `wanted`.
    ///
    /// A busy car simulates its current sweep and then the return sweep.
    /// The passenger can be picked up on the way only by a sweep heading the
    /// way they want to go. If neither sweep passes them, the car finishes
    /// all committed work first and then travels to them. Each simulated
    /// stop costs `BOARDING_TIME` on top of the travel distance.
    pub fn estimate(&self, to_floor: Floor, wanted: Direction) -> u32 {
        let current = match self.direction {
            Some(direction) => direction,
            None => return distance(self.floor, to_floor),
        };

        let mut position = self.floor;
        let mut sweep_cost = 0;

        for sweep in [current, current.opposite()] {
            for stop in self.jobs.stops(sweep) {
                if sweep == wanted && is_on_the_way(to_floor, position, stop) {
                    return self.boarding_countdown + sweep_cost + distance(position, to_floor);
                }
                sweep_cost += distance(position, stop) + BOARDING_TIME;
                position = stop;
            }
        }

        self.boarding_countdown + sweep_cost + distance(position, to_floor)
    }

    /// Queue a stop, as if the floor button inside the car was pressed
    pub fn assign_floor(&mut self, to_floor: Floor, sink: &mut dyn EventSink) -> SimResult<()> {
        check_floor(to_floor, self.floor_count)?;

        let direction = match Direction::between(self.floor, to_floor).or(self.direction) {
            Some(direction) => direction,
            // Idle and already there
            None => return Ok(()),
        };

        self.jobs.insert(direction, to_floor);
        if self.direction.is_none() {
            self.direction = Some(direction);
        }

        sink.emit(&format!(
            "car {}: job registered for floor {} ({})",
            self.id, to_floor, direction
        ));
        Ok(())
    }

    /// Advance one tick. Returns true if the car changed floor.
    pub fn tick(&mut self, sink: &mut dyn EventSink) -> bool {
        if self.boarding_countdown > 0 {
            self.boarding_countdown -= 1;
            if self.boarding_countdown == 0 {
                self.settle_direction(sink);
            }
            return false;
        }

        let direction = match self.direction {
            Some(direction) => direction,
            None => return false,
        };

        let target = match self.jobs.head(direction) {
            Some(target) => target,
            None => {
                self.settle_direction(sink);
                return false;
            }
        };

        let mut moved = false;
        if let Some(step) = Direction::between(self.floor, target) {
            self.floor = step.step(self.floor);
            moved = true;
            sink.emit(&format!("car {}: moving {} to floor {}", self.id, step, self.floor));
        }

        if self.floor == target {
            let passengers = self.jobs.pop_arrived(direction, self.floor);
            self.boarding_countdown = BOARDING_TIME;
            sink.emit(&format!(
                "car {}: arrived at floor {} ({} stop{})",
                self.id,
                self.floor,
                passengers,
                if passengers == 1 { "" } else { "s" }
            ));
        }

        moved
    }

    /// Move one floor toward `floor` without committing to it.
    ///
    /// Only an idle car that is not boarding will move. No job is created and
    /// the direction stays unset.
    pub fn move_closer(&mut self, floor: Floor, sink: &mut dyn EventSink) -> bool {
        if self.direction.is_some() || self.boarding_countdown > 0 {
            return false;
        }
        if check_floor(floor, self.floor_count).is_err() {
            return false;
        }

        match Direction::between(self.floor, floor) {
            Some(step) => {
                self.floor = step.step(self.floor);
                sink.emit(&format!(
                    "car {}: nudged to floor {} toward {}",
                    self.id, self.floor, floor
                ));
                true
            }
            None => false,
        }
    }

    /// Open the doors for a full boarding period
    pub fn hold(&mut self, sink: &mut dyn EventSink) {
        self.boarding_countdown = BOARDING_TIME;
        sink.emit(&format!("car {}: holding at floor {}", self.id, self.floor));
    }

    /// Keep going while the current direction has stops, otherwise turn
    /// around, otherwise go idle.
    fn settle_direction(&mut self, sink: &mut dyn EventSink) {
        let direction = match self.direction {
            Some(direction) => direction,
            None => return,
        };
        if !self.jobs.is_empty(direction) {
            return;
        }

        let opposite = direction.opposite();
        if self.jobs.is_empty(opposite) {
            self.direction = None;
            sink.emit(&format!("car {}: idle at floor {}", self.id, self.floor));
        } else {
            self.direction = Some(opposite);
            sink.emit(&format!("car {}: reversing to {}", self.id, opposite));
        }
    }
}
