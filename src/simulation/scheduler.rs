//! Fleet scheduler that ties the cars together
//!
//! The scheduler owns every car and all pending hall calls. Each tick it moves
//! the cars first and only then matches calls against them, so matching
//! always sees post-movement positions.

use log::{debug, info};
use std::collections::HashSet;
use std::fmt;

use super::car::{CarStatus, SimCar};
use super::error::{check_floor, SimError, SimResult};
use super::events::{EventSink, LogSink, NullSink};
use super::snapshot::{CarState, FleetState};
use super::stats::FleetStats;
use super::types::{CarId, Direction, Floor, Request};

/// A hall call plus the tick it was placed at
#[derive(Debug, Clone, Copy)]
struct PendingCall {
    request: Request,
    placed_at: u64,
}

/// Observable state after a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetStatus {
    pub time: u64,
    pub cars: Vec<CarStatus>,
    pub requests: Vec<Request>,
}

impl fmt::Display for FleetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} | cars:", self.time)?;
        for car in &self.cars {
            write!(f, " {}", car)?;
        }
        write!(f, " | calls:")?;
        if self.requests.is_empty() {
            write!(f, " none")?;
        }
        for request in &self.requests {
            write!(f, " {}", request)?;
        }
        Ok(())
    }
}

/// Dispatches hall calls across a fleet of cars
pub struct FleetScheduler {
    floor_count: Floor,

    /// Fleet order is fixed; ties go to the earlier car
    cars: Vec<SimCar>,

    /// Calls waiting for a car, in arrival order
    pending: Vec<PendingCall>,

    /// Simulation time in ticks
    time: u64,

    stats: FleetStats,

    sink: Box<dyn EventSink>,
}

impl FleetScheduler {
    fn new_internal(
        floor_count: Floor,
        cars: Vec<SimCar>,
        pending: Vec<PendingCall>,
        time: u64,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            floor_count,
            cars,
            pending,
            time,
            stats: FleetStats::new(),
            sink,
        }
    }

    /// Create a fleet of `car_count` idle cars on floor 1, narrating to the
    /// `log` facade at debug level
    pub fn new(floor_count: Floor, car_count: u32) -> SimResult<Self> {
        Self::with_sink(floor_count, car_count, Box::new(LogSink))
    }

    /// Create a fleet of `car_count` idle cars on floor 1
    pub fn with_sink(
        floor_count: Floor,
        car_count: u32,
        sink: Box<dyn EventSink>,
    ) -> SimResult<Self> {
        if floor_count == 0 {
            return Err(SimError::NoFloors);
        }
        if car_count == 0 {
            return Err(SimError::NoCars);
        }

        let cars = (1..=car_count)
            .map(|id| SimCar::new(CarId(id), floor_count, 1))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self::new_internal(floor_count, cars, Vec::new(), 0, sink))
    }

    /// Rebuild a scheduler from a snapshot.
    ///
    /// Cars come back idle with empty job queues at their recorded floor.
    /// Pending calls count as placed at the snapshot's time, and as placed
    /// in the fresh statistics.
    pub fn from_state(state: &FleetState, sink: Box<dyn EventSink>) -> SimResult<Self> {
        if state.floor_count == 0 {
            return Err(SimError::NoFloors);
        }
        if state.cars.is_empty() {
            return Err(SimError::NoCars);
        }

        let mut seen = HashSet::new();
        let mut cars = Vec::with_capacity(state.cars.len());
        for car in &state.cars {
            if !seen.insert(car.id) {
                return Err(SimError::DuplicateCarId(car.id));
            }
            cars.push(SimCar::new(car.id, state.floor_count, car.floor)?);
        }

        let pending = state
            .requests
            .iter()
            .map(|request| {
                check_floor(request.floor, state.floor_count)?;
                Ok(PendingCall {
                    request: *request,
                    placed_at: state.time,
                })
            })
            .collect::<SimResult<Vec<_>>>()?;

        debug!(
            "restored fleet of {} cars with {} pending calls at t={}",
            cars.len(),
            pending.len(),
            state.time
        );
        let mut scheduler =
            Self::new_internal(state.floor_count, cars, pending, state.time, sink);
        for _ in 0..scheduler.pending.len() {
            scheduler.stats.record_placed();
        }
        Ok(scheduler)
    }

    /// Replace the whole simulation with a snapshot, keeping this
    /// scheduler's event sink. On error nothing changes.
    pub fn restore(&mut self, state: &FleetState) -> SimResult<()> {
        let mut restored = Self::from_state(state, Box::new(NullSink))?;
        std::mem::swap(&mut restored.sink, &mut self.sink);
        *self = restored;
        Ok(())
    }

    /// Snapshot positions, pending calls and time. Car job queues are not
    /// part of the snapshot.
    pub fn current_state(&self) -> FleetState {
        FleetState {
            floor_count: self.floor_count,
            time: self.time,
            requests: self.requests(),
            cars: self
                .cars
                .iter()
                .map(|car| CarState {
                    id: car.id(),
                    floor: car.floor(),
                })
                .collect(),
        }
    }

    pub fn floor_count(&self) -> Floor {
        self.floor_count
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&SimCar> {
        self.cars.iter().find(|car| car.id() == id)
    }

    /// Pending hall calls in arrival order
    pub fn requests(&self) -> Vec<Request> {
        self.pending.iter().map(|call| call.request).collect()
    }

    pub fn stats(&self) -> &FleetStats {
        &self.stats
    }

    pub fn status(&self) -> FleetStatus {
        FleetStatus {
            time: self.time,
            cars: self.cars.iter().map(SimCar::status).collect(),
            requests: self.requests(),
        }
    }

    /// Register a hall call. It is matched on the next tick.
    pub fn request_call(&mut self, floor: Floor, direction: Direction) -> SimResult<()> {
        check_floor(floor, self.floor_count)?;

        let request = Request::new(floor, direction);
        self.pending.push(PendingCall {
            request,
            placed_at: self.time,
        });
        self.stats.record_placed();
        self.sink.emit(&format!("call registered at {}", request));
        Ok(())
    }

    /// Press a floor button inside car `car_id`
    pub fn assign_floor(&mut self, car_id: CarId, floor: Floor) -> SimResult<()> {
        let car = self
            .cars
            .iter_mut()
            .find(|car| car.id() == car_id)
            .ok_or(SimError::CarNotFound(car_id))?;
        car.assign_floor(floor, self.sink.as_mut())
    }

    /// Cheapest car for a call and its estimate. Ties go to the earlier car.
    pub fn best_car(&self, floor: Floor, direction: Direction) -> Option<(CarId, u32)> {
        self.best_car_index(floor, direction)
            .map(|(index, cost)| (self.cars[index].id(), cost))
    }

    fn best_car_index(&self, floor: Floor, direction: Direction) -> Option<(usize, u32)> {
        self.cars
            .iter()
            .enumerate()
            .map(|(index, car)| (index, car.estimate(floor, direction)))
            .min_by_key(|&(_, cost)| cost)
    }

    /// Advance the simulation `n` ticks
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    fn step(&mut self) {
        self.time += 1;

        let mut moved = Vec::with_capacity(self.cars.len());
        for car in &mut self.cars {
            moved.push(car.tick(self.sink.as_mut()));
        }

        self.match_requests(&mut moved);

        let status = self.status();
        self.sink.emit(&status.to_string());
    }

    /// Score every pending call against every car.
    ///
    /// A call whose best car can serve it right now is removed and that car
    /// holds its doors. Otherwise an idle best car that has not moved yet this
    /// tick is nudged one floor toward the call.
    fn match_requests(&mut self, moved: &mut [bool]) {
        let pending = std::mem::take(&mut self.pending);
        let mut still_pending = Vec::with_capacity(pending.len());

        for call in pending {
            let Request { floor, direction } = call.request;
            let (best, cost) = match self.best_car_index(floor, direction) {
                Some(best) => best,
                None => {
                    still_pending.push(call);
                    continue;
                }
            };

            let mut served = cost == 0;
            if !served && self.cars[best].is_idle() && !moved[best] {
                let car = &mut self.cars[best];
                if car.move_closer(floor, self.sink.as_mut()) {
                    moved[best] = true;
                    served = car.estimate(floor, direction) == 0;
                }
            }

            if served {
                self.serve(best, call);
            } else {
                still_pending.push(call);
            }
        }

        self.pending = still_pending;
    }

    fn serve(&mut self, index: usize, call: PendingCall) {
        let wait = self.time.saturating_sub(call.placed_at);
        self.stats.record_served(wait);

        let car = &mut self.cars[index];
        car.hold(self.sink.as_mut());
        self.sink.emit(&format!(
            "call {} served by car {} after {} tick(s)",
            call.request,
            car.id(),
            wait
        ));
    }

    /// Log a summary of the fleet
    pub fn log_summary(&self) {
        info!("=== Elevator Fleet Summary ===");
        info!("Time: {} ticks", self.time);
        info!("Floors: {}, Cars: {}", self.floor_count, self.cars.len());
        for car in &self.cars {
            info!(
                "  Car {}: floor={}, direction={}, boarding={}, up={:?}, down={:?}",
                car.id(),
                car.floor(),
                car.direction()
                    .map_or_else(|| "idle".to_string(), |d| d.to_string()),
                car.boarding_countdown(),
                car.jobs(Direction::Up),
                car.jobs(Direction::Down)
            );
        }
        info!("Pending calls: {}", self.pending.len());
        info!("{}", self.stats.summary());
    }
}
