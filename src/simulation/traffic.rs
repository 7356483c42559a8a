//! Random passenger traffic for headless runs

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::error::SimResult;
use super::scheduler::FleetScheduler;
use super::types::{CarId, Direction, Floor};

/// One tick's worth of generated input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficEvent {
    Call { floor: Floor, direction: Direction },
    Press { car: CarId, floor: Floor },
}

/// Generates hall calls and cab presses at fixed per-tick probabilities
pub struct TrafficGenerator {
    /// Optional seeded RNG for reproducible runs
    rng: Option<StdRng>,
    call_rate: f64,
    press_rate: f64,
}

impl TrafficGenerator {
    fn new_internal(rng: Option<StdRng>, call_rate: f64, press_rate: f64) -> Self {
        Self {
            rng,
            call_rate: call_rate.clamp(0.0, 1.0),
            press_rate: press_rate.clamp(0.0, 1.0),
        }
    }

    pub fn new(call_rate: f64, press_rate: f64) -> Self {
        Self::new_internal(None, call_rate, press_rate)
    }

    /// Create a generator with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64, call_rate: f64, press_rate: f64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)), call_rate, press_rate)
    }

    fn chance(&mut self, probability: f64) -> bool {
        match &mut self.rng {
            Some(rng) => rng.random_bool(probability),
            None => rand::rng().random_bool(probability),
        }
    }

    fn random_between(&mut self, low: u32, high: u32) -> u32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(low..=high),
            None => rand::rng().random_range(low..=high),
        }
    }

    /// Events for a single tick, for a building of `floor_count` floors
    /// served by the cars in `car_ids`
    pub fn generate(&mut self, floor_count: Floor, car_ids: &[CarId]) -> Vec<TrafficEvent> {
        let mut events = Vec::new();

        if floor_count > 1 && self.chance(self.call_rate) {
            let floor = self.random_between(1, floor_count);
            let direction = if floor == 1 {
                Direction::Up
            } else if floor == floor_count {
                Direction::Down
            } else if self.chance(0.5) {
                Direction::Up
            } else {
                Direction::Down
            };
            events.push(TrafficEvent::Call { floor, direction });
        }

        if !car_ids.is_empty() && self.chance(self.press_rate) {
            let index = self.random_between(0, car_ids.len() as u32 - 1) as usize;
            let floor = self.random_between(1, floor_count);
            events.push(TrafficEvent::Press {
                car: car_ids[index],
                floor,
            });
        }

        events
    }

    /// Generate one tick of traffic and feed it to `scheduler`
    pub fn apply(&mut self, scheduler: &mut FleetScheduler) -> SimResult<Vec<TrafficEvent>> {
        let car_ids: Vec<CarId> = scheduler.cars().iter().map(|car| car.id()).collect();
        let events = self.generate(scheduler.floor_count(), &car_ids);

        for event in &events {
            match *event {
                TrafficEvent::Call { floor, direction } => {
                    scheduler.request_call(floor, direction)?
                }
                TrafficEvent::Press { car, floor } => scheduler.assign_floor(car, floor)?,
            }
        }

        Ok(events)
    }
}
