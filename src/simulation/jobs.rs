//! Per-direction stop queues for a single car

use sorted_vec::SortedVec;
use std::cmp::Reverse;

use super::types::{Direction, Floor};

/// Stops a car has committed to, split by the direction it will be
/// travelling when it serves them.
///
/// The up queue is ascending and the down queue descending, so the head of
/// either queue is always the next stop in sweep order.
#[derive(Debug, Clone)]
pub struct JobQueues {
    up: SortedVec<Floor>,
    down: SortedVec<Reverse<Floor>>,
}

impl Default for JobQueues {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueues {
    pub fn new() -> Self {
        Self {
            up: SortedVec::new(),
            down: SortedVec::new(),
        }
    }

    pub fn insert(&mut self, direction: Direction, floor: Floor) {
        match direction {
            Direction::Up => {
                self.up.insert(floor);
            }
            Direction::Down => {
                self.down.insert(Reverse(floor));
            }
        }
    }

    /// Next stop in the given direction
    pub fn head(&self, direction: Direction) -> Option<Floor> {
        match direction {
            Direction::Up => self.up.first().copied(),
            Direction::Down => self.down.first().map(|r| r.0),
        }
    }

    /// Remove every leading stop equal to `floor`. Returns how many went.
    pub fn pop_arrived(&mut self, direction: Direction, floor: Floor) -> usize {
        let mut popped = 0;
        while self.head(direction) == Some(floor) {
            match direction {
                Direction::Up => {
                    self.up.remove_index(0);
                }
                Direction::Down => {
                    self.down.remove_index(0);
                }
            }
            popped += 1;
        }
        popped
    }

    pub fn is_empty(&self, direction: Direction) -> bool {
        self.len(direction) == 0
    }

    pub fn len(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.up.len(),
            Direction::Down => self.down.len(),
        }
    }

    /// Stops in sweep order
    pub fn stops(&self, direction: Direction) -> Vec<Floor> {
        match direction {
            Direction::Up => self.up.iter().copied().collect(),
            Direction::Down => self.down.iter().map(|r| r.0).collect(),
        }
    }
}
