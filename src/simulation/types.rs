//! Core types for the elevator simulation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A floor number. Valid floors are `1..=floor_count`.
pub type Floor = u32;

/// Ticks a car stays at a stop after arriving. Also the per-stop penalty
/// used when estimating how long a car needs to serve a call.
pub const BOARDING_TIME: u32 = 2;

/// A wrapper type for car IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub u32);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of travel, or the direction a hall call wants to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Direction needed to get from `from` to `to`, if they differ
    pub fn between(from: Floor, to: Floor) -> Option<Direction> {
        if to > from {
            Some(Direction::Up)
        } else if to < from {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Move `floor` one step in this direction
    pub fn step(self, floor: Floor) -> Floor {
        match self {
            Direction::Up => floor + 1,
            Direction::Down => floor - 1,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
        }
    }
}

/// Glyph for an optional travel direction (idle cars get a dot)
pub fn travel_glyph(direction: Option<Direction>) -> char {
    direction.map_or('·', Direction::glyph)
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A hall call waiting for a car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub floor: Floor,
    pub direction: Direction,
}

impl Request {
    pub fn new(floor: Floor, direction: Direction) -> Self {
        Self { floor, direction }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.floor, self.direction.glyph())
    }
}

/// Absolute distance between two floors
pub fn distance(a: Floor, b: Floor) -> u32 {
    a.abs_diff(b)
}
