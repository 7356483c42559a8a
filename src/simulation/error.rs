//! Errors raised by the simulation core

use thiserror::Error;

use super::types::{CarId, Floor};

/// Every rejected call leaves the simulation exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("floor {floor} is outside the building (1..={floor_count})")]
    FloorOutOfRange { floor: Floor, floor_count: Floor },

    #[error("a building needs at least one floor")]
    NoFloors,

    #[error("a fleet needs at least one car")]
    NoCars,

    #[error("car id {0} is invalid (ids start at 1)")]
    InvalidCarId(CarId),

    #[error("car id {0} appears more than once")]
    DuplicateCarId(CarId),

    #[error("no car with id {0}")]
    CarNotFound(CarId),
}

impl SimError {
    /// Argument outside its allowed range
    pub fn is_range_error(&self) -> bool {
        !self.is_not_found()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SimError::CarNotFound(_))
    }
}

pub type SimResult<T> = std::result::Result<T, SimError>;

/// Check that `floor` lies in `1..=floor_count`
pub fn check_floor(floor: Floor, floor_count: Floor) -> SimResult<Floor> {
    if floor == 0 || floor > floor_count {
        return Err(SimError::FloorOutOfRange { floor, floor_count });
    }
    Ok(floor)
}
