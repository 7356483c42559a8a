//! Plain snapshot of a scheduler for save/restore

use serde::{Deserialize, Serialize};

use super::types::{CarId, Floor, Request};

/// Position of one car. Job queues are not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarState {
    pub id: CarId,
    pub floor: Floor,
}

/// Everything needed to rebuild a scheduler, minus in-flight car jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetState {
    pub floor_count: Floor,
    pub time: u64,
    pub requests: Vec<Request>,
    pub cars: Vec<CarState>,
}
