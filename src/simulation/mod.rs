//! Standalone elevator simulation module
//!
//! This module contains the dispatch and movement logic for a fleet of
//! elevator cars. It has no I/O of its own: narration goes through an
//! injected [`EventSink`] and persistence is a plain [`FleetState`] value.

mod car;
mod error;
mod events;
mod jobs;
mod scheduler;
mod snapshot;
mod stats;
mod traffic;
mod types;

pub use car::{CarStatus, SimCar};
pub use error::{check_floor, SimError, SimResult};
pub use events::{EventSink, LogSink, NullSink};
pub use jobs::JobQueues;
pub use scheduler::{FleetScheduler, FleetStatus};
pub use snapshot::{CarState, FleetState};
pub use stats::FleetStats;
pub use traffic::{TrafficEvent, TrafficGenerator};
pub use types::{distance, travel_glyph, CarId, Direction, Floor, Request, BOARDING_TIME};
