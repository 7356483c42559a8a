//! Elevator Fleet Simulation Library
//!
//! A discrete-time elevator dispatch simulation that can run headless or be
//! driven from an interactive console.

pub mod console;
pub mod simulation;
