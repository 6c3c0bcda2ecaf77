// src/simulation/mod.rs
//
// Offline stand-ins for the remote platform, for tests and demo runs.

pub mod steam;

pub use steam::{demo_inventory, Fault, SimCall, SimulatedSteam};
