// src/connectors/mod.rs

pub mod steam;

pub use steam::{SteamCommunity, SteamCredentials};
