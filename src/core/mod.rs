//! Core services shared by the arbiter and its subsystems

pub mod logging;
