//! Tooling for the four-electrode resistance rig: derive resistance tables from
//! raw captures, analyze the resulting curves for peak-to-peak velocity, and
//! convert raw ADC codes to volts.
pub mod config;
pub mod drivers;
pub mod recorder;
pub mod types;
