//! Channel-driver adapters: selector mapping and the host simulation.

pub mod sim;
pub mod stm32;
