//! Process simulation for the production line.
//!
//! Readings drift from the previous reading by a bounded random jitter and are
//! classified as defective when any value leaves its safe interval. Randomness
//! comes from a [`SimulationSource`] so that tests can script exact sequences.

mod process;
mod source;

pub use process::{
    DEFAULT_VALUES, GLAZING_THICKNESS_JITTER, GLAZING_THICKNESS_SAFE, Interval, MIXING_SPEED_JITTER,
    MIXING_SPEED_SAFE, PRESSURE_JITTER, PRESSURE_SAFE, ProcessValues, TEMPERATURE_JITTER,
    TEMPERATURE_SAFE,
};
pub use source::{RandSource, SimulationSource};
