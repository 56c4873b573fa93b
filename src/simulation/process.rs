use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SimulationSource;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Boundary values are inside.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

// Safe operating intervals (degC, bar, rpm, mm)
pub const TEMPERATURE_SAFE: Interval = Interval::new(160.0, 180.0);
pub const PRESSURE_SAFE: Interval = Interval::new(2.0, 3.8);
pub const MIXING_SPEED_SAFE: Interval = Interval::new(55.0, 65.0);
pub const GLAZING_THICKNESS_SAFE: Interval = Interval::new(1.8, 2.8);

// Per-step drift applied by the simulator
pub const TEMPERATURE_JITTER: Interval = Interval::new(-0.1, 0.2);
pub const PRESSURE_JITTER: Interval = Interval::new(-0.01, 0.02);
pub const MIXING_SPEED_JITTER: Interval = Interval::new(-0.2, 0.2);
pub const GLAZING_THICKNESS_JITTER: Interval = Interval::new(-0.01, 0.02);

/// Values used to seed a batch when no settings row is active.
pub const DEFAULT_VALUES: ProcessValues = ProcessValues {
    temperature: 170.0,
    pressure: 2.5,
    mixing_speed: 60.0,
    glazing_thickness: 2.0,
};

/// The four process values recorded for every reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessValues {
    pub temperature: f64,
    pub pressure: f64,
    pub mixing_speed: f64,
    pub glazing_thickness: f64,
}

impl ProcessValues {
    /// A reading is defective when at least one value is outside its safe interval.
    #[must_use]
    pub fn is_defective(&self) -> bool {
        !TEMPERATURE_SAFE.contains(self.temperature)
            || !PRESSURE_SAFE.contains(self.pressure)
            || !MIXING_SPEED_SAFE.contains(self.mixing_speed)
            || !GLAZING_THICKNESS_SAFE.contains(self.glazing_thickness)
    }

    /// Next reading derived from this one.
    ///
    /// Draws one jitter per field, in field order: temperature, pressure,
    /// mixing speed, glazing thickness.
    #[must_use]
    pub fn drift(&self, source: &dyn SimulationSource) -> Self {
        let jitter = |range: Interval| source.uniform(range.min, range.max);

        let temperature = self.temperature + jitter(TEMPERATURE_JITTER);
        let pressure = self.pressure + jitter(PRESSURE_JITTER);
        let mixing_speed = self.mixing_speed + jitter(MIXING_SPEED_JITTER);
        let glazing_thickness = self.glazing_thickness + jitter(GLAZING_THICKNESS_JITTER);

        Self {
            temperature,
            pressure,
            mixing_speed,
            glazing_thickness,
        }
    }
}
