pub mod data;

pub use data::{ClimateReading, ContactReading, Measurement, MeasurementValue};
