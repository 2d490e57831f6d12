use crate::domain::model::{Locality, TemperatureResult};

/// Kelvin offset (273, not 273.15).
pub const KELVIN_OFFSET: f64 = 273.0;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

pub fn to_temperature_result(locality: Locality, celsius: f64) -> TemperatureResult {
    TemperatureResult {
        city: locality.into_inner(),
        temp_c: celsius,
        temp_f: celsius_to_fahrenheit(celsius),
        temp_k: celsius_to_kelvin(celsius),
    }
}
