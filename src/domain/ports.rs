use crate::core::trace::TraceContext;
use crate::domain::model::{Locality, PostalCode};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Postal code → locality.
///
/// Implementations make a single attempt and attach `cx` to the outbound call.
/// An empty locality must surface as `LocationNotFound`, never as `Ok`.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn lookup(&self, cep: &PostalCode, cx: &TraceContext) -> Result<Locality>;
}

/// Locality → current temperature in Celsius.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_celsius(&self, locality: &Locality, cx: &TraceContext) -> Result<f64>;
}
