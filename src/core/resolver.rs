use crate::core::convert::to_temperature_result;
use crate::core::trace::{Telemetry, TraceContext};
use crate::domain::model::TemperatureResult;
use crate::domain::ports::{LocationLookup, WeatherLookup};
use crate::utils::error::Result;
use crate::utils::validation::validate_postal_code;
use opentelemetry::trace::SpanKind;

/// Validate → locate → fetch weather → convert, strictly in that order.
///
/// Holds no per-request state, so one instance serves all requests concurrently.
#[derive(Debug)]
pub struct WeatherResolutionService<L: LocationLookup, W: WeatherLookup> {
    location: L,
    weather: W,
    telemetry: Telemetry,
}

/// The split topology's compute edge. Same pipeline; its caller hands in the
/// context extracted from the gateway's request as `parent`.
pub type ResolverBackend<L, W> = WeatherResolutionService<L, W>;

impl<L: LocationLookup, W: WeatherLookup> WeatherResolutionService<L, W> {
    pub fn new(location: L, weather: W, telemetry: Telemetry) -> Self {
        Self {
            location,
            weather,
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub async fn resolve(&self, raw_cep: &str, parent: &TraceContext) -> Result<TemperatureResult> {
        let cep = validate_postal_code(raw_cep)?;
        tracing::debug!(cep = %cep, "postal code validated");

        let locality = {
            let span = self
                .telemetry
                .start_span("lookup_location", SpanKind::Client, parent);
            span.set_attribute("cep", cep.to_string());
            self.location
                .lookup(&cep, span.context())
                .await
                .inspect_err(|e| span.record_error(e))?
        };
        tracing::debug!(cep = %cep, locality = %locality, "locality resolved");

        let celsius = {
            let span = self
                .telemetry
                .start_span("lookup_weather", SpanKind::Client, parent);
            span.set_attribute("locality", locality.to_string());
            self.weather
                .current_celsius(&locality, span.context())
                .await
                .inspect_err(|e| span.record_error(e))?
        };
        tracing::debug!(locality = %locality, temp_c = celsius, "temperature resolved");

        Ok(to_temperature_result(locality, celsius))
    }
}
