pub mod convert;
pub mod gateway;
pub mod resolver;
pub mod trace;

pub use crate::domain::model::{Locality, PostalCode, TemperatureResult};
pub use crate::domain::ports::{LocationLookup, WeatherLookup};
pub use crate::utils::error::Result;
pub use gateway::{BackendForwarder, ForwardedResponse, FrontGateway};
pub use resolver::WeatherResolutionService;
pub use trace::{Telemetry, TraceContext};
