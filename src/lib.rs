pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{ServiceRole, TomlConfig};

pub use adapters::http::{BackendClient, ViaCepClient, WeatherApiClient};
pub use core::{FrontGateway, Telemetry, TraceContext, WeatherResolutionService};
pub use utils::error::{ConfigError, PipelineError, Result};
